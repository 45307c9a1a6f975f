//! Command-line token report
//!
//! ```text
//! token-report <coin-id> <amount-usd>
//! ```
//!
//! Prints the report table, or the "did you mean" message when the coin
//! cannot be resolved. Exits with status 2 on invalid input.

use std::process::ExitCode;

use token_advisor::{AdvisorError, MarketConfig, ReportAssembler, ReportOutcome, TokenReport};

const USAGE: &str = "usage: token-report <coin-id> <amount-usd>";

fn print_table(report: &TokenReport) {
    let width = report
        .rows()
        .iter()
        .map(|row| row.label.chars().count())
        .max()
        .unwrap_or(0);

    println!("{:<width$}  Value & Explanation", "Metric");
    println!("{}", "─".repeat(width + 40));
    for (label, value) in report.pairs() {
        println!("{label:<width$}  {value}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [coin, amount] = args.as_slice() else {
        eprintln!("{USAGE}");
        return Ok(ExitCode::from(2));
    };

    let assembler = ReportAssembler::new(MarketConfig::from_env().client()?);

    match assembler.run(coin, amount).await {
        Ok(ReportOutcome::Report(report)) => {
            print_table(&report);
            Ok(ExitCode::SUCCESS)
        }
        Ok(ReportOutcome::NotFound { suggestions, .. }) => {
            eprintln!("{}", suggestions.not_found_message());
            Ok(ExitCode::FAILURE)
        }
        Err(err @ AdvisorError::InvalidInput(_)) => {
            eprintln!("Input Error: {}", err.user_message());
            Ok(ExitCode::from(2))
        }
        Err(err) => Err(err.into()),
    }
}
