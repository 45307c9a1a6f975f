//! CoinGecko Market Data Client
//!
//! Talks to the public CoinGecko v3 REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{MarketDataClient, MarketResult};
use crate::error::{AdvisorError, MarketDataError, Result};
use crate::model::{CoinListing, PriceSeries, TokenSnapshot};

const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// CoinGecko client configuration
#[derive(Clone, Debug)]
pub struct CoinGeckoConfig {
    /// API root, without trailing slash
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl CoinGeckoConfig {
    /// Read `COINGECKO_BASE_URL` and `COINGECKO_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source; unset or unparsable keys keep defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("COINGECKO_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());

        let timeout_secs = match lookup("COINGECKO_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(
                    value = %raw,
                    "Invalid COINGECKO_TIMEOUT_SECS, using {}s",
                    DEFAULT_TIMEOUT_SECS
                );
                DEFAULT_TIMEOUT_SECS
            }),
            None => DEFAULT_TIMEOUT_SECS,
        };

        Self {
            base_url,
            timeout_secs,
        }
    }
}

// --- Response Structs ---

#[derive(Debug, Deserialize)]
struct CoinResponse {
    id: String,
    symbol: String,
    name: String,
    market_data: Option<CoinMarketData>,
}

#[derive(Debug, Default, Deserialize)]
struct CoinMarketData {
    #[serde(default)]
    current_price: UsdQuote,
    #[serde(default)]
    market_cap: UsdQuote,
    circulating_supply: Option<f64>,
    total_supply: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct UsdQuote {
    usd: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    /// `[timestamp_ms, price]` pairs
    prices: Vec<(f64, f64)>,
}

/// CoinGecko REST client
pub struct CoinGeckoClient {
    client: Client,
    config: CoinGeckoConfig,
}

impl CoinGeckoClient {
    pub fn new(config: CoinGeckoConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("token-advisor/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AdvisorError::Config(format!("HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(CoinGeckoConfig::from_env())
    }

    pub fn config(&self) -> &CoinGeckoConfig {
        &self.config
    }

    /// Base URL with `segments` appended, each percent-encoded as a single
    /// path segment
    fn endpoint(&self, segments: &[&str]) -> MarketResult<Url> {
        let base = &self.config.base_url;
        let mut url = Url::parse(base).map_err(|e| {
            MarketDataError::Unavailable(format!("invalid base URL {base}: {e}"))
        })?;
        url.path_segments_mut()
            .map_err(|()| MarketDataError::Unavailable(format!("base URL {base} has no path")))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET the endpoint and decode JSON. A 404 becomes `NotFound(subject)`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
        subject: &str,
    ) -> MarketResult<T> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%url, "Requesting CoinGecko");

        let response = self.client.get(url.clone()).query(query).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(MarketDataError::NotFound(subject.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%url, %status, "CoinGecko request failed");
            return Err(MarketDataError::Unavailable(format!(
                "{status} from {}: {}",
                url.path(),
                body.chars().take(200).collect::<String>()
            )));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// `.` and `..` would be dropped from the path, so they can never name a coin
fn coin_segment(id: &str) -> MarketResult<&str> {
    match id {
        "" | "." | ".." => Err(MarketDataError::NotFound(id.to_string())),
        _ => Ok(id),
    }
}

/// Aggregate figures are kept as `f64`; absent means zero
fn aggregate(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

impl CoinResponse {
    fn into_snapshot(self) -> MarketResult<TokenSnapshot> {
        let market = self.market_data.ok_or_else(|| {
            MarketDataError::Unavailable(format!("no market_data for {}", self.id))
        })?;

        let price = match market.current_price.usd {
            None => Decimal::ZERO,
            Some(usd) => Decimal::from_f64(usd).ok_or_else(|| {
                MarketDataError::Unavailable(format!("current_price.usd out of range: {usd}"))
            })?,
        };

        Ok(TokenSnapshot::new(self.id, self.name, self.symbol)
            .with_price(price)
            .with_market_cap(aggregate(market.market_cap.usd))
            .with_supply(
                aggregate(market.circulating_supply),
                aggregate(market.total_supply),
            ))
    }
}

#[async_trait]
impl MarketDataClient for CoinGeckoClient {
    async fn fetch_snapshot(&self, id: &str) -> MarketResult<TokenSnapshot> {
        let coin: CoinResponse = self
            .get_json(
                &["coins", coin_segment(id)?],
                &[
                    ("localization", "false"),
                    ("tickers", "false"),
                    ("community_data", "false"),
                    ("developer_data", "false"),
                ],
                id,
            )
            .await?;

        coin.into_snapshot()
    }

    async fn fetch_price_history(&self, id: &str, days: u32) -> MarketResult<PriceSeries> {
        let days = days.to_string();
        let chart: MarketChartResponse = self
            .get_json(
                &["coins", coin_segment(id)?, "market_chart"],
                &[("vs_currency", "usd"), ("days", days.as_str())],
                id,
            )
            .await?;

        Ok(chart.prices.into_iter().map(|(_, price)| price).collect::<Vec<_>>().into())
    }

    async fn fetch_all_identifiers(&self) -> MarketResult<Vec<CoinListing>> {
        self.get_json(&["coins", "list"], &[], "coins/list").await
    }

    async fn health_check(&self) -> bool {
        match self.get_json::<serde_json::Value>(&["ping"], &[], "ping").await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("CoinGecko health check failed: {}", e);
                false
            }
        }
    }

    fn name(&self) -> &str {
        "CoinGecko"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn client_for(server: &mockito::Server) -> CoinGeckoClient {
        CoinGeckoClient::new(CoinGeckoConfig {
            base_url: server.url(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = CoinGeckoConfig::from_lookup(|_| None);
        assert_eq!(config.base_url, "https://api.coingecko.com/api/v3");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_config_overrides() {
        let config = CoinGeckoConfig::from_lookup(|key| match key {
            "COINGECKO_BASE_URL" => Some("http://localhost:9000/api/".into()),
            "COINGECKO_TIMEOUT_SECS" => Some("not-a-number".into()),
            _ => None,
        });
        assert_eq!(config.base_url, "http://localhost:9000/api");
        assert_eq!(config.timeout_secs, 30);
    }

    #[tokio::test]
    async fn test_fetch_snapshot() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/coins/bitcoin")
            .match_query(mockito::Matcher::UrlEncoded("tickers".into(), "false".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "id": "bitcoin",
                    "symbol": "btc",
                    "name": "Bitcoin",
                    "market_data": {
                        "current_price": {"usd": 65000.5, "eur": 60000},
                        "market_cap": {"usd": 1280000000000},
                        "circulating_supply": 19700000.0,
                        "total_supply": 21000000.0
                    }
                }"#,
            )
            .create_async()
            .await;

        let snapshot = client_for(&server).fetch_snapshot("bitcoin").await.unwrap();
        mock.assert_async().await;

        assert_eq!(snapshot.display_name(), "Bitcoin (BTC)");
        assert_eq!(snapshot.price_usd, dec!(65000.5));
        assert!((snapshot.market_cap_usd - 1.28e12).abs() < 1.0);
        assert!((snapshot.circulating_supply - 19_700_000.0).abs() < 1e-6);
        assert!((snapshot.total_supply - 21_000_000.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_missing_supply_is_zero() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/coins/dogecoin")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"id":"dogecoin","symbol":"doge","name":"Dogecoin",
                    "market_data":{"current_price":{"usd":0.12},"market_cap":{"usd":null},
                    "circulating_supply":146000000000,"total_supply":null}}"#,
            )
            .create_async()
            .await;

        let snapshot = client_for(&server).fetch_snapshot("dogecoin").await.unwrap();
        assert!(snapshot.total_supply.abs() < f64::EPSILON);
        assert!(snapshot.market_cap_usd.abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_supply_beyond_decimal_range() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/coins/megatoken")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"id":"megatoken","symbol":"mega","name":"Mega Token",
                    "market_data":{"current_price":{"usd":0.000000001},"market_cap":{"usd":5e19},
                    "circulating_supply":1e28,"total_supply":1e29}}"#,
            )
            .create_async()
            .await;

        let snapshot = client_for(&server).fetch_snapshot("megatoken").await.unwrap();
        assert!((snapshot.total_supply / 1e29 - 1.0).abs() < 1e-12);
        assert_eq!(snapshot.price_usd, dec!(0.000000001));
    }

    #[tokio::test]
    async fn test_identifier_stays_one_path_segment() {
        let mut server = mockito::Server::new_async().await;
        let bitcoin = server
            .mock("GET", "/coins/bitcoin")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"id":"bitcoin","symbol":"btc","name":"Bitcoin","market_data":{}}"#)
            .expect(0)
            .create_async()
            .await;
        let bitcoin_chart = server
            .mock("GET", "/coins/bitcoin/market_chart")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"prices":[[0,1.0],[1,2.0]]}"#)
            .expect(0)
            .create_async()
            .await;
        let escaped = server
            .mock("GET", "/coins/..%2Fcoins%2Fbitcoin")
            .match_query(mockito::Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let client = client_for(&server);
        assert_eq!(
            client.fetch_snapshot("../coins/bitcoin").await.unwrap_err(),
            MarketDataError::NotFound("../coins/bitcoin".into())
        );
        escaped.assert_async().await;

        for id in ["bitcoin?x=1", "bitcoin#top", "bitcoin/", "..", "."] {
            assert!(client.fetch_snapshot(id).await.is_err(), "{id:?}");
            assert!(client.fetch_price_history(id, 365).await.is_err(), "{id:?}");
        }
        bitcoin.assert_async().await;
        bitcoin_chart.assert_async().await;
    }

    #[tokio::test]
    async fn test_unknown_coin_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/coins/bitcoinn")
            .match_query(mockito::Matcher::Any)
            .with_status(404)
            .with_body(r#"{"error":"coin not found"}"#)
            .create_async()
            .await;

        let result = client_for(&server).fetch_snapshot("bitcoinn").await;
        assert_eq!(result.unwrap_err(), MarketDataError::NotFound("bitcoinn".into()));
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/coins/bitcoin")
            .match_query(mockito::Matcher::Any)
            .with_status(429)
            .create_async()
            .await;

        let result = client_for(&server).fetch_snapshot("bitcoin").await;
        assert!(matches!(result, Err(MarketDataError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_malformed_body_is_unavailable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/coins/bitcoin/market_chart")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let result = client_for(&server).fetch_price_history("bitcoin", 365).await;
        assert!(matches!(result, Err(MarketDataError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_fetch_price_history_discards_timestamps() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/coins/solana/market_chart")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("vs_currency".into(), "usd".into()),
                mockito::Matcher::UrlEncoded("days".into(), "365".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"prices":[[1700000000000,100.0],[1700086400000,102.5]],"market_caps":[]}"#)
            .create_async()
            .await;

        let series = client_for(&server)
            .fetch_price_history("solana", 365)
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(series.prices(), &[100.0, 102.5]);
    }

    #[tokio::test]
    async fn test_fetch_all_identifiers() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/coins/list")
            .with_status(200)
            .with_body(
                r#"[{"id":"bitcoin","symbol":"btc","name":"Bitcoin"},
                    {"id":"ethereum","symbol":"eth","name":"Ethereum"}]"#,
            )
            .create_async()
            .await;

        let coins = client_for(&server).fetch_all_identifiers().await.unwrap();
        assert_eq!(coins.len(), 2);
        assert_eq!(coins[1], CoinListing::new("ethereum", "eth", "Ethereum"));
    }
}
