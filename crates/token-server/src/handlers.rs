//! HTTP Handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use token_advisor::{
    AdvisorError, AnalysisError, MarketDataError, ReportOutcome, ReportRow, Suggestion,
};

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider: String,
    pub provider_reachable: bool,
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub identifier: String,
    /// Number or numeric string; validated by the advisor
    pub investment_usd: serde_json::Value,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportResponse {
    Ok {
        coin_id: String,
        rows: Vec<ReportRow>,
    },
    NotFound {
        requested: String,
        reason: &'static str,
        message: String,
        suggestions: Vec<Suggestion>,
    },
}

#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub query: String,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Advisor(#[from] AdvisorError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError::Advisor(err) = self;
        let (status, code) = match &err {
            AdvisorError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INPUT_ERROR"),
            AdvisorError::MarketData(_) => (StatusCode::BAD_GATEWAY, "MARKET_DATA_ERROR"),
            AdvisorError::Analysis(_) => (StatusCode::UNPROCESSABLE_ENTITY, "ANALYSIS_ERROR"),
            AdvisorError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
        };
        tracing::debug!(error = %err, code, "Request rejected");

        (
            status,
            Json(ErrorResponse {
                error: err.user_message(),
                code: code.into(),
            }),
        )
            .into_response()
    }
}

/// Short machine-readable tag for why a lookup fell back
fn failure_reason(cause: &AdvisorError) -> &'static str {
    match cause {
        AdvisorError::MarketData(MarketDataError::NotFound(_)) => "not_found",
        AdvisorError::MarketData(MarketDataError::Unavailable(_)) => "unavailable",
        AdvisorError::Analysis(AnalysisError::InsufficientHistory { .. }) => "insufficient_history",
        AdvisorError::Analysis(AnalysisError::InvalidPrice { .. }) => "invalid_history",
        AdvisorError::InvalidInput(_) | AdvisorError::Config(_) => "error",
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let market = state.market();

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        provider: market.name().to_string(),
        provider_reachable: market.health_check().await,
    })
}

/// Full token report, or suggestions when the coin is unknown
pub async fn report_handler(
    State(state): State<AppState>,
    Json(payload): Json<ReportRequest>,
) -> Result<(StatusCode, Json<ReportResponse>), ApiError> {
    let amount = match &payload.investment_usd {
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        _ => String::new(),
    };

    let outcome = state.assembler.run(&payload.identifier, &amount).await?;

    Ok(match outcome {
        ReportOutcome::Report(report) => (
            StatusCode::OK,
            Json(ReportResponse::Ok {
                coin_id: report.coin_id.clone(),
                rows: report.rows().to_vec(),
            }),
        ),
        ReportOutcome::NotFound {
            requested,
            cause,
            suggestions,
        } => (
            StatusCode::NOT_FOUND,
            Json(ReportResponse::NotFound {
                requested,
                reason: failure_reason(&cause),
                message: suggestions.not_found_message(),
                suggestions: suggestions.iter().cloned().collect(),
            }),
        ),
    })
}

/// Fuzzy identifier suggestions without running a report
pub async fn suggest_handler(
    State(state): State<AppState>,
    Query(query): Query<SuggestQuery>,
) -> Json<SuggestResponse> {
    let suggestions = state.assembler.suggest(&query.q).await;

    Json(SuggestResponse {
        query: query.q,
        suggestions: suggestions.iter().cloned().collect(),
    })
}
