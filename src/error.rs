use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum QuoteError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Config source error: {0}")]
    Figment(#[from] figment::Error),

    #[error("Store connectivity error: {0}")]
    StoreConnectivity(#[source] SqlxError),

    #[error("Schema error: {0}")]
    Schema(#[source] SqlxError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Seed fetch error: {0}")]
    SeedFetch(String),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No quotes found.")]
    NoQuotesAvailable,
}

impl IntoResponse for QuoteError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            QuoteError::NoQuotesAvailable => {
                let status = StatusCode::SERVICE_UNAVAILABLE; // 503
                let body = ApiErrorBody {
                    code: "NO_QUOTES".to_string(),
                    message: "No quotes found.".to_string(),
                };
                (status, body)
            }
            QuoteError::StoreConnectivity(_) => {
                let status = StatusCode::SERVICE_UNAVAILABLE;
                let body = ApiErrorBody {
                    code: "STORE_UNAVAILABLE".to_string(),
                    message: "The quote store is unavailable.".to_string(),
                };
                (status, body)
            }
            QuoteError::Reqwest(_) | QuoteError::UrlParse(_) | QuoteError::SeedFetch(_) => {
                let status = StatusCode::BAD_GATEWAY;
                let body = ApiErrorBody {
                    code: "BAD_GATEWAY".to_string(),
                    message: "Upstream service is unavailable.".to_string(),
                };
                (status, body)
            }
            QuoteError::DatabaseError(_)
            | QuoteError::Schema(_)
            | QuoteError::Configuration(_)
            | QuoteError::Figment(_)
            | QuoteError::Credential(_)
            | QuoteError::Json(_) => {
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                let body = ApiErrorBody {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                };
                (status, body)
            }
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
