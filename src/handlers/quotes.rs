use axum::{Json, extract::State};
use tracing::debug;

use crate::db::models::QuoteBody;
use crate::{QuoteError, router::QuoteState};

/// Serve one random quote; 503 "No quotes found." while the table is empty.
pub async fn random_quote_handler(
    State(state): State<QuoteState>,
) -> Result<Json<QuoteBody>, QuoteError> {
    let quote = state
        .store
        .random_quote()
        .await?
        .ok_or(QuoteError::NoQuotesAvailable)?;
    debug!(id = quote.id, "serving quote");
    Ok(Json(quote.into()))
}

/// Liveness only; never touches the store.
pub async fn healthz_handler() -> &'static str {
    "ok"
}
