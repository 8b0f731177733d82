use axum::{Router, routing::get};

use crate::db::QuoteStore;
use crate::handlers::quotes::{healthz_handler, random_quote_handler};

#[derive(Clone)]
pub struct QuoteState {
    pub store: QuoteStore,
}

impl QuoteState {
    pub fn new(store: QuoteStore) -> Self {
        Self { store }
    }
}

pub fn quote_router(state: QuoteState) -> Router {
    Router::new()
        .route("/", get(random_quote_handler))
        .route("/healthz", get(healthz_handler))
        .with_state(state)
}
