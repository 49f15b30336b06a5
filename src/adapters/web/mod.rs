//! JSON tool server.
//!
//! Every core computation is exposed as a `POST /tools/<name>` endpoint
//! taking and returning JSON. `GET /tools` lists what is available.

mod error;
mod handlers;

pub use error::WebError;
pub use handlers::*;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::domain::params::IndicatorParams;
use crate::ports::data_port::DataPort;

pub struct AppState {
    pub data_port: Arc<dyn DataPort + Send + Sync>,
    /// Used when a request carries no `params` of its own.
    pub params: IndicatorParams,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/tools", get(handlers::list_tools))
        .route("/tools/basic-data", post(handlers::basic_data))
        .route("/tools/sma-signals", post(handlers::sma_signals))
        .route("/tools/rsi-signals", post(handlers::rsi_signals))
        .route("/tools/atr", post(handlers::atr))
        .route("/tools/mfi", post(handlers::mfi))
        .route("/tools/summary-stats", post(handlers::summary_stats))
        .route("/tools/evaluate", post(handlers::evaluate))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}
