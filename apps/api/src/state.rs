use std::sync::Arc;

use crate::config::Config;
use crate::normalize::Normalizer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// The normalizer carries the (optional) model client — constructed once
    /// at startup, never reconfigured per request.
    pub normalizer: Arc<Normalizer>,
}
