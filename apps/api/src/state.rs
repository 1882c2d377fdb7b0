use std::sync::Arc;

use crate::requirements::processor::RequirementProcessor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Live or demo backend, picked once at startup from `APP_MODE`.
    pub processor: Arc<dyn RequirementProcessor>,
}
