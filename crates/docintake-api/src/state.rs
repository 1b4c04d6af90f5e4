use docintake_core::Config;
use docintake_processing::UploadPipeline;
use std::sync::Arc;

/// Shared, read-only application state built once at startup.
pub struct AppState {
    pub pipeline: Arc<UploadPipeline>,
    /// Error bodies carry `details` outside production.
    pub expose_error_details: bool,
}

impl AppState {
    pub fn new(config: &Config, pipeline: UploadPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            expose_error_details: !config.is_production(),
        }
    }
}
