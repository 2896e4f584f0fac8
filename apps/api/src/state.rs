use crate::campaign::pipeline::CampaignPipeline;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: CampaignPipeline,
    pub config: Config,
}
