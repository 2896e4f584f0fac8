use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use axum::Json;

use crate::campaign::intake::read_campaign_form;
use crate::campaign::models::PipelineResult;
use crate::errors::PipelineError;
use crate::state::AppState;

/// POST /api/v1/campaigns
///
/// Multipart fields: `email`, `prompt`, `photo`. Responds with the decorated
/// caption, the thumbnail as a data URL and the id of the email that was sent.
pub async fn handle_create_campaign(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PipelineResult>, PipelineError> {
    let multipart = multipart.map_err(|e| PipelineError::MalformedForm(e.body_text()))?;
    let form = read_campaign_form(multipart).await?;
    let result = state.pipeline.run(form).await?;
    Ok(Json(result))
}
