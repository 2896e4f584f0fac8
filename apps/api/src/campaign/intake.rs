use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;

use crate::campaign::models::RawCampaignForm;
use crate::errors::PipelineError;

/// Collects the `email`, `prompt` and `photo` fields from a multipart body.
/// Unknown fields are ignored; a repeated field keeps its last value.
pub async fn read_campaign_form(mut multipart: Multipart) -> Result<RawCampaignForm, PipelineError> {
    let mut form = RawCampaignForm::default();

    while let Some(field) = multipart.next_field().await.map_err(form_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "email" => form.email = Some(field.text().await.map_err(form_error)?),
            "prompt" => form.prompt = Some(field.text().await.map_err(form_error)?),
            "photo" => form.photo = Some(field.bytes().await.map_err(form_error)?),
            _ => {}
        }
    }

    Ok(form)
}

/// An over-limit body is almost always the photo, so it gets the oversize message.
fn form_error(err: MultipartError) -> PipelineError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        PipelineError::PhotoTooLarge
    } else {
        PipelineError::MalformedForm(err.body_text())
    }
}
