//! Input validation for campaign submissions.
//!
//! Checks run in a fixed order (email, brief, photo presence, photo size) and
//! stop at the first failure. Nothing here touches the network.

use crate::campaign::models::{CampaignRequest, RawCampaignForm};
use crate::errors::PipelineError;

/// Maximum accepted size of the reference photo, in bytes (8 MiB).
pub const MAX_PHOTO_BYTES: usize = 8 * 1024 * 1024;

/// Minimum trimmed length of the campaign brief, in characters.
pub const MIN_BRIEF_CHARS: usize = 20;

/// Validates the raw form and returns an owned `CampaignRequest`.
pub fn validate_request(form: RawCampaignForm) -> Result<CampaignRequest, PipelineError> {
    let email = form
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or(PipelineError::MissingEmail)?;
    if !email.contains('@') {
        return Err(PipelineError::InvalidEmail);
    }

    let brief = form.prompt.as_deref().map(str::trim).unwrap_or_default();
    if brief.chars().count() < MIN_BRIEF_CHARS {
        return Err(PipelineError::BriefTooShort);
    }

    let photo = form
        .photo
        .filter(|p| !p.is_empty())
        .ok_or(PipelineError::MissingPhoto)?;
    if photo.len() > MAX_PHOTO_BYTES {
        return Err(PipelineError::PhotoTooLarge);
    }

    Ok(CampaignRequest {
        email: email.to_string(),
        brief_text: brief.to_string(),
        photo_size: photo.len(),
        photo_bytes: photo,
    })
}
