use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub(crate) const GENERIC_FAILURE: &str = "Something went wrong while preparing your campaign.";

/// Coarse classification of a pipeline failure.
/// Only `InputValidation` is the caller's fault; everything else is a 500.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InputValidation,
    DependencyConfiguration,
    DependencyFailure,
    Unexpected,
}

/// Every way a campaign request can fail.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, PipelineError>`.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("An email address is required.")]
    MissingEmail,

    #[error("Please provide a valid email address.")]
    InvalidEmail,

    #[error("The campaign brief must be at least 20 characters.")]
    BriefTooShort,

    #[error("A reference photo is required.")]
    MissingPhoto,

    #[error("The reference photo must be 8 MB or smaller.")]
    PhotoTooLarge,

    #[error("Could not read the form submission: {0}")]
    MalformedForm(String),

    #[error("The reference photo could not be decoded as an image.")]
    UnsupportedOrCorruptImage,

    #[error("Caption generation is not configured (missing API key).")]
    CaptionServiceMisconfigured,

    #[error("Caption generation failed: {0}")]
    CaptionServiceUnavailable(String),

    #[error("Email delivery is not configured (missing SMTP host or credentials).")]
    MailTransportMisconfigured,

    #[error("Email delivery is not configured: sender address '{0}' is invalid.")]
    MailSenderInvalid(String),

    #[error("Email delivery failed: {0}")]
    MailDeliveryFailed(String),

    #[error("Internal server error: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::MissingEmail
            | PipelineError::InvalidEmail
            | PipelineError::BriefTooShort
            | PipelineError::MissingPhoto
            | PipelineError::PhotoTooLarge
            | PipelineError::MalformedForm(_) => ErrorKind::InputValidation,
            PipelineError::CaptionServiceMisconfigured
            | PipelineError::MailTransportMisconfigured
            | PipelineError::MailSenderInvalid(_) => ErrorKind::DependencyConfiguration,
            PipelineError::UnsupportedOrCorruptImage
            | PipelineError::CaptionServiceUnavailable(_)
            | PipelineError::MailDeliveryFailed(_) => ErrorKind::DependencyFailure,
            PipelineError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::InputValidation => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message shown to the caller.
    pub fn public_message(&self) -> String {
        match self {
            PipelineError::Unexpected(_) => GENERIC_FAILURE.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status = self.status();

        match self.kind() {
            ErrorKind::InputValidation => tracing::debug!("Rejected campaign request: {self}"),
            ErrorKind::Unexpected => tracing::error!("Internal error: {self:?}"),
            kind => tracing::error!(?kind, "Campaign pipeline failed: {self}"),
        }

        let body = Json(json!({ "error": self.public_message() }));

        (status, body).into_response()
    }
}

/// Turns a handler panic into the same 500 body as any other unexpected failure.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    PipelineError::Unexpected(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}
