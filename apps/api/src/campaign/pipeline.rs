//! Pipeline Orchestrator — the one place that drives the external services.
//!
//! Flow: validate → normalize thumbnail → synthesize caption → send email →
//! assemble result. The first failing stage aborts everything after it, so the
//! caller never receives a thumbnail without a sent email.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::campaign::models::{CampaignRequest, PipelineResult, RawCampaignForm};
use crate::campaign::validation::validate_request;
use crate::caption::{synthesize_caption, CaptionSynthesizer};
use crate::config::Config;
use crate::delivery::smtp::SmtpMailer;
use crate::delivery::{dispatch, MailTransport};
use crate::errors::PipelineError;
use crate::imaging::normalize_photo;
use crate::llm_client::LlmClient;

/// Holds the two external capabilities. Cheap to clone; shared by all requests.
#[derive(Clone)]
pub struct CampaignPipeline {
    synthesizer: Arc<dyn CaptionSynthesizer>,
    mailer: Arc<dyn MailTransport>,
}

impl CampaignPipeline {
    pub fn new(synthesizer: Arc<dyn CaptionSynthesizer>, mailer: Arc<dyn MailTransport>) -> Self {
        Self {
            synthesizer,
            mailer,
        }
    }

    /// Wires the real Anthropic and SMTP adapters from process configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let llm = LlmClient::new(config.anthropic_api_key.clone())?;
        if !llm.is_configured() {
            tracing::warn!("ANTHROPIC_API_KEY not set; caption generation will fail");
        }
        let mailer = SmtpMailer::from_config(&config.mail);
        info!(
            caption_configured = llm.is_configured(),
            mail_configured = mailer.is_configured(),
            sender = config.mail.sender(),
            "Campaign pipeline ready"
        );
        Ok(Self::new(Arc::new(llm), Arc::new(mailer)))
    }

    #[tracing::instrument(skip_all)]
    pub async fn run(&self, form: RawCampaignForm) -> Result<PipelineResult, PipelineError> {
        let CampaignRequest {
            email,
            brief_text,
            photo_bytes,
            photo_size,
        } = validate_request(form)?;

        info!(
            recipient_domain = email.rsplit('@').next().unwrap_or_default(),
            brief_chars = brief_text.chars().count(),
            photo_size,
            "Campaign request accepted"
        );

        let thumbnail = normalize_photo(photo_bytes).await?;
        let caption = synthesize_caption(self.synthesizer.as_ref(), &brief_text).await?;
        let decorated_caption = caption.decorated();
        let receipt = dispatch(self.mailer.as_ref(), &decorated_caption, &thumbnail, &email).await?;

        Ok(PipelineResult {
            decorated_caption,
            thumbnail_data_url: thumbnail.data_url(),
            email_id: receipt.email_id,
        })
    }
}
