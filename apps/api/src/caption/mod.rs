//! Caption synthesis: brief in, caption plus hashtags out.
//!
//! The generative service sits behind [`CaptionSynthesizer`] so the pipeline can
//! run against a stub in tests. Parsing of its answer never fails; see [`parser`].

pub mod parser;
pub mod prompts;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::caption::parser::parse_caption;
use crate::caption::prompts::{build_caption_prompt, CAPTION_SYSTEM};
use crate::errors::PipelineError;
use crate::llm_client::LlmClient;

/// Upper bound on hashtags kept from a single generation.
pub const MAX_HASHTAGS: usize = 6;

/// Caption text plus up to [`MAX_HASHTAGS`] hashtags (with or without a leading `#`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionPayload {
    pub caption_text: String,
    pub hashtags: Vec<String>,
}

impl CaptionPayload {
    /// Caption followed by a blank line and the space-joined hashtags.
    pub fn decorated(&self) -> String {
        if self.hashtags.is_empty() {
            return self.caption_text.clone();
        }
        let tags: Vec<String> = self.hashtags.iter().map(|t| as_hashtag(t)).collect();
        format!("{}\n\n{}", self.caption_text, tags.join(" "))
    }
}

fn as_hashtag(tag: &str) -> String {
    if tag.starts_with('#') {
        tag.to_string()
    } else {
        format!("#{tag}")
    }
}

/// The generative text service: one brief in, the model's raw text out.
#[async_trait]
pub trait CaptionSynthesizer: Send + Sync {
    async fn synthesize(&self, brief: &str) -> Result<String, PipelineError>;
}

#[async_trait]
impl CaptionSynthesizer for LlmClient {
    async fn synthesize(&self, brief: &str) -> Result<String, PipelineError> {
        let prompt = build_caption_prompt(brief);
        Ok(self.call_text(&prompt, CAPTION_SYSTEM).await?)
    }
}

/// Generates a caption for `brief` and interprets the answer.
///
/// Service and configuration failures propagate; a badly shaped answer only
/// degrades to the raw text.
pub async fn synthesize_caption(
    synthesizer: &dyn CaptionSynthesizer,
    brief: &str,
) -> Result<CaptionPayload, PipelineError> {
    let raw = synthesizer.synthesize(brief).await?;
    if raw.trim().is_empty() {
        return Err(PipelineError::CaptionServiceUnavailable(
            "the caption service returned an empty response".to_string(),
        ));
    }

    let parsed = parse_caption(&raw);
    if !parsed.is_structured() {
        warn!(
            raw_len = raw.len(),
            "Caption output was not structured; using raw text"
        );
    }

    let payload = parsed.into_payload();
    info!(hashtags = payload.hashtags.len(), "Caption synthesized");
    Ok(payload)
}
