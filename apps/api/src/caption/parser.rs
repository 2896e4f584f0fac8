//! Turns the model's raw answer into a [`CaptionPayload`].
//!
//! Parsing is total: anything that is not a JSON object with a non-blank
//! `caption` string becomes [`ParsedCaption::Raw`], which keeps the trimmed
//! text as the caption and carries no hashtags.

use serde_json::Value;

use crate::caption::{CaptionPayload, MAX_HASHTAGS};
use crate::llm_client::strip_json_fences;

/// Outcome of interpreting the model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCaption {
    Structured {
        caption: String,
        hashtags: Vec<String>,
    },
    Raw {
        text: String,
    },
}

impl ParsedCaption {
    pub fn is_structured(&self) -> bool {
        matches!(self, ParsedCaption::Structured { .. })
    }

    pub fn into_payload(self) -> CaptionPayload {
        match self {
            ParsedCaption::Structured { caption, hashtags } => CaptionPayload {
                caption_text: caption,
                hashtags,
            },
            ParsedCaption::Raw { text } => CaptionPayload {
                caption_text: text,
                hashtags: Vec::new(),
            },
        }
    }
}

pub fn parse_caption(raw: &str) -> ParsedCaption {
    let fallback = || ParsedCaption::Raw {
        text: raw.trim().to_string(),
    };

    let Ok(value) = serde_json::from_str::<Value>(strip_json_fences(raw)) else {
        return fallback();
    };

    let caption = value
        .get("caption")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|c| !c.is_empty());
    let Some(caption) = caption else {
        return fallback();
    };

    let hashtags = value
        .get("hashtags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .take(MAX_HASHTAGS)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    ParsedCaption::Structured {
        caption: caption.to_string(),
        hashtags,
    }
}
