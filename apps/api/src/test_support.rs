//! Shared fixtures and service doubles for unit tests.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use crate::caption::CaptionSynthesizer;
use crate::config::{Config, MailConfig};
use crate::delivery::{DeliveryReceipt, MailTransport, OutgoingEmail};
use crate::errors::PipelineError;

pub const VALID_BRIEF: &str = "Launch our summer cold brew!";

/// Encodes a gradient image of the given size.
pub fn image_fixture(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8])
    });
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, format)
        .expect("encode fixture");
    out.into_inner()
}

pub fn test_config() -> Config {
    Config {
        port: 0,
        rust_log: "debug".into(),
        max_request_bytes: 12 * 1024 * 1024,
        anthropic_api_key: None,
        mail: MailConfig {
            smtp_host: None,
            smtp_port: 587,
            smtp_user: None,
            smtp_pass: None,
            from: None,
        },
    }
}

/// Caption service double that counts calls and replies with a canned answer.
pub struct StubSynthesizer {
    reply: Result<String, String>,
    calls: AtomicUsize,
}

impl StubSynthesizer {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CaptionSynthesizer for StubSynthesizer {
    async fn synthesize(&self, _brief: &str) -> Result<String, PipelineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .clone()
            .map_err(PipelineError::CaptionServiceUnavailable)
    }
}

/// Caption service double that panics mid-request.
pub struct PanickingSynthesizer;

#[async_trait]
impl CaptionSynthesizer for PanickingSynthesizer {
    async fn synthesize(&self, _brief: &str) -> Result<String, PipelineError> {
        panic!("caption backend blew up");
    }
}

/// Mail transport double that records every message it is handed.
pub struct StubMailer {
    fail_with: Option<String>,
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl StubMailer {
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self {
            fail_with: None,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn rejecting(message: &str) -> Arc<Self> {
        Arc::new(Self {
            fail_with: Some(message.to_string()),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.sent.lock().expect("stub mailer lock").len()
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().expect("stub mailer lock").clone()
    }
}

#[async_trait]
impl MailTransport for StubMailer {
    async fn deliver(&self, email: OutgoingEmail) -> Result<DeliveryReceipt, PipelineError> {
        self.sent.lock().expect("stub mailer lock").push(email);
        match &self.fail_with {
            Some(message) => Err(PipelineError::MailDeliveryFailed(message.clone())),
            None => Ok(DeliveryReceipt {
                email_id: "<stub-1@postcraft.local>".into(),
            }),
        }
    }
}

/// A `multipart/form-data` part for [`multipart_body`].
pub enum FormPart<'a> {
    Text(&'a str),
    File {
        filename: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

const BOUNDARY: &str = "postcraft-test-boundary";

/// Assembles a multipart body; returns `(content_type_header, body)`.
pub fn multipart_body(parts: &[(&str, FormPart<'_>)]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (name, part) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            FormPart::Text(value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            FormPart::File {
                filename,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}
