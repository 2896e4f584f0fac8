//! Delivery Dispatcher — packages the caption and thumbnail into one email.
//!
//! Composition is pure ([`compose_email`]); sending goes through the
//! [`MailTransport`] seam, implemented for real SMTP by [`smtp::SmtpMailer`].

pub mod smtp;
pub mod template;

use async_trait::async_trait;
use tracing::info;

use crate::errors::PipelineError;
use crate::imaging::NormalizedImage;

/// Sender used when neither `MAIL_FROM` nor an SMTP account is configured.
pub const PLACEHOLDER_SENDER: &str = "Postcraft <no-reply@postcraft.local>";

pub const ATTACHMENT_NAME: &str = "thumbnail.jpg";
pub const ATTACHMENT_CONTENT_TYPE: &str = "image/jpeg";

#[derive(Debug, Clone)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A fully composed message, independent of any transport.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
    pub attachment: EmailAttachment,
}

/// Proof that the transport accepted the message (not that it was delivered).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub email_id: String,
}

/// The mail transport: one composed message in, an acceptance receipt out.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, email: OutgoingEmail) -> Result<DeliveryReceipt, PipelineError>;
}

pub fn compose_email(decorated_caption: &str, image: &NormalizedImage, to: &str) -> OutgoingEmail {
    OutgoingEmail {
        to: to.to_string(),
        subject: template::SUBJECT.to_string(),
        text_body: template::render_text(decorated_caption),
        html_body: template::render_html(decorated_caption),
        attachment: EmailAttachment {
            filename: ATTACHMENT_NAME.to_string(),
            content_type: ATTACHMENT_CONTENT_TYPE.to_string(),
            bytes: image.jpeg_bytes.clone(),
        },
    }
}

/// Composes and sends the campaign email. No retries.
pub async fn dispatch(
    transport: &dyn MailTransport,
    decorated_caption: &str,
    image: &NormalizedImage,
    to: &str,
) -> Result<DeliveryReceipt, PipelineError> {
    let email = compose_email(decorated_caption, image, to);
    let receipt = transport.deliver(email).await?;
    info!(email_id = %receipt.email_id, "Campaign email accepted");
    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct CapturingTransport {
        sent: Mutex<Vec<OutgoingEmail>>,
    }

    #[async_trait]
    impl MailTransport for CapturingTransport {
        async fn deliver(&self, email: OutgoingEmail) -> Result<DeliveryReceipt, PipelineError> {
            self.sent.lock().unwrap().push(email);
            Ok(DeliveryReceipt {
                email_id: "<captured@test>".into(),
            })
        }
    }

    struct RejectingTransport;

    #[async_trait]
    impl MailTransport for RejectingTransport {
        async fn deliver(&self, _email: OutgoingEmail) -> Result<DeliveryReceipt, PipelineError> {
            Err(PipelineError::MailDeliveryFailed("550 relay denied".into()))
        }
    }

    fn thumbnail() -> NormalizedImage {
        NormalizedImage {
            jpeg_bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
        }
    }

    #[test]
    fn test_compose_email_shape() {
        let email = compose_email("Caption\n\n#tag", &thumbnail(), "user@example.com");
        assert_eq!(email.to, "user@example.com");
        assert_eq!(email.subject, template::SUBJECT);
        assert!(email.text_body.contains("Caption\n\n#tag"));
        assert!(email.html_body.contains("white-space: pre-wrap"));
        assert_eq!(email.attachment.filename, "thumbnail.jpg");
        assert_eq!(email.attachment.content_type, "image/jpeg");
        assert_eq!(email.attachment.bytes, thumbnail().jpeg_bytes);
    }

    #[tokio::test]
    async fn test_dispatch_sends_exactly_one_message() {
        let transport = CapturingTransport {
            sent: Mutex::new(Vec::new()),
        };
        let receipt = dispatch(&transport, "Hi", &thumbnail(), "a@b.co")
            .await
            .unwrap();
        assert_eq!(receipt.email_id, "<captured@test>");
        assert_eq!(transport.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_surfaces_transport_errors() {
        let err = dispatch(&RejectingTransport, "Hi", &thumbnail(), "a@b.co")
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::MailDeliveryFailed(_)));
    }
}
