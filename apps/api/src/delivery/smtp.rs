//! SMTP transport for campaign emails, built on `lettre`.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::MailConfig;
use crate::delivery::{DeliveryReceipt, MailTransport, OutgoingEmail};
use crate::errors::PipelineError;

/// Port that selects implicit TLS instead of STARTTLS.
const IMPLICIT_TLS_PORT: u16 = 465;

/// Sends mail through the configured SMTP relay.
/// Without a host, user and password every send fails with
/// `MailTransportMisconfigured`; an unparseable sender with `MailSenderInvalid`.
pub struct SmtpMailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    sender: Result<Mailbox, String>,
}

pub fn is_mailbox(candidate: &str) -> bool {
    candidate.parse::<Mailbox>().is_ok()
}

impl SmtpMailer {
    pub fn from_config(config: &MailConfig) -> Self {
        let sender = config.sender().parse::<Mailbox>().map_err(|e| {
            warn!("Sender address '{}' is invalid: {e}", config.sender());
            config.sender().to_string()
        });

        let transport = match (&config.smtp_host, &config.smtp_user, &config.smtp_pass) {
            (Some(host), Some(user), Some(pass)) => {
                match build_transport(host, config.smtp_port, user, pass) {
                    Ok(transport) => {
                        info!(host = %host, port = config.smtp_port, "SMTP transport initialized");
                        Some(transport)
                    }
                    Err(e) => {
                        warn!(host = %host, "SMTP transport could not be built: {e}");
                        None
                    }
                }
            }
            _ => {
                warn!("SMTP_HOST, SMTP_USER or SMTP_PASS not set; email delivery is disabled");
                None
            }
        };

        Self { transport, sender }
    }

    pub fn is_configured(&self) -> bool {
        self.transport.is_some() && self.sender.is_ok()
    }
}

fn build_transport(
    host: &str,
    port: u16,
    user: &str,
    pass: &str,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, lettre::transport::smtp::Error> {
    let builder = if port == IMPLICIT_TLS_PORT {
        AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
    };
    Ok(builder
        .port(port)
        .credentials(Credentials::new(user.to_string(), pass.to_string()))
        .build())
}

/// `<uuid@sender-domain>`, used as the Message-ID and returned as the email id.
fn new_message_id(sender: &Mailbox) -> String {
    format!("<{}@{}>", Uuid::new_v4(), sender.email.domain())
}

fn build_message(
    sender: &Mailbox,
    email: &OutgoingEmail,
    message_id: &str,
) -> Result<Message, PipelineError> {
    let to: Mailbox = email.to.parse().map_err(|e| {
        PipelineError::MailDeliveryFailed(format!("invalid recipient address: {e}"))
    })?;
    let attachment_type = ContentType::parse(&email.attachment.content_type).map_err(|e| {
        PipelineError::Unexpected(anyhow::anyhow!(
            "invalid attachment content type '{}': {e}",
            email.attachment.content_type
        ))
    })?;

    let attachment = Attachment::new(email.attachment.filename.clone())
        .body(email.attachment.bytes.clone(), attachment_type);

    Message::builder()
        .from(sender.clone())
        .to(to)
        .subject(email.subject.clone())
        .message_id(Some(message_id.to_string()))
        .multipart(
            MultiPart::mixed()
                .multipart(MultiPart::alternative_plain_html(
                    email.text_body.clone(),
                    email.html_body.clone(),
                ))
                .singlepart(attachment),
        )
        .map_err(|e| PipelineError::MailDeliveryFailed(e.to_string()))
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn deliver(&self, email: OutgoingEmail) -> Result<DeliveryReceipt, PipelineError> {
        let transport = self
            .transport
            .as_ref()
            .ok_or(PipelineError::MailTransportMisconfigured)?;
        let sender = self
            .sender
            .as_ref()
            .map_err(|raw| PipelineError::MailSenderInvalid(raw.clone()))?;

        let message_id = new_message_id(sender);
        let message = build_message(sender, &email, &message_id)?;

        let response = transport
            .send(message)
            .await
            .map_err(|e| PipelineError::MailDeliveryFailed(e.to_string()))?;

        info!(code = %response.code(), "SMTP relay accepted message");
        Ok(DeliveryReceipt {
            email_id: message_id,
        })
    }
}
