use anyhow::{Context, Result};

use crate::delivery::smtp::is_mailbox;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_MAX_REQUEST_BYTES: usize = 12 * 1024 * 1024;

/// Application configuration loaded once from environment variables.
///
/// Service credentials are optional here: a missing credential only fails the
/// request that first needs it, never the process start.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub max_request_bytes: usize,
    pub anthropic_api_key: Option<String>,
    pub mail: MailConfig,
}

/// SMTP transport settings plus the optional sender override.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,
    pub from: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", DEFAULT_PORT)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_request_bytes: parse_env("MAX_REQUEST_BYTES", DEFAULT_MAX_REQUEST_BYTES)?,
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            mail: MailConfig {
                smtp_host: optional_env("SMTP_HOST"),
                smtp_port: parse_env("SMTP_PORT", DEFAULT_SMTP_PORT)?,
                smtp_user: optional_env("SMTP_USER"),
                smtp_pass: optional_env("SMTP_PASS"),
                from: optional_env("MAIL_FROM"),
            },
        })
    }
}

impl MailConfig {
    /// Sender resolution: explicit override, then the SMTP account when it is
    /// itself an address (API-key style logins such as `apikey` are skipped),
    /// then a placeholder.
    pub fn sender(&self) -> &str {
        self.from
            .as_deref()
            .or(self
                .smtp_user
                .as_deref()
                .filter(|user| is_mailbox(user)))
            .unwrap_or(crate::delivery::PLACEHOLDER_SENDER)
    }
}

/// Reads an env var, treating unset and blank values alike.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
