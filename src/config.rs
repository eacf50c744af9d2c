//! Service configuration.
//!
//! Built once at startup from the environment (after `dotenvy` has loaded any
//! `.env` file) and handed to the components that need it. Nothing below the
//! bootstrap reads the environment directly.

use std::{path::PathBuf, str::FromStr};

use thiserror::Error;

use crate::workflow::TransitionPolicy;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Top-level configuration for the service binary.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    pub invoice: InvoiceConfig,
    pub mail: MailConfig,
    pub transitions: TransitionPolicy,
}

/// Where invoice artifacts are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceConfig {
    pub dir: PathBuf,
}

/// Outbound mail settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailConfig {
    /// Sender address stamped on every message.
    pub from: String,
    /// Admin recipient for order notifications.
    pub admin_email: String,
    /// NATS server of the mail relay. `None` selects the logging transport.
    pub nats_url: Option<String>,
    /// Subject the relay listens on.
    pub subject: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Ok(Self {
            port: parse_or(get("PORT"), "PORT", 8083)?,
            database_url: get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            max_connections: parse_or(get("DATABASE_MAX_CONNECTIONS"), "DATABASE_MAX_CONNECTIONS", 10)?,
            invoice: InvoiceConfig { dir: get("INVOICE_DIR").map_or_else(|| PathBuf::from("invoices"), PathBuf::from) },
            mail: MailConfig {
                from: get("MAIL_FROM").unwrap_or_else(|| "orders@localhost".to_string()),
                admin_email: get("ADMIN_EMAIL").ok_or(ConfigError::Missing("ADMIN_EMAIL"))?,
                nats_url: get("NATS_URL"),
                subject: get("MAIL_SUBJECT").unwrap_or_else(|| "mail.outbound".to_string()),
            },
            transitions: parse_or(get("ORDER_STATUS_TRANSITIONS"), "ORDER_STATUS_TRANSITIONS", TransitionPolicy::Unrestricted)?,
        })
    }
}

fn parse_or<T>(value: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid { name, reason: e.to_string() }),
    }
}
