//! Notification dispatch.
//!
//! The dispatcher owns no state. It stamps the configured sender on a
//! message, checks that attachments are on disk, and hands the envelope to a
//! [`MailTransport`]. Transport errors come back as [`DeliveryOutcome::Failed`]
//! so the caller decides how much they matter.

pub mod templates;
pub mod transport;

use std::{path::PathBuf, sync::Arc};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::MailConfig;
use crate::domain::MailTransport;

pub use transport::{LogMailTransport, NatsMailTransport};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment { pub filename: String, pub source_path: PathBuf }

/// A message for exactly one recipient.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub attachments: Vec<Attachment>,
}

/// What the transport receives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub id: Uuid,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
    pub attachments: Vec<Attachment>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome { Sent, Failed(String) }

impl DeliveryOutcome {
    pub fn is_sent(&self) -> bool { matches!(self, Self::Sent) }
}

/// One notify attempt and how it went.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationRecord {
    pub recipient: String,
    pub subject: String,
    pub order_id: i64,
    pub outcome: DeliveryOutcome,
}

pub struct NotificationDispatcher {
    transport: Arc<dyn MailTransport>,
    from: String,
}

impl NotificationDispatcher {
    pub fn new(transport: Arc<dyn MailTransport>, config: &MailConfig) -> Self {
        Self { transport, from: config.from.clone() }
    }

    pub async fn send(&self, message: Message) -> DeliveryOutcome {
        for attachment in &message.attachments {
            if tokio::fs::metadata(&attachment.source_path).await.is_err() {
                return DeliveryOutcome::Failed(format!("attachment {} is missing", attachment.source_path.display()));
            }
        }
        let envelope = Envelope {
            id: Uuid::now_v7(),
            from: self.from.clone(),
            to: message.to,
            subject: message.subject,
            html: message.html_body,
            attachments: message.attachments,
        };
        match self.transport.deliver(&envelope).await {
            Ok(()) => {
                tracing::info!(message_id = %envelope.id, recipient = %envelope.to, "notification sent");
                DeliveryOutcome::Sent
            }
            Err(err) => {
                tracing::warn!(message_id = %envelope.id, recipient = %envelope.to, error = %err, "notification failed");
                DeliveryOutcome::Failed(err.to_string())
            }
        }
    }
}
