//! Mail transports.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::Envelope;
use crate::domain::{MailTransport, TransportError};

/// Relay reply to a delivery request.
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum RelayReply {
    Sent,
    Failed { reason: String },
}

/// Message as the relay receives it. Attachments travel inline so the relay
/// does not need access to the invoice directory.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelayMessage {
    id: uuid::Uuid,
    from: String,
    to: String,
    subject: String,
    html: String,
    attachments: Vec<RelayAttachment>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelayAttachment {
    filename: String,
    content_type: String,
    /// Standard base64 of the file contents.
    content: String,
}

/// Read every attachment from disk and serialize the relay request body.
async fn relay_payload(envelope: &Envelope) -> Result<Vec<u8>, TransportError> {
    let mut attachments = Vec::with_capacity(envelope.attachments.len());
    for attachment in &envelope.attachments {
        let bytes = tokio::fs::read(&attachment.source_path).await.map_err(|e| {
            TransportError::Unavailable(format!("cannot read attachment {}: {e}", attachment.source_path.display()))
        })?;
        attachments.push(RelayAttachment {
            filename: attachment.filename.clone(),
            content_type: content_type(&attachment.filename).to_string(),
            content: STANDARD.encode(bytes),
        });
    }
    let message = RelayMessage {
        id: envelope.id,
        from: envelope.from.clone(),
        to: envelope.to.clone(),
        subject: envelope.subject.clone(),
        html: envelope.html.clone(),
        attachments,
    };
    serde_json::to_vec(&message).map_err(|e| TransportError::Unavailable(e.to_string()))
}

fn content_type(filename: &str) -> &'static str {
    if filename.to_ascii_lowercase().ends_with(".pdf") { "application/pdf" } else { "application/octet-stream" }
}

/// Request/reply delivery through a mail relay listening on NATS. The relay
/// answers once it has accepted or refused the message.
#[derive(Clone)]
pub struct NatsMailTransport {
    client: async_nats::Client,
    subject: String,
    timeout: Duration,
}

impl NatsMailTransport {
    pub fn new(client: async_nats::Client, subject: impl Into<String>) -> Self {
        Self { client, subject: subject.into(), timeout: Duration::from_secs(10) }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self { self.timeout = timeout; self }
}

#[async_trait]
impl MailTransport for NatsMailTransport {
    async fn deliver(&self, envelope: &Envelope) -> Result<(), TransportError> {
        let payload = relay_payload(envelope).await?;
        let request = self.client.request(self.subject.clone(), payload.into());
        let reply = tokio::time::timeout(self.timeout, request).await
            .map_err(|_| TransportError::Unavailable(format!("no reply from relay within {:?}", self.timeout)))?
            .map_err(|e| TransportError::Unavailable(e.to_string()))?;
        parse_reply(&reply.payload)
    }
}

fn parse_reply(payload: &[u8]) -> Result<(), TransportError> {
    match serde_json::from_slice::<RelayReply>(payload) {
        Ok(RelayReply::Sent) => Ok(()),
        Ok(RelayReply::Failed { reason }) => Err(TransportError::Rejected(reason)),
        Err(e) => Err(TransportError::MalformedReply(e.to_string())),
    }
}

/// Logs each envelope instead of sending it. Used when no relay is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailTransport;

#[async_trait]
impl MailTransport for LogMailTransport {
    async fn deliver(&self, envelope: &Envelope) -> Result<(), TransportError> {
        tracing::info!(
            message_id = %envelope.id, from = %envelope.from, to = %envelope.to, subject = %envelope.subject,
            attachments = envelope.attachments.len(), "mail relay not configured; message logged only"
        );
        Ok(())
    }
}
