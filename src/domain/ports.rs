//! Ports the order workflow depends on.
//!
//! Adapters live in `repository`, `invoice` and `notify`; the workflow only
//! sees these traits so each collaborator can be swapped or mocked.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::aggregates::{Customer, Order, OrderDraft, OrderEdit, OrderStatus, Viewer};
use crate::notify::Envelope;

/// Errors raised by order and customer storage adapters.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("no customer found with email {email}")]
    ClientNotFound { email: String },

    #[error("order {id} not found")]
    NotFound { id: i64 },

    #[error("stored row is invalid: {0}")]
    InvalidRow(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self { Self::Storage(err.to_string()) }
}

/// Invoice rendering failures. Any variant is fatal to order creation.
#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error("failed to write invoice artifact {path}: {source}")]
    ArtifactWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outbound mail transport failures.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("mail transport unavailable: {0}")]
    Unavailable(String),

    #[error("mail relay rejected message: {0}")]
    Rejected(String),

    #[error("malformed relay reply: {0}")]
    MalformedReply(String),
}

/// Durable order records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Resolve the client through the customer directory and persist a
    /// `Pending` order.
    async fn create(&self, draft: &OrderDraft) -> Result<Order, RepositoryError>;

    async fn get_by_id(&self, id: i64) -> Result<Order, RepositoryError>;

    /// Admins see every order, everyone else only their own.
    async fn list_for_viewer(&self, viewer: &Viewer) -> Result<Vec<Order>, RepositoryError>;

    /// Unconditional status write.
    async fn update_status(&self, id: i64, status: OrderStatus) -> Result<Order, RepositoryError>;

    async fn update_fields(&self, id: i64, edit: &OrderEdit) -> Result<Order, RepositoryError>;

    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;
}

/// Customer lookup collaborator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, RepositoryError>;
}

/// Produces the invoice document for an order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvoiceRenderer: Send + Sync {
    /// Write the invoice and return where it landed.
    async fn render(&self, order: &Order) -> Result<PathBuf, InvoiceError>;
}

/// Hands a fully composed message to the outside world.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, envelope: &Envelope) -> Result<(), TransportError>;
}
