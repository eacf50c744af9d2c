//! Tagged step outcomes and their mapping onto HTTP replies.
//!
//! Every workflow ends in exactly one [`Step`]. Persistence is the durability
//! boundary: once a step has committed, later failures can only make the
//! outcome `Degraded` (notifications) or `Fatal` for the response (invoice),
//! never undo the commit. [`shape`] is the only place status codes are chosen.

use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::{json, Value};
use thiserror::Error;

use super::view::{NotificationDetails, OrderView};
use crate::domain::{Order, OrderStatus, RepositoryError};
use crate::notify::NotificationRecord;

#[derive(Debug)]
pub enum Step<T> {
    Committed(T),
    /// The primary operation committed but some notifications failed.
    Degraded { value: T, notifications: Vec<NotificationRecord> },
    Fatal(Fatal),
}

impl<T> Step<T> {
    /// Classify a finished run by its notification records.
    pub fn settle(result: Result<(T, Vec<NotificationRecord>), Fatal>) -> Self {
        match result {
            Err(fatal) => Self::Fatal(fatal),
            Ok((value, notifications)) if notifications.iter().all(|r| r.outcome.is_sent()) => Self::Committed(value),
            Ok((value, notifications)) => Self::Degraded { value, notifications },
        }
    }

    pub fn from_result(result: Result<T, Fatal>) -> Self {
        match result { Ok(value) => Self::Committed(value), Err(fatal) => Self::Fatal(fatal) }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Step<U> {
        match self {
            Self::Committed(value) => Step::Committed(f(value)),
            Self::Degraded { value, notifications } => Step::Degraded { value: f(value), notifications },
            Self::Fatal(fatal) => Step::Fatal(fatal),
        }
    }
}

/// Result of a workflow that reached its primary commit.
#[derive(Debug)]
pub enum Completed {
    Created(Order),
    StatusChanged(Order),
    Edited(Order),
    Deleted(i64),
    Listed(Vec<Order>),
    Fetched(Order),
}

/// Failures that end a workflow.
#[derive(Debug, Error)]
pub enum Fatal {
    #[error("{0}")]
    Validation(String),

    #[error("Client not found")]
    ClientNotFound(String),

    #[error("Order not found")]
    OrderNotFound(i64),

    #[error("Cannot change order status from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Failed to persist order: {0}")]
    Persistence(String),

    /// The order row exists; only the invoice is missing.
    #[error("Order created but invoice generation failed")]
    InvoiceGeneration { order_id: i64, reason: String },

    /// The write committed but the row could not be read back.
    #[error("Order saved but could not be reloaded")]
    Reload { order_id: i64, reason: String },
}

impl Fatal {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::ClientNotFound(_) | Self::OrderNotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidTransition { .. } => StatusCode::CONFLICT,
            Self::Persistence(_) | Self::InvoiceGeneration { .. } | Self::Reload { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationFailed",
            Self::ClientNotFound(_) => "ClientNotFound",
            Self::OrderNotFound(_) => "NotFound",
            Self::InvalidTransition { .. } => "InvalidTransition",
            Self::Persistence(_) | Self::Reload { .. } => "PersistenceFailed",
            Self::InvoiceGeneration { .. } => "InvoiceGenerationFailed",
        }
    }

    /// Id of an order that is already persisted despite the failure.
    pub fn committed_order(&self) -> Option<i64> {
        match self {
            Self::InvoiceGeneration { order_id, .. } | Self::Reload { order_id, .. } => Some(*order_id),
            _ => None,
        }
    }
}

impl From<RepositoryError> for Fatal {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::ClientNotFound { email } => Self::ClientNotFound(email),
            RepositoryError::NotFound { id } => Self::OrderNotFound(id),
            other => Self::Persistence(other.to_string()),
        }
    }
}

/// Status code and JSON body for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply { pub status: StatusCode, pub body: Value }

impl IntoResponse for Reply {
    fn into_response(self) -> Response { (self.status, Json(self.body)).into_response() }
}

pub fn shape(outcome: Step<Completed>) -> Reply {
    match outcome {
        Step::Committed(done) => success(done, None),
        Step::Degraded { value, notifications } => success(value, NotificationDetails::from_records(&notifications)),
        Step::Fatal(fatal) => failure(&fatal),
    }
}

fn success(done: Completed, details: Option<NotificationDetails>) -> Reply {
    let (status, mut body) = match done {
        Completed::Created(order) => (StatusCode::CREATED, json!(OrderView::from(&order))),
        Completed::StatusChanged(order) => (StatusCode::OK, json!({ "id": order.id, "status": order.status })),
        Completed::Edited(_) => (StatusCode::OK, json!({ "message": "Order updated successfully" })),
        Completed::Deleted(_) => (StatusCode::OK, json!({ "message": "Order deleted successfully" })),
        Completed::Listed(orders) => (StatusCode::OK, json!(orders.iter().map(OrderView::from).collect::<Vec<_>>())),
        Completed::Fetched(order) => (StatusCode::OK, json!(OrderView::from(&order))),
    };
    if let (Some(details), Value::Object(map)) = (details, &mut body) {
        map.insert("details".into(), json!(details));
    }
    Reply { status, body }
}

fn failure(fatal: &Fatal) -> Reply {
    let mut body = json!({ "error": fatal.to_string(), "code": fatal.code() });
    if let Some(order_id) = fatal.committed_order() {
        body["orderId"] = json!(order_id);
    }
    Reply { status: fatal.status(), body }
}
