//! JSON payloads produced by the workflow.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{Order, OrderStatus};
use crate::notify::{DeliveryOutcome, NotificationRecord};

/// Order as returned to API clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: i64,
    pub client_name: String,
    pub client_email: String,
    pub product_name: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub status: OrderStatus,
    pub order_date: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            client_name: order.client_name.clone(),
            client_email: order.client_email.clone(),
            product_name: order.product_name.clone(),
            quantity: order.quantity.value(),
            price: order.unit_price.amount(),
            total: order.total(),
            status: order.status,
            order_date: order.created_at.format("%Y-%m-%d").to_string(),
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

/// Side channel attached to a successful response when notifications failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDetails {
    pub code: &'static str,
    pub message: String,
    pub failures: Vec<NotificationFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationFailure {
    pub recipient: String,
    pub subject: String,
    pub reason: String,
}

impl NotificationDetails {
    /// `None` when every notification went out.
    pub fn from_records(records: &[NotificationRecord]) -> Option<Self> {
        let failures: Vec<NotificationFailure> = records.iter().filter_map(|record| match &record.outcome {
            DeliveryOutcome::Sent => None,
            DeliveryOutcome::Failed(reason) => Some(NotificationFailure {
                recipient: record.recipient.clone(),
                subject: record.subject.clone(),
                reason: reason.clone(),
            }),
        }).collect();
        if failures.is_empty() { return None; }
        Some(Self {
            code: "NotificationFailed",
            message: format!("{} of {} notification(s) could not be sent", failures.len(), records.len()),
            failures,
        })
    }
}
