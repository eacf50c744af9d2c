//! Order Aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use crate::domain::value_objects::{Quantity, UnitPrice};

/// Stored order row. `total` is always derived from quantity and unit price.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    pub id: i64,
    pub client_name: String,
    pub client_email: String,
    pub product_name: String,
    pub quantity: Quantity,
    pub unit_price: UnitPrice,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn total(&self) -> Decimal { self.unit_price.multiply(self.quantity) }

    /// Artifact name of the invoice generated for this order.
    pub fn invoice_name(&self) -> String { invoice_name(self.id) }
}

pub fn invoice_name(order_id: i64) -> String { format!("invoice-{order_id}") }

/// Caller input for a new order. The client's display name is resolved later.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderDraft {
    pub client_email: String,
    pub product_name: String,
    pub quantity: Quantity,
    pub unit_price: UnitPrice,
}

/// Overwrite of the editable fields; status and client identity are untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderEdit {
    pub product_name: String,
    pub quantity: Quantity,
    pub unit_price: UnitPrice,
}

/// Order status as exposed on the wire. Matching is case-sensitive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Pending,
    Approved,
    #[serde(rename = "On Process")]
    OnProcess,
    Completed,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [Self::Pending, Self::Approved, Self::OnProcess, Self::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::OnProcess => "On Process",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|status| status.as_str() == s).ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status `{0}`; expected one of Pending, Approved, On Process, Completed")]
pub struct UnknownStatus(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Pending", OrderStatus::Pending)]
    #[case("Approved", OrderStatus::Approved)]
    #[case("On Process", OrderStatus::OnProcess)]
    #[case("Completed", OrderStatus::Completed)]
    fn test_status_round_trips_through_text(#[case] text: &str, #[case] status: OrderStatus) {
        assert_eq!(text.parse::<OrderStatus>().unwrap(), status);
        assert_eq!(status.to_string(), text);
        assert_eq!(serde_json::to_value(status).unwrap(), serde_json::json!(text));
    }

    #[rstest]
    #[case("pending")]
    #[case("ON PROCESS")]
    #[case("OnProcess")]
    #[case("")]
    fn test_status_parsing_is_case_sensitive(#[case] text: &str) {
        assert!(text.parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_total_is_derived() {
        let now = Utc::now();
        let order = Order {
            id: 7, client_name: "Alice".into(), client_email: "a@b.com".into(), product_name: "Widget".into(),
            quantity: Quantity::new(3).unwrap(), unit_price: UnitPrice::new(Decimal::new(1000, 2)).unwrap(),
            status: OrderStatus::Pending, created_at: now, updated_at: now,
        };
        assert_eq!(order.total(), Decimal::new(30, 0));
        assert_eq!(order.invoice_name(), "invoice-7");
    }
}
