//! Domain events
use crate::domain::aggregates::OrderStatus;

/// Lifecycle change that triggers notifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderEvent {
    Placed,
    StatusChanged { previous: OrderStatus, current: OrderStatus },
}

impl OrderEvent {
    pub fn name(&self) -> &'static str {
        match self { Self::Placed => "order_placed", Self::StatusChanged { .. } => "order_status_changed" }
    }
}
