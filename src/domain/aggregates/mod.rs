//! Aggregates module
pub mod order;
pub mod customer;

pub use order::{invoice_name, Order, OrderDraft, OrderEdit, OrderStatus, UnknownStatus};
pub use customer::{Customer, Role, Viewer};
