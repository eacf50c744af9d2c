//! Order domain: aggregates, value objects, events and ports.
pub mod aggregates;
pub mod events;
pub mod ports;
pub mod value_objects;

pub use aggregates::{Customer, Order, OrderDraft, OrderEdit, OrderStatus, Role, Viewer};
pub use events::OrderEvent;
pub use ports::{CustomerDirectory, InvoiceError, InvoiceRenderer, MailTransport, OrderRepository, RepositoryError, TransportError};
pub use value_objects::{Quantity, UnitPrice};
