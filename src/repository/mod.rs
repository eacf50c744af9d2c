//! Order and customer storage adapters.
pub mod memory;
pub mod postgres;

pub use memory::{InMemoryCustomerDirectory, InMemoryOrderRepository};
pub use postgres::{PgCustomerDirectory, PgOrderRepository};
