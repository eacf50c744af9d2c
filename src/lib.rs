//! orderdesk - stock and order management service
//!
//! The interesting part is the order lifecycle: creating an order persists
//! it, renders a PDF invoice and emails the client and an admin, all inside
//! one request. Persistence is the durability boundary; invoice failures fail
//! the response without undoing the order, and email failures only add a
//! `details` note to an otherwise successful reply.
//!
//! ## Modules
//! - `domain`: orders, customers, value objects and the ports the workflow uses
//! - `repository`: PostgreSQL and in-memory storage adapters
//! - `invoice`: single-page PDF invoices on local disk
//! - `notify`: templated mail through a NATS relay or the log
//! - `workflow`: the orchestrator and its outcome-to-HTTP mapping
//! - `http`: axum router, identity extraction and request validation

pub mod config;
pub mod domain;
pub mod http;
pub mod invoice;
pub mod notify;
pub mod repository;
pub mod workflow;

pub use config::{AppConfig, ConfigError};
pub use http::{router, AppState};
pub use workflow::OrderWorkflow;
