//! Shared fixtures for HTTP-level tests.

#![allow(dead_code)]

use std::{
    collections::HashSet,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use orderdesk::config::{InvoiceConfig, MailConfig};
use orderdesk::domain::{Customer, InvoiceError, InvoiceRenderer, MailTransport, Order, TransportError};
use orderdesk::invoice::PdfInvoiceRenderer;
use orderdesk::notify::{Envelope, NotificationDispatcher};
use orderdesk::repository::{InMemoryCustomerDirectory, InMemoryOrderRepository};
use orderdesk::workflow::TransitionPolicy;
use orderdesk::{router, AppState, OrderWorkflow};

pub const ADMIN_EMAIL: &str = "admin@shop.test";

/// Records every envelope; fails delivery for the listed recipients.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Envelope>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingTransport {
    pub fn fail_for(&self, recipient: &str) { self.failing.lock().unwrap().insert(recipient.to_string()); }
    pub fn delivered(&self) -> Vec<Envelope> { self.sent.lock().unwrap().clone() }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn deliver(&self, envelope: &Envelope) -> Result<(), TransportError> {
        if self.failing.lock().unwrap().contains(&envelope.to) {
            return Err(TransportError::Unavailable("relay down".into()));
        }
        self.sent.lock().unwrap().push(envelope.clone());
        Ok(())
    }
}

/// Renderer whose disk is always full.
pub struct BrokenRenderer;

#[async_trait]
impl InvoiceRenderer for BrokenRenderer {
    async fn render(&self, order: &Order) -> Result<PathBuf, InvoiceError> {
        Err(InvoiceError::ArtifactWriteFailed {
            path: PathBuf::from(format!("/full/invoice-{}.pdf", order.id)),
            source: std::io::Error::new(std::io::ErrorKind::Other, "no space left on device"),
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub orders: Arc<InMemoryOrderRepository>,
    pub transport: Arc<RecordingTransport>,
    pub invoice_dir: TempDir,
}

pub struct TestAppBuilder {
    broken_renderer: bool,
    transitions: TransitionPolicy,
}

impl TestApp {
    pub fn builder() -> TestAppBuilder {
        TestAppBuilder { broken_renderer: false, transitions: TransitionPolicy::Unrestricted }
    }

    pub async fn new() -> Self { Self::builder().build().await }

    pub fn invoice_path(&self, order_id: i64) -> PathBuf {
        orderdesk::invoice::artifact_path(self.invoice_dir.path(), order_id)
    }

    pub async fn send(&self, method: Method, uri: &str, viewer: Option<(&str, &str)>, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some((email, role)) = viewer {
            request = request.header("x-user-email", email).header("x-user-role", role);
        }
        let request = match body {
            Some(json) => request.header("content-type", "application/json").body(Body::from(json.to_string())),
            None => request.body(Body::empty()),
        }.unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, json)
    }
}

impl TestAppBuilder {
    pub fn broken_renderer(mut self) -> Self { self.broken_renderer = true; self }

    pub fn transitions(mut self, transitions: TransitionPolicy) -> Self { self.transitions = transitions; self }

    pub async fn build(self) -> TestApp {
        let invoice_dir = tempfile::tempdir().unwrap();
        let customers = Arc::new(InMemoryCustomerDirectory::with_customers([
            Customer { id: 1, name: "Alice".into(), email: "a@b.com".into() },
            Customer { id: 2, name: "Carol".into(), email: "c@d.com".into() },
        ]));
        let orders = Arc::new(InMemoryOrderRepository::new(customers));
        let transport = Arc::new(RecordingTransport::default());
        let mail = MailConfig { from: "orders@shop.test".into(), admin_email: ADMIN_EMAIL.into(), nats_url: None, subject: "mail.outbound".into() };
        let invoices: Arc<dyn InvoiceRenderer> = if self.broken_renderer {
            Arc::new(BrokenRenderer)
        } else {
            Arc::new(PdfInvoiceRenderer::new(&InvoiceConfig { dir: invoice_dir.path().to_path_buf() }))
        };
        let workflow = OrderWorkflow::new(orders.clone(), invoices, NotificationDispatcher::new(transport.clone(), &mail), ADMIN_EMAIL)
            .with_transitions(self.transitions);
        TestApp { router: router(AppState { workflow: Arc::new(workflow) }), orders, transport, invoice_dir }
    }
}
