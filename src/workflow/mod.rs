//! Order workflow orchestration.
//!
//! The orchestrator is the only component that knows the repository, the
//! invoice renderer and the notification dispatcher. Create and status-change
//! run as persist, render (create only), notify; each returns a [`Step`] that
//! [`pipeline::shape`] turns into the HTTP reply.

pub mod pipeline;
pub mod transitions;
pub mod view;

use std::{path::Path, sync::Arc};

use tracing::{debug, error, info, instrument, warn};

use crate::domain::{InvoiceRenderer, Order, OrderDraft, OrderEdit, OrderEvent, OrderRepository, OrderStatus, Viewer};
use crate::notify::templates::{compose, Audience};
use crate::notify::{Attachment, Message, NotificationDispatcher, NotificationRecord};

pub use pipeline::{shape, Completed, Fatal, Reply, Step};
pub use transitions::TransitionPolicy;
pub use view::OrderView;

pub struct OrderWorkflow {
    orders: Arc<dyn OrderRepository>,
    invoices: Arc<dyn InvoiceRenderer>,
    notifier: NotificationDispatcher,
    admin_email: String,
    transitions: TransitionPolicy,
}

impl OrderWorkflow {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        invoices: Arc<dyn InvoiceRenderer>,
        notifier: NotificationDispatcher,
        admin_email: impl Into<String>,
    ) -> Self {
        Self { orders, invoices, notifier, admin_email: admin_email.into(), transitions: TransitionPolicy::default() }
    }

    pub fn with_transitions(mut self, transitions: TransitionPolicy) -> Self {
        self.transitions = transitions;
        self
    }

    /// Persist, render the invoice, then notify client and admin.
    #[instrument(skip_all, fields(client_email = %draft.client_email))]
    pub async fn create_order(&self, draft: OrderDraft) -> Step<Completed> {
        let outcome = Step::settle(self.run_create(draft).await).map(Completed::Created);
        log_outcome("create_order", &outcome);
        outcome
    }

    async fn run_create(&self, draft: OrderDraft) -> Result<(Order, Vec<NotificationRecord>), Fatal> {
        let created = self.orders.create(&draft).await?;
        info!(order_id = created.id, "order persisted");

        // Re-read so the response and the invoice use the stored row.
        let order = self.reload(created.id).await?;

        let invoice = self.invoices.render(&order).await.map_err(|e| Fatal::InvoiceGeneration {
            order_id: order.id,
            reason: e.to_string(),
        })?;

        let records = self.notify(OrderEvent::Placed, &order, Some(&invoice)).await;
        Ok((order, records))
    }

    /// Write a new status and tell both parties about it.
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: i64, status: OrderStatus) -> Step<Completed> {
        let outcome = Step::settle(self.run_status_update(id, status).await).map(Completed::StatusChanged);
        log_outcome("update_status", &outcome);
        outcome
    }

    async fn run_status_update(&self, id: i64, status: OrderStatus) -> Result<(Order, Vec<NotificationRecord>), Fatal> {
        let previous = self.orders.get_by_id(id).await?.status;
        if !self.transitions.allows(previous, status) {
            return Err(Fatal::InvalidTransition { from: previous, to: status });
        }
        self.orders.update_status(id, status).await?;
        let order = self.reload(id).await?;
        let records = self.notify(OrderEvent::StatusChanged { previous, current: status }, &order, None).await;
        Ok((order, records))
    }

    #[instrument(skip(self, edit))]
    pub async fn edit_order(&self, id: i64, edit: OrderEdit) -> Step<Completed> {
        let outcome = Step::from_result(self.orders.update_fields(id, &edit).await.map_err(Fatal::from)).map(Completed::Edited);
        log_outcome("edit_order", &outcome);
        outcome
    }

    /// Remove the row. The invoice artifact stays where it is.
    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: i64) -> Step<Completed> {
        let outcome = Step::from_result(self.orders.delete(id).await.map_err(Fatal::from)).map(|()| Completed::Deleted(id));
        log_outcome("delete_order", &outcome);
        outcome
    }

    pub async fn list_orders(&self, viewer: &Viewer) -> Step<Completed> {
        Step::from_result(self.orders.list_for_viewer(viewer).await.map_err(Fatal::from)).map(Completed::Listed)
    }

    /// Orders owned by someone else look absent to non-admins.
    pub async fn get_order(&self, viewer: &Viewer, id: i64) -> Step<Completed> {
        let result = match self.orders.get_by_id(id).await {
            Ok(order) if viewer.can_see(&order.client_email) => Ok(order),
            Ok(_) => Err(Fatal::OrderNotFound(id)),
            Err(err) => Err(Fatal::from(err)),
        };
        Step::from_result(result).map(Completed::Fetched)
    }

    /// Read back a row this request has just written.
    async fn reload(&self, order_id: i64) -> Result<Order, Fatal> {
        self.orders.get_by_id(order_id).await.map_err(|e| Fatal::Reload { order_id, reason: e.to_string() })
    }

    /// Send the client and admin messages concurrently; neither gates the other.
    async fn notify(&self, event: OrderEvent, order: &Order, invoice: Option<&Path>) -> Vec<NotificationRecord> {
        debug!(order_id = order.id, event = event.name(), "dispatching notifications");
        let attachments: Vec<Attachment> = invoice.into_iter().map(|path| Attachment {
            filename: format!("{}.pdf", order.invoice_name()),
            source_path: path.to_path_buf(),
        }).collect();
        let client = self.message(event, order, Audience::Client, &order.client_email, &attachments);
        let admin = self.message(event, order, Audience::Admin, &self.admin_email, &attachments);
        let (client_record, admin_record) = tokio::join!(self.deliver(order.id, client), self.deliver(order.id, admin));
        vec![client_record, admin_record]
    }

    fn message(&self, event: OrderEvent, order: &Order, audience: Audience, to: &str, attachments: &[Attachment]) -> Message {
        let (subject, html_body) = compose(event, order, audience);
        Message { to: to.to_string(), subject, html_body, attachments: attachments.to_vec() }
    }

    async fn deliver(&self, order_id: i64, message: Message) -> NotificationRecord {
        let recipient = message.to.clone();
        let subject = message.subject.clone();
        let outcome = self.notifier.send(message).await;
        NotificationRecord { recipient, subject, order_id, outcome }
    }
}

fn log_outcome(operation: &'static str, outcome: &Step<Completed>) {
    match outcome {
        Step::Committed(_) => info!(operation, "workflow committed"),
        Step::Degraded { notifications, .. } => {
            let failed = notifications.iter().filter(|r| !r.outcome.is_sent()).count();
            warn!(operation, failed, "workflow committed with notification failures");
        }
        Step::Fatal(fatal) => match fatal {
            Fatal::Persistence(_) | Fatal::InvoiceGeneration { .. } | Fatal::Reload { .. } => error!(operation, error = %fatal, "workflow failed"),
            _ => info!(operation, error = %fatal, code = fatal.code(), "workflow rejected"),
        },
    }
}
