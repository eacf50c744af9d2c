//! Invoice rendering.
//!
//! Each order gets one single-page PDF at `<dir>/invoice-<id>.pdf`. Rendering
//! the same order again overwrites the file; only the generation date differs.

pub mod pdf;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::InvoiceConfig;
use crate::domain::aggregates::invoice_name;
use crate::domain::value_objects::format_amount;
use crate::domain::{InvoiceError, InvoiceRenderer, Order};
use pdf::{Font, Page};

/// Deterministic artifact location for an order id.
pub fn artifact_path(dir: &Path, order_id: i64) -> PathBuf {
    dir.join(format!("{}.pdf", invoice_name(order_id)))
}

/// Lay out the invoice for `order` as PDF bytes.
pub fn render_document(order: &Order, generated_at: DateTime<Utc>) -> Vec<u8> {
    let mut page = Page::new();
    page.text(Font::Bold, 24, 50, 780, "INVOICE")
        .text(Font::Regular, 11, 50, 755, &format!("Order ID: {}", order.id))
        .text(Font::Regular, 11, 50, 740, &format!("Date: {}", generated_at.format("%Y-%m-%d %H:%M UTC")))
        .rule(50, 545, 725)
        .text(Font::Bold, 12, 50, 700, "Bill To")
        .text(Font::Regular, 11, 50, 684, &order.client_name)
        .text(Font::Regular, 11, 50, 669, &order.client_email)
        .text(Font::Bold, 11, 50, 630, "Product")
        .text(Font::Bold, 11, 300, 630, "Quantity")
        .text(Font::Bold, 11, 380, 630, "Unit Price")
        .text(Font::Bold, 11, 470, 630, "Total")
        .rule(50, 545, 622)
        .text(Font::Regular, 11, 50, 605, &order.product_name)
        .text(Font::Regular, 11, 300, 605, &order.quantity.to_string())
        .text(Font::Regular, 11, 380, 605, &format_amount(order.unit_price.amount()))
        .text(Font::Regular, 11, 470, 605, &format_amount(order.total()))
        .rule(50, 545, 590)
        .text(Font::Bold, 13, 380, 565, &format!("Grand Total: {}", format_amount(order.total())))
        .text(Font::Regular, 11, 50, 520, "Thank you for your business!");
    page.finish()
}

/// Writes invoices into a local directory.
#[derive(Debug, Clone)]
pub struct PdfInvoiceRenderer { dir: PathBuf }

impl PdfInvoiceRenderer {
    pub fn new(config: &InvoiceConfig) -> Self { Self { dir: config.dir.clone() } }

    pub fn dir(&self) -> &Path { &self.dir }
}

#[async_trait]
impl InvoiceRenderer for PdfInvoiceRenderer {
    async fn render(&self, order: &Order) -> Result<PathBuf, InvoiceError> {
        let path = artifact_path(&self.dir, order.id);
        let bytes = render_document(order, Utc::now());
        let write_failed = |source| InvoiceError::ArtifactWriteFailed { path: path.clone(), source };
        tokio::fs::create_dir_all(&self.dir).await.map_err(write_failed)?;
        tokio::fs::write(&path, bytes).await.map_err(write_failed)?;
        tracing::debug!(order_id = order.id, path = %path.display(), "invoice written");
        Ok(path)
    }
}
