//! orderdesk - order management service

use std::sync::Arc;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use orderdesk::config::MailConfig;
use orderdesk::domain::MailTransport;
use orderdesk::invoice::PdfInvoiceRenderer;
use orderdesk::notify::{LogMailTransport, NatsMailTransport, NotificationDispatcher};
use orderdesk::repository::{PgCustomerDirectory, PgOrderRepository};
use orderdesk::{router, AppConfig, AppState, OrderWorkflow};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();
    let config = AppConfig::from_env()?;

    let db = PgPoolOptions::new().max_connections(config.max_connections).connect(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&db).await?;

    let customers = Arc::new(PgCustomerDirectory::new(db.clone()));
    let orders = Arc::new(PgOrderRepository::new(db, customers));
    let invoices = Arc::new(PdfInvoiceRenderer::new(&config.invoice));
    let notifier = NotificationDispatcher::new(mail_transport(&config.mail).await, &config.mail);
    let workflow = OrderWorkflow::new(orders, invoices, notifier, config.mail.admin_email.clone()).with_transitions(config.transitions);
    let state = AppState { workflow: Arc::new(workflow) };

    tracing::info!(invoice_dir = %config.invoice.dir.display(), transitions = %config.transitions, "order workflow ready");
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("orderdesk listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(&addr).await?, router(state)).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}

/// NATS relay when configured and reachable, otherwise log-only delivery.
async fn mail_transport(config: &MailConfig) -> Arc<dyn MailTransport> {
    let Some(url) = config.nats_url.as_deref() else {
        tracing::warn!("NATS_URL not set; outgoing mail will only be logged");
        return Arc::new(LogMailTransport);
    };
    match async_nats::connect(url).await {
        Ok(client) => {
            tracing::info!(url, subject = %config.subject, "mail relay connected");
            Arc::new(NatsMailTransport::new(client, config.subject.clone()))
        }
        Err(err) => {
            tracing::warn!(url, error = %err, "mail relay unreachable; outgoing mail will only be logged");
            Arc::new(LogMailTransport)
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
