//! HTTP surface.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod requests;

use std::sync::Arc;

use axum::{routing::{get, put}, Json, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::workflow::OrderWorkflow;

#[derive(Clone)]
pub struct AppState { pub workflow: Arc<OrderWorkflow> }

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "orderdesk"})) }))
        .route("/api/orders", get(handlers::list_orders).post(handlers::create_order))
        .route("/api/orders/:id", get(handlers::get_order).put(handlers::update_status).delete(handlers::delete_order))
        .route("/api/orders/edit/:id", put(handlers::edit_order))
        .layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()).with_state(state)
}
