//! Order endpoints. Each handler extracts its inputs, runs one workflow
//! operation and returns the shaped reply.

use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    Json,
};

use super::error::ApiError;
use super::requests::{CreateOrderRequest, EditOrderRequest, UpdateStatusRequest};
use super::AppState;
use crate::domain::Viewer;
use crate::workflow::{shape, Reply, Step};

type Body<T> = Result<Json<T>, JsonRejection>;
type OrderId = Result<Path<i64>, PathRejection>;

pub async fn list_orders(State(s): State<AppState>, viewer: Viewer) -> Reply {
    shape(s.workflow.list_orders(&viewer).await)
}

pub async fn get_order(State(s): State<AppState>, viewer: Viewer, id: OrderId) -> Result<Reply, ApiError> {
    let Path(id) = id?;
    Ok(shape(s.workflow.get_order(&viewer, id).await))
}

pub async fn create_order(State(s): State<AppState>, _viewer: Viewer, body: Body<CreateOrderRequest>) -> Result<Reply, ApiError> {
    let Json(request) = body?;
    let outcome = match request.into_draft() {
        Ok(draft) => s.workflow.create_order(draft).await,
        Err(fatal) => Step::Fatal(fatal),
    };
    Ok(shape(outcome))
}

pub async fn update_status(State(s): State<AppState>, _viewer: Viewer, id: OrderId, body: Body<UpdateStatusRequest>) -> Result<Reply, ApiError> {
    let Path(id) = id?;
    let Json(request) = body?;
    let outcome = match request.into_status() {
        Ok(status) => s.workflow.update_status(id, status).await,
        Err(fatal) => Step::Fatal(fatal),
    };
    Ok(shape(outcome))
}

pub async fn edit_order(State(s): State<AppState>, _viewer: Viewer, id: OrderId, body: Body<EditOrderRequest>) -> Result<Reply, ApiError> {
    let Path(id) = id?;
    let Json(request) = body?;
    let outcome = match request.into_edit() {
        Ok(edit) => s.workflow.edit_order(id, edit).await,
        Err(fatal) => Step::Fatal(fatal),
    };
    Ok(shape(outcome))
}

pub async fn delete_order(State(s): State<AppState>, _viewer: Viewer, id: OrderId) -> Result<Reply, ApiError> {
    let Path(id) = id?;
    Ok(shape(s.workflow.delete_order(id).await))
}
