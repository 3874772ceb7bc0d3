use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::directory_dto::{CreateStackPayload, ListQuery, ListResponse, UpdateStackPayload},
    error::Result,
    AppState,
};

#[axum::debug_handler]
pub async fn list_stacks(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let list = state.stack_service.list(query).await?;
    Ok(Json(ListResponse::new(
        list.items, list.total, list.page, list.limit,
    )))
}

#[axum::debug_handler]
pub async fn create_stack(
    State(state): State<AppState>,
    Json(payload): Json<CreateStackPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let stack = state.stack_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(stack)))
}

#[axum::debug_handler]
pub async fn update_stack(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStackPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let stack = state.stack_service.update(id, payload).await?;
    Ok(Json(stack))
}

#[axum::debug_handler]
pub async fn delete_stack(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.stack_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
