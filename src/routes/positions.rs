use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::directory_dto::{CreatePositionPayload, ListQuery, ListResponse, UpdatePositionPayload},
    error::Result,
    AppState,
};

#[axum::debug_handler]
pub async fn list_positions(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let list = state.position_service.list(query).await?;
    Ok(Json(ListResponse::new(
        list.items, list.total, list.page, list.limit,
    )))
}

#[axum::debug_handler]
pub async fn create_position(
    State(state): State<AppState>,
    Json(payload): Json<CreatePositionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let position = state.position_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(position)))
}

#[axum::debug_handler]
pub async fn update_position(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePositionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let position = state.position_service.update(id, payload).await?;
    Ok(Json(position))
}

#[axum::debug_handler]
pub async fn delete_position(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.position_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
