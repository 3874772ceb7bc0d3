use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::directory_dto::{CreateProblemPayload, ListQuery, ListResponse, UpdateProblemPayload},
    error::Result,
    AppState,
};

#[axum::debug_handler]
pub async fn list_problems(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let list = state.problem_service.list(query).await?;
    Ok(Json(ListResponse::new(
        list.items, list.total, list.page, list.limit,
    )))
}

#[axum::debug_handler]
pub async fn get_problem(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let problem = state.problem_service.get_by_id(id).await?;
    Ok(Json(problem))
}

#[axum::debug_handler]
pub async fn create_problem(
    State(state): State<AppState>,
    Json(payload): Json<CreateProblemPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let problem = state.problem_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(problem)))
}

#[axum::debug_handler]
pub async fn update_problem(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProblemPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let problem = state.problem_service.update(id, payload).await?;
    Ok(Json(problem))
}

#[axum::debug_handler]
pub async fn delete_problem(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.problem_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
