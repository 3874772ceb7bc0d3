use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::directory_dto::{ListQuery, ListResponse},
    dto::submission_dto::AddRemarkPayload,
    error::Result,
    middleware::policy::Session,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/admin/submissions",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("limit" = Option<i64>, Query, description = "Items per page"),
        ("search" = Option<String>, Query, description = "Candidate name or email substring filter")
    ),
    responses(
        (status = 200, description = "Paginated list of submissions")
    )
)]
#[axum::debug_handler]
pub async fn list_submissions(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let list = state.submission_service.list(query).await?;
    Ok(Json(ListResponse::new(
        list.items, list.total, list.page, list.limit,
    )))
}

#[utoipa::path(
    get,
    path = "/api/admin/submissions/{id}",
    params(("id" = Uuid, Path, description = "Submission ID")),
    responses(
        (status = 200, description = "Submission with candidate, problem, position and department joined"),
        (status = 404, description = "Submission not found")
    )
)]
#[axum::debug_handler]
pub async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let detail = state.submission_service.get_detail(id).await?;
    Ok(Json(detail))
}

#[utoipa::path(
    patch,
    path = "/api/admin/submissions/{id}",
    params(("id" = Uuid, Path, description = "Submission ID")),
    request_body = AddRemarkPayload,
    responses(
        (status = 200, description = "Remark appended"),
        (status = 400, description = "Empty remark text"),
        (status = 404, description = "Submission not found")
    )
)]
#[axum::debug_handler]
pub async fn add_remark(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddRemarkPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let submission = state
        .submission_service
        .add_remark(id, &payload.text, &session)
        .await?;
    Ok(Json(submission))
}

#[utoipa::path(
    delete,
    path = "/api/admin/submissions/{id}",
    params(("id" = Uuid, Path, description = "Submission ID")),
    responses(
        (status = 204, description = "Submission deleted"),
        (status = 404, description = "Submission not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_submission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.submission_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
