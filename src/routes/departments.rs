use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::directory_dto::{
        CreateDepartmentPayload, ListQuery, ListResponse, UpdateDepartmentPayload,
    },
    error::Result,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/admin/departments",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("limit" = Option<i64>, Query, description = "Items per page"),
        ("search" = Option<String>, Query, description = "Name substring filter")
    ),
    responses(
        (status = 200, description = "Paginated list of departments")
    )
)]
#[axum::debug_handler]
pub async fn list_departments(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let list = state.department_service.list(query).await?;
    Ok(Json(ListResponse::new(
        list.items, list.total, list.page, list.limit,
    )))
}

#[utoipa::path(
    post,
    path = "/api/admin/departments",
    request_body = CreateDepartmentPayload,
    responses(
        (status = 201, description = "Department created"),
        (status = 400, description = "Invalid payload or duplicate name")
    )
)]
#[axum::debug_handler]
pub async fn create_department(
    State(state): State<AppState>,
    Json(payload): Json<CreateDepartmentPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let department = state.department_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(department)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/departments/{id}",
    params(("id" = Uuid, Path, description = "Department ID")),
    request_body = UpdateDepartmentPayload,
    responses(
        (status = 200, description = "Department updated"),
        (status = 404, description = "Department not found")
    )
)]
#[axum::debug_handler]
pub async fn update_department(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDepartmentPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let department = state.department_service.update(id, payload).await?;
    Ok(Json(department))
}

#[utoipa::path(
    delete,
    path = "/api/admin/departments/{id}",
    params(("id" = Uuid, Path, description = "Department ID")),
    responses(
        (status = 204, description = "Department deleted"),
        (status = 404, description = "Department not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_department(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.department_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
