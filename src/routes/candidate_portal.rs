use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::portal_dto::SubmitTestPayload, error::Result, middleware::policy::Session, AppState,
};

#[axum::debug_handler]
pub async fn get_me(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse> {
    let me = state.lifecycle_service.get_me(&session.email).await?;
    Ok(Json(me))
}

#[axum::debug_handler]
pub async fn start_test(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse> {
    let started = state.lifecycle_service.start_test(&session.email).await?;
    Ok(Json(started))
}

#[axum::debug_handler]
pub async fn submit_test(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(payload): Json<SubmitTestPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let submitted = state
        .lifecycle_service
        .submit_test(&session.email, &payload.answers)
        .await?;
    Ok(Json(submitted))
}
