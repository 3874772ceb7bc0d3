use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::auth_dto::{LoginPayload, SessionUser},
    error::Result,
    middleware::policy::Session,
    AppState,
};

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let response = state
        .auth_service
        .authenticate(&payload.email, &payload.password)
        .await?;
    Ok(Json(response))
}

/// Echo the identity claims carried by the current token.
#[axum::debug_handler]
pub async fn current_session(Extension(session): Extension<Session>) -> impl IntoResponse {
    Json(SessionUser {
        id: session.sub,
        email: session.email,
        name: session.name,
        user_type: session.user_type,
        admin_role: session.admin_role,
    })
}
