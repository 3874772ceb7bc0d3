use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::settings_dto::UpdateSettingsPayload, error::Result, middleware::policy::Session, AppState,
};

#[axum::debug_handler]
pub async fn get_settings(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse> {
    let profile = state.settings_service.get_profile(session.sub).await?;
    Ok(Json(profile))
}

#[axum::debug_handler]
pub async fn update_settings(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(payload): Json<UpdateSettingsPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let profile = state
        .settings_service
        .update_profile(session.sub, payload)
        .await?;
    Ok(Json(profile))
}
