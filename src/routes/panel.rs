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
    dto::panel_dto::{CreatePanelUserPayload, UpdatePanelUserPayload},
    error::{Error, Result},
    middleware::policy::Session,
    AppState,
};

/// An admin must never modify or delete their own account row through
/// the panel, regardless of tier. Distinct from Forbidden.
fn guard_self_modification(session: &Session, target: Uuid) -> Result<()> {
    if session.sub == target {
        return Err(Error::BadRequest(
            "You cannot modify your own admin account".to_string(),
        ));
    }
    Ok(())
}

#[axum::debug_handler]
pub async fn list_panel_users(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let list = state.panel_service.list(query).await?;
    Ok(Json(ListResponse::new(
        list.items, list.total, list.page, list.limit,
    )))
}

#[axum::debug_handler]
pub async fn create_panel_user(
    State(state): State<AppState>,
    Json(payload): Json<CreatePanelUserPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state.panel_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[axum::debug_handler]
pub async fn update_panel_user(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePanelUserPayload>,
) -> Result<impl IntoResponse> {
    guard_self_modification(&session, id)?;
    payload.validate()?;
    let user = state.panel_service.update(id, payload).await?;
    Ok(Json(user))
}

#[axum::debug_handler]
pub async fn delete_panel_user(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    guard_self_modification(&session, id)?;
    state.panel_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{ADMIN_ROLE_ADMIN, USER_TYPE_ADMIN};

    #[test]
    fn self_modification_is_rejected_even_for_super_admin() {
        let id = Uuid::new_v4();
        let session = Session {
            sub: id,
            email: "root@example.com".into(),
            name: "Root".into(),
            user_type: USER_TYPE_ADMIN.into(),
            admin_role: Some(ADMIN_ROLE_ADMIN.into()),
            exp: 0,
        };
        assert!(matches!(
            guard_self_modification(&session, id),
            Err(Error::BadRequest(_))
        ));
        assert!(guard_self_modification(&session, Uuid::new_v4()).is_ok());
    }
}
