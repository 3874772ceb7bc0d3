use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::settings_dto::UpdateSettingsPayload;
use crate::error::{Error, Result};
use crate::models::user::PanelUser;
use crate::utils::crypto::{hash_password, verify_password};

#[derive(Clone)]
pub struct SettingsService {
    pool: PgPool,
}

impl SettingsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<PanelUser> {
        let user = sqlx::query_as::<_, PanelUser>(
            r#"SELECT id, email, name, admin_role, created_at, updated_at
               FROM users WHERE id = $1 AND user_type = 'ADMIN'"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        user.ok_or_else(|| Error::NotFound("Account not found".to_string()))
    }

    /// Own-profile update. Changing the password requires the current
    /// password to verify against the stored hash first.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        payload: UpdateSettingsPayload,
    ) -> Result<PanelUser> {
        let new_hash = match payload.new_password {
            Some(ref new_password) => {
                let current = payload.current_password.as_deref().ok_or_else(|| {
                    Error::BadRequest("Current password is required to set a new one".to_string())
                })?;

                let stored_hash = sqlx::query_scalar::<_, String>(
                    r#"SELECT password_hash FROM users WHERE id = $1"#,
                )
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| Error::NotFound("Account not found".to_string()))?;

                let ok = verify_password(current, &stored_hash)
                    .map_err(|e| Error::Internal(format!("password verification failed: {}", e)))?;
                if !ok {
                    return Err(Error::BadRequest(
                        "Current password is incorrect".to_string(),
                    ));
                }

                Some(
                    hash_password(new_password)
                        .map_err(|e| Error::Internal(format!("password hashing failed: {}", e)))?,
                )
            }
            None => None,
        };

        if let Some(ref email) = payload.email {
            let existing = sqlx::query_scalar::<_, Uuid>(
                r#"SELECT id FROM users WHERE email = $1 AND id <> $2"#,
            )
            .bind(email)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
            if existing.is_some() {
                return Err(Error::Conflict(
                    "A user with this email already exists".to_string(),
                ));
            }
        }

        let user = sqlx::query_as::<_, PanelUser>(
            r#"UPDATE users
               SET name = COALESCE($2, name),
                   email = COALESCE($3, email),
                   password_hash = COALESCE($4, password_hash),
                   updated_at = NOW()
               WHERE id = $1 AND user_type = 'ADMIN'
               RETURNING id, email, name, admin_role, created_at, updated_at"#,
        )
        .bind(user_id)
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&new_hash)
        .fetch_optional(&self.pool)
        .await?;

        user.ok_or_else(|| Error::NotFound("Account not found".to_string()))
    }
}
