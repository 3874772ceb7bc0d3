use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::directory_dto::ListQuery;
use crate::dto::panel_dto::{CreatePanelUserPayload, UpdatePanelUserPayload};
use crate::error::{Error, Result};
use crate::models::user::{PanelUser, ADMIN_ROLE_ADMIN, ADMIN_ROLE_USER, USER_TYPE_ADMIN};
use crate::utils::crypto::hash_password;

#[derive(Clone)]
pub struct PanelService {
    pool: PgPool,
}

pub struct PanelUserList {
    pub items: Vec<PanelUser>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

fn validate_admin_role(role: &str) -> Result<()> {
    if role != ADMIN_ROLE_ADMIN && role != ADMIN_ROLE_USER {
        return Err(Error::BadRequest(format!(
            "admin_role must be '{}' or '{}'",
            ADMIN_ROLE_ADMIN, ADMIN_ROLE_USER
        )));
    }
    Ok(())
}

impl PanelService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: ListQuery) -> Result<PanelUserList> {
        let page = query.page();
        let limit = query.limit();
        let search = query
            .search
            .as_deref()
            .map(|s| format!("%{}%", s))
            .unwrap_or_else(|| "%".to_string());

        let items = sqlx::query_as::<_, PanelUser>(
            r#"SELECT id, email, name, admin_role, created_at, updated_at
               FROM users
               WHERE user_type = $1 AND (name ILIKE $2 OR email ILIKE $2)
               ORDER BY name
               LIMIT $3 OFFSET $4"#,
        )
        .bind(USER_TYPE_ADMIN)
        .bind(&search)
        .bind(limit)
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM users
               WHERE user_type = $1 AND (name ILIKE $2 OR email ILIKE $2)"#,
        )
        .bind(USER_TYPE_ADMIN)
        .bind(&search)
        .fetch_one(&self.pool)
        .await?;

        Ok(PanelUserList {
            items,
            total,
            page,
            limit,
        })
    }

    pub async fn create(&self, payload: CreatePanelUserPayload) -> Result<PanelUser> {
        validate_admin_role(&payload.admin_role)?;

        let existing = sqlx::query_scalar::<_, Uuid>(
            r#"SELECT id FROM users WHERE email = $1"#,
        )
        .bind(&payload.email)
        .fetch_optional(&self.pool)
        .await?;
        if existing.is_some() {
            return Err(Error::Conflict(
                "A user with this email already exists".to_string(),
            ));
        }

        let hash = hash_password(&payload.password)
            .map_err(|e| Error::Internal(format!("password hashing failed: {}", e)))?;

        let user = sqlx::query_as::<_, PanelUser>(
            r#"INSERT INTO users (email, name, password_hash, user_type, admin_role)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, email, name, admin_role, created_at, updated_at"#,
        )
        .bind(&payload.email)
        .bind(&payload.name)
        .bind(&hash)
        .bind(USER_TYPE_ADMIN)
        .bind(&payload.admin_role)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn update(&self, id: Uuid, payload: UpdatePanelUserPayload) -> Result<PanelUser> {
        if let Some(ref role) = payload.admin_role {
            validate_admin_role(role)?;
        }
        if let Some(ref email) = payload.email {
            let existing = sqlx::query_scalar::<_, Uuid>(
                r#"SELECT id FROM users WHERE email = $1 AND id <> $2"#,
            )
            .bind(email)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
            if existing.is_some() {
                return Err(Error::Conflict(
                    "A user with this email already exists".to_string(),
                ));
            }
        }

        let hash = match payload.password {
            Some(ref plain) => Some(
                hash_password(plain)
                    .map_err(|e| Error::Internal(format!("password hashing failed: {}", e)))?,
            ),
            None => None,
        };

        let user = sqlx::query_as::<_, PanelUser>(
            r#"UPDATE users
               SET name = COALESCE($2, name),
                   email = COALESCE($3, email),
                   password_hash = COALESCE($4, password_hash),
                   admin_role = COALESCE($5, admin_role),
                   updated_at = NOW()
               WHERE id = $1 AND user_type = $6
               RETURNING id, email, name, admin_role, created_at, updated_at"#,
        )
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&hash)
        .bind(&payload.admin_role)
        .bind(USER_TYPE_ADMIN)
        .fetch_optional(&self.pool)
        .await?;

        user.ok_or_else(|| Error::NotFound("Admin account not found".to_string()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let res = sqlx::query(r#"DELETE FROM users WHERE id = $1 AND user_type = $2"#)
            .bind(id)
            .bind(USER_TYPE_ADMIN)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Admin account not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_role_must_be_a_known_tier() {
        assert!(validate_admin_role("ADMIN").is_ok());
        assert!(validate_admin_role("USER").is_ok());
        assert!(validate_admin_role("ROOT").is_err());
        assert!(validate_admin_role("admin").is_err());
    }
}
