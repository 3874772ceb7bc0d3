use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::PgPool;

use crate::dto::auth_dto::{LoginResponse, SessionUser};
use crate::error::{Error, Result};
use crate::middleware::policy::Session;
use crate::models::user::User;
use crate::utils::crypto::verify_password;

#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
}

impl AuthService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Verify credentials and mint a session token. A missing user and a
    /// wrong password produce the same error so emails cannot be probed.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, email, name, password_hash, user_type, admin_role, created_at, updated_at
               FROM users WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        let Some(user) = user else {
            return Err(Error::Unauthorized("Invalid email or password".to_string()));
        };
        if user.password_hash.is_empty() {
            return Err(Error::Unauthorized("Invalid email or password".to_string()));
        }

        let ok = verify_password(password, &user.password_hash)
            .map_err(|e| Error::Internal(format!("password verification failed: {}", e)))?;
        if !ok {
            return Err(Error::Unauthorized("Invalid email or password".to_string()));
        }

        let token = self.mint_token(&user)?;
        Ok(LoginResponse {
            token,
            user: SessionUser {
                id: user.id,
                email: user.email,
                name: user.name,
                user_type: user.user_type,
                admin_role: user.admin_role,
            },
        })
    }

    fn mint_token(&self, user: &User) -> Result<String> {
        let config = crate::config::get_config();
        let exp = (Utc::now() + Duration::hours(config.session_ttl_hours)).timestamp() as usize;
        let claims = Session {
            sub: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            user_type: user.user_type.clone(),
            admin_role: user.admin_role.clone(),
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .map_err(|e| Error::Internal(format!("token encoding failed: {}", e)))
    }
}
