use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const USER_TYPE_ADMIN: &str = "ADMIN";
pub const USER_TYPE_CANDIDATE: &str = "CANDIDATE";

/// Super-admin tier: may manage departments, stacks and the panel itself.
pub const ADMIN_ROLE_ADMIN: &str = "ADMIN";
/// Plain admin tier.
pub const ADMIN_ROLE_USER: &str = "USER";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub user_type: String,
    pub admin_role: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Admin account as exposed to the interview-panel endpoints; never
/// carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PanelUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub admin_role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
