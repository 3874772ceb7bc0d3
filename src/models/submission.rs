use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Submission {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub problem_id: Uuid,
    pub position_id: Uuid,
    pub submission_time: DateTime<Utc>,
    /// Ordered `[{stack_id, code}]` pairs as submitted.
    pub answers: JsonValue,
    /// Append-only remark log; existing entries are never edited.
    pub remarks: JsonValue,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub stack_id: Uuid,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Remark {
    pub id: Uuid,
    pub text: String,
    pub admin_name: String,
    pub admin_email: String,
    pub created_at: DateTime<Utc>,
}
