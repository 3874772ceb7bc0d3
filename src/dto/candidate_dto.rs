use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCandidatePayload {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub department_id: Uuid,
    pub position_id: Uuid,
    pub problem_id: Uuid,
    pub scheduled_time: DateTime<Utc>,
    #[validate(range(min = 1, max = 480))]
    pub duration_minutes: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateCandidatePayload {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub department_id: Option<Uuid>,
    pub position_id: Option<Uuid>,
    pub problem_id: Option<Uuid>,
    pub scheduled_time: Option<DateTime<Utc>>,
    #[validate(range(min = 1, max = 480))]
    pub duration_minutes: Option<i32>,
    /// Re-run the generate/hash split and update both rows.
    pub regenerate_password: Option<bool>,
}
