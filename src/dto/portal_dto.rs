use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    department::Department, position::Position, problem::ProblemWithStacks,
    submission::Answer,
};
use crate::services::lifecycle_service::TimerPhase;

/// Candidate's own record with joins, plus the derived lifecycle signals.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateMeResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub department: Department,
    pub position: Position,
    pub problem: ProblemWithStacks,
    pub scheduled_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub start_time: Option<DateTime<Utc>>,
    pub submission_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: String,
    pub timer: Option<TimerPhase>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartTestResponse {
    pub candidate_id: Uuid,
    pub status: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitTestPayload {
    #[validate(length(min = 1))]
    pub answers: Vec<Answer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitTestResponse {
    pub submission_id: Uuid,
    pub status: String,
    pub submission_time: DateTime<Utc>,
}
