use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{
    candidate::Candidate, department::Department, position::Position, problem::ProblemWithStacks,
    submission::Submission,
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddRemarkPayload {
    #[validate(length(min = 1))]
    pub text: String,
}

/// Submission joined with everything the review screen needs.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionDetail {
    #[serde(flatten)]
    pub submission: Submission,
    pub candidate: Candidate,
    pub problem: ProblemWithStacks,
    pub position: Position,
    pub department: Department,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SubmissionListItem {
    pub id: uuid::Uuid,
    pub candidate_id: uuid::Uuid,
    pub candidate_name: String,
    pub candidate_email: String,
    pub problem_title: String,
    pub position_name: String,
    pub submission_time: chrono::DateTime<chrono::Utc>,
    pub remark_count: i64,
}
