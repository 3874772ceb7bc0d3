use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::portal_dto::{CandidateMeResponse, StartTestResponse, SubmitTestResponse};
use crate::error::{Error, Result};
use crate::models::{
    candidate::Candidate,
    department::Department,
    position::Position,
    problem::{Problem, ProblemWithStacks},
    stack::Stack,
    submission::{Answer, Submission},
};

/// Countdown/overtime signal derived from the clock; never touches
/// server state and enforces no hard cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum TimerPhase {
    Countdown { remaining_seconds: i64 },
    Overtime { overtime_seconds: i64 },
}

pub fn timer_phase(now: DateTime<Utc>, end_time: DateTime<Utc>) -> TimerPhase {
    let delta = (end_time - now).num_seconds();
    if delta >= 0 {
        TimerPhase::Countdown {
            remaining_seconds: delta,
        }
    } else {
        TimerPhase::Overtime {
            overtime_seconds: -delta,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartDenied {
    NotYetAvailable,
    AlreadyStarted,
}

/// Scheduled -> Started gate. Starting exactly at `scheduled_time` is
/// allowed; a second start must be rejected, never silently accepted.
pub fn start_precondition(
    now: DateTime<Utc>,
    scheduled_time: DateTime<Utc>,
    start_time: Option<DateTime<Utc>>,
) -> std::result::Result<(), StartDenied> {
    if start_time.is_some() {
        return Err(StartDenied::AlreadyStarted);
    }
    if now < scheduled_time {
        return Err(StartDenied::NotYetAvailable);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitDenied {
    NotStarted,
    AlreadySubmitted,
}

pub fn submit_precondition(
    start_time: Option<DateTime<Utc>>,
    submission_time: Option<DateTime<Utc>>,
) -> std::result::Result<(), SubmitDenied> {
    if start_time.is_none() {
        return Err(SubmitDenied::NotStarted);
    }
    if submission_time.is_some() {
        return Err(SubmitDenied::AlreadySubmitted);
    }
    Ok(())
}

#[derive(Clone)]
pub struct LifecycleService {
    pool: PgPool,
}

impl LifecycleService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn get_by_email(&self, email: &str) -> Result<Candidate> {
        let candidate = sqlx::query_as::<_, Candidate>(
            r#"SELECT id, name, email, password, department_id, position_id, problem_id,
                      scheduled_time, duration_minutes, start_time, submission_time,
                      created_at, updated_at
               FROM candidates WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        candidate.ok_or_else(|| Error::NotFound("No scheduled test for this account".to_string()))
    }

    pub async fn get_me(&self, email: &str) -> Result<CandidateMeResponse> {
        let candidate = self.get_by_email(email).await?;

        let department = sqlx::query_as::<_, Department>(
            r#"SELECT id, name, created_at, updated_at FROM departments WHERE id = $1"#,
        )
        .bind(candidate.department_id)
        .fetch_one(&self.pool)
        .await?;

        let position = sqlx::query_as::<_, Position>(
            r#"SELECT id, name, department_id, created_at, updated_at
               FROM positions WHERE id = $1"#,
        )
        .bind(candidate.position_id)
        .fetch_one(&self.pool)
        .await?;

        let problem = sqlx::query_as::<_, Problem>(
            r#"SELECT id, title, description, metadata, created_at, updated_at
               FROM problems WHERE id = $1"#,
        )
        .bind(candidate.problem_id)
        .fetch_one(&self.pool)
        .await?;

        let stacks = sqlx::query_as::<_, Stack>(
            r#"SELECT s.id, s.name, s.created_at, s.updated_at
               FROM stacks s
               JOIN problem_stacks ps ON ps.stack_id = s.id
               WHERE ps.problem_id = $1
               ORDER BY s.name"#,
        )
        .bind(candidate.problem_id)
        .fetch_all(&self.pool)
        .await?;

        let end_time = candidate.end_time();
        let timer = end_time.map(|end| timer_phase(Utc::now(), end));

        Ok(CandidateMeResponse {
            id: candidate.id,
            name: candidate.name.clone(),
            email: candidate.email.clone(),
            department,
            position,
            problem: ProblemWithStacks { problem, stacks },
            scheduled_time: candidate.scheduled_time,
            duration_minutes: candidate.duration_minutes,
            start_time: candidate.start_time,
            submission_time: candidate.submission_time,
            end_time,
            status: candidate.status().to_string(),
            timer,
        })
    }

    /// Scheduled -> Started. Single conditional UPDATE so two racing
    /// start requests cannot both pass the gate; on zero rows a
    /// classification read names the reason.
    pub async fn start_test(&self, email: &str) -> Result<StartTestResponse> {
        let now = Utc::now();
        let updated = sqlx::query_as::<_, Candidate>(
            r#"UPDATE candidates
               SET start_time = $2, updated_at = $2
               WHERE email = $1 AND start_time IS NULL AND scheduled_time <= $2
               RETURNING id, name, email, password, department_id, position_id, problem_id,
                         scheduled_time, duration_minutes, start_time, submission_time,
                         created_at, updated_at"#,
        )
        .bind(email)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(candidate) = updated {
            let start_time = candidate
                .start_time
                .ok_or_else(|| Error::Internal("start_time missing after update".to_string()))?;
            let end_time = candidate
                .end_time()
                .ok_or_else(|| Error::Internal("end_time missing after update".to_string()))?;
            return Ok(StartTestResponse {
                candidate_id: candidate.id,
                status: candidate.status().to_string(),
                start_time,
                end_time,
            });
        }

        let candidate = self.get_by_email(email).await?;
        match start_precondition(now, candidate.scheduled_time, candidate.start_time) {
            Err(StartDenied::AlreadyStarted) => Err(Error::InvalidState(
                "Test has already been started".to_string(),
            )),
            Err(StartDenied::NotYetAvailable) => Err(Error::InvalidState(
                "Test is not yet available".to_string(),
            )),
            // Precondition holds but the conditional update matched no
            // row: the row changed between the two statements.
            Ok(()) => Err(Error::Conflict(
                "Concurrent update, please retry".to_string(),
            )),
        }
    }

    /// Started -> Submitted. Creates the submission row and stamps the
    /// candidate in one transaction; submitting in overtime is allowed.
    pub async fn submit_test(&self, email: &str, answers: &[Answer]) -> Result<SubmitTestResponse> {
        let mut tx = self.pool.begin().await?;

        let candidate = sqlx::query_as::<_, Candidate>(
            r#"SELECT id, name, email, password, department_id, position_id, problem_id,
                      scheduled_time, duration_minutes, start_time, submission_time,
                      created_at, updated_at
               FROM candidates WHERE email = $1
               FOR UPDATE"#,
        )
        .bind(email)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound("No scheduled test for this account".to_string()))?;

        match submit_precondition(candidate.start_time, candidate.submission_time) {
            Err(SubmitDenied::NotStarted) => {
                return Err(Error::InvalidState(
                    "Test has not been started".to_string(),
                ));
            }
            Err(SubmitDenied::AlreadySubmitted) => {
                return Err(Error::InvalidState(
                    "Test has already been submitted".to_string(),
                ));
            }
            Ok(()) => {}
        }

        let now = Utc::now();
        let answers_json = serde_json::to_value(answers)?;

        let submission = sqlx::query_as::<_, Submission>(
            r#"INSERT INTO submissions (id, candidate_id, problem_id, position_id,
                                        submission_time, answers, remarks)
               VALUES ($1, $2, $3, $4, $5, $6, '[]'::jsonb)
               RETURNING id, candidate_id, problem_id, position_id, submission_time,
                         answers, remarks, created_at"#,
        )
        .bind(Uuid::new_v4())
        .bind(candidate.id)
        .bind(candidate.problem_id)
        .bind(candidate.position_id)
        .bind(now)
        .bind(answers_json)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"UPDATE candidates SET submission_time = $2, updated_at = $2 WHERE id = $1"#,
        )
        .bind(candidate.id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(SubmitTestResponse {
            submission_id: submission.id,
            status: "submitted".to_string(),
            submission_time: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn start_allowed_exactly_at_scheduled_time() {
        let t = Utc::now();
        assert_eq!(start_precondition(t, t, None), Ok(()));
        assert_eq!(start_precondition(t + Duration::seconds(1), t, None), Ok(()));
    }

    #[test]
    fn start_before_schedule_denied() {
        let t = Utc::now();
        assert_eq!(
            start_precondition(t - Duration::seconds(1), t, None),
            Err(StartDenied::NotYetAvailable)
        );
    }

    #[test]
    fn double_start_denied_even_after_schedule() {
        let t = Utc::now();
        assert_eq!(
            start_precondition(t + Duration::minutes(5), t, Some(t)),
            Err(StartDenied::AlreadyStarted)
        );
    }

    #[test]
    fn already_started_wins_over_not_yet_available() {
        // A started test stays started even if the schedule was moved forward.
        let t = Utc::now();
        assert_eq!(
            start_precondition(t, t + Duration::hours(1), Some(t)),
            Err(StartDenied::AlreadyStarted)
        );
    }

    #[test]
    fn submit_requires_start() {
        let t = Utc::now();
        assert_eq!(submit_precondition(None, None), Err(SubmitDenied::NotStarted));
        assert_eq!(submit_precondition(Some(t), None), Ok(()));
        assert_eq!(
            submit_precondition(Some(t), Some(t)),
            Err(SubmitDenied::AlreadySubmitted)
        );
    }

    #[test]
    fn timer_flips_to_overtime_past_end() {
        let end = Utc::now();
        assert_eq!(
            timer_phase(end - Duration::seconds(30), end),
            TimerPhase::Countdown {
                remaining_seconds: 30
            }
        );
        assert_eq!(
            timer_phase(end, end),
            TimerPhase::Countdown {
                remaining_seconds: 0
            }
        );
        assert_eq!(
            timer_phase(end + Duration::seconds(90), end),
            TimerPhase::Overtime {
                overtime_seconds: 90
            }
        );
    }
}
