use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Scheduled test instance. `password` is the generated plaintext shown
/// to admins; the paired `users` row (matched by email) carries the hash.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Candidate {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub department_id: Uuid,
    pub position_id: Uuid,
    pub problem_id: Uuid,
    pub scheduled_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub start_time: Option<DateTime<Utc>>,
    pub submission_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Candidate {
    /// Lifecycle state: scheduled until started, started until submitted.
    pub fn status(&self) -> &'static str {
        if self.submission_time.is_some() {
            "submitted"
        } else if self.start_time.is_some() {
            "started"
        } else {
            "scheduled"
        }
    }

    /// Test window boundary, defined once the candidate has started.
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
            .map(|t| t + Duration::minutes(self.duration_minutes as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(start: Option<DateTime<Utc>>, submitted: Option<DateTime<Utc>>) -> Candidate {
        let now = Utc::now();
        Candidate {
            id: Uuid::new_v4(),
            name: "Jane".into(),
            email: "jane@example.com".into(),
            password: "pw".into(),
            department_id: Uuid::new_v4(),
            position_id: Uuid::new_v4(),
            problem_id: Uuid::new_v4(),
            scheduled_time: now,
            duration_minutes: 90,
            start_time: start,
            submission_time: submitted,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn status_follows_timestamps() {
        let now = Utc::now();
        assert_eq!(candidate(None, None).status(), "scheduled");
        assert_eq!(candidate(Some(now), None).status(), "started");
        assert_eq!(candidate(Some(now), Some(now)).status(), "submitted");
    }

    #[test]
    fn end_time_is_start_plus_duration() {
        let start = Utc::now();
        let c = candidate(Some(start), None);
        assert_eq!(c.end_time(), Some(start + Duration::minutes(90)));
        assert_eq!(candidate(None, None).end_time(), None);
    }
}
