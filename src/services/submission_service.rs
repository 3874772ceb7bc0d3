use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::directory_dto::ListQuery;
use crate::dto::submission_dto::{SubmissionDetail, SubmissionListItem};
use crate::error::{Error, Result};
use crate::middleware::policy::Session;
use crate::models::{
    candidate::Candidate,
    department::Department,
    position::Position,
    problem::{Problem, ProblemWithStacks},
    stack::Stack,
    submission::{Remark, Submission},
};

#[derive(Clone)]
pub struct SubmissionService {
    pool: PgPool,
}

pub struct SubmissionList {
    pub items: Vec<SubmissionListItem>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl SubmissionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: ListQuery) -> Result<SubmissionList> {
        let page = query.page();
        let limit = query.limit();
        let search = query
            .search
            .as_deref()
            .map(|s| format!("%{}%", s))
            .unwrap_or_else(|| "%".to_string());

        let items = sqlx::query_as::<_, SubmissionListItem>(
            r#"SELECT sub.id, sub.candidate_id, c.name AS candidate_name,
                      c.email AS candidate_email, pr.title AS problem_title,
                      po.name AS position_name, sub.submission_time,
                      jsonb_array_length(sub.remarks)::bigint AS remark_count
               FROM submissions sub
               JOIN candidates c ON c.id = sub.candidate_id
               JOIN problems pr ON pr.id = sub.problem_id
               JOIN positions po ON po.id = sub.position_id
               WHERE c.name ILIKE $1 OR c.email ILIKE $1
               ORDER BY sub.submission_time DESC
               LIMIT $2 OFFSET $3"#,
        )
        .bind(&search)
        .bind(limit)
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*)
               FROM submissions sub
               JOIN candidates c ON c.id = sub.candidate_id
               WHERE c.name ILIKE $1 OR c.email ILIKE $1"#,
        )
        .bind(&search)
        .fetch_one(&self.pool)
        .await?;

        Ok(SubmissionList {
            items,
            total,
            page,
            limit,
        })
    }

    pub async fn get_detail(&self, id: Uuid) -> Result<SubmissionDetail> {
        let submission = self.get_by_id(id).await?;

        let candidate = sqlx::query_as::<_, Candidate>(
            r#"SELECT id, name, email, password, department_id, position_id, problem_id,
                      scheduled_time, duration_minutes, start_time, submission_time,
                      created_at, updated_at
               FROM candidates WHERE id = $1"#,
        )
        .bind(submission.candidate_id)
        .fetch_one(&self.pool)
        .await?;

        let problem = sqlx::query_as::<_, Problem>(
            r#"SELECT id, title, description, metadata, created_at, updated_at
               FROM problems WHERE id = $1"#,
        )
        .bind(submission.problem_id)
        .fetch_one(&self.pool)
        .await?;

        let stacks = sqlx::query_as::<_, Stack>(
            r#"SELECT s.id, s.name, s.created_at, s.updated_at
               FROM stacks s
               JOIN problem_stacks ps ON ps.stack_id = s.id
               WHERE ps.problem_id = $1
               ORDER BY s.name"#,
        )
        .bind(submission.problem_id)
        .fetch_all(&self.pool)
        .await?;

        let position = sqlx::query_as::<_, Position>(
            r#"SELECT id, name, department_id, created_at, updated_at
               FROM positions WHERE id = $1"#,
        )
        .bind(submission.position_id)
        .fetch_one(&self.pool)
        .await?;

        let department = sqlx::query_as::<_, Department>(
            r#"SELECT id, name, created_at, updated_at FROM departments WHERE id = $1"#,
        )
        .bind(position.department_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(SubmissionDetail {
            submission,
            candidate,
            problem: ProblemWithStacks { problem, stacks },
            position,
            department,
        })
    }

    /// Append to the remark log. The new entry is concatenated onto the
    /// stored array in place, so existing entries are never rewritten and
    /// concurrent appends cannot drop each other.
    pub async fn add_remark(
        &self,
        id: Uuid,
        text: &str,
        acting_admin: &Session,
    ) -> Result<Submission> {
        if text.trim().is_empty() {
            return Err(Error::BadRequest("Remark text must not be empty".to_string()));
        }

        let entry = serde_json::to_value(vec![Remark {
            id: Uuid::new_v4(),
            text: text.to_string(),
            admin_name: acting_admin.name.clone(),
            admin_email: acting_admin.email.clone(),
            created_at: Utc::now(),
        }])?;

        let updated = sqlx::query_as::<_, Submission>(
            r#"UPDATE submissions SET remarks = remarks || $2::jsonb
               WHERE id = $1
               RETURNING id, candidate_id, problem_id, position_id, submission_time,
                         answers, remarks, created_at"#,
        )
        .bind(id)
        .bind(entry)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| Error::NotFound("Submission not found".to_string()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let res = sqlx::query(r#"DELETE FROM submissions WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Submission not found".to_string()));
        }
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Submission> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"SELECT id, candidate_id, problem_id, position_id, submission_time,
                      answers, remarks, created_at
               FROM submissions WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        submission.ok_or_else(|| Error::NotFound("Submission not found".to_string()))
    }
}
