use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::candidate_dto::{CreateCandidatePayload, UpdateCandidatePayload};
use crate::dto::directory_dto::ListQuery;
use crate::error::{Error, Result};
use crate::models::candidate::Candidate;
use crate::models::user::USER_TYPE_CANDIDATE;
use crate::utils::crypto::hash_password;
use crate::utils::password::generate_password;

const DEFAULT_DURATION_MINUTES: i32 = 60;

#[derive(Clone)]
pub struct CandidateService {
    pool: PgPool,
}

pub struct CandidateList {
    pub items: Vec<Candidate>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl CandidateService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: ListQuery) -> Result<CandidateList> {
        let page = query.page();
        let limit = query.limit();
        let search = query
            .search
            .as_deref()
            .map(|s| format!("%{}%", s))
            .unwrap_or_else(|| "%".to_string());

        let items = sqlx::query_as::<_, Candidate>(
            r#"SELECT id, name, email, password, department_id, position_id, problem_id,
                      scheduled_time, duration_minutes, start_time, submission_time,
                      created_at, updated_at
               FROM candidates
               WHERE name ILIKE $1 OR email ILIKE $1
               ORDER BY scheduled_time DESC
               LIMIT $2 OFFSET $3"#,
        )
        .bind(&search)
        .bind(limit)
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM candidates WHERE name ILIKE $1 OR email ILIKE $1"#,
        )
        .bind(&search)
        .fetch_one(&self.pool)
        .await?;

        Ok(CandidateList {
            items,
            total,
            page,
            limit,
        })
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Candidate> {
        let candidate = sqlx::query_as::<_, Candidate>(
            r#"SELECT id, name, email, password, department_id, position_id, problem_id,
                      scheduled_time, duration_minutes, start_time, submission_time,
                      created_at, updated_at
               FROM candidates WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        candidate.ok_or_else(|| Error::NotFound("Candidate not found".to_string()))
    }

    /// Compound create: generate a password, hash it for the paired login
    /// row, keep the plaintext on the candidate row for admin visibility,
    /// and insert both rows in one transaction.
    pub async fn create(&self, payload: CreateCandidatePayload) -> Result<Candidate> {
        let existing_user = sqlx::query_scalar::<_, Uuid>(
            r#"SELECT id FROM users WHERE email = $1"#,
        )
        .bind(&payload.email)
        .fetch_optional(&self.pool)
        .await?;
        if existing_user.is_some() {
            return Err(Error::Conflict(
                "A user with this email already exists".to_string(),
            ));
        }
        let existing_candidate = sqlx::query_scalar::<_, Uuid>(
            r#"SELECT id FROM candidates WHERE email = $1"#,
        )
        .bind(&payload.email)
        .fetch_optional(&self.pool)
        .await?;
        if existing_candidate.is_some() {
            return Err(Error::Conflict(
                "A candidate with this email already exists".to_string(),
            ));
        }

        let plaintext = generate_password();
        let hash = hash_password(&plaintext)
            .map_err(|e| Error::Internal(format!("password hashing failed: {}", e)))?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"INSERT INTO users (email, name, password_hash, user_type, admin_role)
               VALUES ($1, $2, $3, $4, NULL)"#,
        )
        .bind(&payload.email)
        .bind(&payload.name)
        .bind(&hash)
        .bind(USER_TYPE_CANDIDATE)
        .execute(&mut *tx)
        .await?;

        let candidate = sqlx::query_as::<_, Candidate>(
            r#"INSERT INTO candidates (name, email, password, department_id, position_id,
                                       problem_id, scheduled_time, duration_minutes)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING id, name, email, password, department_id, position_id, problem_id,
                         scheduled_time, duration_minutes, start_time, submission_time,
                         created_at, updated_at"#,
        )
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&plaintext)
        .bind(payload.department_id)
        .bind(payload.position_id)
        .bind(payload.problem_id)
        .bind(payload.scheduled_time)
        .bind(payload.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(candidate)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateCandidatePayload) -> Result<Candidate> {
        let current = self.get_by_id(id).await?;
        let regenerate = payload.regenerate_password.unwrap_or(false);

        let mut tx = self.pool.begin().await?;

        let candidate = sqlx::query_as::<_, Candidate>(
            r#"UPDATE candidates
               SET name = COALESCE($2, name),
                   department_id = COALESCE($3, department_id),
                   position_id = COALESCE($4, position_id),
                   problem_id = COALESCE($5, problem_id),
                   scheduled_time = COALESCE($6, scheduled_time),
                   duration_minutes = COALESCE($7, duration_minutes),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING id, name, email, password, department_id, position_id, problem_id,
                         scheduled_time, duration_minutes, start_time, submission_time,
                         created_at, updated_at"#,
        )
        .bind(id)
        .bind(&payload.name)
        .bind(payload.department_id)
        .bind(payload.position_id)
        .bind(payload.problem_id)
        .bind(payload.scheduled_time)
        .bind(payload.duration_minutes)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(ref name) = payload.name {
            sqlx::query(r#"UPDATE users SET name = $2, updated_at = NOW() WHERE email = $1"#)
                .bind(&current.email)
                .bind(name)
                .execute(&mut *tx)
                .await?;
        }

        let candidate = if regenerate {
            let plaintext = generate_password();
            let hash = hash_password(&plaintext)
                .map_err(|e| Error::Internal(format!("password hashing failed: {}", e)))?;

            sqlx::query(
                r#"UPDATE users SET password_hash = $2, updated_at = NOW() WHERE email = $1"#,
            )
            .bind(&current.email)
            .bind(&hash)
            .execute(&mut *tx)
            .await?;

            sqlx::query_as::<_, Candidate>(
                r#"UPDATE candidates SET password = $2, updated_at = NOW()
                   WHERE id = $1
                   RETURNING id, name, email, password, department_id, position_id, problem_id,
                             scheduled_time, duration_minutes, start_time, submission_time,
                             created_at, updated_at"#,
            )
            .bind(id)
            .bind(&plaintext)
            .fetch_one(&mut *tx)
            .await?
        } else {
            candidate
        };

        tx.commit().await?;
        Ok(candidate)
    }

    /// Mirror of create: both the candidate row and its paired login row
    /// go, or neither does.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let candidate = self.get_by_id(id).await?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(r#"DELETE FROM candidates WHERE id = $1"#)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(r#"DELETE FROM users WHERE email = $1 AND user_type = $2"#)
            .bind(&candidate.email)
            .bind(USER_TYPE_CANDIDATE)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
