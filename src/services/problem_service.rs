use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::directory_dto::{CreateProblemPayload, ListQuery, UpdateProblemPayload};
use crate::error::{Error, Result};
use crate::models::problem::{Problem, ProblemWithStacks};
use crate::models::stack::Stack;

#[derive(Clone)]
pub struct ProblemService {
    pool: PgPool,
}

pub struct ProblemList {
    pub items: Vec<ProblemWithStacks>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl ProblemService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: ListQuery) -> Result<ProblemList> {
        let page = query.page();
        let limit = query.limit();
        let search = query
            .search
            .as_deref()
            .map(|s| format!("%{}%", s))
            .unwrap_or_else(|| "%".to_string());

        let problems = sqlx::query_as::<_, Problem>(
            r#"SELECT id, title, description, metadata, created_at, updated_at
               FROM problems
               WHERE title ILIKE $1 OR description ILIKE $1
               ORDER BY title
               LIMIT $2 OFFSET $3"#,
        )
        .bind(&search)
        .bind(limit)
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM problems WHERE title ILIKE $1 OR description ILIKE $1"#,
        )
        .bind(&search)
        .fetch_one(&self.pool)
        .await?;

        let mut items = Vec::with_capacity(problems.len());
        for problem in problems {
            let stacks = self.stacks_for(problem.id).await?;
            items.push(ProblemWithStacks { problem, stacks });
        }

        Ok(ProblemList {
            items,
            total,
            page,
            limit,
        })
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<ProblemWithStacks> {
        let problem = sqlx::query_as::<_, Problem>(
            r#"SELECT id, title, description, metadata, created_at, updated_at
               FROM problems WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Problem not found".to_string()))?;

        let stacks = self.stacks_for(id).await?;
        Ok(ProblemWithStacks { problem, stacks })
    }

    pub async fn create(&self, payload: CreateProblemPayload) -> Result<ProblemWithStacks> {
        self.ensure_stacks_exist(&payload.stack_ids).await?;

        let mut tx = self.pool.begin().await?;

        let problem = sqlx::query_as::<_, Problem>(
            r#"INSERT INTO problems (title, description, metadata)
               VALUES ($1, $2, $3)
               RETURNING id, title, description, metadata, created_at, updated_at"#,
        )
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.metadata)
        .fetch_one(&mut *tx)
        .await?;

        for stack_id in &payload.stack_ids {
            sqlx::query(r#"INSERT INTO problem_stacks (problem_id, stack_id) VALUES ($1, $2)"#)
                .bind(problem.id)
                .bind(stack_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        let stacks = self.stacks_for(problem.id).await?;
        Ok(ProblemWithStacks { problem, stacks })
    }

    pub async fn update(&self, id: Uuid, payload: UpdateProblemPayload) -> Result<ProblemWithStacks> {
        if let Some(ref stack_ids) = payload.stack_ids {
            self.ensure_stacks_exist(stack_ids).await?;
        }

        let mut tx = self.pool.begin().await?;

        let problem = sqlx::query_as::<_, Problem>(
            r#"UPDATE problems
               SET title = COALESCE($2, title),
                   description = COALESCE($3, description),
                   metadata = COALESCE($4, metadata),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING id, title, description, metadata, created_at, updated_at"#,
        )
        .bind(id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.metadata)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound("Problem not found".to_string()))?;

        if let Some(stack_ids) = payload.stack_ids {
            sqlx::query(r#"DELETE FROM problem_stacks WHERE problem_id = $1"#)
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for stack_id in stack_ids {
                sqlx::query(
                    r#"INSERT INTO problem_stacks (problem_id, stack_id) VALUES ($1, $2)"#,
                )
                .bind(id)
                .bind(stack_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        let stacks = self.stacks_for(problem.id).await?;
        Ok(ProblemWithStacks { problem, stacks })
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let res = sqlx::query(r#"DELETE FROM problems WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Problem not found".to_string()));
        }
        Ok(())
    }

    async fn stacks_for(&self, problem_id: Uuid) -> Result<Vec<Stack>> {
        let stacks = sqlx::query_as::<_, Stack>(
            r#"SELECT s.id, s.name, s.created_at, s.updated_at
               FROM stacks s
               JOIN problem_stacks ps ON ps.stack_id = s.id
               WHERE ps.problem_id = $1
               ORDER BY s.name"#,
        )
        .bind(problem_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(stacks)
    }

    async fn ensure_stacks_exist(&self, stack_ids: &[Uuid]) -> Result<()> {
        if stack_ids.is_empty() {
            return Ok(());
        }
        let found = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM stacks WHERE id = ANY($1)"#,
        )
        .bind(stack_ids)
        .fetch_one(&self.pool)
        .await?;
        if found != stack_ids.len() as i64 {
            return Err(Error::NotFound("One or more stacks not found".to_string()));
        }
        Ok(())
    }
}
