use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::directory_dto::{CreateStackPayload, ListQuery, UpdateStackPayload};
use crate::error::{Error, Result};
use crate::models::stack::Stack;

#[derive(Clone)]
pub struct StackService {
    pool: PgPool,
}

pub struct StackList {
    pub items: Vec<Stack>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl StackService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: ListQuery) -> Result<StackList> {
        let page = query.page();
        let limit = query.limit();
        let search = query
            .search
            .as_deref()
            .map(|s| format!("%{}%", s))
            .unwrap_or_else(|| "%".to_string());

        let items = sqlx::query_as::<_, Stack>(
            r#"SELECT id, name, created_at, updated_at
               FROM stacks
               WHERE name ILIKE $1
               ORDER BY name
               LIMIT $2 OFFSET $3"#,
        )
        .bind(&search)
        .bind(limit)
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let total =
            sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM stacks WHERE name ILIKE $1"#)
                .bind(&search)
                .fetch_one(&self.pool)
                .await?;

        Ok(StackList {
            items,
            total,
            page,
            limit,
        })
    }

    pub async fn create(&self, payload: CreateStackPayload) -> Result<Stack> {
        self.ensure_name_free(&payload.name, None).await?;

        let stack = sqlx::query_as::<_, Stack>(
            r#"INSERT INTO stacks (name) VALUES ($1)
               RETURNING id, name, created_at, updated_at"#,
        )
        .bind(&payload.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(stack)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateStackPayload) -> Result<Stack> {
        self.ensure_name_free(&payload.name, Some(id)).await?;

        let stack = sqlx::query_as::<_, Stack>(
            r#"UPDATE stacks SET name = $2, updated_at = NOW()
               WHERE id = $1
               RETURNING id, name, created_at, updated_at"#,
        )
        .bind(id)
        .bind(&payload.name)
        .fetch_optional(&self.pool)
        .await?;

        stack.ok_or_else(|| Error::NotFound("Stack not found".to_string()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let res = sqlx::query(r#"DELETE FROM stacks WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Stack not found".to_string()));
        }
        Ok(())
    }

    async fn ensure_name_free(&self, name: &str, exclude: Option<Uuid>) -> Result<()> {
        let existing =
            sqlx::query_scalar::<_, Uuid>(r#"SELECT id FROM stacks WHERE name = $1"#)
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        if let Some(existing_id) = existing {
            if Some(existing_id) != exclude {
                return Err(Error::Conflict(
                    "A stack with this name already exists".to_string(),
                ));
            }
        }
        Ok(())
    }
}
