use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::directory_dto::{CreatePositionPayload, ListQuery, UpdatePositionPayload};
use crate::error::{Error, Result};
use crate::models::position::{Position, PositionWithDepartment};

#[derive(Clone)]
pub struct PositionService {
    pool: PgPool,
}

pub struct PositionList {
    pub items: Vec<PositionWithDepartment>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl PositionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: ListQuery) -> Result<PositionList> {
        let page = query.page();
        let limit = query.limit();
        let search = query
            .search
            .as_deref()
            .map(|s| format!("%{}%", s))
            .unwrap_or_else(|| "%".to_string());

        let items = sqlx::query_as::<_, PositionWithDepartment>(
            r#"SELECT p.id, p.name, p.department_id, d.name AS department_name,
                      p.created_at, p.updated_at
               FROM positions p
               JOIN departments d ON d.id = p.department_id
               WHERE p.name ILIKE $1 OR d.name ILIKE $1
               ORDER BY d.name, p.name
               LIMIT $2 OFFSET $3"#,
        )
        .bind(&search)
        .bind(limit)
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*)
               FROM positions p
               JOIN departments d ON d.id = p.department_id
               WHERE p.name ILIKE $1 OR d.name ILIKE $1"#,
        )
        .bind(&search)
        .fetch_one(&self.pool)
        .await?;

        Ok(PositionList {
            items,
            total,
            page,
            limit,
        })
    }

    pub async fn create(&self, payload: CreatePositionPayload) -> Result<Position> {
        self.ensure_department_exists(payload.department_id).await?;
        self.ensure_name_free(&payload.name, payload.department_id, None)
            .await?;

        let position = sqlx::query_as::<_, Position>(
            r#"INSERT INTO positions (name, department_id) VALUES ($1, $2)
               RETURNING id, name, department_id, created_at, updated_at"#,
        )
        .bind(&payload.name)
        .bind(payload.department_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(position)
    }

    pub async fn update(&self, id: Uuid, payload: UpdatePositionPayload) -> Result<Position> {
        let current = sqlx::query_as::<_, Position>(
            r#"SELECT id, name, department_id, created_at, updated_at
               FROM positions WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Position not found".to_string()))?;

        let name = payload.name.unwrap_or(current.name);
        let department_id = payload.department_id.unwrap_or(current.department_id);

        self.ensure_department_exists(department_id).await?;
        self.ensure_name_free(&name, department_id, Some(id)).await?;

        let position = sqlx::query_as::<_, Position>(
            r#"UPDATE positions SET name = $2, department_id = $3, updated_at = NOW()
               WHERE id = $1
               RETURNING id, name, department_id, created_at, updated_at"#,
        )
        .bind(id)
        .bind(&name)
        .bind(department_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(position)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let res = sqlx::query(r#"DELETE FROM positions WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Position not found".to_string()));
        }
        Ok(())
    }

    async fn ensure_department_exists(&self, department_id: Uuid) -> Result<()> {
        let exists = sqlx::query_scalar::<_, Uuid>(
            r#"SELECT id FROM departments WHERE id = $1"#,
        )
        .bind(department_id)
        .fetch_optional(&self.pool)
        .await?;
        if exists.is_none() {
            return Err(Error::NotFound("Department not found".to_string()));
        }
        Ok(())
    }

    /// (name, department_id) composite uniqueness: the same name under a
    /// different department is allowed.
    async fn ensure_name_free(
        &self,
        name: &str,
        department_id: Uuid,
        exclude: Option<Uuid>,
    ) -> Result<()> {
        let existing = sqlx::query_scalar::<_, Uuid>(
            r#"SELECT id FROM positions WHERE name = $1 AND department_id = $2"#,
        )
        .bind(name)
        .bind(department_id)
        .fetch_optional(&self.pool)
        .await?;
        if let Some(existing_id) = existing {
            if Some(existing_id) != exclude {
                return Err(Error::Conflict(
                    "A position with this name already exists in this department".to_string(),
                ));
            }
        }
        Ok(())
    }
}
