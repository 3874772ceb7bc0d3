use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::directory_dto::{CreateDepartmentPayload, ListQuery, UpdateDepartmentPayload};
use crate::error::{Error, Result};
use crate::models::department::Department;

#[derive(Clone)]
pub struct DepartmentService {
    pool: PgPool,
}

pub struct DepartmentList {
    pub items: Vec<Department>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl DepartmentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: ListQuery) -> Result<DepartmentList> {
        let page = query.page();
        let limit = query.limit();
        let search = query
            .search
            .as_deref()
            .map(|s| format!("%{}%", s))
            .unwrap_or_else(|| "%".to_string());

        let items = sqlx::query_as::<_, Department>(
            r#"SELECT id, name, created_at, updated_at
               FROM departments
               WHERE name ILIKE $1
               ORDER BY name
               LIMIT $2 OFFSET $3"#,
        )
        .bind(&search)
        .bind(limit)
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM departments WHERE name ILIKE $1"#,
        )
        .bind(&search)
        .fetch_one(&self.pool)
        .await?;

        Ok(DepartmentList {
            items,
            total,
            page,
            limit,
        })
    }

    pub async fn create(&self, payload: CreateDepartmentPayload) -> Result<Department> {
        self.ensure_name_free(&payload.name, None).await?;

        let department = sqlx::query_as::<_, Department>(
            r#"INSERT INTO departments (name) VALUES ($1)
               RETURNING id, name, created_at, updated_at"#,
        )
        .bind(&payload.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(department)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateDepartmentPayload) -> Result<Department> {
        self.ensure_name_free(&payload.name, Some(id)).await?;

        let department = sqlx::query_as::<_, Department>(
            r#"UPDATE departments SET name = $2, updated_at = NOW()
               WHERE id = $1
               RETURNING id, name, created_at, updated_at"#,
        )
        .bind(id)
        .bind(&payload.name)
        .fetch_optional(&self.pool)
        .await?;

        department.ok_or_else(|| Error::NotFound("Department not found".to_string()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let res = sqlx::query(r#"DELETE FROM departments WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Department not found".to_string()));
        }
        Ok(())
    }

    async fn ensure_name_free(&self, name: &str, exclude: Option<Uuid>) -> Result<()> {
        let existing = sqlx::query_scalar::<_, Uuid>(
            r#"SELECT id FROM departments WHERE name = $1"#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        if let Some(existing_id) = existing {
            if Some(existing_id) != exclude {
                return Err(Error::Conflict(
                    "A department with this name already exists".to_string(),
                ));
            }
        }
        Ok(())
    }
}
