use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;
use validator::Validate;

/// Shared list query: page/limit pagination plus a case-insensitive
/// substring search. Limit defaults to 5.
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

pub const DEFAULT_PAGE_LIMIT: i64 = 5;

impl ListQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, 100)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl<T> ListResponse<T> {
    pub fn new(items: Vec<T>, total: i64, page: i64, limit: i64) -> Self {
        let total_pages = ((total as f64) / (limit as f64)).ceil() as i64;
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDepartmentPayload {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateDepartmentPayload {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePositionPayload {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub department_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdatePositionPayload {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    pub department_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateStackPayload {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateStackPayload {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProblemPayload {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub metadata: Option<JsonValue>,
    pub stack_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateProblemPayload {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub metadata: Option<JsonValue>,
    /// When present, replaces the problem's stack set.
    pub stack_ids: Option<Vec<Uuid>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_defaults() {
        let q = ListQuery {
            page: None,
            limit: None,
            search: None,
        };
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), 5);
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn list_query_clamps_out_of_range_values() {
        let q = ListQuery {
            page: Some(0),
            limit: Some(1000),
            search: None,
        };
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), 100);
    }

    #[test]
    fn total_pages_rounds_up() {
        let r: ListResponse<i32> = ListResponse::new(vec![], 11, 1, 5);
        assert_eq!(r.total_pages, 3);
        let r: ListResponse<i32> = ListResponse::new(vec![], 10, 1, 5);
        assert_eq!(r.total_pages, 2);
        let r: ListResponse<i32> = ListResponse::new(vec![], 0, 1, 5);
        assert_eq!(r.total_pages, 0);
    }
}
