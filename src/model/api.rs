use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Error body returned by every failing endpoint.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorDto {
    pub error: String,
    /// Present on validation failures only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldErrorDto>>,
}

impl ErrorDto {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fields: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct FieldErrorDto {
    pub field: String,
    pub message: String,
}

/// Offset pagination query parameters.
#[derive(Deserialize, Debug, Clone, IntoParams)]
pub struct PaginationParams {
    /// Zero-based page index.
    #[serde(default)]
    pub page: u64,
    /// Entries per page, 1 to 100.
    #[serde(default = "default_entries")]
    pub entries: u64,
}

fn default_entries() -> u64 {
    10
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 0,
            entries: default_entries(),
        }
    }
}

/// Cursor pagination query parameters for feeds.
#[derive(Deserialize, Debug, Clone, Default, IntoParams)]
pub struct CursorParams {
    /// Only return items with an id lower than this one.
    pub before: Option<i32>,
    /// Maximum items to return, 1 to 50, default 20.
    pub limit: Option<u64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct PaginatedDto<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CursorPageDto<T> {
    pub items: Vec<T>,
    /// Pass as `before` to fetch the next page; absent on the last page.
    pub next_cursor: Option<i32>,
}

/// Generic count response.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CountDto {
    pub count: u64,
}
