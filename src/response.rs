use serde::Serialize;
use utoipa::ToSchema;

/// Extra information attached to list responses.
#[derive(Debug, Serialize, ToSchema, Clone, Default)]
pub struct Meta {
    pub total: Option<i64>,
    pub query: Option<String>,
}

impl Meta {
    pub fn listing(total: usize, query: Option<String>) -> Self {
        Self {
            total: Some(total as i64),
            query,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}
