use schemars::JsonSchema;
use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Standard success envelope: `{status, data}` plus `results` for lists.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ApiResponse<T> {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<usize>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            status: "success".to_string(),
            results: None,
            data,
        }
    }

    pub fn list(results: usize, data: T) -> Self {
        ApiResponse {
            status: "success".to_string(),
            results: Some(results),
            data,
        }
    }
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct MessageResponse {
    pub status: String,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        MessageResponse {
            status: "success".to_string(),
            message: message.to_string(),
        }
    }
}
