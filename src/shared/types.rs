use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error envelope returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    /// Always null on errors
    #[schema(value_type = Option<Object>)]
    pub data: Option<()>,
    pub message: String,
    /// Always null on errors
    #[schema(value_type = Option<Object>)]
    pub meta: Option<()>,
    pub errors: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(message: String, errors: Option<Vec<String>>) -> Self {
        Self {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}
