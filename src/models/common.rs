use serde::{Deserialize, Serialize};

/// Structured error body the API returns on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub id: String,
    pub message: String,
    pub name: String,
}
