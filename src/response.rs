use crate::{
    error::{Result, StabilityError},
    models::ApiErrorResponse,
    transport::HttpResponse,
};
use serde::de::DeserializeOwned;

/// Classifies a delivered response.
///
/// 200 decodes into `T` (mismatch is a decode error). Any other status tries
/// the structured error body first and falls back to a bare status error, so
/// gateway pages and other non-JSON bodies never surface as decode failures.
pub fn validate_response<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
    if response.status == 200 {
        return serde_json::from_slice(&response.body)
            .map_err(|e| StabilityError::DecodeError(e.to_string()));
    }

    match serde_json::from_slice::<ApiErrorResponse>(&response.body) {
        Ok(error) => {
            log::warn!(
                "API returned {} {}: {}",
                response.status,
                error.name,
                error.message
            );
            Err(StabilityError::ApiError {
                status: response.status,
                id: error.id,
                name: error.name,
                message: error.message,
            })
        }
        Err(_) => {
            log::warn!(
                "API returned {} with an undecodable body ({} bytes)",
                response.status,
                response.body.len()
            );
            Err(StabilityError::StatusError(response.status))
        }
    }
}
