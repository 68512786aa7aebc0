use thiserror::Error;

#[derive(Debug, Error)]
pub enum StabilityError {
    /// The client configuration cannot produce a valid request.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// No response was delivered (connection, DNS, timeout).
    #[error("Transport error: {0}")]
    TransportError(String),

    /// Non-200 status with a structured error body.
    #[error("API error ({status}) {name}: {message}")]
    ApiError {
        status: u16,
        id: String,
        name: String,
        message: String,
    },

    /// Non-200 status whose body could not be decoded.
    #[error("Invalid response status code: {0}")]
    StatusError(u16),

    /// The request payload cannot be represented in its wire encoding.
    #[error("Encoding error: {0}")]
    EncodingError(String),

    /// A 200 response whose body does not match the expected schema.
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Local file access, e.g. when saving an artifact.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl StabilityError {
    pub fn is_api_error(&self) -> bool {
        matches!(self, StabilityError::ApiError { .. })
    }

    pub fn is_transport_error(&self) -> bool {
        matches!(self, StabilityError::TransportError(_))
    }

    /// HTTP status reported by the server, if the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            StabilityError::ApiError { status, .. } => Some(*status),
            StabilityError::StatusError(status) => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, StabilityError>;
