use thiserror::Error;

/// Failures talking to the platform's REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response: connection refused, timeout, TLS failure.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status.
    #[error("Application error ({status}): {body}")]
    Application { status: u16, body: String },

    /// A 2xx response whose body was not the expected JSON.
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(feature = "client")]
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if err.is_builder() {
            ApiError::InvalidUrl(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Application {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            ApiError::Network(err.to_string())
        }
    }
}
