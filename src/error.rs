// Error taxonomy for reserve/release operations
//
// Success is Ok(()); there is no ErrorNone variant. Backend seam errors are
// plain strings (see backend::KeyGrabBackend) and get classified here.

/// Errors surfaced by [`MediaKeyManager`](crate::MediaKeyManager) operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MediaKeyError {
    /// A supplied argument was rejected by the backend
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Surface creation failed, or a grab/ungrab in the batch failed
    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Map backend error messages to MediaKeyError variants
pub fn map_backend_error(msg: &str) -> MediaKeyError {
    if msg.to_lowercase().contains("invalid") {
        MediaKeyError::InvalidParameter(msg.to_string())
    } else {
        MediaKeyError::OperationFailed(msg.to_string())
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
