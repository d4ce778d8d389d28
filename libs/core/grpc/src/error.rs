use std::time::Duration;
use thiserror::Error;

pub type GrpcResult<T> = Result<T, GrpcError>;

/// Errors that can occur during gRPC client creation and configuration
#[derive(Error, Debug)]
pub enum GrpcError {
    /// Invalid URI provided for connection
    #[error("Invalid URI: {0}")]
    InvalidUri(#[from] tonic::transport::Error),

    /// Failed to establish connection
    #[error("Connection failed: {0}")]
    ConnectionFailed(tonic::transport::Error),

    /// Connection timeout
    #[error("Connection timeout after {0:?}")]
    ConnectionTimeout(Duration),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Maximum retries exceeded
    #[error("Maximum retries ({0}) exceeded")]
    MaxRetriesExceeded(u32),
}

// Implement conversion to tonic::Status for use at service boundaries
impl From<GrpcError> for tonic::Status {
    fn from(err: GrpcError) -> Self {
        match err {
            GrpcError::InvalidUri(_) | GrpcError::InvalidConfig(_) => {
                tonic::Status::invalid_argument(err.to_string())
            }
            GrpcError::ConnectionFailed(_)
            | GrpcError::ConnectionTimeout(_)
            | GrpcError::MaxRetriesExceeded(_) => tonic::Status::unavailable(err.to_string()),
        }
    }
}
