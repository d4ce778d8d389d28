use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Name is empty.")]
    EmptyName,

    #[error("session_handle is empty.")]
    EmptySessionHandle,

    #[error("Invalid session handle: {0}")]
    InvalidSessionHandle(String),

    #[error("Empty input keys.")]
    EmptyKeys,

    #[error("input is empty.")]
    EmptyUpdate,

    #[error("Creating KnowledgeBank failed.")]
    BankCreation,

    #[error("Creating GradientDescentOptimizer failed.")]
    OptimizerCreation,

    #[error("Key not found: {0}")]
    NotFound(String),

    #[error("Inconsistent result returned by BatchLookup()")]
    InconsistentLookup,

    #[error("Inconsistent embedding dimension, got {got} expect {expect}")]
    Dimension { got: usize, expect: usize },

    #[error(
        "Optimizer is not created, did you forget to add gradient_descent_config in DynamicEmbeddingConfig?"
    )]
    MissingOptimizer,

    #[error("No valid keys for gradient update.")]
    NoValidKeys,

    #[error("Applying gradient update returned error: {0}")]
    OptimizerFailed(String),

    #[error("Snapshot I/O error: {0}")]
    SnapshotIo(#[from] std::io::Error),

    #[error("Snapshot encoding error: {0}")]
    SnapshotEncoding(#[from] serde_json::Error),

    #[error("Snapshot dimension mismatch, got {got} expect {expect}")]
    SnapshotDimension { got: usize, expect: usize },
}

pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

impl EmbeddingError {
    /// Whether the error reports a structurally malformed request, as opposed
    /// to a server-side failure.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            EmbeddingError::EmptyName
                | EmbeddingError::EmptySessionHandle
                | EmbeddingError::InvalidSessionHandle(_)
                | EmbeddingError::EmptyKeys
                | EmbeddingError::EmptyUpdate
                | EmbeddingError::Dimension { .. }
        )
    }
}

/// Convert EmbeddingError to the gRPC status surfaced to callers
impl From<EmbeddingError> for tonic::Status {
    fn from(err: EmbeddingError) -> Self {
        if err.is_invalid_argument() {
            tonic::Status::invalid_argument(err.to_string())
        } else {
            tonic::Status::internal(err.to_string())
        }
    }
}
