use grpc_client::GrpcError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("No input.")]
    EmptyInput,

    #[error("Input key is empty.")]
    EmptyKeys,

    #[error("Inconsistent keys size and values size: {keys} v.s. {values}")]
    KeyValueMismatch { keys: usize, values: usize },

    #[error("Inconsistent embedding dimension, got {got} expect {expect}")]
    DimensionMismatch { got: usize, expect: usize },

    #[error("Shape {shape:?} does not hold {count} elements")]
    ShapeMismatch { shape: Vec<usize>, count: usize },

    #[error("Knowledge bank service address is empty.")]
    EmptyAddress,

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Transport error: {0}")]
    Transport(#[from] GrpcError),

    #[error("RPC failed: {0}")]
    Rpc(#[from] tonic::Status),
}

pub type ManagerResult<T> = Result<T, ManagerError>;
