//! # gRPC Client Library
//!
//! Reusable channel construction for the knowledge bank service clients:
//! HTTP/2 tuning, lazy connection establishment, and retry with exponential
//! backoff.
//!
//! ## Quick Start
//!
//! ```ignore
//! use grpc_client::create_channel;
//! use rpc::embedding::v1::knowledge_bank_service_client::KnowledgeBankServiceClient;
//!
//! let channel = create_channel("http://[::1]:50051").await?;
//! let client = KnowledgeBankServiceClient::new(channel);
//! ```
//!
//! ## With Custom Configuration
//!
//! ```ignore
//! use grpc_client::{create_channel_with_config, ChannelConfig};
//! use std::time::Duration;
//!
//! let config = ChannelConfig::default()
//!     .with_connect_timeout(Duration::from_secs(10))
//!     .with_request_timeout(Duration::from_secs(120));
//!
//! let channel = create_channel_with_config("http://[::1]:50051", config).await?;
//! ```
//!
//! ## With Retry
//!
//! ```ignore
//! use grpc_client::{create_channel_with_retry, RetryConfig};
//!
//! let retry = RetryConfig::new().with_max_retries(5);
//! let channel = create_channel_with_retry("http://[::1]:50051", Some(retry)).await?;
//! ```

pub mod channel;
pub mod error;
pub mod retry;

// Re-export main types and functions for convenience
pub use channel::{
    ChannelConfig, create_channel, create_channel_lazy, create_channel_lazy_with_config,
    create_channel_with_config, create_channel_with_retry,
};
pub use error::{GrpcError, GrpcResult};
pub use retry::{RetryConfig, retry, retry_with_backoff};
