//! Shared test utilities for knowledge bank testing
//!
//! This crate provides reusable test infrastructure:
//! - `TestKbsServer`: in-process knowledge bank gRPC server on an ephemeral
//!   port, shut down when dropped
//! - `TestDataBuilder`: deterministic test key and vector generation
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDataBuilder, TestKbsServer};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let server = TestKbsServer::start().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let keys = builder.keys("embedding", 3);
//!     // connect a client to server.address() ...
//! }
//! ```

use kbs_server::KnowledgeBankServiceImpl;
use rpc::embedding::v1::knowledge_bank_service_server::KnowledgeBankServiceServer;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::codec::CompressionEncoding;
use tonic::transport::Server;
use tracing::debug;

/// In-process knowledge bank server bound to an ephemeral loopback port.
///
/// The server mirrors the production configuration (zstd compression both
/// ways) and serves until the struct is dropped.
pub struct TestKbsServer {
    address: String,
    handle: JoinHandle<()>,
}

impl TestKbsServer {
    /// Bind a fresh server and start serving in the background.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let address = listener
            .local_addr()
            .expect("listener has no local address")
            .to_string();
        let incoming = TcpListenerStream::new(listener);

        let service = KnowledgeBankServiceImpl::new();
        let handle = tokio::spawn(async move {
            Server::builder()
                .add_service(
                    KnowledgeBankServiceServer::new(service)
                        .accept_compressed(CompressionEncoding::Zstd)
                        .send_compressed(CompressionEncoding::Zstd),
                )
                .serve_with_incoming(incoming)
                .await
                .expect("test knowledge bank server failed");
        });

        debug!(address = %address, "Started test knowledge bank server");
        Self { address, handle }
    }

    /// Address to hand to a client, as "host:port".
    pub fn address(&self) -> &str {
        &self.address
    }
}

impl Drop for TestKbsServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by deriving all data from a seed.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a unique key for testing
    pub fn key(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Generate `count` distinct keys sharing a prefix
    pub fn keys(&self, prefix: &str, count: usize) -> Vec<String> {
        (0..count)
            .map(|index| self.key(prefix, &index.to_string()))
            .collect()
    }

    /// Generate a deterministic vector of the given dimension. Different
    /// salts produce different vectors for the same builder.
    pub fn vector(&self, dimension: usize, salt: u64) -> Vec<f32> {
        (0..dimension)
            .map(|index| {
                let raw = self
                    .seed
                    .wrapping_mul(31)
                    .wrapping_add(salt)
                    .wrapping_add(index as u64);
                ((raw % 17) as f32) - 8.0
            })
            .collect()
    }
}
