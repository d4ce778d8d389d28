//! Knowledge Bank gRPC Service
//!
//! A microservice serving session-partitioned embedding storage via gRPC.
//!
//! ## Architecture
//!
//! ```text
//! Client (embedding-manager)
//!   ↓ (gRPC with Zstd compression)
//! KnowledgeBankServiceImpl (service.rs)
//!   ↓ (proto ↔ domain conversions)
//! KnowledgeBankService (domain layer)
//!   ↓ (session registry, locking discipline, gradient pipeline)
//! KnowledgeBank / GradientOptimizer backends
//! ```
//!
//! ## Modules
//!
//! - `server`: Server initialization and lifecycle
//! - `service`: gRPC service implementation (KnowledgeBankServiceImpl)

pub mod server;
pub mod service;

// Re-export for convenience
pub use server::run;
pub use service::KnowledgeBankServiceImpl;
