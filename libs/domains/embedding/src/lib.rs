//! Embedding Knowledge Bank Domain
//!
//! Session-partitioned key→vector storage with batched lookup, batched
//! overwrite and gradient-descent updates.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │ KnowledgeBankService │  ← dispatch, locking discipline, gradient pipeline
//! └──────────┬───────────┘
//!            │
//! ┌──────────▼───────────┐
//! │   SessionRegistry    │  ← handle → (bank, optimizer), idempotent creation
//! └──────────┬───────────┘
//!            │
//! ┌──────────▼───────────┐
//! │ KnowledgeBank /      │  ← capability traits + backends
//! │ GradientOptimizer    │
//! └──────────────────────┘
//! ```
//!
//! Session handles are a pure function of the (name, configuration) pair, so
//! two callers presenting the same pair share one session while differing
//! configurations get independent state.

pub mod conversions;
pub mod error;
pub mod in_memory;
pub mod knowledge_bank;
pub mod models;
pub mod optimizer;
pub mod registry;
pub mod service;
pub mod session;

// Re-export commonly used types
pub use error::{EmbeddingError, EmbeddingResult};
pub use in_memory::InMemoryKnowledgeBank;
pub use knowledge_bank::{make_knowledge_bank, KnowledgeBank, METADATA_FILE_NAME};
pub use models::{
    DynamicEmbeddingConfig, EmbeddingVector, GradientDescentConfig, InitializerConfig,
    KnowledgeBankConfig, StorageConfig, UpdateRule,
};
pub use optimizer::{make_optimizer, GradientOptimizer, SgdOptimizer};
pub use registry::{Session, SessionRegistry};
pub use service::KnowledgeBankService;
pub use session::{decode_session_handle, derive_session_handle, encode_session_handle};
