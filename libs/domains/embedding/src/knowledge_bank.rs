use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{EmbeddingError, EmbeddingResult};
use crate::in_memory::InMemoryKnowledgeBank;
use crate::models::{DynamicEmbeddingConfig, EmbeddingVector, StorageConfig};

/// Fixed file name of an exported snapshot's metadata file. Callers that know
/// the export directory can locate a snapshot without parsing the returned
/// path.
pub const METADATA_FILE_NAME: &str = "embedding_store_meta_data.json";

/// Capability interface of the keyed embedding store backing one session.
///
/// Batched lookups report per-key outcomes: a failed key yields an `Err`
/// element without failing the rest of the batch. Implementations must be
/// internally thread-safe for concurrent mutating reads — the service runs
/// `batch_lookup_with_update` under a shared registry lock.
#[async_trait]
pub trait KnowledgeBank: Send + Sync {
    /// The fixed dimension every stored vector has.
    fn embedding_dimension(&self) -> usize;

    /// Pure read: a missing key is a per-key error and the store is untouched.
    async fn batch_lookup(&self, keys: &[String]) -> Vec<EmbeddingResult<EmbeddingVector>>;

    /// Lazy-create read: a missing key is initialized and persisted before it
    /// is returned; each call increments the entry's weight.
    async fn batch_lookup_with_update(
        &self,
        keys: &[String],
    ) -> Vec<EmbeddingResult<EmbeddingVector>>;

    /// Overwrite the given keys with the paired values.
    async fn batch_update(
        &self,
        keys: &[String],
        values: Vec<EmbeddingVector>,
    ) -> EmbeddingResult<()>;

    /// Write a snapshot under `directory` and return the metadata file path.
    async fn export(&self, directory: &Path) -> EmbeddingResult<PathBuf>;

    /// Replace the current content with the snapshot at `metadata_path`.
    async fn import(&self, metadata_path: &Path) -> EmbeddingResult<()>;

    /// Number of stored entries.
    fn size(&self) -> usize;

    /// All stored keys in sorted order.
    fn keys(&self) -> Vec<String>;
}

/// Instantiate the storage backend a configuration names.
pub fn make_knowledge_bank(
    config: &DynamicEmbeddingConfig,
) -> EmbeddingResult<Arc<dyn KnowledgeBank>> {
    if config.embedding_dimension == 0 {
        return Err(EmbeddingError::BankCreation);
    }
    match config.knowledge_bank.storage {
        StorageConfig::InMemory => Ok(Arc::new(InMemoryKnowledgeBank::new(
            config.embedding_dimension,
            config.knowledge_bank.initializer,
        ))),
    }
}
