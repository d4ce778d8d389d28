use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::error::{EmbeddingError, EmbeddingResult};
use crate::knowledge_bank::{KnowledgeBank, METADATA_FILE_NAME};
use crate::models::{EmbeddingVector, InitializerConfig};

/// File holding the actual entries referenced by the metadata file.
const DATA_FILE_NAME: &str = "in_memory_embedding_data.json";

/// Points an exported snapshot at its data checkpoint.
#[derive(Debug, Serialize, Deserialize)]
struct CheckpointMetaData {
    checkpoint_saved_path: PathBuf,
}

/// On-disk image of the whole store. Keys are kept in a BTreeMap so repeated
/// exports of identical content produce identical files.
#[derive(Debug, Serialize, Deserialize)]
struct StoreSnapshot {
    embedding_dimension: usize,
    embeddings: BTreeMap<String, EmbeddingVector>,
}

/// Knowledge bank keeping every entry in process memory.
///
/// Entries live in a sharded concurrent map, so lazy initialization under
/// concurrent lookups resolves to exactly one stored entry per key.
pub struct InMemoryKnowledgeBank {
    embedding_dimension: usize,
    initializer: InitializerConfig,
    entries: DashMap<String, EmbeddingVector>,
}

impl InMemoryKnowledgeBank {
    pub fn new(embedding_dimension: usize, initializer: InitializerConfig) -> Self {
        Self {
            embedding_dimension,
            initializer,
            entries: DashMap::new(),
        }
    }
}

#[async_trait]
impl KnowledgeBank for InMemoryKnowledgeBank {
    fn embedding_dimension(&self) -> usize {
        self.embedding_dimension
    }

    async fn batch_lookup(&self, keys: &[String]) -> Vec<EmbeddingResult<EmbeddingVector>> {
        keys.iter()
            .map(|key| {
                self.entries
                    .get(key)
                    .map(|entry| entry.clone())
                    .ok_or_else(|| EmbeddingError::NotFound(key.clone()))
            })
            .collect()
    }

    async fn batch_lookup_with_update(
        &self,
        keys: &[String],
    ) -> Vec<EmbeddingResult<EmbeddingVector>> {
        keys.iter()
            .map(|key| {
                // The entry API holds the shard lock across init and
                // increment, so concurrent callers see one initialization.
                let mut entry = self.entries.entry(key.clone()).or_insert_with(|| {
                    self.initializer
                        .initial_entry(key, self.embedding_dimension)
                });
                entry.weight += 1.0;
                Ok(entry.clone())
            })
            .collect()
    }

    async fn batch_update(
        &self,
        keys: &[String],
        values: Vec<EmbeddingVector>,
    ) -> EmbeddingResult<()> {
        for (key, value) in keys.iter().zip(values) {
            if value.values.len() != self.embedding_dimension {
                return Err(EmbeddingError::Dimension {
                    got: value.values.len(),
                    expect: self.embedding_dimension,
                });
            }
            self.entries.insert(key.clone(), value);
        }
        Ok(())
    }

    async fn export(&self, directory: &Path) -> EmbeddingResult<PathBuf> {
        fs::create_dir_all(directory).await?;

        let snapshot = StoreSnapshot {
            embedding_dimension: self.embedding_dimension,
            embeddings: self
                .entries
                .iter()
                .map(|entry| (entry.key().clone(), entry.value().clone()))
                .collect(),
        };
        let data_path = directory.join(DATA_FILE_NAME);
        fs::write(&data_path, serde_json::to_vec_pretty(&snapshot)?).await?;

        let metadata_path = directory.join(METADATA_FILE_NAME);
        let meta_data = CheckpointMetaData {
            checkpoint_saved_path: data_path,
        };
        fs::write(&metadata_path, serde_json::to_vec_pretty(&meta_data)?).await?;

        info!(
            entries = snapshot.embeddings.len(),
            path = %metadata_path.display(),
            "Exported embedding store snapshot"
        );
        Ok(metadata_path)
    }

    async fn import(&self, metadata_path: &Path) -> EmbeddingResult<()> {
        let meta_data: CheckpointMetaData =
            serde_json::from_slice(&fs::read(metadata_path).await?)?;
        let snapshot: StoreSnapshot =
            serde_json::from_slice(&fs::read(&meta_data.checkpoint_saved_path).await?)?;

        if snapshot.embedding_dimension != self.embedding_dimension {
            return Err(EmbeddingError::SnapshotDimension {
                got: snapshot.embedding_dimension,
                expect: self.embedding_dimension,
            });
        }

        self.entries.clear();
        for (key, value) in snapshot.embeddings {
            self.entries.insert(key, value);
        }

        info!(
            entries = self.entries.len(),
            path = %metadata_path.display(),
            "Imported embedding store snapshot"
        );
        Ok(())
    }

    fn size(&self) -> usize {
        self.entries.len()
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.iter().map(|entry| entry.key().clone()).collect();
        keys.sort();
        keys
    }
}
