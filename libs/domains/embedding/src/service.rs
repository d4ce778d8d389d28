use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::instrument;

use rpc::embedding::v1 as pb;

use crate::error::{EmbeddingError, EmbeddingResult};
use crate::models::{is_padding_key, EmbeddingVector};
use crate::registry::SessionRegistry;
use crate::session::encode_session_handle;

/// Transport-independent core of the knowledge bank service.
///
/// Locking discipline: one reader/writer lock guards the session registry.
/// Locating an existing session and the whole body of a Lookup or Export run
/// under the shared guard — including lazy-create mutations, which the banks
/// absorb through their own internal synchronization. Session insertion and
/// the whole body of an Update or Import run under the exclusive guard, so
/// all Updates across the service are mutually exclusive with each other and
/// with session creation.
#[derive(Default)]
pub struct KnowledgeBankService {
    registry: RwLock<SessionRegistry>,
}

impl KnowledgeBankService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions.
    pub async fn session_count(&self) -> usize {
        self.registry.read().await.len()
    }

    /// Compute the session handle for a request and ensure the session
    /// exists. Idempotent: repeat calls with an identical request return the
    /// same handle and leave existing content untouched.
    #[instrument(skip_all, fields(name = %request.name))]
    pub async fn start_session(&self, request: &pb::StartSessionRequest) -> EmbeddingResult<String> {
        if request.name.is_empty() {
            return Err(EmbeddingError::EmptyName);
        }
        let handle = encode_session_handle(request);
        self.registry.write().await.get_or_create(&handle)?;
        Ok(handle)
    }

    /// Create the session a handle describes if this process has not seen it
    /// yet. The existence check runs under the shared guard; only an actual
    /// insertion takes the exclusive guard.
    async fn ensure_session(&self, handle: &str) -> EmbeddingResult<()> {
        if self.registry.read().await.contains(handle) {
            return Ok(());
        }
        self.registry.write().await.get_or_create(handle)?;
        Ok(())
    }

    /// Batched lookup. Padding keys resolve to the zero vector without
    /// touching the store; keys whose lookup fails are omitted from the
    /// returned table.
    #[instrument(skip_all, fields(key_count = keys.len(), update = update))]
    pub async fn lookup(
        &self,
        handle: &str,
        keys: &[String],
        update: bool,
    ) -> EmbeddingResult<HashMap<String, EmbeddingVector>> {
        if handle.is_empty() {
            return Err(EmbeddingError::EmptySessionHandle);
        }
        if keys.is_empty() {
            return Err(EmbeddingError::EmptyKeys);
        }
        self.ensure_session(handle).await?;

        let registry = self.registry.read().await;
        let session = registry
            .get(handle)
            .ok_or_else(|| EmbeddingError::InvalidSessionHandle(handle.to_string()))?;

        let store_keys: Vec<String> = keys
            .iter()
            .filter(|key| !is_padding_key(key))
            .cloned()
            .collect();
        let results = if update {
            session.bank.batch_lookup_with_update(&store_keys).await
        } else {
            session.bank.batch_lookup(&store_keys).await
        };
        if results.len() != store_keys.len() {
            return Err(EmbeddingError::InconsistentLookup);
        }

        let mut table = HashMap::with_capacity(keys.len());
        for (key, result) in store_keys.iter().zip(results) {
            if let Ok(embedding) = result {
                table.insert(key.clone(), embedding);
            }
        }
        if store_keys.len() != keys.len() {
            // Padding positions always read as the zero vector.
            table.insert(
                String::new(),
                EmbeddingVector::zeros(session.bank.embedding_dimension()),
            );
        }
        Ok(table)
    }

    /// Batched update: direct overwrites and/or the gradient pipeline. Both
    /// sub-paths run under one exclusive guard; gradient writes only happen
    /// after the read and apply stages succeed.
    #[instrument(skip_all, fields(value_count = values.len(), gradient_count = gradients.len()))]
    pub async fn update(
        &self,
        handle: &str,
        values: HashMap<String, EmbeddingVector>,
        gradients: HashMap<String, EmbeddingVector>,
    ) -> EmbeddingResult<()> {
        if handle.is_empty() {
            return Err(EmbeddingError::EmptySessionHandle);
        }
        if values.is_empty() && gradients.is_empty() {
            return Err(EmbeddingError::EmptyUpdate);
        }

        let mut registry = self.registry.write().await;
        let session = registry.get_or_create(handle)?;

        if !values.is_empty() {
            let (keys, values): (Vec<String>, Vec<EmbeddingVector>) = values
                .into_iter()
                .filter(|(key, _)| !is_padding_key(key))
                .unzip();
            // Writes addressed only at the padding sentinel are dropped.
            if !keys.is_empty() {
                session.bank.batch_update(&keys, values).await?;
            }
        }

        if !gradients.is_empty() {
            let optimizer = session
                .optimizer
                .clone()
                .ok_or(EmbeddingError::MissingOptimizer)?;

            // Step one: read the current embeddings of the gradient keys.
            let (keys, gradients): (Vec<String>, Vec<EmbeddingVector>) = gradients
                .into_iter()
                .filter(|(key, _)| !is_padding_key(key))
                .unzip();
            let results = session.bank.batch_lookup(&keys).await;
            if results.len() != keys.len() {
                return Err(EmbeddingError::InconsistentLookup);
            }

            let mut valid_keys = Vec::with_capacity(keys.len());
            let mut embeddings = Vec::with_capacity(keys.len());
            let mut valid_gradients = Vec::with_capacity(keys.len());
            for ((key, gradient), result) in keys.into_iter().zip(gradients).zip(results) {
                if let Ok(embedding) = result {
                    valid_keys.push(key);
                    embeddings.push(embedding);
                    valid_gradients.push(gradient);
                }
            }
            if valid_keys.is_empty() {
                return Err(EmbeddingError::NoValidKeys);
            }

            // Step two: apply the configured update rule.
            let updated = optimizer
                .apply(&embeddings, &valid_gradients)
                .map_err(EmbeddingError::OptimizerFailed)?;

            // Step three: write the updated embeddings back.
            session.bank.batch_update(&valid_keys, updated).await?;
        }

        Ok(())
    }

    /// Snapshot the session's bank under `directory`; returns the metadata
    /// file path.
    #[instrument(skip_all)]
    pub async fn export(&self, handle: &str, directory: &Path) -> EmbeddingResult<PathBuf> {
        if handle.is_empty() {
            return Err(EmbeddingError::EmptySessionHandle);
        }
        self.ensure_session(handle).await?;

        let registry = self.registry.read().await;
        let session = registry
            .get(handle)
            .ok_or_else(|| EmbeddingError::InvalidSessionHandle(handle.to_string()))?;
        session.bank.export(directory).await
    }

    /// Replace the session's content with the snapshot at `metadata_path`.
    #[instrument(skip_all)]
    pub async fn import(&self, handle: &str, metadata_path: &Path) -> EmbeddingResult<()> {
        if handle.is_empty() {
            return Err(EmbeddingError::EmptySessionHandle);
        }

        let mut registry = self.registry.write().await;
        let session = registry.get_or_create(handle)?;
        session.bank.import(metadata_path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;

    use crate::knowledge_bank::KnowledgeBank;
    use crate::models::DynamicEmbeddingConfig;
    use crate::optimizer::MockGradientOptimizer;
    use crate::registry::Session;

    fn config() -> DynamicEmbeddingConfig {
        DynamicEmbeddingConfig::new(2)
    }

    fn start_request(name: &str, config: &DynamicEmbeddingConfig) -> pb::StartSessionRequest {
        pb::StartSessionRequest {
            name: name.to_string(),
            config: Some(config.clone().into()),
        }
    }

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn value_map(pairs: &[(&str, Vec<f32>)]) -> HashMap<String, EmbeddingVector> {
        pairs
            .iter()
            .map(|(key, values)| (key.to_string(), EmbeddingVector::with_values(values.clone())))
            .collect()
    }

    fn assert_close(actual: &[f32], expected: &[f32]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-6, "expected {:?}, got {:?}", expected, actual);
        }
    }

    #[tokio::test]
    async fn test_start_session_empty_name() {
        let service = KnowledgeBankService::new();
        let request = pb::StartSessionRequest::default();
        let err = service.start_session(&request).await.unwrap_err();
        assert_eq!(err.to_string(), "Name is empty.");
    }

    #[tokio::test]
    async fn test_start_session_empty_config() {
        let service = KnowledgeBankService::new();
        let request = pb::StartSessionRequest {
            name: "an embedding".to_string(),
            config: None,
        };
        let err = service.start_session(&request).await.unwrap_err();
        assert_eq!(err.to_string(), "Creating KnowledgeBank failed.");
    }

    #[tokio::test]
    async fn test_start_session_valid_configs() {
        let service = KnowledgeBankService::new();

        let handle = service
            .start_session(&start_request("an embedding", &config()))
            .await
            .unwrap();
        assert!(!handle.is_empty());
        assert_eq!(service.session_count().await, 1);

        // Another name, another session.
        let other = service
            .start_session(&start_request("another embedding", &config()))
            .await
            .unwrap();
        assert!(!other.is_empty());
        assert_ne!(handle, other);
        assert_eq!(service.session_count().await, 2);
    }

    #[tokio::test]
    async fn test_start_session_is_idempotent() {
        let service = KnowledgeBankService::new();
        let request = start_request("emb", &config());

        let first = service.start_session(&request).await.unwrap();
        service
            .lookup(&first, &keys(&["key1"]), true)
            .await
            .unwrap();

        // Same request again: same handle, content untouched.
        let second = service.start_session(&request).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(service.session_count().await, 1);

        let table = service
            .lookup(&first, &keys(&["key1"]), false)
            .await
            .unwrap();
        assert!(table.contains_key("key1"));
    }

    #[tokio::test]
    async fn test_same_name_different_config_gets_independent_state() {
        let service = KnowledgeBankService::new();
        let narrow = service
            .start_session(&start_request("emb", &DynamicEmbeddingConfig::new(2)))
            .await
            .unwrap();
        let wide = service
            .start_session(&start_request("emb", &DynamicEmbeddingConfig::new(3)))
            .await
            .unwrap();
        assert_ne!(narrow, wide);
        assert_eq!(service.session_count().await, 2);

        // Populating one session is invisible to the other.
        service.lookup(&narrow, &keys(&["key1"]), true).await.unwrap();
        let table = service.lookup(&wide, &keys(&["key1"]), false).await.unwrap();
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_empty_handle() {
        let service = KnowledgeBankService::new();
        let err = service.lookup("", &keys(&["key1"]), true).await.unwrap_err();
        assert_eq!(err.to_string(), "session_handle is empty.");
    }

    #[tokio::test]
    async fn test_lookup_empty_keys() {
        let service = KnowledgeBankService::new();
        let handle = service
            .start_session(&start_request("emb1", &config()))
            .await
            .unwrap();
        let err = service.lookup(&handle, &[], true).await.unwrap_err();
        assert_eq!(err.to_string(), "Empty input keys.");
    }

    #[tokio::test]
    async fn test_lookup_with_update_creates_and_counts() {
        let service = KnowledgeBankService::new();
        let handle = service
            .start_session(&start_request("emb1", &config()))
            .await
            .unwrap();

        let table = service.lookup(&handle, &keys(&["key1"]), true).await.unwrap();
        let entry = &table["key1"];
        assert_eq!(entry.tag, "key1");
        assert_eq!(entry.values, vec![0.0, 0.0]);
        assert_eq!(entry.weight, 1.0);

        // Multiple keys; the first was already seen once.
        let table = service
            .lookup(&handle, &keys(&["key1", "key2"]), true)
            .await
            .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table["key1"].weight, 2.0);
        assert_eq!(table["key2"].weight, 1.0);
    }

    #[tokio::test]
    async fn test_lookup_without_update_omits_unknown_keys() {
        let service = KnowledgeBankService::new();
        let handle = service
            .start_session(&start_request("emb1", &config()))
            .await
            .unwrap();

        service
            .lookup(&handle, &keys(&["key1", "key2"]), true)
            .await
            .unwrap();

        // Pure read returns both known keys unchanged.
        let table = service
            .lookup(&handle, &keys(&["key1", "key2"]), false)
            .await
            .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table["key1"].weight, 2.0);
        assert_eq!(table["key2"].weight, 1.0);

        // An out-of-vocabulary key is omitted, not an error.
        let table = service
            .lookup(&handle, &keys(&["key1", "key2", "oov"]), false)
            .await
            .unwrap();
        assert_eq!(table.len(), 2);
        assert!(!table.contains_key("oov"));
    }

    #[tokio::test]
    async fn test_lookup_without_update_leaves_store_unchanged() {
        let service = KnowledgeBankService::new();
        let handle = service
            .start_session(&start_request("emb1", &config()))
            .await
            .unwrap();

        let table = service.lookup(&handle, &keys(&["fresh"]), false).await.unwrap();
        assert!(table.is_empty());

        // The key still does not exist.
        let table = service.lookup(&handle, &keys(&["fresh"]), false).await.unwrap();
        assert!(table.is_empty());

        // Until a lazy lookup creates it.
        let table = service.lookup(&handle, &keys(&["fresh"]), true).await.unwrap();
        assert_eq!(table["fresh"].weight, 1.0);
        let table = service.lookup(&handle, &keys(&["fresh"]), false).await.unwrap();
        assert_eq!(table["fresh"].weight, 1.0);
    }

    #[tokio::test]
    async fn test_lookup_cold_start() {
        // A handle fully describes its session: a fresh service instance can
        // serve it without a StartSession call.
        let service = KnowledgeBankService::new();
        let handle = encode_session_handle(&start_request("emb1", &config()));

        let table = service
            .lookup(&handle, &keys(&["key1", "key2"]), true)
            .await
            .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table["key1"].values, vec![0.0, 0.0]);
        assert_eq!(table["key1"].weight, 1.0);
        assert_eq!(table["key2"].weight, 1.0);
        assert_eq!(service.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_lookup_padding_key_reads_zero_and_skips_store() {
        let service = KnowledgeBankService::new();
        let handle = service
            .start_session(&start_request("emb1", &config()))
            .await
            .unwrap();

        let table = service
            .lookup(&handle, &keys(&["key1", ""]), true)
            .await
            .unwrap();
        assert_eq!(table[""].values, vec![0.0, 0.0]);
        assert_eq!(table[""].weight, 0.0);

        // The sentinel was not persisted: only key1 exists.
        let table = service
            .lookup(&handle, &keys(&["key1", ""]), false)
            .await
            .unwrap();
        assert_eq!(table["key1"].weight, 1.0);
        assert_eq!(table[""].values, vec![0.0, 0.0]);
    }

    #[tokio::test]
    async fn test_update_empty_handle_and_empty_input() {
        let service = KnowledgeBankService::new();
        let err = service
            .update("", HashMap::new(), HashMap::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "session_handle is empty.");

        let handle = service
            .start_session(&start_request("emb1", &config()))
            .await
            .unwrap();
        let err = service
            .update(&handle, HashMap::new(), HashMap::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "input is empty.");
    }

    #[tokio::test]
    async fn test_update_values_overwrites() {
        let service = KnowledgeBankService::new();
        let handle = service
            .start_session(&start_request("emb1", &config()))
            .await
            .unwrap();

        service
            .update(&handle, value_map(&[("key1", vec![1.0, 2.0])]), HashMap::new())
            .await
            .unwrap();

        let table = service.lookup(&handle, &keys(&["key1"]), true).await.unwrap();
        assert_eq!(table["key1"].values, vec![1.0, 2.0]);
        assert_eq!(table["key1"].weight, 1.0);

        service
            .update(&handle, value_map(&[("key2", vec![3.0, 4.0])]), HashMap::new())
            .await
            .unwrap();

        let table = service
            .lookup(&handle, &keys(&["key1", "key2"]), true)
            .await
            .unwrap();
        assert_eq!(table["key1"].values, vec![1.0, 2.0]);
        assert_eq!(table["key1"].weight, 2.0);
        assert_eq!(table["key2"].values, vec![3.0, 4.0]);
        assert_eq!(table["key2"].weight, 1.0);
    }

    #[tokio::test]
    async fn test_update_values_skips_padding_key() {
        let service = KnowledgeBankService::new();
        let handle = service
            .start_session(&start_request("emb1", &config()))
            .await
            .unwrap();

        service
            .update(&handle, value_map(&[("", vec![7.0, 8.0])]), HashMap::new())
            .await
            .unwrap();

        // Nothing was written; the sentinel still reads as zero.
        let table = service.lookup(&handle, &keys(&[""]), false).await.unwrap();
        assert_eq!(table[""].values, vec![0.0, 0.0]);
    }

    #[tokio::test]
    async fn test_update_values_rejects_wrong_dimension() {
        let service = KnowledgeBankService::new();
        let handle = service
            .start_session(&start_request("emb1", &config()))
            .await
            .unwrap();

        let err = service
            .update(&handle, value_map(&[("key1", vec![1.0, 2.0, 3.0])]), HashMap::new())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Inconsistent embedding dimension, got 3 expect 2"
        );
    }

    #[tokio::test]
    async fn test_update_gradients_requires_optimizer() {
        let service = KnowledgeBankService::new();
        let handle = service
            .start_session(&start_request("emb1", &config()))
            .await
            .unwrap();

        let err = service
            .update(&handle, HashMap::new(), value_map(&[("key1", vec![0.1, 0.2])]))
            .await
            .unwrap_err();
        assert!(matches!(err, EmbeddingError::MissingOptimizer));
    }

    #[tokio::test]
    async fn test_update_gradients_pipeline() {
        let service = KnowledgeBankService::new();
        let handle = service
            .start_session(&start_request("emb1", &config().with_sgd(0.1)))
            .await
            .unwrap();

        // Gradient for a key with no embedding yet: nothing to update.
        let gradients = value_map(&[("key1", vec![0.1, 0.2])]);
        let err = service
            .update(&handle, HashMap::new(), gradients.clone())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No valid keys for gradient update.");

        // Create the embedding, then apply the same gradient.
        service.lookup(&handle, &keys(&["key1"]), true).await.unwrap();
        service.update(&handle, HashMap::new(), gradients).await.unwrap();

        let table = service.lookup(&handle, &keys(&["key1"]), true).await.unwrap();
        let entry = &table["key1"];
        assert_eq!(entry.tag, "key1");
        assert_close(&entry.values, &[-0.01, -0.02]);
        assert_eq!(entry.weight, 2.0);
    }

    #[tokio::test]
    async fn test_update_gradients_drops_unknown_and_padding_keys() {
        let service = KnowledgeBankService::new();
        let handle = service
            .start_session(&start_request("emb1", &config().with_sgd(0.1)))
            .await
            .unwrap();

        service.lookup(&handle, &keys(&["known"]), true).await.unwrap();

        let gradients = value_map(&[
            ("known", vec![1.0, 2.0]),
            ("unknown", vec![5.0, 5.0]),
            ("", vec![9.0, 9.0]),
        ]);
        service.update(&handle, HashMap::new(), gradients).await.unwrap();

        let table = service
            .lookup(&handle, &keys(&["known", "unknown", ""]), false)
            .await
            .unwrap();
        assert_close(&table["known"].values, &[-0.1, -0.2]);
        assert!(!table.contains_key("unknown"));
        assert_eq!(table[""].values, vec![0.0, 0.0]);
    }

    #[tokio::test]
    async fn test_update_values_and_gradients_in_one_call() {
        let service = KnowledgeBankService::new();
        let handle = service
            .start_session(&start_request("emb1", &config().with_sgd(0.1)))
            .await
            .unwrap();

        service.lookup(&handle, &keys(&["grad-key"]), true).await.unwrap();

        service
            .update(
                &handle,
                value_map(&[("value-key", vec![1.0, 2.0])]),
                value_map(&[("grad-key", vec![1.0, 1.0])]),
            )
            .await
            .unwrap();

        let table = service
            .lookup(&handle, &keys(&["value-key", "grad-key"]), false)
            .await
            .unwrap();
        assert_eq!(table["value-key"].values, vec![1.0, 2.0]);
        assert_close(&table["grad-key"].values, &[-0.1, -0.1]);
    }

    #[tokio::test]
    async fn test_optimizer_failure_is_surfaced() {
        let service = KnowledgeBankService::new();
        let handle = service
            .start_session(&start_request("emb1", &config()))
            .await
            .unwrap();

        // Swap in an optimizer that always fails.
        let mut optimizer = MockGradientOptimizer::new();
        optimizer
            .expect_apply()
            .returning(|_, _| Err("numeric overflow".to_string()));
        {
            let mut registry = service.registry.write().await;
            let session = registry.get(&handle).unwrap();
            registry.insert(
                &handle,
                Session {
                    bank: session.bank,
                    optimizer: Some(Arc::new(optimizer)),
                },
            );
        }

        service.lookup(&handle, &keys(&["key1"]), true).await.unwrap();
        let err = service
            .update(&handle, HashMap::new(), value_map(&[("key1", vec![1.0, 1.0])]))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Applying gradient update returned error: numeric overflow"
        );

        // The failed pipeline left the embedding untouched.
        let table = service.lookup(&handle, &keys(&["key1"]), false).await.unwrap();
        assert_eq!(table["key1"].values, vec![0.0, 0.0]);
    }

    /// Bank double that returns one result fewer than requested.
    struct ShortCountBank;

    #[async_trait]
    impl KnowledgeBank for ShortCountBank {
        fn embedding_dimension(&self) -> usize {
            2
        }

        async fn batch_lookup(&self, keys: &[String]) -> Vec<EmbeddingResult<EmbeddingVector>> {
            keys.iter()
                .skip(1)
                .map(|_| Ok(EmbeddingVector::zeros(2)))
                .collect()
        }

        async fn batch_lookup_with_update(
            &self,
            keys: &[String],
        ) -> Vec<EmbeddingResult<EmbeddingVector>> {
            self.batch_lookup(keys).await
        }

        async fn batch_update(
            &self,
            _keys: &[String],
            _values: Vec<EmbeddingVector>,
        ) -> EmbeddingResult<()> {
            Ok(())
        }

        async fn export(&self, _directory: &Path) -> EmbeddingResult<PathBuf> {
            Err(EmbeddingError::BankCreation)
        }

        async fn import(&self, _metadata_path: &Path) -> EmbeddingResult<()> {
            Ok(())
        }

        fn size(&self) -> usize {
            0
        }

        fn keys(&self) -> Vec<String> {
            Vec::new()
        }
    }

    #[tokio::test]
    async fn test_inconsistent_lookup_count_is_internal_error() {
        let service = KnowledgeBankService::new();
        let handle = service
            .start_session(&start_request("emb1", &config()))
            .await
            .unwrap();
        {
            let mut registry = service.registry.write().await;
            registry.insert(
                &handle,
                Session {
                    bank: Arc::new(ShortCountBank),
                    optimizer: None,
                },
            );
        }

        let err = service
            .lookup(&handle, &keys(&["key1", "key2"]), false)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Inconsistent result returned by BatchLookup()"
        );
    }

    #[tokio::test]
    async fn test_export_import_round_trip() {
        let service = KnowledgeBankService::new();
        let handle = service
            .start_session(&start_request("emb1", &config()))
            .await
            .unwrap();

        service
            .update(
                &handle,
                value_map(&[
                    ("key1", vec![1.0, 2.0]),
                    ("key2", vec![3.0, 4.0]),
                    ("key3", vec![5.0, 6.0]),
                ]),
                HashMap::new(),
            )
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let exported_path = service.export(&handle, dir.path()).await.unwrap();

        // Overwrite everything, then restore.
        service
            .update(
                &handle,
                value_map(&[
                    ("key1", vec![-1.0, -1.0]),
                    ("key2", vec![-1.0, -1.0]),
                    ("key3", vec![-1.0, -1.0]),
                ]),
                HashMap::new(),
            )
            .await
            .unwrap();

        service.import(&handle, &exported_path).await.unwrap();

        let table = service
            .lookup(&handle, &keys(&["key1", "key2", "key3"]), false)
            .await
            .unwrap();
        assert_eq!(table["key1"].values, vec![1.0, 2.0]);
        assert_eq!(table["key2"].values, vec![3.0, 4.0]);
        assert_eq!(table["key3"].values, vec![5.0, 6.0]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_lookups_initialize_once() {
        let service = Arc::new(KnowledgeBankService::new());
        let handle = service
            .start_session(&start_request("emb1", &config()))
            .await
            .unwrap();
        let callers = 8;

        let handles: Vec<_> = (0..callers)
            .map(|_| {
                let service = service.clone();
                let handle = handle.clone();
                tokio::spawn(async move {
                    service.lookup(&handle, &keys(&["shared"]), true).await
                })
            })
            .collect();

        for task in handles {
            let table = task.await.unwrap().unwrap();
            assert_eq!(table["shared"].values, vec![0.0, 0.0]);
        }

        let table = service.lookup(&handle, &keys(&["shared"]), false).await.unwrap();
        assert_eq!(table["shared"].weight, callers as f32);
    }
}
