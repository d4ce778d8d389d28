//! Embedding Manager
//!
//! Client façade over the knowledge bank service. A manager is bound to one
//! (embedding name, service address) pair at construction time and translates
//! rectangular batches of keys, values and gradients into the flat request
//! shapes the service consumes, rebuilding rectangular outputs on the way
//! back.
//!
//! ```text
//! Batch<String> / Batch<f32>
//!   ↓ (flatten, shape checks)
//! DynamicEmbeddingManager
//!   ↓ (gRPC over a lazily connected channel)
//! KnowledgeBankService
//! ```
//!
//! Padding: the empty-string key never addresses a real entry. Lookups at
//! padding positions return zero vectors, and writes or gradients aimed at
//! them are dropped by the service, so fixed-shape batches can carry
//! variable-length data.

pub mod batch;
pub mod error;

pub use batch::Batch;
pub use error::{ManagerError, ManagerResult};

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use domain_embedding::DynamicEmbeddingConfig;
use grpc_client::create_channel_lazy;
use rpc::embedding::v1 as pb;
use rpc::embedding::v1::knowledge_bank_service_client::KnowledgeBankServiceClient;
use tonic::codec::CompressionEncoding;
use tonic::transport::Channel;
use tracing::{info, instrument};
use validator::Validate;

/// Client handle for one embedding session.
///
/// Cloning is cheap; clones share the underlying channel and session.
#[derive(Clone)]
pub struct DynamicEmbeddingManager {
    name: String,
    embedding_dimension: usize,
    session_handle: String,
    client: KnowledgeBankServiceClient<Channel>,
}

impl DynamicEmbeddingManager {
    /// Validate the configuration, connect to `address` and start (or join)
    /// the session the (name, config) pair describes.
    ///
    /// The channel is created lazily, but the StartSession call issued here
    /// forces a round trip, so an unreachable service fails construction.
    pub async fn create(
        config: DynamicEmbeddingConfig,
        name: &str,
        address: &str,
    ) -> ManagerResult<Self> {
        if address.is_empty() {
            return Err(ManagerError::EmptyAddress);
        }
        config
            .validate()
            .map_err(|e| ManagerError::InvalidConfig(e.to_string()))?;
        if let Some(gd) = &config.gradient_descent {
            if !(gd.learning_rate > 0.0) {
                return Err(ManagerError::InvalidConfig(
                    "learning_rate must be positive".to_string(),
                ));
            }
        }

        let channel = create_channel_lazy(format!("http://{}", address))?;
        let mut client = KnowledgeBankServiceClient::new(channel)
            .accept_compressed(CompressionEncoding::Zstd)
            .send_compressed(CompressionEncoding::Zstd);

        let embedding_dimension = config.embedding_dimension;
        let response = client
            .start_session(pb::StartSessionRequest {
                name: name.to_string(),
                config: Some(config.into()),
            })
            .await?;
        let session_handle = response.into_inner().session_handle;

        info!(name = %name, address = %address, "Started embedding session");

        Ok(Self {
            name: name.to_string(),
            embedding_dimension,
            session_handle,
            client,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn embedding_dimension(&self) -> usize {
        self.embedding_dimension
    }

    pub fn session_handle(&self) -> &str {
        &self.session_handle
    }

    /// Batched lookup. The output has shape `keys.shape + [dimension]`; any
    /// key the service omitted (per-key failure) and every padding position
    /// reads as the zero vector.
    #[instrument(skip_all, fields(key_count = keys.len(), update = update))]
    pub async fn lookup(&self, keys: &Batch<String>, update: bool) -> ManagerResult<Batch<f32>> {
        if keys.is_empty() {
            return Err(ManagerError::EmptyInput);
        }

        let response = self
            .client
            .clone()
            .lookup(pb::LookupRequest {
                session_handle: self.session_handle.clone(),
                update,
                key: keys.as_slice().to_vec(),
            })
            .await?
            .into_inner();
        let table = response.embedding_table;

        let mut data = Vec::with_capacity(keys.len() * self.embedding_dimension);
        for key in keys.as_slice() {
            let row = table.get(key).map(|vector| vector.value.as_slice()).unwrap_or(&[]);
            data.extend(
                row.iter()
                    .copied()
                    .chain(std::iter::repeat(0.0))
                    .take(self.embedding_dimension),
            );
        }

        let mut shape = keys.shape().to_vec();
        shape.push(self.embedding_dimension);
        Batch::new(shape, data)
    }

    /// Batched overwrite of the given keys with the paired rows of `values`.
    #[instrument(skip_all, fields(key_count = keys.len()))]
    pub async fn update_values(
        &self,
        keys: &Batch<String>,
        values: &Batch<f32>,
    ) -> ManagerResult<()> {
        self.check_update_shapes(keys, values)?;

        self.client
            .clone()
            .update(pb::UpdateRequest {
                session_handle: self.session_handle.clone(),
                values: self.to_vector_map(keys, values),
                gradients: HashMap::new(),
            })
            .await?;
        Ok(())
    }

    /// Apply the paired rows of `gradients` to the given keys through the
    /// session's optimizer.
    #[instrument(skip_all, fields(key_count = keys.len()))]
    pub async fn update_gradients(
        &self,
        keys: &Batch<String>,
        gradients: &Batch<f32>,
    ) -> ManagerResult<()> {
        self.check_update_shapes(keys, gradients)?;

        self.client
            .clone()
            .update(pb::UpdateRequest {
                session_handle: self.session_handle.clone(),
                values: HashMap::new(),
                gradients: self.to_vector_map(keys, gradients),
            })
            .await?;
        Ok(())
    }

    /// Snapshot the session's knowledge bank under
    /// `directory/<name>/`; returns the path of the metadata file,
    /// `directory/<name>/embedding_store_meta_data.json`.
    #[instrument(skip_all)]
    pub async fn export(&self, directory: &Path) -> ManagerResult<PathBuf> {
        let export_directory = directory.join(&self.name);
        let response = self
            .client
            .clone()
            .export(pb::ExportRequest {
                session_handle: self.session_handle.clone(),
                export_directory: export_directory.to_string_lossy().into_owned(),
            })
            .await?
            .into_inner();
        Ok(PathBuf::from(response.exported_path))
    }

    /// Replace the session's content with the snapshot at `metadata_path`.
    /// Lookups afterwards reproduce the exported values exactly.
    #[instrument(skip_all)]
    pub async fn import(&self, metadata_path: &Path) -> ManagerResult<()> {
        self.client
            .clone()
            .import(pb::ImportRequest {
                session_handle: self.session_handle.clone(),
                source_path: metadata_path.to_string_lossy().into_owned(),
            })
            .await?;
        Ok(())
    }

    /// Shared validation of UpdateValues/UpdateGradients inputs: the flat key
    /// count must match the product of the value batch's leading dimensions,
    /// and its trailing dimension must be the embedding dimension.
    fn check_update_shapes(&self, keys: &Batch<String>, values: &Batch<f32>) -> ManagerResult<()> {
        if keys.is_empty() {
            return Err(ManagerError::EmptyKeys);
        }
        let (trailing, leading) = match values.shape().split_last() {
            Some((trailing, leading)) => (*trailing, leading.iter().product::<usize>()),
            None => (0, 0),
        };
        if keys.len() != leading {
            return Err(ManagerError::KeyValueMismatch {
                keys: keys.len(),
                values: leading,
            });
        }
        if trailing != self.embedding_dimension {
            return Err(ManagerError::DimensionMismatch {
                got: trailing,
                expect: self.embedding_dimension,
            });
        }
        Ok(())
    }

    fn to_vector_map(
        &self,
        keys: &Batch<String>,
        values: &Batch<f32>,
    ) -> HashMap<String, pb::EmbeddingVector> {
        keys.as_slice()
            .iter()
            .zip(values.as_slice().chunks(self.embedding_dimension))
            .map(|(key, row)| {
                (
                    key.clone(),
                    pb::EmbeddingVector {
                        tag: String::new(),
                        value: row.to_vec(),
                        weight: 0.0,
                    },
                )
            })
            .collect()
    }
}
