//! Knowledge bank gRPC service implementation
//!
//! This module contains the KnowledgeBankServiceImpl struct and its gRPC
//! trait implementation. Handlers stay minimal: request validation, session
//! dispatch and the gradient pipeline live in the domain layer, and proto ↔
//! domain conversions come from domain_embedding::conversions.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use domain_embedding::{EmbeddingVector, KnowledgeBankService};
use rpc::embedding::v1::{
    knowledge_bank_service_server::KnowledgeBankService as KnowledgeBankServiceTrait,
    EmbeddingVector as EmbeddingVectorProto, ExportRequest, ExportResponse, ImportRequest,
    ImportResponse, LookupRequest, LookupResponse, StartSessionRequest, StartSessionResponse,
    UpdateRequest, UpdateResponse,
};
use tonic::{Request, Response, Status};
use tracing::info;

/// gRPC service implementation for the knowledge bank
///
/// Wraps the domain KnowledgeBankService; every handler converts at the edge
/// and delegates.
#[derive(Default)]
pub struct KnowledgeBankServiceImpl {
    service: Arc<KnowledgeBankService>,
}

impl KnowledgeBankServiceImpl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions, exposed for tests and diagnostics.
    pub async fn session_count(&self) -> usize {
        self.service.session_count().await
    }
}

fn vector_map_from_proto(
    map: HashMap<String, EmbeddingVectorProto>,
) -> HashMap<String, EmbeddingVector> {
    map.into_iter()
        .map(|(key, vector)| (key, vector.into()))
        .collect()
}

#[tonic::async_trait]
impl KnowledgeBankServiceTrait for KnowledgeBankServiceImpl {
    async fn start_session(
        &self,
        request: Request<StartSessionRequest>,
    ) -> Result<Response<StartSessionResponse>, Status> {
        let req = request.into_inner();
        let session_handle = self.service.start_session(&req).await?;

        info!(name = %req.name, "Started session");

        Ok(Response::new(StartSessionResponse { session_handle }))
    }

    async fn lookup(
        &self,
        request: Request<LookupRequest>,
    ) -> Result<Response<LookupResponse>, Status> {
        let req = request.into_inner();
        let table = self
            .service
            .lookup(&req.session_handle, &req.key, req.update)
            .await?;

        Ok(Response::new(LookupResponse {
            embedding_table: table
                .into_iter()
                .map(|(key, vector)| (key, vector.into()))
                .collect(),
        }))
    }

    async fn update(
        &self,
        request: Request<UpdateRequest>,
    ) -> Result<Response<UpdateResponse>, Status> {
        let req = request.into_inner();
        self.service
            .update(
                &req.session_handle,
                vector_map_from_proto(req.values),
                vector_map_from_proto(req.gradients),
            )
            .await?;

        Ok(Response::new(UpdateResponse {}))
    }

    async fn export(
        &self,
        request: Request<ExportRequest>,
    ) -> Result<Response<ExportResponse>, Status> {
        let req = request.into_inner();
        let exported_path = self
            .service
            .export(&req.session_handle, Path::new(&req.export_directory))
            .await?;

        Ok(Response::new(ExportResponse {
            exported_path: exported_path.to_string_lossy().into_owned(),
        }))
    }

    async fn import(
        &self,
        request: Request<ImportRequest>,
    ) -> Result<Response<ImportResponse>, Status> {
        let req = request.into_inner();
        self.service
            .import(&req.session_handle, Path::new(&req.source_path))
            .await?;

        Ok(Response::new(ImportResponse {}))
    }
}
