//! gRPC server initialization and lifecycle management
//!
//! This module handles all server setup:
//! - Tracing initialization
//! - Listen address configuration
//! - gRPC server configuration and startup
//! - Health check service (grpc.health.v1.Health)

use core_config::server::KbsServerConfig;
use core_config::{Environment, FromEnv};
use eyre::{Result, WrapErr};
use rpc::embedding::v1::knowledge_bank_service_server::KnowledgeBankServiceServer;
use tonic::transport::Server;
use tonic_health::server::health_reporter;
use tracing::info;

use crate::service::KnowledgeBankServiceImpl;

/// Run the gRPC server
///
/// This is the main entry point for server initialization. It:
/// 1. Sets up structured logging (env-aware: JSON for prod, pretty for dev)
/// 2. Reads the listen address from the environment
/// 3. Starts the gRPC server with compression and health checks enabled
///
/// # Errors
///
/// Returns an error if the listen address is invalid, binding fails, or the
/// server runtime encounters an error.
pub async fn run() -> Result<()> {
    // Initialize tracing (env-aware: JSON for prod, pretty for dev)
    let environment = Environment::from_env();
    core_config::tracing::init_tracing(&environment);

    // Configure server address from environment or defaults
    let config = KbsServerConfig::from_env().wrap_err("Failed to load server configuration")?;
    let addr = config
        .address()
        .parse()
        .wrap_err_with(|| format!("Failed to parse server address: {}", config.address()))?;

    let kbs_service = KnowledgeBankServiceImpl::new();
    info!("KnowledgeBankService listening on {}", addr);

    // Create health reporter for Kubernetes probes
    let (mut health_reporter, health_service) = health_reporter();
    health_reporter
        .set_service_status(
            "embedding.v1.KnowledgeBankService",
            tonic_health::ServingStatus::Serving,
        )
        .await;
    // Also set empty service name for generic health checks
    health_reporter
        .set_service_status("", tonic_health::ServingStatus::Serving)
        .await;
    info!("Health check service enabled (grpc.health.v1.Health)");

    // Build and start the gRPC server
    Server::builder()
        .add_service(health_service)
        .add_service(
            KnowledgeBankServiceServer::new(kbs_service)
                // Enable zstd compression for requests and responses
                .accept_compressed(tonic::codec::CompressionEncoding::Zstd)
                .send_compressed(tonic::codec::CompressionEncoding::Zstd),
        )
        .serve(addr)
        .await
        .wrap_err("gRPC server failed")?;

    Ok(())
}
