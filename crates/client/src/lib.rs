//! aqueduct-client: client library for the Aqueduct pipeline-execution API
//!
//! This crate provides:
//! - [`ExecutionClient`], a blocking client for the execution lifecycle
//!   (submit, poll status, fetch results or failure diagnostics)
//! - The execution data model: statuses, asset-identifier formats, quota
//! - [`ResultTable`], a decoder for the CSV a finished execution produces
//! - Credential resolution (credentials file, then environment)

pub mod client;
pub mod credentials;
pub mod error;
pub mod execution;
pub mod table;
pub mod transport;

// Re-exports
pub use client::{create_client, ExecutionClient, ExecutionRequest, DEFAULT_BASE_URL};
pub use credentials::{
    CredentialError, CredentialProvider, DefaultCredentialProvider, StaticCredential,
};
pub use error::ClientError;
pub use execution::{
    AssetIdFormat, Execution, ExecutionError, ExecutionId, ExecutionStatus, QuotaInfo,
};
pub use table::{ResultRow, ResultTable, TableError};
pub use transport::{HttpResponse, Transport, TransportError, UreqTransport};
