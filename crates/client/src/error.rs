// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the execution client

use crate::credentials::CredentialError;
use crate::execution::ExecutionId;
use crate::table::TableError;
use crate::transport::TransportError;
use thiserror::Error;

/// Errors that can occur while talking to the execution API
#[derive(Debug, Error)]
pub enum ClientError {
    /// Client-side validation failure, raised before any request is sent
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("execution not found: {0}")]
    NotFound(ExecutionId),

    /// The server refused a submission because too many executions are
    /// already queued or running
    #[error("{current} executions queued or running, the limit is {maximum}")]
    QuotaExceeded { current: u64, maximum: u64 },

    #[error("execution {0} is still running")]
    StillRunning(ExecutionId),

    #[error("execution {0} ended in error, use get_execution_error for diagnostics")]
    ExecutionFailed(ExecutionId),

    #[error("execution {0} did not end in error")]
    NotFailed(ExecutionId),

    /// The server answered 2xx but the payload did not decode
    #[error("unexpected response from server: {0}")]
    UnexpectedResponse(String),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("credential error: {0}")]
    Credential(#[from] CredentialError),

    #[error("result decode error: {0}")]
    Table(#[from] TableError),
}
