// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution API client
//!
//! Every method is a single blocking round trip, except the two result
//! fetches which first poll execution status so a doomed download is never
//! attempted. The client performs no retries and holds no mutable state.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::credentials::{CredentialProvider, DefaultCredentialProvider};
use crate::error::ClientError;
use crate::execution::{
    parse_date, AssetIdFormat, Execution, ExecutionError, ExecutionId, ExecutionStatus, QuotaInfo,
};
use crate::table::ResultTable;
use crate::transport::{HttpResponse, Transport, TransportError, UreqTransport};

/// Default endpoint of the hosted execution API
pub const DEFAULT_BASE_URL: &str = "https://factset.quantopian.com/api/experimental/pipelines";

/// Request header carrying the API key
const API_KEY_HEADER: &str = "Quantopian-API-Key";

/// A pipeline execution to be submitted.
///
/// Dates are taken as text and validated when the request is submitted; a
/// midnight timestamp normalizes to its date.
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    code: String,
    start_date: String,
    end_date: String,
    name: Option<String>,
    params: BTreeMap<String, serde_json::Value>,
    asset_identifier_format: AssetIdFormat,
}

impl ExecutionRequest {
    pub fn new(
        code: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            name: None,
            params: BTreeMap::new(),
            asset_identifier_format: AssetIdFormat::default(),
        }
    }

    /// Set the human-readable name of the execution
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add one input argument for the pipeline factory defined in the code
    pub fn with_param(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Replace the full parameter mapping
    pub fn with_params(mut self, params: BTreeMap<String, serde_json::Value>) -> Self {
        self.params = params;
        self
    }

    pub fn with_asset_identifier_format(mut self, format: AssetIdFormat) -> Self {
        self.asset_identifier_format = format;
        self
    }
}

/// Client for the execution API
#[derive(Debug)]
pub struct ExecutionClient<T = UreqTransport> {
    transport: T,
    base_url: String,
    api_key: String,
}

impl ExecutionClient<UreqTransport> {
    /// Create a client against the default endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_transport(UreqTransport::new(), api_key, DEFAULT_BASE_URL)
    }
}

impl<T: Transport> ExecutionClient<T> {
    /// Create a client with an injected transport
    pub fn with_transport(
        transport: T,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            transport,
            base_url,
            api_key: api_key.into(),
        }
    }

    /// Point the client at a nonstandard deployment
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// List the metadata of every execution submitted under this key
    pub fn list_executions(&self) -> Result<Vec<Execution>, ClientError> {
        let response = ensure_success(self.get("")?)?;
        let payload: ExecutionList = decode(&response)?;
        Ok(payload.pipelines)
    }

    /// Fetch the metadata of a single execution
    pub fn get_execution(&self, id: &ExecutionId) -> Result<Execution, ClientError> {
        let response = self.get(&format!("/{id}"))?;
        if response.status == 404 {
            return Err(ClientError::NotFound(id.clone()));
        }
        let response = ensure_success(response)?;
        let payload: ExecutionEnvelope = decode(&response)?;
        Ok(payload.pipeline)
    }

    /// Report how many executions are active and what the ceiling is
    pub fn get_quota(&self) -> Result<QuotaInfo, ClientError> {
        let response = ensure_success(self.get("/concurrent_executions_info")?)?;
        decode(&response)
    }

    /// Create and queue a new pipeline execution, returning its id.
    ///
    /// Validation happens before any request is sent: both dates must parse
    /// as calendar dates and the end date must not precede the start date.
    pub fn submit_execution(&self, request: &ExecutionRequest) -> Result<ExecutionId, ClientError> {
        let start_date = parse_date(&request.start_date)?;
        let end_date = parse_date(&request.end_date)?;

        if end_date < start_date {
            return Err(ClientError::InvalidArgument(format!(
                "end_date ({end_date}) must be on or after start_date ({start_date})"
            )));
        }

        let body = json!({
            "code": request.code,
            "start_date": start_date.format("%Y-%m-%d").to_string(),
            "end_date": end_date.format("%Y-%m-%d").to_string(),
            "asset_identifier_format": request.asset_identifier_format,
            "params": request.params,
            "name": request.name,
        });

        let url = self.url("");
        debug!(%url, "submitting execution");
        let response = self
            .transport
            .post_json(&url, &self.auth_headers(), &body)?;

        if response.status == 429 {
            // concurrent execution quota exceeded
            let quota: QuotaExceededBody =
                response.json().map_err(|e| ClientError::UnexpectedResponse(e.to_string()))?;
            return Err(ClientError::QuotaExceeded {
                current: quota.current,
                maximum: quota.maximum,
            });
        }
        let response = ensure_success(response)?;

        let payload: SubmitResponse = decode(&response)?;
        info!(id = %payload.pipeline_id, "execution submitted");
        Ok(payload.pipeline_id)
    }

    /// Download and decode the results of a successful execution.
    ///
    /// The execution is polled first: a non-terminal status fails with
    /// [`ClientError::StillRunning`] and a failed one with
    /// [`ClientError::ExecutionFailed`], both without touching the results
    /// endpoint.
    pub fn get_result_table(&self, id: &ExecutionId) -> Result<ResultTable, ClientError> {
        let execution = self.get_execution(id)?;
        match execution.status {
            ExecutionStatus::Queued | ExecutionStatus::Running => {
                return Err(ClientError::StillRunning(id.clone()))
            }
            ExecutionStatus::Failed => return Err(ClientError::ExecutionFailed(id.clone())),
            ExecutionStatus::Success => {}
        }

        let response = ensure_success(self.get(&format!("/{id}/results_url"))?)?;
        let payload: ResultsUrl = decode(&response)?;

        // The download link is pre-signed: no API key goes with it
        debug!(url = %payload.url, "downloading results");
        let download = ensure_success(self.transport.get(&payload.url, &[])?)?;

        let table = ResultTable::parse(
            &download.body,
            execution.asset_identifier_format.column_name(),
        )?;
        Ok(table)
    }

    /// Fetch the diagnostics of an execution that ended in FAILED.
    ///
    /// Fails with [`ClientError::NotFailed`] before issuing the extra
    /// request if the execution did not end in error.
    pub fn get_execution_error(&self, id: &ExecutionId) -> Result<ExecutionError, ClientError> {
        let execution = self.get_execution(id)?;
        if execution.status != ExecutionStatus::Failed {
            return Err(ClientError::NotFailed(id.clone()));
        }

        let response = ensure_success(self.get(&format!("/{id}/exception"))?)?;
        decode(&response)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_headers(&self) -> [(&'static str, &str); 1] {
        [(API_KEY_HEADER, self.api_key.as_str())]
    }

    fn get(&self, path: &str) -> Result<HttpResponse, TransportError> {
        let url = self.url(path);
        debug!(%url, "GET");
        self.transport.get(&url, &self.auth_headers())
    }
}

/// Create a client with the API key resolved from the default credential
/// chain (credentials file, then environment)
pub fn create_client() -> Result<ExecutionClient, ClientError> {
    let api_key = DefaultCredentialProvider::new().api_key()?;
    Ok(ExecutionClient::new(api_key))
}

// Wire envelopes. The server still says "pipeline" where the client says
// "execution"; the translation stays inside this module.

#[derive(Debug, Deserialize)]
struct ExecutionList {
    pipelines: Vec<Execution>,
}

#[derive(Debug, Deserialize)]
struct ExecutionEnvelope {
    pipeline: Execution,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    pipeline_id: ExecutionId,
}

#[derive(Debug, Deserialize)]
struct ResultsUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct QuotaExceededBody {
    current: u64,
    #[serde(rename = "allowed")]
    maximum: u64,
}

fn ensure_success(response: HttpResponse) -> Result<HttpResponse, TransportError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(TransportError::Status {
            status: response.status,
            body: response.body,
        })
    }
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ClientError> {
    response
        .json()
        .map_err(|e| ClientError::UnexpectedResponse(e.to_string()))
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
