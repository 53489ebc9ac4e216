// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution data model
//!
//! An execution is created server-side when pipeline code is submitted and is
//! immutable from the client's perspective afterwards, except for its status,
//! which the server advances (QUEUED → RUNNING → SUCCESS or FAILED) and the
//! client only observes.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Unique identifier for a pipeline execution
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutionId(pub String);

impl std::fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ExecutionId {
    fn from(s: String) -> Self {
        ExecutionId(s)
    }
}

impl From<&str> for ExecutionId {
    fn from(s: &str) -> Self {
        ExecutionId(s.to_string())
    }
}

/// Server-side lifecycle state of an execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    Queued,
    /// Older servers report `IN-PROGRESS` for this state.
    #[serde(alias = "IN-PROGRESS")]
    Running,
    Success,
    Failed,
}

impl ExecutionStatus {
    /// Check if this status is terminal
    pub fn is_terminal(self) -> bool {
        matches!(self, ExecutionStatus::Success | ExecutionStatus::Failed)
    }
}

/// How securities are identified in submitted code and result tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetIdFormat {
    #[default]
    Symbol,
    Sid,
    FsymRegionId,
}

impl AssetIdFormat {
    /// Name of the identifier column in result tables
    pub fn column_name(self) -> &'static str {
        match self {
            AssetIdFormat::Symbol => "symbol",
            AssetIdFormat::Sid => "sid",
            AssetIdFormat::FsymRegionId => "fsym_region_id",
        }
    }
}

impl std::fmt::Display for AssetIdFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column_name())
    }
}

impl std::str::FromStr for AssetIdFormat {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "symbol" => Ok(AssetIdFormat::Symbol),
            "sid" => Ok(AssetIdFormat::Sid),
            "fsym_region_id" => Ok(AssetIdFormat::FsymRegionId),
            other => Err(ClientError::InvalidArgument(format!(
                "invalid asset_identifier_format {other:?}, should be symbol, sid, or fsym_region_id"
            ))),
        }
    }
}

/// Metadata of a pipeline execution as reported by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Execution {
    pub id: ExecutionId,
    #[serde(default)]
    pub name: Option<String>,
    /// The pipeline code this execution runs. Omitted from list responses.
    #[serde(default)]
    pub code: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ExecutionStatus,
    #[serde(default)]
    pub asset_identifier_format: AssetIdFormat,
    /// Server timestamps carry no offset
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub params: BTreeMap<String, serde_json::Value>,
}

/// Diagnostics for an execution that ended in FAILED
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionError {
    /// Simulation date the failure occurred on
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Exception name
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "lineno")]
    pub line_number: Option<u32>,
    /// Pipeline method the failure was raised from
    #[serde(default)]
    pub method: Option<String>,
}

/// Concurrent-execution quota as reported by the server
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QuotaInfo {
    /// Executions currently queued or running
    pub running: u64,
    /// Ceiling on queued-or-running executions
    pub maximum: u64,
}

/// Parse a calendar date from user input.
///
/// Accepts a bare `YYYY-MM-DD` date or a midnight timestamp, which
/// normalizes to its date. A timestamp with a nonzero time component is not
/// a calendar date and is rejected.
pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, ClientError> {
    let input = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(input, format) {
            if datetime.time() == NaiveTime::MIN {
                return Ok(datetime.date());
            }
            return Err(ClientError::InvalidArgument(format!(
                "{input} is not a calendar date"
            )));
        }
    }

    Err(ClientError::InvalidArgument(format!(
        "could not parse date: {input}"
    )))
}

#[cfg(test)]
#[path = "execution_tests.rs"]
mod tests;
