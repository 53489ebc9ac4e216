// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! API key resolution
//!
//! The hosted API authenticates every request with a per-user key. The
//! default chain checks a credentials file, then the environment. Resolution
//! sits behind [`CredentialProvider`] so the client can be constructed in
//! tests without touching the filesystem or the environment.

use std::env;
use std::fs;
use std::path::PathBuf;

use thiserror::Error;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "QUANTOPIAN_API_KEY";

/// Override for the credentials file location (used by tests)
const CREDENTIALS_PATH_ENV: &str = "QUANTOPIAN_CREDENTIALS";

/// Errors raised while resolving a credential
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error(
        "no API key found: set QUANTOPIAN_API_KEY or create ~/.quantopian/credentials"
    )]
    Missing,

    #[error("could not read credentials file {path}: {message}")]
    Unreadable { path: String, message: String },
}

/// Source of the API key used to authenticate requests
pub trait CredentialProvider {
    fn api_key(&self) -> Result<String, CredentialError>;
}

/// A fixed, pre-resolved key
pub struct StaticCredential(pub String);

impl CredentialProvider for StaticCredential {
    fn api_key(&self) -> Result<String, CredentialError> {
        Ok(self.0.clone())
    }
}

/// File-then-environment resolution chain.
///
/// Checks `~/.quantopian/credentials` for an `API_KEY` entry, then the
/// `QUANTOPIAN_API_KEY` environment variable.
#[derive(Debug, Default)]
pub struct DefaultCredentialProvider;

impl DefaultCredentialProvider {
    pub fn new() -> Self {
        Self
    }

    fn credentials_path() -> Option<PathBuf> {
        if let Ok(path) = env::var(CREDENTIALS_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".quantopian").join("credentials"))
    }
}

impl CredentialProvider for DefaultCredentialProvider {
    fn api_key(&self) -> Result<String, CredentialError> {
        if let Some(path) = Self::credentials_path() {
            if path.is_file() {
                let content =
                    fs::read_to_string(&path).map_err(|e| CredentialError::Unreadable {
                        path: path.display().to_string(),
                        message: e.to_string(),
                    })?;
                if let Some(key) = parse_credentials_file(&content) {
                    return Ok(key);
                }
            }
        }

        if let Ok(key) = env::var(API_KEY_ENV) {
            let key = key.trim();
            if !key.is_empty() {
                return Ok(key.to_string());
            }
        }

        Err(CredentialError::Missing)
    }
}

/// Extract `API_KEY` from an INI-style credentials file.
///
/// Section headers are ignored; the first `API_KEY = value` line wins.
fn parse_credentials_file(content: &str) -> Option<String> {
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            if key.trim() == "API_KEY" && !value.trim().is_empty() {
                return Some(value.trim().to_string());
            }
        }
    }
    None
}

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod tests;
