// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Blocking HTTP transport
//!
//! The client talks to the network through the [`Transport`] trait so tests
//! can script responses without a server. [`UreqTransport`] is the production
//! implementation.

use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors surfaced by the HTTP transport
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a status the client has no handling for
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Http(Box<ureq::Error>),

    #[error("failed to read response body: {0}")]
    Body(String),
}

impl From<ureq::Error> for TransportError {
    fn from(err: ureq::Error) -> Self {
        TransportError::Http(Box::new(err))
    }
}

/// A raw HTTP response: status code plus body text
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Blocking request/response seam between the client and the network.
///
/// Implementations return the response whatever its status; translating
/// non-2xx statuses into errors is the caller's policy.
pub trait Transport {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, TransportError>;

    fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, TransportError> {
        (**self).get(url, headers)
    }

    fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<HttpResponse, TransportError> {
        (**self).post_json(url, headers, body)
    }
}

/// Request timeout unless `AQUEDUCT_TIMEOUT_MS` overrides it
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// Timeout configuration (env var in milliseconds)
fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Timeout applied to every request
pub fn request_timeout() -> Duration {
    parse_duration_ms("AQUEDUCT_TIMEOUT_MS").unwrap_or(DEFAULT_TIMEOUT)
}

/// Production transport on top of ureq
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::with_timeout(request_timeout())
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        // Non-2xx statuses are data here, not errors: the client translates
        // 404 and 429 itself.
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        Self {
            agent: config.into(),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, TransportError> {
        let mut request = self.agent.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let mut response = request.call()?;
        read_response(&mut response)
    }

    fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<HttpResponse, TransportError> {
        let mut request = self.agent.post(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let mut response = request.send_json(body)?;
        read_response(&mut response)
    }
}

fn read_response(
    response: &mut ureq::http::Response<ureq::Body>,
) -> Result<HttpResponse, TransportError> {
    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| TransportError::Body(e.to_string()))?;
    Ok(HttpResponse { status, body })
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
