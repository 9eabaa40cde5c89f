//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - Exactly one attempt per request (no retry)
//! - Status classification: 404, rate limiting, other failures

use crate::error::AuditError;
use chrono::{DateTime, SecondsFormat};
use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header (GitHub rejects requests without one)
pub const DEFAULT_USER_AGENT: &str = concat!("depaudit/", env!("CARGO_PKG_VERSION"));

const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";
const RATE_LIMIT_RESET: &str = "x-ratelimit-reset";

/// HTTP client wrapper
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, AuditError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, AuditError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                AuditError::unreachable(
                    "",
                    "HTTP client",
                    format!("failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self { client })
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Start a GET request
    pub fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url)
    }

    /// Send a request once and classify the response status
    pub async fn send(
        &self,
        request: RequestBuilder,
        target: &str,
        upstream: &str,
    ) -> Result<Response, AuditError> {
        let response = request.send().await.map_err(|e| {
            let message = if e.is_timeout() {
                "request timed out".to_string()
            } else {
                e.to_string()
            };
            AuditError::unreachable(target, upstream, message)
        })?;

        debug!("{} answered {} for {}", upstream, response.status(), target);
        check_status(response, target, upstream)
    }

    /// Send a request once and decode the JSON body
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        target: &str,
        upstream: &str,
    ) -> Result<T, AuditError> {
        let response = self.send(request, target, upstream).await?;
        response.json::<T>().await.map_err(|e| {
            AuditError::unreachable(target, upstream, format!("invalid response body: {}", e))
        })
    }
}

fn check_status(response: Response, target: &str, upstream: &str) -> Result<Response, AuditError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::NOT_FOUND {
        return Err(AuditError::not_found(target, upstream));
    }

    if is_rate_limited(status, response.headers()) {
        return Err(AuditError::rate_limited(
            target,
            upstream,
            rate_limit_reset(response.headers()),
        ));
    }

    Err(AuditError::unreachable(
        target,
        upstream,
        format!("HTTP {}", status),
    ))
}

fn is_rate_limited(status: StatusCode, headers: &HeaderMap) -> bool {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return true;
    }

    status == StatusCode::FORBIDDEN
        && headers
            .get(RATE_LIMIT_REMAINING)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim() == "0")
            .unwrap_or(false)
}

/// Human-readable reset time from the rate-limit headers.
///
/// A Unix epoch becomes RFC 3339 UTC (`2024-01-01T00:00:00Z`); any other
/// value is returned as sent.
pub fn rate_limit_reset(headers: &HeaderMap) -> String {
    let Some(raw) = headers
        .get(RATE_LIMIT_RESET)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
    else {
        return "unknown".to_string();
    };

    raw.parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| raw.to_string())
}
