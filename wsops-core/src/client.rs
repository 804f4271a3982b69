//! Blocking, bearer-authenticated client for the workspace REST API.
//!
//! One `ureq::Agent` per invocation, built with the configured request
//! timeout. Every call blocks the calling thread.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::settings::Settings;
use crate::types::{AccessToken, WorkspaceId};

/// Status, `Location` header and body text of a completed exchange.
///
/// Non-2xx responses are returned as data, never as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub url: String,
    pub status: u16,
    pub location: Option<String>,
    pub body: String,
}

impl ApiResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|source| ApiError::Decode {
            url: self.url.clone(),
            source,
        })
    }

    /// Map this response to [`ApiError::UnexpectedStatus`].
    pub fn unexpected(self, operation: &'static str) -> ApiError {
        ApiError::UnexpectedStatus {
            operation,
            status: self.status,
            body: self.body,
        }
    }
}

/// Build the shared blocking agent.
pub fn build_agent(timeout: Duration) -> ureq::Agent {
    ureq::AgentBuilder::new().timeout(timeout).build()
}

/// Fold a `ureq` result into an [`ApiResponse`].
///
/// `ureq` reports 4xx/5xx as `Error::Status`; those come back as `Ok` here.
pub fn read_response(
    url: &str,
    result: Result<ureq::Response, ureq::Error>,
) -> Result<ApiResponse, ApiError> {
    let response = match result {
        Ok(response) => response,
        Err(ureq::Error::Status(_, response)) => response,
        Err(ureq::Error::Transport(transport)) => {
            return Err(ApiError::Transport {
                url: url.to_string(),
                source: Box::new(transport),
            })
        }
    };
    let status = response.status();
    let location = response.header("Location").map(str::to_owned);
    let body = response.into_string().map_err(|source| ApiError::Body {
        url: url.to_string(),
        source,
    })?;
    Ok(ApiResponse {
        url: url.to_string(),
        status,
        location,
        body,
    })
}

pub struct ApiClient {
    agent: ureq::Agent,
    base_url: String,
    token: AccessToken,
}

impl ApiClient {
    pub fn new(settings: &Settings, token: AccessToken) -> Self {
        Self::with_base_url(&settings.api_base_url, settings.request_timeout(), token)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration, token: AccessToken) -> Self {
        Self {
            agent: build_agent(timeout),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/workspaces/{id}{suffix}`
    pub fn workspace_url(&self, workspace: &WorkspaceId, suffix: &str) -> String {
        format!("{}/workspaces/{}{}", self.base_url, workspace, suffix)
    }

    /// GET an absolute URL with bearer auth.
    pub fn get(&self, url: &str) -> Result<ApiResponse, ApiError> {
        tracing::debug!(%url, "GET");
        let result = self
            .agent
            .get(url)
            .set("Authorization", &self.token.bearer())
            .call();
        read_response(url, result)
    }

    /// POST a JSON body to an absolute URL with bearer auth.
    pub fn post_json<T: Serialize>(&self, url: &str, body: &T) -> Result<ApiResponse, ApiError> {
        tracing::debug!(%url, "POST");
        let result = self
            .agent
            .post(url)
            .set("Authorization", &self.token.bearer())
            .send_json(body);
        read_response(url, result)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
