//! Token Provider.
//!
//! Resource-owner-password grant against
//! `{authority_host}/{tenant_id}/oauth2/v2.0/token`, driven by `oauth2`'s
//! typed exchange. Client credentials travel in the request body; a
//! confidential client additionally sends its `client_secret`.

use std::cell::Cell;
use std::fmt;
use std::time::Duration;

use oauth2::basic::{BasicClient, BasicErrorResponse};
use oauth2::http::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use oauth2::http::StatusCode;
use oauth2::{
    AuthType, AuthUrl, ClientId, ClientSecret, HttpRequest, HttpResponse, RequestTokenError,
    ResourceOwnerPassword, ResourceOwnerUsername, Scope, TokenResponse, TokenUrl,
};

use wsops_core::client::build_agent;
use wsops_core::{AccessToken, ApiError, Settings};

use crate::error::AuthError;

/// Whether the application registration holds a client secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientKind {
    Confidential,
    Public,
}

#[derive(Clone)]
pub struct Credentials {
    pub tenant_id: String,
    pub client_id: String,
    pub user_name: String,
    pub password: String,
    pub client_secret: Option<String>,
}

impl Credentials {
    pub fn client_kind(&self) -> ClientKind {
        match self.client_secret.as_deref() {
            Some(secret) if !secret.is_empty() => ClientKind::Confidential,
            _ => ClientKind::Public,
        }
    }

    /// Secret sent with the token request; `None` for a public client.
    fn secret(&self) -> Option<ClientSecret> {
        match self.client_kind() {
            ClientKind::Confidential => self.client_secret.clone().map(ClientSecret::new),
            ClientKind::Public => None,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("user_name", &self.user_name)
            .field("password", &"<redacted>")
            .field("client_kind", &self.client_kind())
            .finish()
    }
}

pub struct TokenProvider {
    agent: ureq::Agent,
    authority_host: String,
    scope: String,
}

impl TokenProvider {
    pub fn new(settings: &Settings) -> Self {
        Self::with_authority(
            &settings.authority_host,
            &settings.scope,
            settings.request_timeout(),
        )
    }

    pub fn with_authority(authority_host: &str, scope: &str, timeout: Duration) -> Self {
        Self {
            agent: build_agent(timeout),
            authority_host: authority_host.trim_end_matches('/').to_string(),
            scope: scope.to_string(),
        }
    }

    pub fn token_url(&self, tenant_id: &str) -> String {
        format!("{}/{}/oauth2/v2.0/token", self.authority_host, tenant_id)
    }

    pub fn authorize_url(&self, tenant_id: &str) -> String {
        format!("{}/{}/oauth2/v2.0/authorize", self.authority_host, tenant_id)
    }

    fn client(&self, credentials: &Credentials) -> Result<BasicClient, AuthError> {
        let auth_url = self.authorize_url(&credentials.tenant_id);
        let token_url = self.token_url(&credentials.tenant_id);
        let auth_url = AuthUrl::new(auth_url.clone())
            .map_err(|source| AuthError::InvalidUrl { url: auth_url, source })?;
        let token_url = TokenUrl::new(token_url.clone())
            .map_err(|source| AuthError::InvalidUrl { url: token_url, source })?;

        Ok(BasicClient::new(
            ClientId::new(credentials.client_id.clone()),
            credentials.secret(),
            auth_url,
            Some(token_url),
        )
        .set_auth_type(AuthType::RequestBody))
    }

    /// Acquire a bearer token for the configured scope.
    ///
    /// An error answer from the identity endpoint is [`AuthError::Rejected`];
    /// the caller must abort.
    pub fn acquire(&self, credentials: &Credentials) -> Result<AccessToken, AuthError> {
        tracing::info!(
            user = %credentials.user_name,
            client = ?credentials.client_kind(),
            "generating token for workspace APIs"
        );
        let client = self.client(credentials)?;
        let status = Cell::new(0u16);

        let result = client
            .exchange_password(
                &ResourceOwnerUsername::new(credentials.user_name.clone()),
                &ResourceOwnerPassword::new(credentials.password.clone()),
            )
            .add_scope(Scope::new(self.scope.clone()))
            .request(|request| self.send(request, &status));

        match result {
            Ok(token) => Ok(AccessToken::new(token.access_token().secret().clone())),
            Err(err) => Err(rejection(err, status.get())),
        }
    }

    /// Transport for `oauth2`: the shared agent, with 4xx/5xx handed back as
    /// responses so the identity endpoint's error body gets parsed.
    fn send(&self, request: HttpRequest, status: &Cell<u16>) -> Result<HttpResponse, ApiError> {
        let url = request.url.to_string();
        let mut call = self.agent.request(request.method.as_str(), &url);
        for (name, value) in request.headers.iter() {
            if let Ok(value) = value.to_str() {
                call = call.set(name.as_str(), value);
            }
        }

        let response = match call.send_bytes(&request.body) {
            Ok(response) | Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(transport)) => {
                return Err(ApiError::Transport {
                    url,
                    source: Box::new(transport),
                })
            }
        };
        status.set(response.status());

        let mut headers = HeaderMap::new();
        if let Some(value) = response
            .header("Content-Type")
            .and_then(|v| HeaderValue::from_str(v).ok())
        {
            headers.insert(CONTENT_TYPE, value);
        }
        let status_code = StatusCode::from_u16(response.status()).unwrap_or(StatusCode::BAD_GATEWAY);
        let body = response
            .into_string()
            .map_err(|source| ApiError::Body {
                url: url.clone(),
                source,
            })?;

        Ok(HttpResponse {
            status_code,
            headers,
            body: body.into_bytes(),
        })
    }
}

fn rejection(err: RequestTokenError<ApiError, BasicErrorResponse>, status: u16) -> AuthError {
    let (error, description) = match err {
        RequestTokenError::Request(api) => return AuthError::Api(api),
        RequestTokenError::ServerResponse(response) => (
            response.error().to_string(),
            response
                .error_description()
                .cloned()
                .unwrap_or_else(|| "no description".to_string()),
        ),
        RequestTokenError::Parse(source, _) => (
            format!("http_{status}"),
            format!("no access token in response: {source}"),
        ),
        RequestTokenError::Other(message) => (format!("http_{status}"), message),
    };
    tracing::error!(%error, "token request rejected");
    AuthError::Rejected { error, description }
}

/// Acquire a token using endpoints and timeout from `settings`.
pub fn acquire_token(
    settings: &Settings,
    credentials: &Credentials,
) -> Result<AccessToken, AuthError> {
    TokenProvider::new(settings).acquire(credentials)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
