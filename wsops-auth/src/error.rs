//! Error types for wsops-auth.

use thiserror::Error;

use wsops_core::ApiError;

#[derive(Debug, Error)]
pub enum AuthError {
    /// The identity endpoint answered without an access token.
    #[error("authentication failed: {error}: {description}")]
    Rejected { error: String, description: String },

    /// Authority host and tenant did not form a valid endpoint URL.
    #[error("invalid identity endpoint {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: oauth2::url::ParseError,
    },

    #[error(transparent)]
    Api(#[from] ApiError),
}
