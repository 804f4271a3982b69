//! # wsops-auth
//!
//! Exchanges tenant, client and user credentials for a workspace-API bearer
//! token using the resource-owner-password-credentials grant.
//!
//! No caching, no refresh, no retry: one token per invocation.

pub mod error;
pub mod token;

pub use error::AuthError;
pub use token::{acquire_token, ClientKind, Credentials, TokenProvider};
