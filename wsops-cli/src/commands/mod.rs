pub mod commit;
pub mod config;
pub mod status;
pub mod update;

use anyhow::{Context, Result};
use clap::Args;

use wsops_auth::{acquire_token, Credentials};
use wsops_core::{ApiClient, Settings};

/// Identity flags shared by every subcommand.
#[derive(Args, Debug)]
pub struct CredentialArgs {
    /// Directory (tenant) ID.
    #[arg(long, env = "WSOPS_TENANT_ID")]
    pub tenant_id: String,

    /// Application (client) ID.
    #[arg(long, env = "WSOPS_CLIENT_ID")]
    pub client_id: String,

    /// Client secret; omit for a public client registration.
    #[arg(long, env = "WSOPS_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// User principal name.
    #[arg(long, env = "WSOPS_USER_NAME")]
    pub user_name: String,

    #[arg(long, env = "WSOPS_PASSWORD", hide_env_values = true)]
    pub password: String,
}

impl CredentialArgs {
    fn credentials(&self) -> Credentials {
        Credentials {
            tenant_id: self.tenant_id.clone(),
            client_id: self.client_id.clone(),
            user_name: self.user_name.clone(),
            password: self.password.clone(),
            client_secret: self.client_secret.clone(),
        }
    }

    /// Acquire a token and build an authenticated client.
    pub fn connect(&self, settings: &Settings) -> Result<ApiClient> {
        let token = acquire_token(settings, &self.credentials())
            .with_context(|| format!("could not sign in as '{}'", self.user_name))?;
        Ok(ApiClient::new(settings, token))
    }
}
