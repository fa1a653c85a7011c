use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::pr::{PrError, PullRequestApi};

/// Environment variables consulted for a token, in order.
pub const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(
        "No GitHub token found. To fix this:\n  \
         1. Create a token at https://github.com/settings/tokens with the `repo` scope\n  \
         2. Export it: export GITHUB_TOKEN=<token> (GH_TOKEN also works)\n  \
         3. Or install the GitHub CLI and run `gh auth login`"
    )]
    MissingToken,

    #[error(
        "GitHub rejected the token: {0}\n  \
         Check that it has not expired and has the `repo` scope, or re-run `gh auth login`"
    )]
    Rejected(String),
}

/// A source of GitHub credentials. Returns `None` when it has nothing to offer.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Short label used in logs (never the token itself).
    fn name(&self) -> &str;

    async fn token(&self) -> Option<String>;
}

/// Reads a token from an environment variable.
pub struct EnvTokenProvider {
    var: String,
}

impl EnvTokenProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

#[async_trait]
impl TokenProvider for EnvTokenProvider {
    fn name(&self) -> &str {
        &self.var
    }

    async fn token(&self) -> Option<String> {
        std::env::var(&self.var).ok()
    }
}

/// Asks the GitHub CLI (`gh auth token`) for its stored token.
pub struct CliTokenProvider {
    program: String,
}

impl CliTokenProvider {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for CliTokenProvider {
    fn name(&self) -> &str {
        &self.program
    }

    async fn token(&self) -> Option<String> {
        let output = match Command::new(&self.program).args(["auth", "token"]).output().await {
            Ok(output) => output,
            Err(e) => {
                debug!(program = %self.program, error = %e, "could not run token helper");
                return None;
            }
        };
        if !output.status.success() {
            debug!(program = %self.program, status = %output.status, "token helper exited unsuccessfully");
            return None;
        }
        String::from_utf8(output.stdout).ok()
    }
}

/// Providers in resolution order: each env var, then the CLI helper.
pub fn default_providers(cli_program: &str) -> Vec<Box<dyn TokenProvider>> {
    let mut providers: Vec<Box<dyn TokenProvider>> = TOKEN_ENV_VARS
        .iter()
        .map(|var| Box::new(EnvTokenProvider::new(*var)) as Box<dyn TokenProvider>)
        .collect();
    providers.push(Box::new(CliTokenProvider::new(cli_program)));
    providers
}

/// Return the first non-blank token. Providers after the winner are never asked.
#[instrument(skip_all, fields(providers = providers.len()))]
pub async fn resolve_token(providers: &[Box<dyn TokenProvider>]) -> Result<String, AuthError> {
    for provider in providers {
        if let Some(token) = provider.token().await {
            let token = token.trim();
            if !token.is_empty() {
                debug!(source = provider.name(), "resolved GitHub token");
                return Ok(token.to_string());
            }
        }
        debug!(source = provider.name(), "no token from source");
    }
    Err(AuthError::MissingToken)
}

/// Look up who the token belongs to.
///
/// A rejected token is fatal. Any other failure is logged and gives `None`,
/// which leaves every repository without results for this run.
#[instrument(skip_all)]
pub async fn authenticated_login(api: &dyn PullRequestApi) -> Result<Option<String>, AuthError> {
    match api.authenticated_user().await {
        Ok(login) => Ok(Some(login)),
        Err(PrError::Unauthorized { message, .. }) => Err(AuthError::Rejected(message)),
        Err(e) => {
            warn!(error = %e, "could not look up the authenticated user, skipping pull request fetch");
            Ok(None)
        }
    }
}
