use thiserror::Error;

use crate::auth::AuthError;
use crate::config::ConfigError;
use crate::pr::PrError;
use crate::repo::RepoError;

/// Errors that end the run. Recoverable failures are logged where they happen
/// and never reach this type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    GitHub(#[from] PrError),

    #[error("No config directory found for the saved repository list; set [store] path in the config file")]
    NoStorePath,
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        1
    }
}
