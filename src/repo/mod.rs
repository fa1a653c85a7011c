pub mod prompt;
pub mod resolve;
pub mod store;
pub mod types;

pub use prompt::LinePrompter;
pub use resolve::{resolve, Resolution};
pub use store::RepoStore;
pub use types::RepoId;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Invalid repository format: \"{0}\" (expected owner/repo, e.g. facebook/react)")]
    InvalidIdentifier(String),

    #[error("Failed to read interactive input: {0}")]
    Prompt(#[from] std::io::Error),
}
