use std::fmt;
use std::str::FromStr;

use super::RepoError;

/// A GitHub repository in canonical `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    /// Parse an `owner/name` identifier.
    /// Exactly one `/` with non-empty text on both sides is accepted; nothing is trimmed.
    pub fn parse(raw: &str) -> Result<RepoId, RepoError> {
        match raw.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(RepoId {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(RepoError::InvalidIdentifier(raw.to_string())),
        }
    }
}

impl FromStr for RepoId {
    type Err = RepoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RepoId::parse(s)
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// True when `s` is a well-formed repository identifier.
pub fn is_valid_repo_identifier(s: &str) -> bool {
    RepoId::parse(s).is_ok()
}
