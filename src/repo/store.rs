use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use super::types::is_valid_repo_identifier;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to write saved repositories to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize saved repositories: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// On-disk shape of the remembered repository list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRepos {
    #[serde(default)]
    pub repos: Vec<String>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

/// JSON file holding the repositories the user has worked with before.
#[derive(Debug, Clone)]
pub struct RepoStore {
    path: PathBuf,
}

impl RepoStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config_dir>/pr-list/repos.json`, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pr-list").join("repos.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved repositories in their stored order.
    /// A missing, unreadable or corrupt file yields an empty list.
    pub fn load(&self) -> Vec<String> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no saved repositories yet");
                return Vec::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read saved repositories");
                return Vec::new();
            }
        };

        let saved: SavedRepos = match serde_json::from_str(&contents) {
            Ok(saved) => saved,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "saved repositories file is corrupt, ignoring it");
                return Vec::new();
            }
        };

        let mut repos = Vec::new();
        for repo in saved.repos {
            if !is_valid_repo_identifier(&repo) {
                warn!(repo = %repo, "skipping malformed saved repository");
                continue;
            }
            if !repos.contains(&repo) {
                repos.push(repo);
            }
        }
        debug!(count = repos.len(), "loaded saved repositories");
        repos
    }

    /// Overwrite the file with `repos`, stamping the current time.
    pub fn save(&self, repos: &[String]) -> Result<(), StoreError> {
        let saved = SavedRepos {
            repos: repos.to_vec(),
            last_updated: Some(Utc::now()),
        };
        let json = serde_json::to_string_pretty(&saved)?;

        let write_err = |source: std::io::Error| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(&self.path, json).map_err(write_err)?;
        debug!(path = %self.path.display(), count = repos.len(), "saved repositories");
        Ok(())
    }

    /// Union `new` into the stored list and persist it. Returns the merged list.
    pub fn merge_and_save(&self, new: &[String]) -> Result<Vec<String>, StoreError> {
        let merged = merge_unique(&self.load(), new);
        self.save(&merged)?;
        Ok(merged)
    }
}

/// Union of `existing` and `new`, each value once, in first-seen order.
pub fn merge_unique(existing: &[String], new: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(existing.len() + new.len());
    for repo in existing.iter().chain(new) {
        if !merged.contains(repo) {
            merged.push(repo.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_merge_unique_keeps_first_seen_order() {
        let merged = merge_unique(
            &strings(&["a/one", "b/two"]),
            &strings(&["c/three", "a/one", "c/three", "d/four"]),
        );
        assert_eq!(merged, strings(&["a/one", "b/two", "c/three", "d/four"]));
    }

    #[test]
    fn test_merge_unique_each_value_once() {
        let input = strings(&["x/a", "x/b", "x/a", "x/c", "x/b", "x/a"]);
        let merged = merge_unique(&[], &input);
        assert_eq!(merged, strings(&["x/a", "x/b", "x/c"]));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = RepoStore::new(dir.path().join("repos.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repos.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(RepoStore::new(&path).load().is_empty());
    }

    #[test]
    fn test_load_skips_malformed_and_duplicate_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repos.json");
        fs::write(
            &path,
            r#"{"repos": ["a/one", "broken", "a/one", "b/two"], "lastUpdated": "2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(RepoStore::new(&path).load(), strings(&["a/one", "b/two"]));
    }

    #[test]
    fn test_save_creates_parent_dirs_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = RepoStore::new(dir.path().join("nested").join("repos.json"));
        store.save(&strings(&["a/one", "b/two"])).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let saved: SavedRepos = serde_json::from_str(&raw).unwrap();
        assert_eq!(saved.repos, strings(&["a/one", "b/two"]));
        assert!(saved.last_updated.is_some());
        assert!(raw.contains("\"lastUpdated\""));
    }

    #[test]
    fn test_merge_and_save_unions_with_existing() {
        let dir = tempfile::tempdir().unwrap();
        let store = RepoStore::new(dir.path().join("repos.json"));
        store.save(&strings(&["a/one"])).unwrap();

        let merged = store.merge_and_save(&strings(&["b/two", "a/one"])).unwrap();
        assert_eq!(merged, strings(&["a/one", "b/two"]));
        assert_eq!(store.load(), merged);
    }
}
