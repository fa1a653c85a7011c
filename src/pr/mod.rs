pub mod client;
pub mod types;

pub use client::{GitHubClient, PullRequestApi};
pub use types::{PullRequest, RepoResult};

use futures::future::join_all;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::repo::RepoId;
use types::ChangeStats;

#[derive(Debug, Error)]
pub enum PrError {
    #[error("GitHub API request failed: {0}")]
    ApiRequest(#[from] reqwest::Error),

    #[error("GitHub rejected the request ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("GitHub rate limit exceeded: {message}")]
    RateLimited { message: String },

    #[error("GitHub returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Invalid GitHub API URL: {0}")]
    InvalidBaseUrl(String),
}

/// Fetch the open PRs authored by `login` in `repo`.
///
/// Never fails. A malformed identifier or a failed listing gives an empty list;
/// a failed detail fetch keeps the PR with zero additions and deletions.
#[instrument(skip(api, login), fields(repo = %repo))]
pub async fn fetch_repo_pull_requests(
    api: &dyn PullRequestApi,
    repo: &str,
    login: &str,
) -> Vec<PullRequest> {
    let repo_id = match RepoId::parse(repo) {
        Ok(id) => id,
        Err(e) => {
            warn!(error = %e, "skipping malformed repository");
            return Vec::new();
        }
    };

    let listed = match api.list_open_pull_requests(&repo_id).await {
        Ok(listed) => listed,
        Err(e) => {
            warn!(error = %e, "could not list pull requests");
            return Vec::new();
        }
    };
    let total = listed.len();

    let mine: Vec<_> = listed
        .into_iter()
        .filter(|pr| pr.author() == Some(login))
        .collect();
    debug!(open = total, authored = mine.len(), "filtered pull requests by author");

    let details = join_all(
        mine.iter()
            .map(|pr| api.pull_request_stats(&repo_id, pr.number)),
    )
    .await;

    mine.into_iter()
        .zip(details)
        .map(|(summary, detail)| {
            let stats = detail.unwrap_or_else(|e| {
                warn!(pr = summary.number, error = %e, "could not fetch PR details, reporting zero changes");
                ChangeStats::default()
            });
            PullRequest {
                number: summary.number,
                title: summary.title,
                url: summary.html_url,
                additions: stats.additions,
                deletions: stats.deletions,
            }
        })
        .collect()
}

/// Fetch every repository concurrently. Results keep the order of `repos`.
pub async fn fetch_all(api: &dyn PullRequestApi, repos: &[RepoId], login: &str) -> Vec<RepoResult> {
    join_all(repos.iter().map(|repo| async move {
        let repository = repo.to_string();
        let pull_requests = fetch_repo_pull_requests(api, &repository, login).await;
        RepoResult {
            repository,
            pull_requests,
        }
    }))
    .await
}

/// One empty result per repository, for runs where nothing could be fetched.
pub fn empty_results(repos: &[RepoId]) -> Vec<RepoResult> {
    repos
        .iter()
        .map(|repo| RepoResult {
            repository: repo.to_string(),
            pull_requests: Vec::new(),
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use types::{ApiUser, PullSummary};

    /// In-memory GitHub: repo -> listed PRs, (repo, number) -> stats. Missing entries fail.
    #[derive(Default)]
    pub struct FakeApi {
        pub login: String,
        pub listings: HashMap<String, Vec<PullSummary>>,
        pub stats: HashMap<(String, u64), ChangeStats>,
        pub user_calls: AtomicUsize,
    }

    impl FakeApi {
        pub fn new(login: &str) -> Self {
            Self {
                login: login.to_string(),
                ..Default::default()
            }
        }

        pub fn with_pr(mut self, repo: &str, number: u64, title: &str, author: &str, stats: Option<(u64, u64)>) -> Self {
            self.listings.entry(repo.to_string()).or_default().push(PullSummary {
                number,
                title: title.to_string(),
                html_url: format!("https://github.com/{}/pull/{}", repo, number),
                user: Some(ApiUser {
                    login: author.to_string(),
                }),
            });
            if let Some((additions, deletions)) = stats {
                self.stats
                    .insert((repo.to_string(), number), ChangeStats { additions, deletions });
            }
            self
        }

        pub fn with_empty_repo(mut self, repo: &str) -> Self {
            self.listings.entry(repo.to_string()).or_default();
            self
        }
    }

    #[async_trait]
    impl PullRequestApi for FakeApi {
        async fn authenticated_user(&self) -> Result<String, PrError> {
            self.user_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.login.clone())
        }

        async fn list_open_pull_requests(&self, repo: &RepoId) -> Result<Vec<PullSummary>, PrError> {
            self.listings
                .get(&repo.to_string())
                .cloned()
                .ok_or_else(|| PrError::Status {
                    status: 404,
                    url: format!("/repos/{}/pulls", repo),
                })
        }

        async fn pull_request_stats(&self, repo: &RepoId, number: u64) -> Result<ChangeStats, PrError> {
            self.stats
                .get(&(repo.to_string(), number))
                .copied()
                .ok_or_else(|| PrError::Status {
                    status: 500,
                    url: format!("/repos/{}/pulls/{}", repo, number),
                })
        }
    }

    #[tokio::test]
    async fn test_keeps_only_authored_prs_in_listing_order() {
        let api = FakeApi::new("alice")
            .with_pr("org/repo", 123, "Add new feature", "alice", Some((50, 10)))
            .with_pr("org/repo", 124, "Someone else", "bob", Some((1, 1)))
            .with_pr("org/repo", 456, "Fix bug", "alice", Some((5, 2)));

        let prs = fetch_repo_pull_requests(&api, "org/repo", "alice").await;

        assert_eq!(prs.len(), 2);
        assert_eq!(prs[0].number, 123);
        assert_eq!((prs[0].additions, prs[0].deletions), (50, 10));
        assert_eq!(prs[0].url, "https://github.com/org/repo/pull/123");
        assert_eq!(prs[1].number, 456);
        assert_eq!(prs[1].title, "Fix bug");
    }

    #[tokio::test]
    async fn test_author_match_is_exact() {
        let api = FakeApi::new("alice").with_pr("org/repo", 1, "t", "Alice", Some((1, 1)));
        assert!(fetch_repo_pull_requests(&api, "org/repo", "alice").await.is_empty());
    }

    #[tokio::test]
    async fn test_detail_failure_zeroes_only_that_pr() {
        let api = FakeApi::new("alice")
            .with_pr("org/repo", 123, "Add new feature", "alice", Some((50, 10)))
            .with_pr("org/repo", 456, "Fix bug", "alice", None);

        let prs = fetch_repo_pull_requests(&api, "org/repo", "alice").await;

        assert_eq!(prs.len(), 2);
        assert_eq!((prs[0].additions, prs[0].deletions), (50, 10));
        assert_eq!(prs[1].number, 456);
        assert_eq!((prs[1].additions, prs[1].deletions), (0, 0));
    }

    #[tokio::test]
    async fn test_malformed_identifier_is_empty() {
        let api = FakeApi::new("alice");
        assert!(fetch_repo_pull_requests(&api, "no-slash", "alice").await.is_empty());
    }

    #[tokio::test]
    async fn test_listing_failure_does_not_affect_siblings() {
        let api = FakeApi::new("alice")
            .with_pr("org/good", 7, "Works", "alice", Some((3, 4)));
        let repos = vec![
            RepoId::parse("org/missing").unwrap(),
            RepoId::parse("org/good").unwrap(),
        ];

        let results = fetch_all(&api, &repos, "alice").await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].repository, "org/missing");
        assert!(results[0].pull_requests.is_empty());
        assert_eq!(results[1].repository, "org/good");
        assert_eq!(results[1].pull_requests[0].number, 7);
    }

    #[tokio::test]
    async fn test_fetch_all_does_not_look_up_identity() {
        let api = FakeApi::new("alice").with_empty_repo("a/one").with_empty_repo("b/two");
        let repos = vec![RepoId::parse("a/one").unwrap(), RepoId::parse("b/two").unwrap()];
        fetch_all(&api, &repos, "alice").await;
        assert_eq!(api.user_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_results_keeps_every_repository() {
        let repos = vec![RepoId::parse("a/one").unwrap(), RepoId::parse("b/two").unwrap()];
        let results = empty_results(&repos);
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].repository, "b/two");
        assert!(results.iter().all(|r| r.pull_requests.is_empty()));
    }
}
