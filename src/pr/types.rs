use serde::Deserialize;

/// One of the user's open pull requests with its change counts.
/// Built from the list response plus the per-PR detail response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// PR number (e.g., 42)
    pub number: u64,
    /// PR title, as GitHub returns it
    pub title: String,
    /// Browser URL of the PR
    pub url: String,
    /// Total lines added
    pub additions: u64,
    /// Total lines deleted
    pub deletions: u64,
}

/// Open PRs for a single repository, in GitHub's listing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoResult {
    /// Repository identifier, normally `owner/name`
    pub repository: String,
    pub pull_requests: Vec<PullRequest>,
}

/// Entry of `GET /repos/{owner}/{repo}/pulls`.
#[derive(Debug, Clone, Deserialize)]
pub struct PullSummary {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    /// Null for PRs opened by deleted accounts.
    pub user: Option<ApiUser>,
}

impl PullSummary {
    pub fn author(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.login.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    pub login: String,
}

/// The subset of `GET /repos/{owner}/{repo}/pulls/{number}` the listing lacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ChangeStats {
    pub additions: u64,
    pub deletions: u64,
}
