use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::types::{ApiUser, ChangeStats, PullSummary};
use super::PrError;
use crate::repo::RepoId;

/// GitHub caps `per_page` at 100; only the first page is read.
pub const PAGE_SIZE: u32 = 100;

const USER_AGENT: &str = "pr-list";

/// The three GitHub REST calls the fetcher relies on.
#[async_trait]
pub trait PullRequestApi: Send + Sync {
    /// Login of the user the token belongs to.
    async fn authenticated_user(&self) -> Result<String, PrError>;

    /// Open PRs of `repo`, first page only.
    async fn list_open_pull_requests(&self, repo: &RepoId) -> Result<Vec<PullSummary>, PrError>;

    /// Additions/deletions of a single PR.
    async fn pull_request_stats(&self, repo: &RepoId, number: u64) -> Result<ChangeStats, PrError>;
}

/// reqwest-backed GitHub REST client holding a bearer token.
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl GitHubClient {
    /// `base_url` is the API root, e.g. `https://api.github.com`.
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self, PrError> {
        let parsed =
            reqwest::Url::parse(base_url).map_err(|_| PrError::InvalidBaseUrl(base_url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(PrError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, PrError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "GET");
        let response = self
            .http
            .get(&url)
            .query(query)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED
            || status == StatusCode::FORBIDDEN
            || status == StatusCode::TOO_MANY_REQUESTS
        {
            let rate_limited = status == StatusCode::TOO_MANY_REQUESTS
                || response
                    .headers()
                    .get("x-ratelimit-remaining")
                    .is_some_and(|remaining| remaining.as_bytes() == b"0");
            let message = error_message(&response.text().await.unwrap_or_default());
            if rate_limited {
                return Err(PrError::RateLimited { message });
            }
            return Err(PrError::Unauthorized {
                status: status.as_u16(),
                message,
            });
        }

        if !status.is_success() {
            return Err(PrError::Status {
                status: status.as_u16(),
                url,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

/// GitHub error bodies look like `{"message": "...", "documentation_url": "..."}`.
#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The human-readable part of an error response, or the trimmed body if it isn't JSON.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.message,
        Err(_) => body.trim().to_string(),
    }
}

#[async_trait]
impl PullRequestApi for GitHubClient {
    async fn authenticated_user(&self) -> Result<String, PrError> {
        let user: ApiUser = self.get_json("/user", &[]).await?;
        Ok(user.login)
    }

    async fn list_open_pull_requests(&self, repo: &RepoId) -> Result<Vec<PullSummary>, PrError> {
        let path = format!("/repos/{}/{}/pulls", repo.owner, repo.name);
        self.get_json(
            &path,
            &[("state", "open".to_string()), ("per_page", PAGE_SIZE.to_string())],
        )
        .await
    }

    async fn pull_request_stats(&self, repo: &RepoId, number: u64) -> Result<ChangeStats, PrError> {
        let path = format!("/repos/{}/{}/pulls/{}", repo.owner, repo.name, number);
        self.get_json(&path, &[]).await
    }
}
