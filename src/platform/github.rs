//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PullRequestSource;
use crate::types::{PrState, RawPullRequest, RepositoryRef};
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::debug;

/// Number of most recent pull requests inspected per repository
const PULL_REQUEST_LIMIT: u8 = 100;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    /// Token for raw HTTP requests (combined status)
    token: String,
    /// HTTP client for raw requests (combined status)
    http_client: Client,
    /// API base URL for raw requests, without trailing slash
    api_base: String,
    /// Login of the token owner, fetched on first use
    login: OnceCell<String>,
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// `host` selects a GitHub Enterprise instance; `None` means github.com.
    pub fn new(token: &str, host: Option<&str>) -> Result<Self> {
        let api_base = host.map_or_else(
            || "https://api.github.com".to_string(),
            |h| format!("https://{h}/api/v3"),
        );
        Self::with_api_base(token, &api_base)
    }

    /// Create a service against an explicit API base URL
    pub fn with_api_base(token: &str, api_base: &str) -> Result<Self> {
        let api_base = api_base.trim_end_matches('/').to_string();

        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(api_base.as_str())
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("merge-pin")
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token: token.to_string(),
            http_client,
            api_base,
            login: OnceCell::new(),
        })
    }

    /// Login of the authenticated user
    async fn login(&self) -> Result<&str> {
        let login = self
            .login
            .get_or_try_init(|| async {
                let user = self.client.current().user().await?;
                debug!(login = %user.login, "authenticated");
                Ok::<_, Error>(user.login)
            })
            .await?;
        Ok(login.as_str())
    }
}

/// Split a configured target into owner and name
fn split_target(target: &str) -> Result<(Option<&str>, &str)> {
    let target = target.trim();
    match target.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((Some(owner), name))
        }
        None if !target.is_empty() => Ok((None, target)),
        _ => Err(Error::Config(format!("invalid repository '{target}'"))),
    }
}

/// Helper to convert a repository model into our `RepositoryRef`
fn repo_ref(repo: &octocrab::models::Repository, fallback_owner: &str) -> RepositoryRef {
    RepositoryRef {
        owner: repo
            .owner
            .as_ref()
            .map_or_else(|| fallback_owner.to_string(), |o| o.login.clone()),
        name: repo.name.clone(),
    }
}

/// Helper to convert an octocrab PR to our `RawPullRequest` type
fn pr_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> RawPullRequest {
    let state = match pr.state {
        Some(octocrab::models::IssueState::Open) => PrState::Open,
        // IssueState is non-exhaustive, so use wildcard for Closed and any future variants
        Some(_) | None => PrState::Closed,
    };

    RawPullRequest {
        id: pr.id.0,
        number: pr.number,
        title: pr.title.clone().unwrap_or_default(),
        state,
        labels: pr
            .labels
            .as_ref()
            .map(|labels| labels.iter().map(|l| l.name.clone()).collect())
            .unwrap_or_default(),
        mergeable: pr.mergeable,
        merged: pr.merged.unwrap_or(false) || pr.merged_at.is_some(),
        merged_at: pr.merged_at,
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        head_sha: pr.head.sha.clone(),
        combined_state: None,
    }
}

#[async_trait]
impl PullRequestSource for GitHubService {
    async fn resolve_repository(&self, target: &str) -> Result<RepositoryRef> {
        let (owner, name) = split_target(target)?;
        let owner = match owner {
            Some(owner) => owner.to_string(),
            None => self.login().await?.to_string(),
        };

        debug!(owner = %owner, name, "resolving repository");
        let repo = self.client.repos(&owner, name).get().await?;

        let resolved = match repo.parent.as_deref() {
            Some(parent) if repo.fork.unwrap_or(false) => repo_ref(parent, &owner),
            _ => repo_ref(&repo, &owner),
        };
        debug!(target, repo = %resolved, "resolved repository");
        Ok(resolved)
    }

    async fn list_pull_requests(&self, repo: &RepositoryRef) -> Result<Vec<RawPullRequest>> {
        debug!(repo = %repo, "listing pull requests");
        let page = self
            .client
            .pulls(&repo.owner, &repo.name)
            .list()
            .state(octocrab::params::State::All)
            .per_page(PULL_REQUEST_LIMIT)
            .send()
            .await?;

        let result: Vec<RawPullRequest> = page.items.iter().map(pr_from_octocrab).collect();
        debug!(repo = %repo, count = result.len(), "listed pull requests");
        Ok(result)
    }

    async fn combined_status(&self, repo: &RepositoryRef, sha: &str) -> Result<String> {
        #[derive(Deserialize)]
        struct CombinedStatus {
            state: String,
        }

        let url = format!(
            "{}/repos/{}/{}/commits/{}/status",
            self.api_base, repo.owner, repo.name, sha
        );

        let response = self
            .http_client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to fetch commit status: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::GitHubApi(format!(
                "Commit status for {repo}@{sha} returned {}",
                response.status()
            )));
        }

        let status: CombinedStatus = response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse commit status: {e}")))?;

        debug!(repo = %repo, sha, state = %status.state, "commit status");
        Ok(status.state)
    }

    async fn pull_request_mergeable(
        &self,
        repo: &RepositoryRef,
        number: u64,
    ) -> Result<Option<bool>> {
        debug!(repo = %repo, number, "getting PR mergeability");
        let pr = self.client.pulls(&repo.owner, &repo.name).get(number).await?;
        Ok(pr.mergeable)
    }
}
