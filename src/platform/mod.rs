//! Source-control platform access
//!
//! The plan engine only needs a read-only view of pull requests and commit
//! states, expressed by [`PullRequestSource`].

mod github;

pub use github::GitHubService;

use crate::error::Result;
use crate::types::{RawPullRequest, RepositoryRef};
use async_trait::async_trait;

/// Read-only pull request source
#[async_trait]
pub trait PullRequestSource: Send + Sync {
    /// Resolve a configured target (`owner/name` or bare `name`) to the
    /// repository whose pull requests should be listed.
    ///
    /// Forks resolve to their parent.
    async fn resolve_repository(&self, target: &str) -> Result<RepositoryRef>;

    /// List the most recent pull requests in any state, newest first
    async fn list_pull_requests(&self, repo: &RepositoryRef) -> Result<Vec<RawPullRequest>>;

    /// Raw combined check state of a commit (`success`, `pending`, `failure`, ...)
    async fn combined_status(&self, repo: &RepositoryRef, sha: &str) -> Result<String>;

    /// Mergeability of a single pull request, as computed by the platform
    async fn pull_request_mergeable(&self, repo: &RepositoryRef, number: u64)
    -> Result<Option<bool>>;
}
