//! Mock pull request source for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use merge_pin::error::{Error, Result};
use merge_pin::platform::PullRequestSource;
use merge_pin::types::{RawPullRequest, RepositoryRef};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Simple mock pull request source
///
/// Features:
/// - Configurable pull requests, check states and mergeability per repository
/// - Fork resolution (`target -> parent`)
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockPullRequestSource {
    owner: String,
    pulls: Mutex<HashMap<String, Vec<RawPullRequest>>>,
    statuses: Mutex<HashMap<String, String>>,
    mergeable: Mutex<HashMap<(String, u64), Option<bool>>>,
    forks: Mutex<HashMap<String, String>>,
    // Call tracking
    list_calls: Mutex<Vec<String>>,
    status_calls: Mutex<Vec<String>>,
    mergeable_calls: Mutex<Vec<(String, u64)>>,
    // Error injection
    error_on_list: Mutex<Option<String>>,
    // Latency injection
    list_delay: Mutex<Option<Duration>>,
}

impl MockPullRequestSource {
    /// Create an empty mock whose repositories belong to `owner`
    pub fn new(owner: &str) -> Self {
        Self {
            owner: owner.to_string(),
            pulls: Mutex::new(HashMap::new()),
            statuses: Mutex::new(HashMap::new()),
            mergeable: Mutex::new(HashMap::new()),
            forks: Mutex::new(HashMap::new()),
            list_calls: Mutex::new(Vec::new()),
            status_calls: Mutex::new(Vec::new()),
            mergeable_calls: Mutex::new(Vec::new()),
            error_on_list: Mutex::new(None),
            list_delay: Mutex::new(None),
        }
    }

    // === Setup methods ===

    /// Set the pull requests listed for a repository
    pub fn set_pulls(&self, repo: &str, pulls: Vec<RawPullRequest>) {
        self.pulls.lock().unwrap().insert(repo.to_string(), pulls);
    }

    /// Set the combined state reported for a commit
    pub fn set_status(&self, sha: &str, state: &str) {
        self.statuses
            .lock()
            .unwrap()
            .insert(sha.to_string(), state.to_string());
    }

    /// Set the mergeability reported by the single-PR endpoint
    pub fn set_mergeable(&self, repo: &str, number: u64, mergeable: Option<bool>) {
        self.mergeable
            .lock()
            .unwrap()
            .insert((repo.to_string(), number), mergeable);
    }

    /// Make `target` a fork of `parent`
    pub fn set_fork(&self, target: &str, parent: &str) {
        self.forks
            .lock()
            .unwrap()
            .insert(target.to_string(), parent.to_string());
    }

    // === Error injection methods ===

    /// Make `list_pull_requests` return an error
    pub fn fail_list(&self, msg: &str) {
        *self.error_on_list.lock().unwrap() = Some(msg.to_string());
    }

    /// Stop failing `list_pull_requests`
    pub fn clear_failures(&self) {
        *self.error_on_list.lock().unwrap() = None;
    }

    /// Make every `list_pull_requests` call take `delay`
    pub fn delay_list(&self, delay: Duration) {
        *self.list_delay.lock().unwrap() = Some(delay);
    }

    // === Call inspection ===

    /// Repositories listed, in call order
    pub fn list_calls(&self) -> Vec<String> {
        self.list_calls.lock().unwrap().clone()
    }

    /// Commits whose status was read, in call order
    pub fn status_calls(&self) -> Vec<String> {
        self.status_calls.lock().unwrap().clone()
    }

    /// Single-PR mergeability reads, in call order
    pub fn mergeable_calls(&self) -> Vec<(String, u64)> {
        self.mergeable_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PullRequestSource for MockPullRequestSource {
    async fn resolve_repository(&self, target: &str) -> Result<RepositoryRef> {
        let name = target.rsplit('/').next().unwrap_or(target);
        let name = self
            .forks
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string());
        Ok(RepositoryRef {
            owner: self.owner.clone(),
            name,
        })
    }

    async fn list_pull_requests(&self, repo: &RepositoryRef) -> Result<Vec<RawPullRequest>> {
        self.list_calls.lock().unwrap().push(repo.name.clone());
        let delay = *self.list_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(msg) = self.error_on_list.lock().unwrap().clone() {
            return Err(Error::GitHubApi(msg));
        }
        Ok(self
            .pulls
            .lock()
            .unwrap()
            .get(&repo.name)
            .cloned()
            .unwrap_or_default())
    }

    async fn combined_status(&self, _repo: &RepositoryRef, sha: &str) -> Result<String> {
        self.status_calls.lock().unwrap().push(sha.to_string());
        Ok(self
            .statuses
            .lock()
            .unwrap()
            .get(sha)
            .cloned()
            .unwrap_or_else(|| "pending".to_string()))
    }

    async fn pull_request_mergeable(
        &self,
        repo: &RepositoryRef,
        number: u64,
    ) -> Result<Option<bool>> {
        let key = (repo.name.clone(), number);
        self.mergeable_calls.lock().unwrap().push(key.clone());
        Ok(self.mergeable.lock().unwrap().get(&key).copied().flatten())
    }
}
