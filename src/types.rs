//! Core types for merge-pin

use crate::status::CommitStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Label that puts a pull request into the merge plan
pub const MERGE_QUEUE_LABEL: &str = "to-be-merged";

/// Pull request lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
    /// PR is open
    Open,
    /// PR was closed, merged or not
    Closed,
}

impl std::fmt::Display for PrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// A repository on the source-control platform
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryRef {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name, also the heading used in the rendered plan
    pub name: String,
}

impl std::fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A pull request as listed by the source-control platform
///
/// `combined_state` is the raw combined check state of the head commit.
/// It is only looked up for pull requests that can end up in the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPullRequest {
    /// Platform-wide PR id
    pub id: u64,
    /// PR number within the repository
    pub number: u64,
    /// PR title
    pub title: String,
    /// Lifecycle state
    pub state: PrState,
    /// Names of the labels attached to the PR
    pub labels: Vec<String>,
    /// Whether the PR can be merged; `None` while the platform computes it
    pub mergeable: Option<bool>,
    /// Whether the PR was merged
    pub merged: bool,
    /// When the PR was merged
    pub merged_at: Option<DateTime<Utc>>,
    /// Web URL for the PR
    pub html_url: String,
    /// SHA of the most recent commit on the PR
    pub head_sha: String,
    /// Raw combined check state of the head commit
    pub combined_state: Option<String>,
}

impl RawPullRequest {
    /// Whether the PR carries the merge-queue label
    pub fn is_labeled(&self) -> bool {
        self.labels.iter().any(|l| l == MERGE_QUEUE_LABEL)
    }
}

/// One entry of a repository's merge plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRecord {
    /// Platform-wide PR id
    pub id: u64,
    /// PR number within the repository
    pub number: u64,
    /// PR title
    pub title: String,
    /// Lifecycle state
    pub state: PrState,
    /// Whether the PR can be merged; `None` when unknown
    pub mergeable: Option<bool>,
    /// Whether the PR was merged
    pub merged: bool,
    /// Web URL for the PR
    pub url: String,
    /// Normalized check status of the head commit
    pub commit_status: CommitStatus,
}

/// Handle to a message posted in the chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHandle {
    /// Chat the message lives in
    pub chat_id: i64,
    /// Message id within the chat
    pub message_id: i64,
}
