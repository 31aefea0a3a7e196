//! Semantic statuses and their display icons
//!
//! Both tables are exhaustive matches, so every status has an icon.

use crate::types::{PrState, PullRequestRecord};
use serde::{Deserialize, Serialize};

/// Normalized combined check state of a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommitStatus {
    /// All checks passed
    Success,
    /// A check failed or errored
    Failed,
    /// Checks still running, or none reported yet
    Pending,
    /// A state the platform reported that we do not know about
    Other(String),
}

impl CommitStatus {
    /// Normalize a raw combined state: `error` and `failure` both become
    /// [`CommitStatus::Failed`], everything else keeps its meaning.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "error" | "failure" => Self::Failed,
            "success" => Self::Success,
            "pending" => Self::Pending,
            other => Self::Other(other.to_string()),
        }
    }

    /// Semantic name. Equal to the raw input for anything but failures.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Pending => "pending",
            Self::Other(raw) => raw,
        }
    }

    /// Display glyph
    pub const fn icon(&self) -> &'static str {
        match self {
            Self::Success => "\u{1F7E2}",
            Self::Failed => "\u{1F534}",
            Self::Pending => "\u{1F7E0}",
            Self::Other(_) => "\u{26AA}",
        }
    }
}

impl std::fmt::Display for CommitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a pull request stands in the merge queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeStatus {
    /// Waiting to be merged
    Queued,
    /// Merged
    Merged,
    /// Cannot be merged right now (conflicts or unknown mergeability)
    Blocked,
    /// Closed without merging
    Cancelled,
}

impl MergeStatus {
    /// Derive the merge status of a record.
    ///
    /// Closed states win over mergeability.
    pub const fn of(record: &PullRequestRecord) -> Self {
        match (record.state, record.merged, record.mergeable) {
            (PrState::Closed, false, _) => Self::Cancelled,
            (PrState::Closed, true, _) => Self::Merged,
            (PrState::Open, _, Some(true)) => Self::Queued,
            (PrState::Open, _, _) => Self::Blocked,
        }
    }

    /// Display glyph
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Queued => "\u{23F3}",
            Self::Merged => "\u{2705}",
            Self::Blocked => "\u{1F504}",
            Self::Cancelled => "\u{23F9}",
        }
    }
}

impl std::fmt::Display for MergeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::Merged => write!(f, "merged"),
            Self::Blocked => write!(f, "blocked"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}
