//! Merge plan building - pure functions
//!
//! No I/O happens here. All data is passed in, including "today", so the
//! same input always yields the same plan.

use crate::status::CommitStatus;
use crate::types::{PrState, PullRequestRecord, RawPullRequest};
use chrono::{FixedOffset, NaiveDate};

/// Pull requests fetched for one repository, in fetch order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryPulls {
    /// Repository name as shown in the plan
    pub repository: String,
    /// Pull requests as listed by the platform
    pub pulls: Vec<RawPullRequest>,
}

/// Queued pull requests of one repository
///
/// Records are unique by PR id and keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryPlan {
    /// Repository name
    pub name: String,
    records: Vec<PullRequestRecord>,
}

impl RepositoryPlan {
    /// Create an empty plan for a repository
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: Vec::new(),
        }
    }

    /// Insert a record, replacing any record with the same PR id in place
    pub fn insert(&mut self, record: PullRequestRecord) {
        if let Some(existing) = self.records.iter_mut().find(|r| r.id == record.id) {
            *existing = record;
        } else {
            self.records.push(record);
        }
    }

    /// Look up a record by PR id
    pub fn get(&self, id: u64) -> Option<&PullRequestRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Records in natural (fetch) order
    pub fn records(&self) -> &[PullRequestRecord] {
        &self.records
    }

    /// Number of queued pull requests
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The merge plan: one `RepositoryPlan` per repository, in fetch order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    /// Per-repository plans
    pub repositories: Vec<RepositoryPlan>,
}

impl MergePlan {
    /// Look up a repository's plan by name
    pub fn repository(&self, name: &str) -> Option<&RepositoryPlan> {
        self.repositories.iter().find(|r| r.name == name)
    }

    /// Total number of queued pull requests across repositories
    pub fn pull_request_count(&self) -> usize {
        self.repositories.iter().map(RepositoryPlan::len).sum()
    }
}

/// Whether a pull request belongs in the plan on `today`.
///
/// It must carry the merge-queue label and be either open or merged today,
/// with "today" taken in the `offset` timezone.
pub fn is_queued(pr: &RawPullRequest, today: NaiveDate, offset: FixedOffset) -> bool {
    let merged_today = pr
        .merged_at
        .is_some_and(|at| at.with_timezone(&offset).date_naive() == today);

    (pr.state == PrState::Open || merged_today) && pr.is_labeled()
}

/// Build a merge plan (PURE - no I/O, easily testable)
///
/// Repositories without queued pull requests stay in the plan with an empty
/// `RepositoryPlan`, so every target is always listed.
pub fn build_plan(fetched: &[RepositoryPulls], today: NaiveDate, offset: FixedOffset) -> MergePlan {
    let repositories = fetched
        .iter()
        .map(|repo| {
            let mut plan = RepositoryPlan::new(repo.repository.clone());
            for pr in repo.pulls.iter().filter(|pr| is_queued(pr, today, offset)) {
                plan.insert(PullRequestRecord {
                    id: pr.id,
                    number: pr.number,
                    title: pr.title.clone(),
                    state: pr.state,
                    mergeable: pr.mergeable,
                    merged: pr.merged,
                    url: pr.html_url.clone(),
                    commit_status: CommitStatus::from_raw(
                        pr.combined_state.as_deref().unwrap_or("pending"),
                    ),
                });
            }
            plan
        })
        .collect();

    MergePlan { repositories }
}
