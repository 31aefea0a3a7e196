//! Gather phase - fetch everything the plan needs
//!
//! Check states and mergeability are only fetched for pull requests that can
//! end up in the plan. Any platform error aborts the whole gather.

use crate::error::Result;
use crate::plan::build::{RepositoryPulls, is_queued};
use crate::platform::PullRequestSource;
use crate::types::{PrState, RepositoryRef};
use chrono::{FixedOffset, NaiveDate};
use tracing::debug;

/// Fetch pull requests for every target repository (EFFECTFUL)
///
/// Targets resolving to the same repository (e.g. two forks of one parent)
/// are listed once, at the position of their first occurrence.
pub async fn gather_pull_requests(
    source: &dyn PullRequestSource,
    targets: &[String],
    today: NaiveDate,
    offset: FixedOffset,
) -> Result<Vec<RepositoryPulls>> {
    let mut resolved: Vec<RepositoryRef> = Vec::new();
    for target in targets {
        let repo = source.resolve_repository(target).await?;
        if resolved.contains(&repo) {
            debug!(target = %target, repo = %repo, "skipping duplicate repository");
            continue;
        }
        resolved.push(repo);
    }

    let mut result = Vec::with_capacity(resolved.len());
    for repo in resolved {
        let mut pulls = source.list_pull_requests(&repo).await?;
        let mut candidates = 0usize;

        for pr in pulls.iter_mut().filter(|pr| is_queued(pr, today, offset)) {
            candidates += 1;
            pr.combined_state = Some(source.combined_status(&repo, &pr.head_sha).await?);

            // List responses leave mergeability uncomputed
            if pr.state == PrState::Open && pr.mergeable.is_none() {
                pr.mergeable = source.pull_request_mergeable(&repo, pr.number).await?;
            }
        }

        debug!(repo = %repo, listed = pulls.len(), candidates, "gathered pull requests");
        result.push(RepositoryPulls {
            repository: repo.name,
            pulls,
        });
    }

    Ok(result)
}
