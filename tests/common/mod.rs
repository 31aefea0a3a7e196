//! Shared fixtures for integration and unit tests

#![allow(dead_code)]

mod mock_chat;
mod mock_platform;

pub use mock_chat::{CHAT_ID, EditCall, MockChatTransport, NoticeCall};
pub use mock_platform::MockPullRequestSource;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use merge_pin::bot::PlanBot;
use merge_pin::schedule::ReferenceClock;
use merge_pin::types::{MERGE_QUEUE_LABEL, PrState, RawPullRequest};
use std::sync::Arc;

/// Owner of every mock repository
pub const OWNER: &str = "acme";

/// Reference timezone used by the fixtures (UTC+3)
pub fn offset() -> FixedOffset {
    FixedOffset::east_opt(3 * 3600).unwrap()
}

/// The fixed "today" of the fixtures
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 6).unwrap()
}

/// A UTC timestamp
pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

/// An open, mergeable, labeled pull request with a passing head commit.
///
/// The id is derived from the number, and the head SHA is `sha-<number>`.
pub fn make_pr(number: u64, title: &str) -> RawPullRequest {
    RawPullRequest {
        id: 10_000 + number,
        number,
        title: title.to_string(),
        state: PrState::Open,
        labels: vec![MERGE_QUEUE_LABEL.to_string()],
        mergeable: Some(true),
        merged: false,
        merged_at: None,
        html_url: format!("https://github.com/{OWNER}/repo/pull/{number}"),
        head_sha: format!("sha-{number}"),
        combined_state: Some("success".to_string()),
    }
}

/// Same as [`make_pr`] without the merge-queue label
pub fn make_unlabeled_pr(number: u64, title: &str) -> RawPullRequest {
    RawPullRequest {
        labels: vec!["needs-review".to_string()],
        ..make_pr(number, title)
    }
}

/// A labeled pull request merged at `merged_at`
pub fn make_merged_pr(number: u64, title: &str, merged_at: DateTime<Utc>) -> RawPullRequest {
    RawPullRequest {
        state: PrState::Closed,
        merged: true,
        merged_at: Some(merged_at),
        ..make_pr(number, title)
    }
}

/// Bot wired to mocks with a pinned clock
pub fn make_bot(
    source: &Arc<MockPullRequestSource>,
    chat: &Arc<MockChatTransport>,
    repositories: &[&str],
) -> PlanBot {
    PlanBot::new(
        source.clone(),
        chat.clone(),
        repositories.iter().map(ToString::to_string).collect(),
        ReferenceClock::pinned(offset(), today()),
    )
}
