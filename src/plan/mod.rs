//! Merge plan engine
//!
//! Three phases, matching the rest of the crate:
//! 1. Gather - fetch pull requests and check states (effectful, bounded)
//! 2. Build - filter and annotate into a `MergePlan` (pure, testable)
//! 3. Render - apply the manual order and produce `MarkdownV2` text (pure)

mod build;
mod gather;
mod order;
mod render;

pub use build::{build_plan, is_queued, MergePlan, RepositoryPlan, RepositoryPulls};
pub use gather::gather_pull_requests;
pub use order::ManualOrder;
pub use render::{escape_markdown, render_plan};
