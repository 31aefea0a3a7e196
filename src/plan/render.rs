//! Rendering the merge plan as Telegram `MarkdownV2` text

use crate::plan::build::MergePlan;
use crate::plan::order::ManualOrder;
use crate::status::MergeStatus;
use chrono::NaiveDate;

/// Characters `MarkdownV2` reserves in free text
const RESERVED: &[char] = &[
    '\\', '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Escape free text for `MarkdownV2`: each reserved character gets exactly
/// one backslash in front of it.
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    for c in text.chars() {
        if RESERVED.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape a link target; inside `(...)` only `)` and `\` are special.
fn escape_link_url(url: &str) -> String {
    url.replace('\\', "\\\\").replace(')', "\\)")
}

/// Render the plan (PURE)
///
/// Repositories appear in plan order; within a repository the manual order
/// is applied. Identical inputs always render identically.
pub fn render_plan(plan: &MergePlan, order: &ManualOrder, date: NaiveDate) -> String {
    let mut out = escape_markdown(&format!("Merge plan for {date}.\n"));

    for repo in &plan.repositories {
        out.push_str(&escape_markdown(&format!("\n{}:\n", repo.name)));

        for record in order.apply(repo) {
            let line = format!(
                "{} {} {} ",
                MergeStatus::of(record).icon(),
                record.commit_status.icon(),
                record.title
            );
            out.push_str(&escape_markdown(&line));
            out.push_str(&format!(
                "\\([\\#{}]({})\\)\n",
                record.number,
                escape_link_url(&record.url)
            ));
        }
    }

    out
}
