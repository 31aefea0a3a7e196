//! Preview command - print the plan message without posting it

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check};
use anstream::{eprintln, println};
use indicatif::{ProgressBar, ProgressStyle};
use merge_pin::config::Config;
use merge_pin::error::Result;
use merge_pin::plan::{ManualOrder, build_plan, gather_pull_requests, render_plan};
use std::time::Duration;

/// Fetch the plan once and print its `MarkdownV2` text to stdout
pub async fn run_preview(config: &Config) -> Result<()> {
    let ctx = CommandContext::new(config)?;
    let today = ctx.clock.today();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!(
        "Fetching pull requests from {} repositories...",
        config.repositories.len().accent()
    ));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let fetched =
        match gather_pull_requests(&ctx.github, &config.repositories, today, ctx.clock.offset())
            .await
        {
            Ok(fetched) => fetched,
            Err(e) => {
                spinner.finish_and_clear();
                return Err(e);
            }
        };
    let plan = build_plan(&fetched, today, ctx.clock.offset());

    spinner.finish_and_clear();
    eprintln!(
        "{} {} queued pull request(s) in {} repositories",
        check(),
        plan.pull_request_count().accent(),
        plan.repositories.len().accent()
    );
    eprintln!("{}", format!("Plan for {today}:").emphasis());
    eprintln!();

    println!("{}", render_plan(&plan, &ManualOrder::new(), today));
    Ok(())
}
