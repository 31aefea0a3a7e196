//! Run command - the long-running bot

use crate::cli::context::CommandContext;
use merge_pin::bot::PlanBot;
use merge_pin::config::Config;
use merge_pin::error::Result;
use merge_pin::service::run_service;
use std::sync::Arc;
use tracing::{info, warn};

/// Run the bot until interrupted
pub async fn run_bot(config: Config) -> Result<()> {
    if config.repositories.is_empty() {
        warn!("no repositories configured, the plan will only contain its header");
    }

    let ctx = CommandContext::new(&config)?;
    let telegram = CommandContext::telegram(&config)?;

    info!(repositories = ?config.repositories, "tracking repositories");
    let plan_bot = PlanBot::new(
        Arc::new(ctx.github),
        telegram.clone(),
        config.repositories,
        ctx.clock,
    );

    run_service(plan_bot, telegram, config.schedule, ctx.clock).await;
    Ok(())
}
