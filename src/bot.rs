//! Cycle runner
//!
//! `PlanBot` owns all mutable state (the pinned message handle and the
//! manual order) and runs one cycle per trigger. Callers serialize triggers;
//! see [`crate::service`].

use crate::chat::ChatTransport;
use crate::command::Command;
use crate::error::{Error, Result};
use crate::plan::{ManualOrder, MergePlan, build_plan, gather_pull_requests, render_plan};
use crate::platform::PullRequestSource;
use crate::publish::Publisher;
use crate::schedule::ReferenceClock;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// What started a cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// The scheduler
    Scheduled(Command),
    /// A chat user, who gets user-facing errors as replies
    Chat {
        /// Parsed command
        command: Command,
        /// Chat the command came from
        chat_id: i64,
    },
}

impl Trigger {
    /// The command to run
    pub const fn command(&self) -> &Command {
        match self {
            Self::Scheduled(command) | Self::Chat { command, .. } => command,
        }
    }
}

/// Merge plan bot
pub struct PlanBot {
    source: Arc<dyn PullRequestSource>,
    transport: Arc<dyn ChatTransport>,
    publisher: Publisher,
    order: ManualOrder,
    repositories: Vec<String>,
    clock: ReferenceClock,
}

impl PlanBot {
    /// Create a bot with nothing published and no manual order
    pub fn new(
        source: Arc<dyn PullRequestSource>,
        transport: Arc<dyn ChatTransport>,
        repositories: Vec<String>,
        clock: ReferenceClock,
    ) -> Self {
        Self {
            source,
            publisher: Publisher::new(Arc::clone(&transport)),
            transport,
            order: ManualOrder::new(),
            repositories,
            clock,
        }
    }

    /// The publication state
    pub const fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    /// The manual order currently in effect
    pub const fn order(&self) -> &ManualOrder {
        &self.order
    }

    /// Fetch and build a fresh plan
    pub async fn fetch_plan(&self) -> Result<MergePlan> {
        let today = self.clock.today();
        let fetched = gather_pull_requests(
            self.source.as_ref(),
            &self.repositories,
            today,
            self.clock.offset(),
        )
        .await?;
        let plan = build_plan(&fetched, today, self.clock.offset());
        debug!(
            repositories = plan.repositories.len(),
            pull_requests = plan.pull_request_count(),
            "built merge plan"
        );
        Ok(plan)
    }

    /// Fetch, build and render the plan with `order`
    pub async fn render_with(&self, order: &ManualOrder) -> Result<String> {
        let plan = self.fetch_plan().await?;
        Ok(render_plan(&plan, order, self.clock.today()))
    }

    /// Run one cycle.
    ///
    /// State only changes after the remote calls it depends on succeeded.
    pub async fn execute(&mut self, command: &Command) -> Result<()> {
        match command {
            Command::Post => {
                let text = self.render_with(&self.order).await?;
                self.publisher.post(&text).await?;
            }
            Command::Update => {
                if !self.publisher.is_published() {
                    return Err(Error::NothingToUpdate);
                }
                let text = self.render_with(&self.order).await?;
                self.publisher.update(&text).await?;
            }
            Command::Reorder {
                repository,
                numbers,
            } => {
                if !self.publisher.is_published() {
                    return Err(Error::NothingToUpdate);
                }
                let mut next = self.order.clone();
                next.set(repository.clone(), numbers.clone());

                let text = self.render_with(&next).await?;
                self.publisher.update(&text).await?;
                self.order = next;
                info!(repository = %repository, ?numbers, "manual order set");
            }
        }
        Ok(())
    }

    /// Run a triggered cycle, containing every failure.
    ///
    /// User-facing errors are replied to the chat that issued the command;
    /// everything else is only logged.
    pub async fn handle(&mut self, trigger: Trigger) {
        let command = trigger.command();
        debug!(%command, "cycle started");

        match self.execute(command).await {
            Ok(()) => info!(%command, "cycle finished"),
            Err(e) => match &trigger {
                Trigger::Chat { chat_id, .. } if e.is_user_facing() => {
                    warn!(%command, error = %e, "command rejected");
                    if let Err(reply_err) = self.transport.send_notice(*chat_id, &e.to_string()).await {
                        error!(error = %reply_err, "failed to reply to command");
                    }
                }
                Trigger::Scheduled(_) if matches!(e, Error::NothingToUpdate) => {
                    info!(%command, "plan not posted yet, skipping update");
                }
                _ => error!(%command, error = %e, "cycle failed"),
            },
        }
    }

    /// Report a command that could not be parsed back to its sender
    pub async fn reject(&self, chat_id: i64, e: &Error) {
        warn!(chat_id, error = %e, "malformed command");
        if let Err(reply_err) = self.transport.send_notice(chat_id, &e.to_string()).await {
            error!(error = %reply_err, "failed to reply to command");
        }
    }
}
