//! Long-running service: one event loop, one cycle at a time
//!
//! The loop owns the `PlanBot` exclusively. Timers and inbound commands are
//! merged through `tokio::select!`, so cycles never overlap.

use crate::bot::{PlanBot, Trigger};
use crate::chat::{InboundMessage, TelegramBot};
use crate::command::Command;
use crate::schedule::{ReferenceClock, Schedule};
use chrono::{DateTime, FixedOffset};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Pause after a failed `getUpdates` call
const POLL_BACKOFF: Duration = Duration::from_secs(5);

/// Capacity of the inbound command queue
const INBOUND_CAPACITY: usize = 32;

/// Upper bound of the refresh period, also the idle post timer deadline
const ONE_DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Lower bound of the refresh period
const MIN_REFRESH: Duration = Duration::from_secs(1);

/// Forward inbound Telegram messages into `tx` until the receiver is gone
async fn poll_messages(bot: Arc<TelegramBot>, tx: mpsc::Sender<InboundMessage>) {
    let mut offset = None;
    loop {
        match bot.get_updates(offset).await {
            Ok((messages, next_offset)) => {
                offset = next_offset;
                for message in messages {
                    if tx.send(message).await.is_err() {
                        return;
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "polling for commands failed");
                tokio::time::sleep(POLL_BACKOFF).await;
            }
        }
    }
}

/// Next daily post strictly after both `now` and `after`, with the matching
/// timer deadline.
///
/// `after` keeps a timer that fired a little early from picking the same
/// post time again.
fn next_post(
    schedule: &Schedule,
    clock: &ReferenceClock,
    after: Option<DateTime<FixedOffset>>,
) -> Option<(DateTime<FixedOffset>, Instant)> {
    let now = clock.now();
    let from = after.map_or(now, |after| after.max(now));
    let at = schedule.next_post_after(from)?;
    let wait = (at - now).to_std().unwrap_or_default();
    debug!(next_post = %at, "scheduled daily post");
    Some((at, Instant::now() + wait))
}

/// Route an inbound message to the bot
async fn dispatch(
    plan_bot: &mut PlanBot,
    chat_id: i64,
    bot_username: Option<&str>,
    message: InboundMessage,
) {
    if message.chat_id != chat_id {
        debug!(from = message.chat_id, "ignoring message from another chat");
        return;
    }
    match Command::parse_addressed(&message.text, bot_username) {
        Ok(Some(command)) => {
            plan_bot
                .handle(Trigger::Chat {
                    command,
                    chat_id: message.chat_id,
                })
                .await;
        }
        Ok(None) => {}
        Err(e) => plan_bot.reject(message.chat_id, &e).await,
    }
}

/// Process timers and inbound messages until `shutdown` completes.
///
/// The daily post deadline is only moved forward after the post ran, so a
/// deadline that passes during another cycle fires right after it.
pub async fn run_event_loop(
    plan_bot: &mut PlanBot,
    chat_id: i64,
    bot_username: Option<&str>,
    schedule: &Schedule,
    clock: &ReferenceClock,
    mut inbound: mpsc::Receiver<InboundMessage>,
    shutdown: impl Future<Output = ()>,
) {
    let mut scheduled = next_post(schedule, clock, None);
    let post_timer = tokio::time::sleep_until(
        scheduled.map_or_else(|| Instant::now() + ONE_DAY, |(_, deadline)| deadline),
    );
    tokio::pin!(post_timer);
    tokio::pin!(shutdown);

    let period = schedule.refresh_every.clamp(MIN_REFRESH, ONE_DAY);
    let mut refresh = tokio::time::interval_at(Instant::now() + period, period);
    refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            () = &mut post_timer, if scheduled.is_some() => {
                plan_bot.handle(Trigger::Scheduled(Command::Post)).await;
                scheduled = next_post(schedule, clock, scheduled.map(|(at, _)| at));
                if let Some((_, deadline)) = scheduled {
                    post_timer.as_mut().reset(deadline);
                }
            }
            _ = refresh.tick() => {
                plan_bot.handle(Trigger::Scheduled(Command::Update)).await;
            }
            Some(message) = inbound.recv() => {
                dispatch(plan_bot, chat_id, bot_username, message).await;
            }
            () = &mut shutdown => break,
        }
    }
}

/// Run the bot until Ctrl-C
pub async fn run_service(
    mut plan_bot: PlanBot,
    telegram: Arc<TelegramBot>,
    schedule: Schedule,
    clock: ReferenceClock,
) {
    let chat_id = telegram.chat_id();
    let bot_username = match telegram.username().await {
        Ok(username) => username,
        Err(e) => {
            warn!(error = %e, "failed to look up bot username, accepting any @mention");
            None
        }
    };

    let (tx, rx) = mpsc::channel(INBOUND_CAPACITY);
    let poller = tokio::spawn(poll_messages(Arc::clone(&telegram), tx));

    info!(
        chat_id,
        bot = bot_username.as_deref().unwrap_or("?"),
        refresh_secs = schedule.refresh_every.as_secs(),
        "merge plan service started"
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
        }
    };
    run_event_loop(
        &mut plan_bot,
        chat_id,
        bot_username.as_deref(),
        &schedule,
        &clock,
        rx,
        shutdown,
    )
    .await;

    poller.abort();
    info!("merge plan service stopped");
}
