//! Shared setup for CLI commands
//!
//! Builds the platform and chat services from a resolved `Config`.

use merge_pin::chat::TelegramBot;
use merge_pin::config::Config;
use merge_pin::error::Result;
use merge_pin::platform::GitHubService;
use merge_pin::schedule::ReferenceClock;
use std::sync::Arc;

/// Services shared by `run` and `preview`
pub struct CommandContext {
    /// GitHub pull request source
    pub github: GitHubService,
    /// Clock in the reference timezone
    pub clock: ReferenceClock,
}

impl CommandContext {
    /// Create a new command context
    pub fn new(config: &Config) -> Result<Self> {
        let github = GitHubService::new(&config.github_token, config.github_host.as_deref())?;
        Ok(Self {
            github,
            clock: ReferenceClock::new(config.offset),
        })
    }

    /// Create the Telegram bot bound to the configured chat
    pub fn telegram(config: &Config) -> Result<Arc<TelegramBot>> {
        let bot = TelegramBot::new(
            config.bot_token.clone(),
            config.chat_id,
            config.telegram_api_url.clone(),
        )?;
        Ok(Arc::new(bot))
    }
}
