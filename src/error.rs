//! Error types for merge-pin

use thiserror::Error;

/// Errors produced by a refresh cycle or by startup
#[derive(Debug, Error)]
pub enum Error {
    /// GitHub API failure (unreachable, auth, rate limit, bad response)
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Telegram Bot API failure
    #[error("Telegram API error: {0}")]
    Telegram(String),

    /// `update` or `reorder` ran before the plan was ever posted
    #[error("Nothing to update yet: the merge plan has not been posted.")]
    NothingToUpdate,

    /// Malformed chat command arguments
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// Invalid or incomplete configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether this error should be reported back to the chat user who
    /// triggered the cycle. Fetch and transport failures stay in the logs.
    pub const fn is_user_facing(&self) -> bool {
        matches!(self, Self::NothingToUpdate | Self::InvalidCommand(_))
    }
}

impl From<octocrab::Error> for Error {
    fn from(e: octocrab::Error) -> Self {
        Self::GitHubApi(e.to_string())
    }
}

/// Result alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;
