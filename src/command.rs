//! Commands that run a refresh cycle

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

/// `/name` or `/name@botname`
static COMMAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/([A-Za-z_]+)(?:@([A-Za-z0-9_]+))?$").expect("command regex is valid")
});

/// What a cycle should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Post a new pinned plan message, replacing the previous one
    Post,
    /// Edit the existing plan message in place
    Update,
    /// Set the manual order of a repository, then update
    Reorder {
        /// Repository name as shown in the plan
        repository: String,
        /// PR numbers, first to merge first
        numbers: Vec<u64>,
    },
}

impl Command {
    /// Parse a chat message, accepting any `@botname` suffix.
    ///
    /// Returns `Ok(None)` for text that is not one of our commands. Malformed
    /// arguments fail with [`Error::InvalidCommand`].
    pub fn parse(text: &str) -> Result<Option<Self>> {
        Self::parse_addressed(text, None)
    }

    /// Parse a chat message sent to the bot named `bot_username`.
    ///
    /// Commands with an `@botname` suffix naming another bot are not ours
    /// and yield `Ok(None)`. Without a known username every suffix matches.
    pub fn parse_addressed(text: &str, bot_username: Option<&str>) -> Result<Option<Self>> {
        let mut words = text.split_whitespace();
        let Some(first) = words.next() else {
            return Ok(None);
        };
        let Some(caps) = COMMAND_RE.captures(first) else {
            return Ok(None);
        };
        if let (Some(target), Some(own)) = (caps.get(2), bot_username) {
            if !target.as_str().eq_ignore_ascii_case(own) {
                return Ok(None);
            }
        }

        let command = match &caps[1] {
            "rebuild" => Self::Post,
            "update" => Self::Update,
            "reorder" => {
                let repository = words.next().ok_or_else(|| {
                    Error::InvalidCommand(
                        "usage: /reorder <repository> <pr number>...".to_string(),
                    )
                })?;
                let numbers = words
                    .map(|w| {
                        w.trim_start_matches('#').parse::<u64>().map_err(|_| {
                            Error::InvalidCommand(format!("'{w}' is not a pull request number"))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Self::Reorder {
                    repository: repository.to_string(),
                    numbers,
                }
            }
            _ => return Ok(None),
        };
        Ok(Some(command))
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Post => write!(f, "post"),
            Self::Update => write!(f, "update"),
            Self::Reorder {
                repository,
                numbers,
            } => {
                write!(f, "reorder {repository}")?;
                for n in numbers {
                    write!(f, " {n}")?;
                }
                Ok(())
            }
        }
    }
}
