//! Chat transport
//!
//! The publisher only needs to send, edit, pin and unpin messages in one
//! configured chat, plus send plain notices back to whoever issued a command.

mod telegram;

pub use telegram::{InboundMessage, TelegramBot};

use crate::error::Result;
use crate::types::MessageHandle;
use async_trait::async_trait;

/// Chat transport trait
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send `MarkdownV2` text to the configured chat
    async fn send_message(&self, text: &str) -> Result<MessageHandle>;

    /// Replace the text of an existing message (`MarkdownV2`)
    async fn edit_message(&self, handle: &MessageHandle, text: &str) -> Result<()>;

    /// Pin a message
    async fn pin_message(&self, handle: &MessageHandle) -> Result<()>;

    /// Unpin a message
    async fn unpin_message(&self, handle: &MessageHandle) -> Result<()>;

    /// Send a plain-text notice to `chat_id`
    async fn send_notice(&self, chat_id: i64, text: &str) -> Result<()>;
}
