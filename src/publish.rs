//! Publication state machine for the pinned plan message
//!
//! `post` replaces the pinned message, `update` edits it in place. Exactly
//! one message represents the plan at any time, and routine refreshes never
//! create new ones.

use crate::chat::ChatTransport;
use crate::error::{Error, Result};
use crate::types::MessageHandle;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Owner of the handle to the currently pinned plan message
pub struct Publisher {
    transport: Arc<dyn ChatTransport>,
    handle: Option<MessageHandle>,
}

impl Publisher {
    /// Create an unpublished publisher
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            transport,
            handle: None,
        }
    }

    /// Handle of the pinned plan message, if one was posted
    pub const fn handle(&self) -> Option<&MessageHandle> {
        self.handle.as_ref()
    }

    /// Whether a plan message exists
    pub const fn is_published(&self) -> bool {
        self.handle.is_some()
    }

    /// Post `text` as a new pinned message, replacing the previous one.
    ///
    /// Unpinning the previous message is best-effort. The new handle is
    /// stored as soon as the message was sent, before pinning.
    pub async fn post(&mut self, text: &str) -> Result<MessageHandle> {
        if let Some(previous) = self.handle {
            if let Err(e) = self.transport.unpin_message(&previous).await {
                warn!(message_id = previous.message_id, error = %e, "failed to unpin previous plan");
            }
        }

        let handle = self.transport.send_message(text).await?;
        self.handle = Some(handle);
        self.transport.pin_message(&handle).await?;

        info!(message_id = handle.message_id, "posted merge plan");
        Ok(handle)
    }

    /// Edit the pinned plan message in place.
    ///
    /// Fails with [`Error::NothingToUpdate`] before the first `post`.
    pub async fn update(&self, text: &str) -> Result<()> {
        let handle = self.handle.as_ref().ok_or(Error::NothingToUpdate)?;
        self.transport.edit_message(handle, text).await?;
        debug!(message_id = handle.message_id, "updated merge plan");
        Ok(())
    }
}
