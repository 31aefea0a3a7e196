//! Mock chat transport for testing

#![allow(dead_code)]

use async_trait::async_trait;
use merge_pin::chat::ChatTransport;
use merge_pin::error::{Error, Result};
use merge_pin::types::MessageHandle;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

/// Chat the mock posts to
pub const CHAT_ID: i64 = -100_500;

/// Call record for `edit_message`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditCall {
    pub message_id: i64,
    pub text: String,
}

/// Call record for `send_notice`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeCall {
    pub chat_id: i64,
    pub text: String,
}

/// Mock chat transport
///
/// Tracks sent, edited and pinned messages so tests can check that exactly
/// one plan message is pinned.
pub struct MockChatTransport {
    next_message_id: AtomicI64,
    sent: Mutex<Vec<(i64, String)>>,
    edits: Mutex<Vec<EditCall>>,
    pinned: Mutex<Vec<i64>>,
    unpin_calls: Mutex<Vec<i64>>,
    notices: Mutex<Vec<NoticeCall>>,
    // Error injection
    error_on_send: Mutex<Option<String>>,
    error_on_edit: Mutex<Option<String>>,
    error_on_unpin: Mutex<Option<String>>,
}

impl Default for MockChatTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChatTransport {
    /// Create a mock with no messages
    pub fn new() -> Self {
        Self {
            next_message_id: AtomicI64::new(1),
            sent: Mutex::new(Vec::new()),
            edits: Mutex::new(Vec::new()),
            pinned: Mutex::new(Vec::new()),
            unpin_calls: Mutex::new(Vec::new()),
            notices: Mutex::new(Vec::new()),
            error_on_send: Mutex::new(None),
            error_on_edit: Mutex::new(None),
            error_on_unpin: Mutex::new(None),
        }
    }

    // === Error injection methods ===

    /// Make `send_message` return an error
    pub fn fail_send(&self, msg: &str) {
        *self.error_on_send.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `edit_message` return an error
    pub fn fail_edit(&self, msg: &str) {
        *self.error_on_edit.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `unpin_message` return an error
    pub fn fail_unpin(&self, msg: &str) {
        *self.error_on_unpin.lock().unwrap() = Some(msg.to_string());
    }

    // === Call inspection ===

    /// Sent plan messages as `(message_id, text)`
    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Edits in call order
    pub fn edits(&self) -> Vec<EditCall> {
        self.edits.lock().unwrap().clone()
    }

    /// Currently pinned message ids
    pub fn pinned(&self) -> Vec<i64> {
        self.pinned.lock().unwrap().clone()
    }

    /// Unpin attempts, including failed ones
    pub fn unpin_calls(&self) -> Vec<i64> {
        self.unpin_calls.lock().unwrap().clone()
    }

    /// Plain-text notices
    pub fn notices(&self) -> Vec<NoticeCall> {
        self.notices.lock().unwrap().clone()
    }

    /// Text of the most recent sent or edited plan message
    pub fn latest_text(&self) -> Option<String> {
        let last_edit = self.edits.lock().unwrap().last().map(|e| e.text.clone());
        last_edit.or_else(|| self.sent.lock().unwrap().last().map(|(_, t)| t.clone()))
    }
}

#[async_trait]
impl ChatTransport for MockChatTransport {
    async fn send_message(&self, text: &str) -> Result<MessageHandle> {
        if let Some(msg) = self.error_on_send.lock().unwrap().clone() {
            return Err(Error::Telegram(msg));
        }
        let message_id = self.next_message_id.fetch_add(1, Ordering::SeqCst);
        self.sent
            .lock()
            .unwrap()
            .push((message_id, text.to_string()));
        Ok(MessageHandle {
            chat_id: CHAT_ID,
            message_id,
        })
    }

    async fn edit_message(&self, handle: &MessageHandle, text: &str) -> Result<()> {
        if let Some(msg) = self.error_on_edit.lock().unwrap().clone() {
            return Err(Error::Telegram(msg));
        }
        self.edits.lock().unwrap().push(EditCall {
            message_id: handle.message_id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn pin_message(&self, handle: &MessageHandle) -> Result<()> {
        self.pinned.lock().unwrap().push(handle.message_id);
        Ok(())
    }

    async fn unpin_message(&self, handle: &MessageHandle) -> Result<()> {
        self.unpin_calls.lock().unwrap().push(handle.message_id);
        if let Some(msg) = self.error_on_unpin.lock().unwrap().clone() {
            return Err(Error::Telegram(msg));
        }
        self.pinned
            .lock()
            .unwrap()
            .retain(|id| *id != handle.message_id);
        Ok(())
    }

    async fn send_notice(&self, chat_id: i64, text: &str) -> Result<()> {
        self.notices.lock().unwrap().push(NoticeCall {
            chat_id,
            text: text.to_string(),
        });
        Ok(())
    }
}
