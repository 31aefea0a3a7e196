//! Telegram Bot API transport using reqwest

use crate::chat::ChatTransport;
use crate::error::{Error, Result};
use crate::types::MessageHandle;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Bot API endpoint
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Long-poll duration for `getUpdates`, in seconds
const POLL_TIMEOUT_SECS: u64 = 25;

/// Parse mode for every plan message
const PARSE_MODE: &str = "MarkdownV2";

/// Telegram answers edits with identical text with this error
const NOT_MODIFIED: &str = "message is not modified";

#[derive(Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Deserialize)]
struct Chat {
    id: i64,
}

#[derive(Deserialize)]
struct Message {
    message_id: i64,
    chat: Chat,
    text: Option<String>,
}

#[derive(Deserialize)]
struct User {
    username: Option<String>,
}

#[derive(Deserialize)]
struct Update {
    update_id: i64,
    message: Option<Message>,
}

#[derive(Serialize)]
struct LinkPreviewOptions {
    is_disabled: bool,
}

#[derive(Serialize)]
struct SendMessagePayload<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'a str>,
    link_preview_options: LinkPreviewOptions,
}

#[derive(Serialize)]
struct EditMessagePayload<'a> {
    chat_id: i64,
    message_id: i64,
    text: &'a str,
    parse_mode: &'a str,
    link_preview_options: LinkPreviewOptions,
}

#[derive(Serialize)]
struct MessageRefPayload {
    chat_id: i64,
    message_id: i64,
}

#[derive(Serialize)]
struct EmptyPayload {}

#[derive(Serialize)]
struct GetUpdatesPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
    allowed_updates: [&'static str; 1],
}

/// A text message received by the bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Chat the message was sent in
    pub chat_id: i64,
    /// Message text
    pub text: String,
}

/// Telegram bot bound to a single chat
pub struct TelegramBot {
    client: Client,
    api_url: String,
    token: String,
    chat_id: i64,
}

impl TelegramBot {
    /// Create a new bot client
    ///
    /// `api_url` defaults to [`DEFAULT_API_URL`].
    pub fn new(token: String, chat_id: i64, api_url: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Telegram(format!("failed to create HTTP client: {e}")))?;

        let api_url = api_url
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            api_url,
            token,
            chat_id,
        })
    }

    /// The configured chat
    pub const fn chat_id(&self) -> i64 {
        self.chat_id
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }

    async fn call<P, R>(&self, method: &str, payload: &P, timeout: Option<Duration>) -> Result<R>
    where
        P: Serialize + Sync,
        R: DeserializeOwned,
    {
        let mut request = self.client.post(self.method_url(method)).json(payload);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        // Strip the URL from transport errors: it contains the bot token
        let response = request
            .send()
            .await
            .map_err(|e| Error::Telegram(format!("{method} failed: {}", e.without_url())))?;

        let status = response.status();
        let body: ApiResponse<R> = response.json().await.map_err(|e| {
            Error::Telegram(format!(
                "{method} returned unreadable response ({status}): {}",
                e.without_url()
            ))
        })?;

        if !body.ok {
            let description = body
                .description
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(Error::Telegram(format!("{method}: {description}")));
        }

        body.result
            .ok_or_else(|| Error::Telegram(format!("{method}: response has no result")))
    }

    /// The bot's own username, used to tell `/cmd@thisbot` from
    /// `/cmd@otherbot` in group chats
    pub async fn username(&self) -> Result<Option<String>> {
        let me: User = self.call("getMe", &EmptyPayload {}, None).await?;
        Ok(me.username)
    }

    /// Long-poll for new text messages.
    ///
    /// Returns the messages and the offset to pass on the next call.
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<(Vec<InboundMessage>, Option<i64>)> {
        let payload = GetUpdatesPayload {
            offset,
            timeout: POLL_TIMEOUT_SECS,
            allowed_updates: ["message"],
        };
        let updates: Vec<Update> = self
            .call(
                "getUpdates",
                &payload,
                Some(Duration::from_secs(POLL_TIMEOUT_SECS + DEFAULT_TIMEOUT_SECS)),
            )
            .await?;

        let next_offset = updates
            .iter()
            .map(|u| u.update_id + 1)
            .max()
            .or(offset);

        let messages: Vec<InboundMessage> = updates
            .into_iter()
            .filter_map(|u| u.message)
            .filter_map(|m| {
                m.text.map(|text| InboundMessage {
                    chat_id: m.chat.id,
                    text,
                })
            })
            .collect();

        if !messages.is_empty() {
            debug!(count = messages.len(), "received messages");
        }
        Ok((messages, next_offset))
    }
}

#[async_trait]
impl ChatTransport for TelegramBot {
    async fn send_message(&self, text: &str) -> Result<MessageHandle> {
        debug!(chat_id = self.chat_id, len = text.len(), "sending message");
        let payload = SendMessagePayload {
            chat_id: self.chat_id,
            text,
            parse_mode: Some(PARSE_MODE),
            link_preview_options: LinkPreviewOptions { is_disabled: true },
        };
        let message: Message = self.call("sendMessage", &payload, None).await?;

        let handle = MessageHandle {
            chat_id: message.chat.id,
            message_id: message.message_id,
        };
        debug!(message_id = handle.message_id, "sent message");
        Ok(handle)
    }

    async fn edit_message(&self, handle: &MessageHandle, text: &str) -> Result<()> {
        debug!(message_id = handle.message_id, "editing message");
        let payload = EditMessagePayload {
            chat_id: handle.chat_id,
            message_id: handle.message_id,
            text,
            parse_mode: PARSE_MODE,
            link_preview_options: LinkPreviewOptions { is_disabled: true },
        };
        match self
            .call::<_, serde_json::Value>("editMessageText", &payload, None)
            .await
        {
            Ok(_) => Ok(()),
            Err(Error::Telegram(msg)) if msg.contains(NOT_MODIFIED) => {
                debug!(message_id = handle.message_id, "message text unchanged");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn pin_message(&self, handle: &MessageHandle) -> Result<()> {
        debug!(message_id = handle.message_id, "pinning message");
        let payload = MessageRefPayload {
            chat_id: handle.chat_id,
            message_id: handle.message_id,
        };
        let _: bool = self.call("pinChatMessage", &payload, None).await?;
        Ok(())
    }

    async fn unpin_message(&self, handle: &MessageHandle) -> Result<()> {
        debug!(message_id = handle.message_id, "unpinning message");
        let payload = MessageRefPayload {
            chat_id: handle.chat_id,
            message_id: handle.message_id,
        };
        let _: bool = self.call("unpinChatMessage", &payload, None).await?;
        Ok(())
    }

    async fn send_notice(&self, chat_id: i64, text: &str) -> Result<()> {
        let payload = SendMessagePayload {
            chat_id,
            text,
            parse_mode: None,
            link_preview_options: LinkPreviewOptions { is_disabled: true },
        };
        let _: Message = self.call("sendMessage", &payload, None).await?;
        Ok(())
    }
}
