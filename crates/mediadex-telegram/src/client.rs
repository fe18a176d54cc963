//! Bot API HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info, warn};

use mediadex_core::{
    defaults, ChatApi, Error, MemberStatus, OutboundMessage, Result, SendOptions,
};

/// Default Bot API base URL.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Bot API implementation of [`ChatApi`].
///
/// Only the three operations the core consumes are implemented: send,
/// bulk delete, and member lookup.
pub struct BotClient {
    client: Client,
    base_url: String,
    token: String,
}

/// Bot API response envelope.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to_message_id: Option<i64>,
}

#[derive(Debug, Serialize)]
struct DeleteMessagesRequest<'a> {
    chat_id: i64,
    message_ids: &'a [i64],
}

#[derive(Debug, Serialize)]
struct GetChatMemberRequest {
    chat_id: i64,
    user_id: i64,
}

#[derive(Debug, Deserialize)]
struct ChatMemberResult {
    status: MemberStatus,
}

impl BotClient {
    /// Create a new client against the default Bot API endpoint.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_config(
            DEFAULT_API_URL.to_string(),
            token.into(),
            Duration::from_secs(defaults::CHAT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Create a new client with a custom base URL and request timeout.
    pub fn with_config(base_url: String, token: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        info!(
            subsystem = "chat",
            component = "client",
            base_url,
            "Initializing Bot API client"
        );

        Self {
            client,
            base_url,
            token,
        }
    }

    /// Create from environment variables.
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `TELEGRAM_BOT_TOKEN` | required | Bot credential |
    /// | `TELEGRAM_API_URL` | `https://api.telegram.org` | API base URL |
    /// | `TELEGRAM_TIMEOUT_SECS` | `30` | Per-request timeout |
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| Error::Config("TELEGRAM_BOT_TOKEN is not set".into()))?;
        let base_url =
            std::env::var("TELEGRAM_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let timeout = std::env::var("TELEGRAM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::CHAT_REQUEST_TIMEOUT_SECS);

        Ok(Self::with_config(
            base_url,
            token,
            Duration::from_secs(timeout),
        ))
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    async fn call<B: Serialize, T: DeserializeOwned>(&self, method: &str, body: &B) -> Result<T> {
        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await?;

        let envelope: ApiEnvelope<T> = response.json().await?;
        if !envelope.ok {
            let description = envelope
                .description
                .unwrap_or_else(|| "unknown API error".to_string());
            warn!(
                subsystem = "chat",
                component = "client",
                op = method,
                error = %description,
                "Bot API call rejected"
            );
            return Err(Error::Chat(format!("{method}: {description}")));
        }
        envelope
            .result
            .ok_or_else(|| Error::Chat(format!("{method}: empty result")))
    }
}

#[async_trait]
impl ChatApi for BotClient {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        options: &SendOptions,
    ) -> Result<OutboundMessage> {
        let request = SendMessageRequest {
            chat_id,
            text,
            reply_to_message_id: options.reply_to_message_id,
        };
        let message: OutboundMessage = self.call("sendMessage", &request).await?;
        debug!(
            subsystem = "chat",
            component = "client",
            op = "send_message",
            chat_id,
            message_id = message.message_id,
            "Message sent"
        );
        Ok(message)
    }

    async fn delete_messages(&self, chat_id: i64, message_ids: &[i64]) -> Result<()> {
        let request = DeleteMessagesRequest {
            chat_id,
            message_ids,
        };
        let _deleted: bool = self.call("deleteMessages", &request).await?;
        debug!(
            subsystem = "chat",
            component = "client",
            op = "delete_messages",
            chat_id,
            result_count = message_ids.len(),
            "Messages deleted"
        );
        Ok(())
    }

    async fn get_chat_member(&self, chat_id: i64, user_id: i64) -> Result<MemberStatus> {
        let request = GetChatMemberRequest { chat_id, user_id };
        let member: ChatMemberResult = self.call("getChatMember", &request).await?;
        Ok(member.status)
    }
}
