use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

/// Minimal Telegram Bot API client: just enough to push text to one chat.
pub struct TelegramBot {
    http: Client,
    token: String,
    chat_id: String,
}

#[derive(Debug, Deserialize)]
struct ApiReply {
    ok: bool,
    description: Option<String>,
}

impl TelegramBot {
    pub fn new(http: Client, token: &str, chat_id: &str) -> Self {
        Self {
            http,
            token: token.to_string(),
            chat_id: chat_id.to_string(),
        }
    }

    /// Send `text` to the configured chat.
    ///
    /// Failures are logged and swallowed: a missed notification must never
    /// stop the poller.
    pub async fn send_message(&self, text: &str) {
        tracing::debug!(text, "Sending Telegram message");
        if let Err(err) = self.try_send(text).await {
            tracing::error!(error = %err, text, "Failed to send Telegram message");
        }
    }

    async fn try_send(&self, text: &str) -> Result<()> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.token);
        let reply: ApiReply = self
            .http
            .post(&url)
            .json(&json!({ "chat_id": self.chat_id, "text": text }))
            .send()
            .await?
            .json()
            .await?;

        if !reply.ok {
            anyhow::bail!(
                "Telegram refused the message: {}",
                reply.description.unwrap_or_else(|| "no description".to_string())
            );
        }
        Ok(())
    }
}
