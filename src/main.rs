mod api;
mod config;
mod error;
mod logger;
mod poller;
mod status;
mod telegram;

use std::time::Duration;

use anyhow::{Context, Result};

use crate::api::StatusClient;
use crate::config::Config;
use crate::poller::Poller;
use crate::telegram::TelegramBot;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const STARTUP_MESSAGE: &str = "этот бот работает";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logger::init_logging();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "Cannot start without required configuration");
            std::process::exit(1);
        }
    };

    tracing::info!("Starting homework status watcher");

    let http = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;

    let client = StatusClient::new(http.clone(), &config.practicum_token);
    let bot = TelegramBot::new(http, &config.telegram_token, &config.telegram_chat_id);

    bot.send_message(STARTUP_MESSAGE).await;

    let cursor = chrono::Utc::now().timestamp();
    Poller::new(client, bot).run(cursor).await;

    Ok(())
}
