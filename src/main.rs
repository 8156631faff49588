use anyhow::Result;
use std::env;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bankbot::bot::{self, AppState};
use bankbot::gateway::HttpBankingGateway;
use bankbot::localization;
use bankbot::session::SessionStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    info!("Starting Banking Assistant Bot");

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Get bot token and backend address from environment
    let bot_token = env::var("TELEGRAM_BOT_TOKEN").expect("TELEGRAM_BOT_TOKEN must be set");
    let base_url = env::var("BANKING_API_BASE_URL").expect("BANKING_API_BASE_URL must be set");

    // Load the UI string tables before accepting any update
    localization::init_localization()?;

    let state = Arc::new(AppState {
        sessions: SessionStore::new(),
        gateway: Arc::new(HttpBankingGateway::new(base_url)),
    });

    // Initialize the bot
    let bot = Bot::new(bot_token);

    info!("Bot initialized, starting dispatcher");

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint({
            let state = Arc::clone(&state);
            move |bot: Bot, msg: Message| {
                let state = Arc::clone(&state);
                async move { bot::message_handler(bot, msg, state).await }
            }
        }))
        .branch(Update::filter_callback_query().endpoint({
            let state = Arc::clone(&state);
            move |bot: Bot, q: CallbackQuery| {
                let state = Arc::clone(&state);
                async move { bot::callback_handler(bot, q, state).await }
            }
        }));

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
