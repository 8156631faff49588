//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, error};

use super::dispatcher::{dispatch, InboundEvent};
use super::message_handler::deliver_reply;
use super::AppState;

/// Handle callback queries from inline keyboards
pub async fn callback_handler(bot: Bot, q: CallbackQuery, state: Arc<AppState>) -> Result<()> {
    debug!(user_id = %q.from.id, "Received callback query from user");

    if let (Some(data), Some(msg)) = (q.data.as_deref(), q.message.as_ref()) {
        let event = InboundEvent::CallbackAction {
            chat_id: msg.chat().id.0,
            message_id: msg.id().0,
            action: data.to_string(),
        };

        let handle = state.sessions.session(msg.chat().id.0).await;
        let mut session = handle.lock().await;
        let result = dispatch(event, &mut session, state.gateway.as_ref()).await;
        drop(session);

        if let Some(reply) = result.reply {
            deliver_reply(&bot, reply).await;
        }
    }

    // Answer the callback query to remove the loading state
    if let Err(e) = bot.answer_callback_query(q.id).await {
        error!(error = %e, "Failed to answer callback query");
    }

    Ok(())
}
