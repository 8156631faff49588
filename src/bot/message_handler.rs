//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, MessageId};
use tracing::{debug, error};

use super::dispatcher::{dispatch, InboundEvent, OutboundReply, ReplyTarget};
use super::ui_builder::{to_inline_markup, to_reply_markup};
use super::AppState;

/// Handle one incoming message: classify it, run the dispatcher under the
/// conversation's session lock and deliver the reply.
pub async fn message_handler(bot: Bot, msg: Message, state: Arc<AppState>) -> Result<()> {
    let chat_id = msg.chat.id;

    let event = if let Some(contact) = msg.contact() {
        debug!(chat_id = %chat_id, "Received shared contact");
        InboundEvent::ContactShared {
            chat_id: chat_id.0,
            phone_number: contact.phone_number.clone(),
        }
    } else if let Some(text) = msg.text() {
        debug!(chat_id = %chat_id, message_length = text.len(), "Received text message");
        InboundEvent::TextCommand {
            chat_id: chat_id.0,
            text: text.to_string(),
        }
    } else {
        debug!(chat_id = %chat_id, "Ignoring unsupported message kind");
        return Ok(());
    };

    if let Err(e) = bot.send_chat_action(chat_id, ChatAction::Typing).await {
        debug!(chat_id = %chat_id, error = %e, "Failed to send typing action");
    }

    let handle = state.sessions.session(chat_id.0).await;
    let mut session = handle.lock().await;
    let result = dispatch(event, &mut session, state.gateway.as_ref()).await;
    drop(session);

    if let Some(reply) = result.reply {
        deliver_reply(&bot, reply).await;
    }

    Ok(())
}

/// Send or edit a message as the dispatcher decided. Failures are logged
/// and the event is otherwise dropped.
pub async fn deliver_reply(bot: &Bot, reply: OutboundReply) {
    match reply.target {
        ReplyTarget::Send { chat_id } => {
            let request = bot.send_message(ChatId(chat_id), reply.text);
            let request = match to_reply_markup(&reply.keyboard) {
                Some(markup) => request.reply_markup(markup),
                None => request,
            };
            if let Err(e) = request.await {
                error!(chat_id, error = %e, "Failed to send reply");
            }
        }
        ReplyTarget::Edit {
            chat_id,
            message_id,
        } => {
            let request = bot.edit_message_text(ChatId(chat_id), MessageId(message_id), reply.text);
            let request = match to_inline_markup(&reply.keyboard) {
                Some(markup) => request.reply_markup(markup),
                None => request,
            };
            if let Err(e) = request.await {
                error!(chat_id, message_id, error = %e, "Failed to edit message");
            }
        }
    }
}
