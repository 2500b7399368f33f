use std::sync::Arc;

use teloxide::prelude::*;

use vkm_core::{
    domain::{ChatId, MessageId, MessageRef, UserId},
    messaging::types,
};

use crate::router::AppState;

/// Core view of a button press. Presses without a visible message (inline
/// mode) are answered in the user's private chat.
fn to_core(q: &CallbackQuery) -> types::CallbackQuery {
    let user_id = UserId(q.from.id.0 as i64);
    let message = q.message.as_ref().map(|m| MessageRef {
        chat_id: ChatId(m.chat.id.0),
        message_id: MessageId(m.id.0),
    });
    let chat_id = message.map_or(ChatId(user_id.0), |m| m.chat_id);

    types::CallbackQuery {
        chat_id,
        user_id,
        callback_id: q.id.clone(),
        data: q.data.clone().unwrap_or_default(),
        message,
    }
}

pub async fn handle_callback(q: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    state.router.handle_callback(to_core(&q)).await;
    Ok(())
}
