use std::sync::Arc;

use teloxide::prelude::*;

use vkm_core::{
    domain::{ChatId, UserId},
    messaging::types::TextMessage,
};

use crate::router::AppState;

pub async fn handle_text(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let Some(text) = msg.text().map(|s| s.to_string()) else {
        return Ok(());
    };

    state
        .router
        .handle_text(TextMessage {
            chat_id: ChatId(msg.chat.id.0),
            user_id: UserId(user.id.0 as i64),
            text,
        })
        .await;
    Ok(())
}
