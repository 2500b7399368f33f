use std::sync::Arc;

use teloxide::{prelude::*, types::BotCommand};
use tracing::{info, warn};

use vkm_core::{
    domain::{ChatId, UserId},
    messaging::{port::MessagingPort, types::View},
    session::SessionKey,
    views,
};

use crate::router::AppState;

fn parse_command(text: &str) -> (String, String) {
    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

/// Command menu registered with Telegram at startup.
pub fn bot_commands() -> Vec<BotCommand> {
    vec![
        BotCommand::new("start", "Start working with the bot"),
        BotCommand::new("menu", "Main menu"),
        BotCommand::new("token", "Set your VK token"),
        BotCommand::new("help", "Show help"),
    ]
}

async fn send(state: &AppState, chat_id: ChatId, view: &View) {
    if let Err(e) = state.router.messenger().send_view(chat_id, view).await {
        warn!(chat_id = chat_id.0, "failed to send command reply: {e}");
    }
}

pub async fn handle_command(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let chat_id = ChatId(msg.chat.id.0);
    let user_id = UserId(user.id.0 as i64);
    let (cmd, _arg) = parse_command(text);
    info!(chat_id = chat_id.0, user_id = user_id.0, %cmd, "command");

    match cmd.as_str() {
        "start" => send(&state, chat_id, &views::welcome()).await,
        "help" => send(&state, chat_id, &views::help()).await,
        "token" => {
            state
                .router
                .prompt_token(SessionKey::new(chat_id, user_id))
                .await
        }
        "menu" => state.router.open_menu(chat_id).await,
        _ => send(&state, chat_id, &views::unknown_bot_command()).await,
    }

    Ok(())
}
