//! Telegram adapter (teloxide).
//!
//! This crate implements the `vkm-core` MessagingPort over the Telegram Bot API
//! and wires incoming updates into the core router.

use async_trait::async_trait;

use teloxide::{
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup, InputFile, ParseMode},
    ApiError, RequestError,
};

use tokio::time::sleep;
use tracing::debug;

pub mod handlers;
pub mod router;

use vkm_core::{
    domain::{ChatId, MessageId, MessageRef},
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::{AudioUpload, ChatAction, InlineKeyboard, TextFormat, View},
    },
    Result,
};

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn tg_msg_id(message_id: MessageId) -> teloxide::types::MessageId {
        teloxide::types::MessageId(message_id.0)
    }

    fn map_err(e: RequestError) -> Error {
        Error::External(format!("telegram error: {e}"))
    }

    /// `None` for an empty keyboard so the request carries no markup at all.
    fn markup(keyboard: &InlineKeyboard) -> Option<InlineKeyboardMarkup> {
        if keyboard.is_empty() {
            return None;
        }
        let rows: Vec<Vec<InlineKeyboardButton>> = keyboard
            .rows
            .iter()
            .filter(|row| !row.is_empty())
            .map(|row| {
                row.iter()
                    .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.callback_data.clone()))
                    .collect()
            })
            .collect();
        Some(InlineKeyboardMarkup::new(rows))
    }

    fn parse_mode(view: &View) -> Option<ParseMode> {
        match view.format {
            TextFormat::Html => Some(ParseMode::Html),
            TextFormat::Plain => None,
        }
    }

    async fn with_retry<T, Fut>(
        &self,
        mut op: impl FnMut() -> Fut,
    ) -> std::result::Result<T, RequestError>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, RequestError>>,
        Fut::IntoFuture: Send,
    {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(RequestError::RetryAfter(d)) if attempts < MAX_RETRIES => {
                    attempts += 1;
                    debug!("telegram asked to retry after {d:?}");
                    sleep(d).await;
                }
                Err(other) => return Err(other),
            }
        }
    }

    fn message_ref(chat_id: ChatId, msg: &Message) -> MessageRef {
        MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        }
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    async fn send_view(&self, chat_id: ChatId, view: &View) -> Result<MessageRef> {
        let markup = Self::markup(&view.keyboard);
        let parse_mode = Self::parse_mode(view);
        let msg = self
            .with_retry(|| {
                let mut req = self
                    .bot
                    .send_message(Self::tg_chat(chat_id), view.text.clone());
                if let Some(mode) = parse_mode {
                    req = req.parse_mode(mode);
                }
                if let Some(markup) = &markup {
                    req = req.reply_markup(markup.clone());
                }
                req
            })
            .await
            .map_err(Self::map_err)?;

        Ok(Self::message_ref(chat_id, &msg))
    }

    async fn edit_view(&self, msg: MessageRef, view: &View) -> Result<()> {
        let markup = Self::markup(&view.keyboard);
        let parse_mode = Self::parse_mode(view);
        let result = self
            .with_retry(|| {
                let mut req = self.bot.edit_message_text(
                    Self::tg_chat(msg.chat_id),
                    Self::tg_msg_id(msg.message_id),
                    view.text.clone(),
                );
                if let Some(mode) = parse_mode {
                    req = req.parse_mode(mode);
                }
                if let Some(markup) = &markup {
                    req = req.reply_markup(markup.clone());
                }
                req
            })
            .await;

        match result {
            // Pressing the same button twice re-renders identical content.
            Ok(_) | Err(RequestError::Api(ApiError::MessageNotModified)) => Ok(()),
            Err(e) => Err(Self::map_err(e)),
        }
    }

    async fn send_chat_action(&self, chat_id: ChatId, action: ChatAction) -> Result<()> {
        let tg_action = match action {
            ChatAction::UploadAudio => teloxide::types::ChatAction::UploadVoice,
        };
        self.with_retry(|| self.bot.send_chat_action(Self::tg_chat(chat_id), tg_action))
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn send_audio(
        &self,
        chat_id: ChatId,
        audio: &AudioUpload,
        keyboard: &InlineKeyboard,
    ) -> Result<MessageRef> {
        let markup = Self::markup(keyboard);
        let msg = self
            .with_retry(|| {
                let mut req = self
                    .bot
                    .send_audio(Self::tg_chat(chat_id), InputFile::file(audio.path.clone()))
                    .title(audio.title.clone())
                    .performer(audio.performer.clone())
                    .caption(audio.caption.clone());
                if let Some(markup) = &markup {
                    req = req.reply_markup(markup.clone());
                }
                req
            })
            .await
            .map_err(Self::map_err)?;

        Ok(Self::message_ref(chat_id, &msg))
    }

    async fn answer_callback_query(&self, callback_id: &str, text: Option<&str>) -> Result<()> {
        self.with_retry(|| {
            let mut req = self.bot.answer_callback_query(callback_id.to_string());
            if let Some(t) = text {
                req = req.text(t.to_string());
            }
            req
        })
        .await
        .map_err(Self::map_err)?;
        Ok(())
    }
}
