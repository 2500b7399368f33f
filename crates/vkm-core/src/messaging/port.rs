use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    messaging::types::{AudioUpload, ChatAction, InlineKeyboard, View},
    Result,
};

/// Outbound chat port.
///
/// The router only talks to the messenger through this trait, so tests can
/// record calls and the Telegram adapter can be swapped or decorated.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_view(&self, chat_id: ChatId, view: &View) -> Result<MessageRef>;
    async fn edit_view(&self, msg: MessageRef, view: &View) -> Result<()>;

    async fn send_chat_action(&self, chat_id: ChatId, action: ChatAction) -> Result<()>;

    async fn send_audio(
        &self,
        chat_id: ChatId,
        audio: &AudioUpload,
        keyboard: &InlineKeyboard,
    ) -> Result<MessageRef>;

    async fn answer_callback_query(&self, callback_id: &str, text: Option<&str>) -> Result<()>;
}
