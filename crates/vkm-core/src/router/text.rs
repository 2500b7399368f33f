use tracing::{info, warn};

use super::{reason, CallbackRouter};
use crate::{
    credentials::AccessToken,
    errors::Error,
    messaging::types::TextMessage,
    music::SourceTag,
    paginator::render_page,
    session::{Session, SessionKey},
    views,
};

impl CallbackRouter {
    /// Free text is a search query right after the search prompt and a token
    /// candidate otherwise.
    pub async fn handle_text(&self, msg: TextMessage) {
        let handle = self
            .inner
            .sessions
            .get(SessionKey::new(msg.chat_id, msg.user_id))
            .await;
        let mut session = handle.lock().await;

        if session.awaiting_search_query {
            self.search(&mut session, &msg).await;
        } else {
            drop(session);
            self.accept_token(&msg).await;
        }
    }

    async fn search(&self, session: &mut Session, msg: &TextMessage) {
        let query = msg.text.trim();
        if query.is_empty() {
            self.reply(msg.chat_id, &views::search_query_empty()).await;
            return;
        }
        session.awaiting_search_query = false;
        info!(chat_id = msg.chat_id.0, %query, "search");

        let token = match self.token().await {
            Ok(token) => token,
            Err(e) => {
                self.reply(msg.chat_id, &views::credential_prompt(&reason(&e)))
                    .await;
                return;
            }
        };

        let status = match self.inner.messenger.send_view(msg.chat_id, &views::searching()).await {
            Ok(status) => Some(status),
            Err(e) => {
                warn!("failed to send search status: {e}");
                None
            }
        };

        let view = match self.inner.source.search(&token, query).await {
            Ok(list) if list.is_empty() => views::empty_tracks(SourceTag::Search, None),
            Ok(list) => {
                let settings = &self.inner.settings;
                let mut view = render_page(
                    &list,
                    0,
                    settings.page_size,
                    settings.button_label_max_length,
                );
                view.text = format!("{}{}", views::search_header(query), view.text);
                session.commit_listing(list, SourceTag::Search);
                view
            }
            Err(Error::Credential(m)) => views::credential_prompt(&m),
            Err(e) => {
                warn!(%query, "search failed: {e}");
                views::failure(&reason(&e), "main_menu")
            }
        };

        self.show(msg.chat_id, status, &view).await;
    }

    async fn accept_token(&self, msg: &TextMessage) {
        let Some(token) = AccessToken::parse(&msg.text) else {
            self.reply(msg.chat_id, &views::token_empty()).await;
            return;
        };

        let identity = match self.inner.source.check_credential(&token).await {
            Ok(identity) => identity,
            Err(e) => {
                info!(user_id = msg.user_id.0, "token rejected: {e}");
                self.reply(msg.chat_id, &views::token_rejected(&reason(&e)))
                    .await;
                return;
            }
        };

        let view = match self.inner.credentials.replace(token).await {
            Ok(()) => {
                info!(user_id = msg.user_id.0, "token accepted");
                views::token_saved(&identity)
            }
            Err(e) => {
                warn!("failed to persist token: {e}");
                views::token_not_saved(&e.to_string())
            }
        };
        self.reply(msg.chat_id, &view).await;
    }
}
