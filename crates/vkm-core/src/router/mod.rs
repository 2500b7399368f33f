//! Callback routing.
//!
//! Every button press goes through [`CallbackRouter::handle_callback`]: the data
//! is classified into a [`CallbackCommand`], the matching branch runs in its own
//! task, and the result is turned into exactly one callback answer plus at most
//! one edit of the pressed message. Free text goes through
//! [`CallbackRouter::handle_text`] (see `text.rs`).

pub mod command;
mod playback;
mod text;

#[cfg(test)]
mod tests;

use std::{future::Future, sync::Arc};

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::{
    config::BrowseSettings,
    credentials::{AccessToken, CredentialStore},
    domain::{ChatId, MessageRef},
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::{CallbackQuery, View},
    },
    music::{AudioList, AudioSource, SourceTag},
    paginator::{clamp_start, render_page},
    session::{Session, SessionKey, SessionStore},
    views, Result,
};

pub use command::{CallbackCommand, SubList};

/// What to do with the pressed message once a branch finished.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Answer the callback, then replace the message with this view.
    Render(View),
    /// Answer the callback with a short notice; the message stays as is.
    Toast(String),
    /// Answer the callback without any visible change.
    Silent,
    /// The branch already answered and rendered everything itself.
    Done,
}

struct Inner {
    source: Arc<dyn AudioSource>,
    credentials: Arc<CredentialStore>,
    sessions: SessionStore,
    messenger: Arc<dyn MessagingPort>,
    settings: BrowseSettings,
}

/// Cheap to clone; all state is shared.
#[derive(Clone)]
pub struct CallbackRouter {
    inner: Arc<Inner>,
}

impl CallbackRouter {
    pub fn new(
        source: Arc<dyn AudioSource>,
        credentials: Arc<CredentialStore>,
        sessions: SessionStore,
        messenger: Arc<dyn MessagingPort>,
        settings: BrowseSettings,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                credentials,
                sessions,
                messenger,
                settings,
            }),
        }
    }

    pub fn messenger(&self) -> &Arc<dyn MessagingPort> {
        &self.inner.messenger
    }

    /// Handle one button press. Never fails: every error ends up as a toast or
    /// a rendered view, and a panicking branch renders a generic error.
    pub async fn handle_callback(&self, q: CallbackQuery) {
        info!(chat_id = q.chat_id.0, user_id = q.user_id.0, data = %q.data, "callback");

        let this = self.clone();
        let query = q.clone();
        let task = tokio::spawn(async move { this.run(&query).await });

        if let Err(e) = task.await {
            error!(data = %q.data, "callback branch aborted: {e}");
            self.emit(&q, Outcome::Render(views::fault("internal error")))
                .await;
        }
    }

    async fn run(&self, q: &CallbackQuery) {
        let handle = self
            .inner
            .sessions
            .get(SessionKey::new(q.chat_id, q.user_id))
            .await;

        let result = match CallbackCommand::classify(&q.data) {
            Ok(command) => {
                debug!(?command, "classified callback");
                self.dispatch(command, q, &handle).await
            }
            Err(e) => Err(e),
        };

        let outcome = result.unwrap_or_else(|e| self.recover(e));
        self.emit(q, outcome).await;
    }

    async fn dispatch(
        &self,
        command: CallbackCommand,
        q: &CallbackQuery,
        handle: &Arc<Mutex<Session>>,
    ) -> Result<Outcome> {
        match command {
            CallbackCommand::MainMenu => Ok(Outcome::Render(self.main_menu_view().await)),
            CallbackCommand::Noop => Ok(Outcome::Silent),
            CallbackCommand::SetToken => {
                handle.lock().await.awaiting_search_query = false;
                Ok(Outcome::Render(views::token_prompt()))
            }
            CallbackCommand::Info | CallbackCommand::ProgramInfo => {
                Ok(Outcome::Render(views::program_info()))
            }
            CallbackCommand::TokenManagement => Ok(Outcome::Render(views::token_management())),
            CallbackCommand::CheckToken => {
                let token = self.token().await?;
                let view = match self.inner.source.check_credential(&token).await {
                    Ok(identity) => views::token_check(Ok(&identity)),
                    Err(e) => views::token_check(Err(&reason(&e))),
                };
                Ok(Outcome::Render(view))
            }
            CallbackCommand::Browse(tag) => self.browse(tag, handle).await,
            CallbackCommand::Open(sub, id) => self.open(sub, &id, handle).await,
            CallbackCommand::Page(requested) => {
                let session = handle.lock().await;
                let Some(listing) = session.listing() else {
                    return Ok(Outcome::Render(views::list_not_found()));
                };
                let settings = &self.inner.settings;
                let start = clamp_start(requested, listing.tracks.len(), settings.page_size);
                Ok(Outcome::Render(render_page(
                    &listing.tracks,
                    start,
                    settings.page_size,
                    settings.button_label_max_length,
                )))
            }
            CallbackCommand::Play(index) => self.play(q, handle, index).await,
            CallbackCommand::Unknown(data) => {
                info!(%data, "unknown callback");
                Ok(Outcome::Render(views::unknown_command()))
            }
        }
    }

    async fn browse(&self, tag: SourceTag, handle: &Arc<Mutex<Session>>) -> Result<Outcome> {
        let source = &self.inner.source;
        let limit = self.inner.settings.entity_list_limit;

        if tag == SourceTag::Search {
            handle.lock().await.awaiting_search_query = true;
            return Ok(Outcome::Render(views::search_prompt()));
        }

        let token = self.token().await?;
        let view = match tag {
            SourceTag::MyMusic => {
                return self
                    .show_tracks(handle, tag, None, source.list_own(&token))
                    .await
            }
            SourceTag::Recommendations | SourceTag::AlgorithmicMixes => {
                return self
                    .show_tracks(handle, tag, None, source.list_recommendations(&token))
                    .await
            }
            SourceTag::FriendsMusic => views::friends(&source.list_friends(&token).await?, limit),
            SourceTag::GroupsMusic => views::groups(&source.list_groups(&token).await?, limit),
            SourceTag::Playlists => {
                views::playlists(&source.list_playlists(&token).await?, limit)
            }
            SourceTag::Search => views::search_prompt(),
        };
        Ok(Outcome::Render(view))
    }

    async fn open(
        &self,
        sub: SubList,
        id: &str,
        handle: &Arc<Mutex<Session>>,
    ) -> Result<Outcome> {
        let source = &self.inner.source;
        let token = self.token().await?;
        match sub {
            SubList::Friend => {
                self.show_tracks(handle, sub.source(), Some(sub), source.list_friend(&token, id))
                    .await
            }
            SubList::Group => {
                self.show_tracks(handle, sub.source(), Some(sub), source.list_group(&token, id))
                    .await
            }
            SubList::Playlist => {
                self.show_tracks(
                    handle,
                    sub.source(),
                    Some(sub),
                    source.list_playlist(&token, id),
                )
                .await
            }
        }
    }

    /// Fetch a track list and show its first page. The session keeps its
    /// previous list unless the fetch produced a non-empty one.
    async fn show_tracks(
        &self,
        handle: &Arc<Mutex<Session>>,
        tag: SourceTag,
        sub: Option<SubList>,
        fetch: impl Future<Output = Result<AudioList>>,
    ) -> Result<Outcome> {
        let mut session = handle.lock().await;
        let back_to = sub.map_or("main_menu", |s| s.source().menu_command());

        match fetch.await {
            Ok(list) if list.is_empty() => {
                info!(source = %tag, "empty track list");
                Ok(Outcome::Render(views::empty_tracks(tag, sub)))
            }
            Ok(list) => {
                let settings = &self.inner.settings;
                info!(source = %tag, tracks = list.len(), "track list loaded");
                let view = render_page(
                    &list,
                    0,
                    settings.page_size,
                    settings.button_label_max_length,
                );
                session.commit_listing(list, tag);
                Ok(Outcome::Render(view))
            }
            Err(Error::Remote(msg)) => {
                warn!(source = %tag, "listing failed: {msg}");
                Ok(Outcome::Render(views::failure(&msg, back_to)))
            }
            Err(e) => Err(e),
        }
    }

    /// Main menu for the stored token, or the credential prompt when there is
    /// no token or it no longer validates.
    pub async fn main_menu_view(&self) -> View {
        let Some(token) = self.inner.credentials.current().await else {
            return views::credential_prompt(views::NO_TOKEN);
        };
        match self.inner.source.check_credential(&token).await {
            Ok(identity) => views::main_menu(&identity),
            Err(e) => {
                warn!("stored token rejected: {e}");
                views::credential_prompt(&reason(&e))
            }
        }
    }

    /// Send the main menu as a new message (the `/menu` command).
    pub async fn open_menu(&self, chat_id: ChatId) {
        let view = self.main_menu_view().await;
        self.reply(chat_id, &view).await;
    }

    /// Send the token prompt as a new message (the `/token` command). The next
    /// free text from this user is taken as a token.
    pub async fn prompt_token(&self, key: SessionKey) {
        self.inner
            .sessions
            .get(key)
            .await
            .lock()
            .await
            .awaiting_search_query = false;
        self.reply(key.chat_id, &views::token_prompt()).await;
    }

    async fn token(&self) -> Result<AccessToken> {
        self.inner
            .credentials
            .current()
            .await
            .ok_or_else(|| Error::Credential(views::NO_TOKEN.to_string()))
    }

    fn recover(&self, e: Error) -> Outcome {
        match e {
            Error::MalformedCommand(msg) => {
                warn!("malformed callback: {msg}");
                Outcome::Toast("❌ Invalid command".to_string())
            }
            Error::NotFound => Outcome::Toast("❌ Track not found".to_string()),
            Error::Unplayable => Outcome::Toast("❌ Track is not available".to_string()),
            Error::Credential(msg) => {
                info!("credential required: {msg}");
                Outcome::Render(views::credential_prompt(&msg))
            }
            Error::Remote(msg) => {
                warn!("remote call failed: {msg}");
                Outcome::Render(views::failure(&msg, "main_menu"))
            }
            Error::Resource(msg) => {
                error!("resource failure: {msg}");
                Outcome::Render(views::fault("could not prepare the file"))
            }
            other => {
                error!("callback failed: {other}");
                Outcome::Render(views::fault("internal error"))
            }
        }
    }

    async fn emit(&self, q: &CallbackQuery, outcome: Outcome) {
        match outcome {
            Outcome::Render(view) => {
                self.answer(q, None).await;
                self.show(q.chat_id, q.message, &view).await;
            }
            Outcome::Toast(text) => self.answer(q, Some(&text)).await,
            Outcome::Silent => self.answer(q, None).await,
            Outcome::Done => {}
        }
    }

    async fn answer(&self, q: &CallbackQuery, text: Option<&str>) {
        if let Err(e) = self
            .inner
            .messenger
            .answer_callback_query(&q.callback_id, text)
            .await
        {
            warn!("answer_callback_query failed: {e}");
        }
    }

    /// Edit `message` when there is one, otherwise send a new message. A
    /// message that cannot be edited (an audio attachment has no text) gets a
    /// fresh message instead. Returns the message now showing `view`.
    async fn show(
        &self,
        chat_id: ChatId,
        message: Option<MessageRef>,
        view: &View,
    ) -> Option<MessageRef> {
        let messenger = &self.inner.messenger;
        if let Some(msg) = message {
            match messenger.edit_view(msg, view).await {
                Ok(()) => return Some(msg),
                Err(e) => warn!(chat_id = chat_id.0, "edit failed, sending instead: {e}"),
            }
        }
        match messenger.send_view(chat_id, view).await {
            Ok(sent) => Some(sent),
            Err(e) => {
                warn!(chat_id = chat_id.0, "failed to render view: {e}");
                None
            }
        }
    }

    async fn reply(&self, chat_id: ChatId, view: &View) {
        if let Err(e) = self.inner.messenger.send_view(chat_id, view).await {
            warn!(chat_id = chat_id.0, "failed to send message: {e}");
        }
    }
}

/// Human-readable reason without the error-kind prefix.
fn reason(e: &Error) -> String {
    match e {
        Error::Credential(msg) | Error::Remote(msg) => msg.clone(),
        other => other.to_string(),
    }
}
