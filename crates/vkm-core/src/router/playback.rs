use std::{path::Path, sync::Arc};

use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{CallbackRouter, Outcome};
use crate::{
    domain::MessageRef,
    errors::Error,
    messaging::types::{AudioUpload, CallbackQuery, ChatAction},
    music::{SourceTag, Track},
    session::Session,
    views, Result,
};

/// A resolved `play_audio_<index>` selection, detached from the session.
#[derive(Clone, Debug)]
pub(super) struct Selection {
    pub track: Track,
    pub url: String,
    pub back: SourceTag,
}

pub(super) fn select(session: &Session, index: usize) -> Result<Selection> {
    let (track, back) = session.track_at(index).ok_or(Error::NotFound)?;
    let url = track
        .playback_url
        .as_deref()
        .filter(|u| !u.is_empty())
        .ok_or(Error::Unplayable)?;
    Ok(Selection {
        track: track.clone(),
        url: url.to_string(),
        back,
    })
}

impl CallbackRouter {
    /// Download the selected track and send it as audio.
    ///
    /// Resolution failures are returned before anything is answered. Once the
    /// callback is answered every failure is rendered here and the result is
    /// `Outcome::Done`.
    pub(super) async fn play(
        &self,
        q: &CallbackQuery,
        handle: &Arc<Mutex<Session>>,
        index: usize,
    ) -> Result<Outcome> {
        // Only the selection is needed; the download runs without the lock.
        let selection = select(&*handle.lock().await, index)?;
        let name = selection.track.display_name();
        info!(index, track = %name, "playing track");

        self.answer(q, None).await;

        let status = self
            .show(q.chat_id, q.message, &views::downloading(&name))
            .await;

        let file = match self.temp_file() {
            Ok(file) => file,
            Err(e) => {
                warn!("{e}");
                self.show(q.chat_id, status, &views::fault("could not prepare the file"))
                    .await;
                return Ok(Outcome::Done);
            }
        };

        self.transfer(q, status, &selection, file.path()).await;
        release(file);
        Ok(Outcome::Done)
    }

    fn temp_file(&self) -> Result<NamedTempFile> {
        tempfile::Builder::new()
            .prefix("vkm-")
            .suffix(".mp3")
            .tempfile_in(&self.inner.settings.temp_dir)
            .map_err(|e| Error::Resource(format!("cannot create temp file: {e}")))
    }

    async fn transfer(
        &self,
        q: &CallbackQuery,
        status: Option<MessageRef>,
        selection: &Selection,
        path: &Path,
    ) {
        let name = selection.track.display_name();
        let timeout = self.inner.settings.download_timeout;

        let downloaded = tokio::time::timeout(
            timeout,
            self.inner.source.download(&selection.url, path),
        )
        .await;
        match downloaded {
            Ok(Ok(bytes)) => debug!(bytes, track = %name, "download finished"),
            Ok(Err(e)) => {
                warn!(track = %name, "download failed: {e}");
                self.show(q.chat_id, status, &views::download_failed(&name, selection.back))
                    .await;
                return;
            }
            Err(_) => {
                warn!(track = %name, "download timed out after {timeout:?}");
                self.show(q.chat_id, status, &views::download_failed(&name, selection.back))
                    .await;
                return;
            }
        }

        let messenger = &self.inner.messenger;
        if let Err(e) = messenger
            .send_chat_action(q.chat_id, ChatAction::UploadAudio)
            .await
        {
            debug!("chat action failed: {e}");
        }

        let upload = AudioUpload {
            path: path.to_path_buf(),
            title: selection.track.title.clone(),
            performer: selection.track.artist.clone(),
            caption: format!("🎵 {name}"),
        };
        match messenger
            .send_audio(q.chat_id, &upload, &views::back_to_list(selection.back))
            .await
        {
            Ok(_) => info!(track = %name, "audio sent"),
            Err(e) => {
                warn!(track = %name, "send_audio failed: {e}");
                self.show(
                    q.chat_id,
                    status,
                    &views::send_failed(&e.to_string(), selection.back),
                )
                .await;
            }
        }
    }
}

/// Remove the temp file now. Dropping it would do the same but hide errors.
fn release(file: NamedTempFile) {
    if let Err(e) = file.close() {
        warn!("{}", Error::Resource(format!("cannot remove temp file: {e}")));
    }
}
