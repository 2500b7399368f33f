use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex as StdMutex},
    time::Duration,
};

use async_trait::async_trait;

use super::*;
use crate::{
    domain::{MessageId, MessageRef, UserId},
    messaging::types::{AudioUpload, ChatAction, InlineKeyboard, TextMessage},
    music::{Friend, Group, Identity, Playlist, Track},
};

const CHAT: ChatId = ChatId(1);
const USER: UserId = UserId(2);
const PRESSED: MessageRef = MessageRef {
    chat_id: CHAT,
    message_id: MessageId(10),
};

#[derive(Default)]
struct FakeSource {
    reject_token: bool,
    panic_on_own: bool,
    fail_download: bool,
    /// Keyed by "own", "friend:<id>", "group:<id>", "playlist:<id>",
    /// "recommendations", "search:<q>". Missing keys yield an empty list.
    lists: StdMutex<HashMap<String, std::result::Result<AudioList, String>>>,
    friends: Vec<Friend>,
}

impl FakeSource {
    fn with_list(self, key: &str, list: std::result::Result<AudioList, String>) -> Self {
        self.lists.lock().unwrap().insert(key.to_string(), list);
        self
    }

    fn list(&self, key: &str) -> Result<AudioList> {
        match self.lists.lock().unwrap().get(key) {
            Some(Ok(list)) => Ok(list.clone()),
            Some(Err(msg)) => Err(Error::Remote(msg.clone())),
            None => Ok(AudioList::default()),
        }
    }
}

#[async_trait]
impl AudioSource for FakeSource {
    async fn check_credential(&self, token: &AccessToken) -> Result<Identity> {
        if self.reject_token || token.as_str().contains("bad") {
            return Err(Error::Credential("User authorization failed".into()));
        }
        Ok(Identity {
            id: 42,
            first_name: "Ann".into(),
            last_name: "Lee".into(),
        })
    }

    async fn list_own(&self, _token: &AccessToken) -> Result<AudioList> {
        if self.panic_on_own {
            panic!("boom");
        }
        self.list("own")
    }

    async fn list_friend(&self, _token: &AccessToken, friend_id: &str) -> Result<AudioList> {
        self.list(&format!("friend:{friend_id}"))
    }

    async fn list_group(&self, _token: &AccessToken, group_id: &str) -> Result<AudioList> {
        self.list(&format!("group:{group_id}"))
    }

    async fn list_playlist(&self, _token: &AccessToken, playlist_id: &str) -> Result<AudioList> {
        self.list(&format!("playlist:{playlist_id}"))
    }

    async fn list_friends(&self, _token: &AccessToken) -> Result<Vec<Friend>> {
        Ok(self.friends.clone())
    }

    async fn list_groups(&self, _token: &AccessToken) -> Result<Vec<Group>> {
        Err(Error::Remote("Access denied".into()))
    }

    async fn list_playlists(&self, _token: &AccessToken) -> Result<Vec<Playlist>> {
        Ok(Vec::new())
    }

    async fn list_recommendations(&self, _token: &AccessToken) -> Result<AudioList> {
        self.list("recommendations")
    }

    async fn search(&self, _token: &AccessToken, query: &str) -> Result<AudioList> {
        self.list(&format!("search:{query}"))
    }

    async fn download(&self, _url: &str, dest: &Path) -> Result<u64> {
        if self.fail_download {
            return Err(Error::Remote("HTTP 403".into()));
        }
        tokio::fs::write(dest, b"ID3fake").await?;
        Ok(7)
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Call {
    Send(View),
    Edit(View),
    Answer(Option<String>),
    Action(ChatAction),
    Audio {
        caption: String,
        title: String,
        keyboard: InlineKeyboard,
        file_present: bool,
    },
}

#[derive(Default)]
struct FakeMessenger {
    calls: StdMutex<Vec<Call>>,
    fail_audio: bool,
    /// Editing fails the way Telegram refuses to edit an audio message.
    fail_edit: bool,
}

impl FakeMessenger {
    fn take(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }

    fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MessagingPort for FakeMessenger {
    async fn send_view(&self, chat_id: ChatId, view: &View) -> Result<MessageRef> {
        self.push(Call::Send(view.clone()));
        Ok(MessageRef {
            chat_id,
            message_id: MessageId(77),
        })
    }

    async fn edit_view(&self, _msg: MessageRef, view: &View) -> Result<()> {
        self.push(Call::Edit(view.clone()));
        if self.fail_edit {
            return Err(Error::External(
                "Bad Request: there is no text in the message to edit".into(),
            ));
        }
        Ok(())
    }

    async fn send_chat_action(&self, _chat_id: ChatId, action: ChatAction) -> Result<()> {
        self.push(Call::Action(action));
        Ok(())
    }

    async fn send_audio(
        &self,
        chat_id: ChatId,
        audio: &AudioUpload,
        keyboard: &InlineKeyboard,
    ) -> Result<MessageRef> {
        self.push(Call::Audio {
            caption: audio.caption.clone(),
            title: audio.title.clone(),
            keyboard: keyboard.clone(),
            file_present: audio.path.exists(),
        });
        if self.fail_audio {
            return Err(Error::External("Request Entity Too Large".into()));
        }
        Ok(MessageRef {
            chat_id,
            message_id: MessageId(78),
        })
    }

    async fn answer_callback_query(&self, _callback_id: &str, text: Option<&str>) -> Result<()> {
        self.push(Call::Answer(text.map(str::to_string)));
        Ok(())
    }
}

struct Harness {
    router: CallbackRouter,
    messenger: Arc<FakeMessenger>,
    credentials: Arc<CredentialStore>,
    dir: tempfile::TempDir,
}

impl Harness {
    fn new(source: FakeSource, token: Option<&str>) -> Self {
        Self::with_messenger(source, token, FakeMessenger::default())
    }

    fn with_messenger(source: FakeSource, token: Option<&str>, messenger: FakeMessenger) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let messenger = Arc::new(messenger);
        let credentials = Arc::new(CredentialStore::new(
            dir.path().join("vk_token.txt"),
            token.and_then(AccessToken::parse),
        ));
        let media = dir.path().join("media");
        std::fs::create_dir_all(&media).unwrap();
        let settings = BrowseSettings {
            temp_dir: media,
            download_timeout: Duration::from_secs(5),
            ..BrowseSettings::default()
        };
        let router = CallbackRouter::new(
            Arc::new(source),
            credentials.clone(),
            SessionStore::new(100, Duration::from_secs(60)),
            messenger.clone(),
            settings,
        );
        Self {
            router,
            messenger,
            credentials,
            dir,
        }
    }

    async fn press(&self, data: &str) -> Vec<Call> {
        self.router
            .handle_callback(CallbackQuery {
                chat_id: CHAT,
                user_id: USER,
                callback_id: "cb-1".into(),
                data: data.to_string(),
                message: Some(PRESSED),
            })
            .await;
        self.messenger.take()
    }

    async fn type_text(&self, text: &str) -> Vec<Call> {
        self.router
            .handle_text(TextMessage {
                chat_id: CHAT,
                user_id: USER,
                text: text.to_string(),
            })
            .await;
        self.messenger.take()
    }

    fn media_files(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.dir.path().join("media"))
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect()
    }
}

fn tracks(n: usize) -> AudioList {
    (0..n)
        .map(|i| Track {
            artist: format!("Artist {}", i + 1),
            title: format!("Song {}", i + 1),
            duration_seconds: 125,
            playback_url: Some(format!("https://cdn.example/{i}.mp3")),
        })
        .collect()
}

/// The single edit in a render outcome, after exactly one plain answer.
fn rendered(calls: &[Call]) -> &View {
    match calls {
        [Call::Answer(None), Call::Edit(view)] => view,
        other => panic!("expected answer + edit, got {other:?}"),
    }
}

fn targets(view: &View) -> Vec<String> {
    view.keyboard
        .buttons()
        .map(|b| b.callback_data.clone())
        .collect()
}

fn answers(calls: &[Call]) -> usize {
    calls
        .iter()
        .filter(|c| matches!(c, Call::Answer(_)))
        .count()
}

#[tokio::test]
async fn main_menu_without_token_asks_for_one() {
    let h = Harness::new(FakeSource::default(), None);
    let calls = h.press("main_menu").await;
    let view = rendered(&calls);
    assert!(view.text.contains("token is not set"));
    assert_eq!(targets(view), vec!["set_token"]);
}

#[tokio::test]
async fn main_menu_with_rejected_token_shows_reason() {
    let h = Harness::new(FakeSource::default(), Some("bad.token"));
    let calls = h.press("main_menu").await;
    let view = rendered(&calls);
    assert!(view.text.contains("User authorization failed"));
    assert_eq!(targets(view), vec!["set_token"]);
}

#[tokio::test]
async fn main_menu_with_valid_token_greets_user() {
    let h = Harness::new(FakeSource::default(), Some("1.good"));
    let calls = h.press("main_menu").await;
    let view = rendered(&calls);
    assert!(view.text.contains("Ann Lee"));
    assert!(targets(view).contains(&"my_music".to_string()));
}

#[tokio::test]
async fn browsing_without_token_renders_credential_prompt() {
    let h = Harness::new(FakeSource::default().with_list("own", Ok(tracks(3))), None);
    let calls = h.press("my_music").await;
    assert_eq!(targets(rendered(&calls)), vec!["set_token"]);
}

#[tokio::test]
async fn empty_own_music_offers_only_main_menu() {
    let h = Harness::new(FakeSource::default(), Some("1.good"));
    let calls = h.press("my_music").await;
    let view = rendered(&calls);
    assert_eq!(view.text, "🎵 You have no tracks");
    assert_eq!(targets(view), vec!["main_menu"]);

    // Nothing was committed.
    let calls = h.press("play_audio_page_0").await;
    assert!(rendered(&calls).text.contains("Track list not found"));
}

#[tokio::test]
async fn twenty_three_tracks_page_forward() {
    let h = Harness::new(
        FakeSource::default().with_list("own", Ok(tracks(23))),
        Some("1.good"),
    );

    let calls = h.press("my_music").await;
    let first = rendered(&calls);
    assert!(first.text.starts_with("1. Artist 1 - Song 1 (2:05)"));
    assert!(first.text.ends_with("Page 1/3"));
    let nav = &first.keyboard.rows[first.keyboard.rows.len() - 2];
    assert_eq!(nav.len(), 2);
    assert_eq!(nav[0].callback_data, "noop");
    assert_eq!(nav[0].label, "1/3");
    assert_eq!(nav[1].callback_data, "play_audio_page_10");

    let calls = h.press("play_audio_page_10").await;
    let second = rendered(&calls);
    assert!(second.text.starts_with("11. Artist 11"));
    assert!(second.text.contains("20. Artist 20"));
    assert!(second.text.ends_with("Page 2/3"));
    let nav: Vec<_> = second.keyboard.rows[second.keyboard.rows.len() - 2]
        .iter()
        .map(|b| b.callback_data.as_str())
        .collect();
    assert_eq!(nav, vec!["play_audio_page_0", "noop", "play_audio_page_20"]);
}

#[tokio::test]
async fn out_of_range_page_requests_clamp() {
    let h = Harness::new(
        FakeSource::default().with_list("own", Ok(tracks(23))),
        Some("1.good"),
    );
    h.press("my_music").await;

    let calls = h.press("play_audio_page_999").await;
    assert!(rendered(&calls).text.ends_with("Page 3/3"));

    let calls = h.press("play_audio_page_-4").await;
    assert!(rendered(&calls).text.ends_with("Page 1/3"));

    let calls = h.press("play_audio_page_99999999999999999999").await;
    assert!(rendered(&calls).text.ends_with("Page 3/3"));

    let calls = h.press("play_audio_99999999999999999999").await;
    assert_eq!(calls, vec![Call::Answer(Some("❌ Track not found".into()))]);
}

#[tokio::test]
async fn paging_without_a_list_points_back_to_menu() {
    let h = Harness::new(FakeSource::default(), Some("1.good"));
    let calls = h.press("play_audio_page_10").await;
    let view = rendered(&calls);
    assert_eq!(view.text, "❌ Track list not found. Return to the menu.");
    assert_eq!(targets(view), vec!["main_menu"]);
}

#[tokio::test]
async fn malformed_callbacks_only_toast() {
    let h = Harness::new(FakeSource::default(), Some("1.good"));
    for data in ["play_audio_page_x", "play_audio_1_2", "friend_"] {
        let calls = h.press(data).await;
        assert_eq!(
            calls,
            vec![Call::Answer(Some("❌ Invalid command".into()))],
            "{data}"
        );
    }
}

#[tokio::test]
async fn noop_is_acknowledged_silently() {
    let h = Harness::new(FakeSource::default(), Some("1.good"));
    assert_eq!(h.press("noop").await, vec![Call::Answer(None)]);
}

#[tokio::test]
async fn unknown_callback_renders_hint() {
    let h = Harness::new(FakeSource::default(), Some("1.good"));
    let calls = h.press("definitely_not_a_command").await;
    let view = rendered(&calls);
    assert_eq!(view.text, "❌ Unknown command");
    assert_eq!(targets(view), vec!["main_menu"]);
}

#[tokio::test]
async fn track_without_url_toasts_without_editing() {
    let mut list = tracks(2).tracks().to_vec();
    list[1].playback_url = None;
    let h = Harness::new(
        FakeSource::default().with_list("own", Ok(AudioList::new(list))),
        Some("1.good"),
    );
    h.press("my_music").await;

    let calls = h.press("play_audio_1").await;
    assert_eq!(calls.len(), 1);
    assert!(matches!(&calls[0], Call::Answer(Some(_))));

    let calls = h.press("play_audio_5").await;
    assert_eq!(calls, vec![Call::Answer(Some("❌ Track not found".into()))]);
}

#[tokio::test]
async fn playing_a_track_sends_audio_and_cleans_up() {
    let h = Harness::new(
        FakeSource::default().with_list("own", Ok(tracks(3))),
        Some("1.good"),
    );
    h.press("my_music").await;

    let calls = h.press("play_audio_2").await;
    assert_eq!(answers(&calls), 1);
    assert_eq!(calls[0], Call::Answer(None));
    match &calls[1] {
        Call::Edit(view) => assert_eq!(view.text, "📥 Downloading: Artist 3 - Song 3..."),
        other => panic!("expected status edit, got {other:?}"),
    }
    assert_eq!(calls[2], Call::Action(ChatAction::UploadAudio));
    match &calls[3] {
        Call::Audio {
            caption,
            title,
            keyboard,
            file_present,
        } => {
            assert_eq!(caption, "🎵 Artist 3 - Song 3");
            assert_eq!(title, "Song 3");
            assert!(*file_present);
            assert_eq!(keyboard.rows[0][0].callback_data, "my_music");
        }
        other => panic!("expected audio, got {other:?}"),
    }
    assert_eq!(calls.len(), 4);
    assert!(h.media_files().is_empty());
}

#[tokio::test]
async fn failed_download_edits_status_and_cleans_up() {
    let h = Harness::new(
        FakeSource {
            fail_download: true,
            ..FakeSource::default()
        }
        .with_list("own", Ok(tracks(1))),
        Some("1.good"),
    );
    h.press("my_music").await;

    let calls = h.press("play_audio_0").await;
    assert_eq!(answers(&calls), 1);
    let last = calls.last().unwrap();
    match last {
        Call::Edit(view) => {
            assert!(view.text.starts_with("❌ Download failed"));
            assert_eq!(targets(view), vec!["my_music"]);
        }
        other => panic!("expected error edit, got {other:?}"),
    }
    assert!(!calls.iter().any(|c| matches!(c, Call::Audio { .. })));
    assert!(h.media_files().is_empty());
}

#[tokio::test]
async fn failed_upload_edits_status() {
    let h = Harness::with_messenger(
        FakeSource::default().with_list("own", Ok(tracks(1))),
        Some("1.good"),
        FakeMessenger {
            fail_audio: true,
            ..FakeMessenger::default()
        },
    );
    h.press("my_music").await;

    let calls = h.press("play_audio_0").await;
    match calls.last().unwrap() {
        Call::Edit(view) => assert!(view.text.contains("Request Entity Too Large")),
        other => panic!("expected error edit, got {other:?}"),
    }
    assert!(h.media_files().is_empty());
}

#[tokio::test]
async fn uneditable_message_gets_a_fresh_list() {
    let h = Harness::with_messenger(
        FakeSource::default().with_list("own", Ok(tracks(3))),
        Some("1.good"),
        FakeMessenger {
            fail_edit: true,
            ..FakeMessenger::default()
        },
    );

    // "Back to list" pressed under a sent audio message.
    let calls = h.press("my_music").await;
    match &calls[..] {
        [Call::Answer(None), Call::Edit(edited), Call::Send(sent)] => {
            assert_eq!(edited, sent);
            assert!(sent.text.ends_with("Page 1/1"));
        }
        other => panic!("expected answer, edit, send; got {other:?}"),
    }
}

#[tokio::test]
async fn download_status_falls_back_to_a_new_message() {
    let h = Harness::with_messenger(
        FakeSource::default().with_list("own", Ok(tracks(1))),
        Some("1.good"),
        FakeMessenger {
            fail_edit: true,
            ..FakeMessenger::default()
        },
    );
    h.press("my_music").await;

    let calls = h.press("play_audio_0").await;
    assert_eq!(answers(&calls), 1);
    assert_eq!(
        calls[2],
        Call::Send(views::downloading("Artist 1 - Song 1"))
    );
    assert!(matches!(calls.last(), Some(Call::Audio { .. })));
    assert!(h.media_files().is_empty());
}

#[tokio::test]
async fn failed_listing_keeps_previous_list() {
    let h = Harness::new(
        FakeSource::default()
            .with_list("own", Ok(tracks(3)))
            .with_list("friend:7", Err("Access denied".into())),
        Some("1.good"),
    );
    h.press("my_music").await;

    let calls = h.press("friend_7").await;
    let view = rendered(&calls);
    assert_eq!(view.text, "❌ Error: Access denied");
    assert_eq!(targets(view), vec!["friends_music"]);

    let calls = h.press("play_audio_page_0").await;
    assert!(rendered(&calls).text.starts_with("1. Artist 1"));
}

#[tokio::test]
async fn sub_lists_go_back_to_the_coarse_source() {
    let h = Harness::new(
        FakeSource::default().with_list("friend:7", Ok(tracks(2))),
        Some("1.good"),
    );
    let calls = h.press("friend_7").await;
    assert!(rendered(&calls).text.starts_with("1. Artist 1"));

    let calls = h.press("play_audio_0").await;
    let back = calls.iter().find_map(|c| match c {
        Call::Audio { keyboard, .. } => Some(keyboard.rows[0][0].callback_data.clone()),
        _ => None,
    });
    assert_eq!(back.as_deref(), Some("friends_music"));

    // Empty group list also goes back to the coarse source.
    let calls = h.press("group_5").await;
    assert_eq!(targets(rendered(&calls)), vec!["groups_music"]);
}

#[tokio::test]
async fn entity_lists_do_not_touch_the_session() {
    let friends = (1..=12)
        .map(|id| Friend {
            id,
            first_name: format!("F{id}"),
            last_name: "X".into(),
        })
        .collect();
    let h = Harness::new(
        FakeSource {
            friends,
            ..FakeSource::default()
        }
        .with_list("own", Ok(tracks(2))),
        Some("1.good"),
    );
    h.press("my_music").await;

    let calls = h.press("friends_music").await;
    let t = targets(rendered(&calls));
    assert_eq!(t.len(), 11);
    assert_eq!(t[0], "friend_1");
    assert_eq!(t[10], "main_menu");

    let calls = h.press("play_audio_page_0").await;
    assert!(rendered(&calls).text.starts_with("1. Artist 1"));
}

#[tokio::test]
async fn remote_entity_failure_renders_error_with_menu_back() {
    let h = Harness::new(FakeSource::default(), Some("1.good"));
    let calls = h.press("groups_music").await;
    let view = rendered(&calls);
    assert_eq!(view.text, "❌ Error: Access denied");
    assert_eq!(targets(view), vec!["main_menu"]);
}

#[tokio::test]
async fn panicking_branch_renders_fault_view() {
    let h = Harness::new(
        FakeSource {
            panic_on_own: true,
            ..FakeSource::default()
        },
        Some("1.good"),
    );
    let calls = h.press("my_music").await;
    let view = rendered(&calls);
    assert!(view.text.contains("internal error"));
    assert_eq!(targets(view), vec!["main_menu"]);
}

#[tokio::test]
async fn search_prompt_then_query_commits_search_results() {
    let h = Harness::new(
        FakeSource::default().with_list("search:queen", Ok(tracks(12))),
        Some("1.good"),
    );

    let calls = h.press("search_music").await;
    assert_eq!(rendered(&calls).text, "🔍 Enter a search query:");

    let calls = h.type_text("  queen ").await;
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], Call::Send(views::searching()));
    match &calls[1] {
        Call::Edit(view) => {
            assert!(view.text.starts_with("🔍 Results for 'queen'\n\n1. Artist 1"));
            assert!(view.text.ends_with("Page 1/2"));
        }
        other => panic!("expected results edit, got {other:?}"),
    }

    let calls = h.press("play_audio_0").await;
    let back = calls.iter().find_map(|c| match c {
        Call::Audio { keyboard, .. } => Some(keyboard.rows[0][0].callback_data.clone()),
        _ => None,
    });
    assert_eq!(back.as_deref(), Some("search_music"));

    // The flag was cleared: the next text is treated as a token.
    let calls = h.type_text("bad.token").await;
    match &calls[..] {
        [Call::Send(view)] => assert!(view.text.starts_with("❌ Token is invalid")),
        other => panic!("expected token rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_search_query_keeps_waiting() {
    let h = Harness::new(
        FakeSource::default().with_list("search:abba", Ok(tracks(1))),
        Some("1.good"),
    );
    h.press("search").await;

    let calls = h.type_text("   ").await;
    assert_eq!(calls, vec![Call::Send(views::search_query_empty())]);

    let calls = h.type_text("abba").await;
    assert_eq!(calls[0], Call::Send(views::searching()));
}

#[tokio::test]
async fn search_without_results_says_nothing_found() {
    let h = Harness::new(FakeSource::default(), Some("1.good"));
    h.press("search_music").await;
    let calls = h.type_text("zzz").await;
    match calls.last().unwrap() {
        Call::Edit(view) => assert_eq!(view.text, "🎵 Nothing found"),
        other => panic!("expected edit, got {other:?}"),
    }
}

#[tokio::test]
async fn valid_token_text_is_persisted() {
    let h = Harness::new(FakeSource::default(), None);
    let calls = h.type_text(" 5.fresh \n").await;
    match &calls[..] {
        [Call::Send(view)] => {
            assert!(view.text.contains("Ann Lee"));
            assert!(view.text.contains("/menu"));
        }
        other => panic!("expected confirmation, got {other:?}"),
    }
    assert_eq!(h.credentials.current().await.unwrap().as_str(), "5.fresh");
    assert_eq!(
        std::fs::read_to_string(h.dir.path().join("vk_token.txt")).unwrap(),
        "5.fresh"
    );
}

#[tokio::test]
async fn rejected_token_text_keeps_stored_token() {
    let h = Harness::new(FakeSource::default(), Some("1.good"));
    h.type_text("bad.one").await;
    assert_eq!(h.credentials.current().await.unwrap().as_str(), "1.good");
    assert!(!h.dir.path().join("vk_token.txt").exists());
}

#[tokio::test]
async fn set_token_cancels_pending_search_but_keeps_the_list() {
    let h = Harness::new(
        FakeSource::default().with_list("own", Ok(tracks(3))),
        Some("1.good"),
    );
    h.press("my_music").await;
    h.press("search_music").await;
    h.press("set_token").await;
    h.type_text("9.tok").await;
    assert_eq!(h.credentials.current().await.unwrap().as_str(), "9.tok");

    let calls = h.press("play_audio_page_0").await;
    assert!(rendered(&calls).text.starts_with("1. Artist 1"));
}

#[tokio::test]
async fn check_token_reports_identity_with_back_to_management() {
    let h = Harness::new(FakeSource::default(), Some("1.good"));
    let calls = h.press("check_token").await;
    let view = rendered(&calls);
    assert!(view.text.starts_with("✅ Token is valid!"));
    assert_eq!(targets(view), vec!["token_management"]);
}

#[tokio::test]
async fn every_callback_is_answered_exactly_once() {
    let h = Harness::new(
        FakeSource::default().with_list("own", Ok(tracks(3))),
        Some("1.good"),
    );
    for data in [
        "main_menu",
        "noop",
        "set_token",
        "info",
        "program_info",
        "token_management",
        "check_token",
        "my_music",
        "play_audio_page_0",
        "play_audio_0",
        "play_audio_x",
        "recommendations",
        "unknown_thing",
    ] {
        let calls = h.press(data).await;
        assert_eq!(answers(&calls), 1, "{data}: {calls:?}");
    }
}
