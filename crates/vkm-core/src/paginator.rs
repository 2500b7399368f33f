//! Page rendering for track lists.
//!
//! Everything here is pure: given the list, a start index and a page size it
//! produces the message text and keyboard. Clamping requested indices is the
//! caller's job (see [`clamp_start`]).

use crate::{
    messaging::types::{InlineButton, InlineKeyboard, View},
    music::AudioList,
    router::command::CallbackCommand,
};

pub const NO_TRACKS_TEXT: &str = "🎵 No tracks";
pub const MAIN_MENU_LABEL: &str = "🔙 Main menu";

/// Page geometry for one render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub start: usize,
    pub end: usize,
    pub current: usize,
    pub total: usize,
}

impl Page {
    pub fn locate(len: usize, start: usize, page_size: usize) -> Self {
        let end = start.saturating_add(page_size).min(len);
        Self {
            start,
            end,
            current: start / page_size + 1,
            total: total_pages(len, page_size),
        }
    }

    pub fn prev_start(&self, page_size: usize) -> Option<usize> {
        (self.start > 0).then(|| self.start.saturating_sub(page_size))
    }

    pub fn next_start(&self, len: usize) -> Option<usize> {
        (self.end < len).then_some(self.end)
    }
}

/// `ceil(len / page_size)`; zero for an empty list.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if len == 0 {
        0
    } else {
        (len - 1) / page_size + 1
    }
}

/// Repair a requested page start: negative goes to the first page, past the
/// end goes to the start of the last page.
pub fn clamp_start(requested: i64, len: usize, page_size: usize) -> usize {
    if requested <= 0 || len == 0 {
        return 0;
    }
    let requested = usize::try_from(requested).unwrap_or(usize::MAX);
    if requested >= len {
        (len - 1) / page_size * page_size
    } else {
        requested
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Render the page of `list` that starts at `start`.
pub fn render_page(list: &AudioList, start: usize, page_size: usize, label_max: usize) -> View {
    if list.is_empty() {
        return View::plain(NO_TRACKS_TEXT, main_menu_keyboard());
    }

    let page = Page::locate(list.len(), start, page_size);

    let mut text = String::new();
    let mut keyboard = InlineKeyboard::default();
    for (index, track) in list
        .tracks()
        .iter()
        .enumerate()
        .take(page.end)
        .skip(page.start)
    {
        text.push_str(&format!(
            "{}. {} - {} ({})\n",
            index + 1,
            track.artist,
            track.title,
            track.duration_label()
        ));
        keyboard.push_row(vec![InlineButton::new(
            format!(
                "{}. {} - {}",
                index + 1,
                truncate_chars(&track.artist, label_max),
                truncate_chars(&track.title, label_max)
            ),
            CallbackCommand::Play(index).to_string(),
        )]);
    }
    text.push_str(&format!("\nPage {}/{}", page.current, page.total));

    let mut nav = Vec::new();
    if let Some(prev) = page.prev_start(page_size) {
        nav.push(InlineButton::new(
            "⬅️ Prev",
            CallbackCommand::Page(prev as i64).to_string(),
        ));
    }
    if page.total > 1 {
        nav.push(InlineButton::new(
            format!("{}/{}", page.current, page.total),
            CallbackCommand::Noop.to_string(),
        ));
    }
    if let Some(next) = page.next_start(list.len()) {
        nav.push(InlineButton::new(
            "Next ➡️",
            CallbackCommand::Page(next as i64).to_string(),
        ));
    }
    keyboard.push_row(nav);
    keyboard.push_row(vec![main_menu_button()]);

    View::plain(text, keyboard)
}

pub fn main_menu_button() -> InlineButton {
    InlineButton::new(MAIN_MENU_LABEL, CallbackCommand::MainMenu.to_string())
}

pub fn main_menu_keyboard() -> InlineKeyboard {
    InlineKeyboard::new(vec![vec![main_menu_button()]])
}
