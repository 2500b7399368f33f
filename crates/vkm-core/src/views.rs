//! Static screens and message templates.

use crate::{
    messaging::types::{InlineButton, InlineKeyboard, View},
    music::{Friend, Group, Identity, Playlist, SourceTag},
    paginator::{main_menu_button, main_menu_keyboard},
    router::command::{CallbackCommand, SubList},
};

pub const PROGRAM_NAME: &str = "VK Music Bot";
pub const PROGRAM_DESCRIPTION: &str = "Telegram bot for browsing and playing your VK music";
pub const TOKEN_HELP_URL: &str = "https://vkhost.github.io/";

pub const FEATURES: &[&str] = &[
    "🎵 My music",
    "👥 Friends' music",
    "👥 Groups' music",
    "📋 Music from playlists",
    "🔍 Music search",
    "📻 Recommendations and popular music",
    "🤖 VK algorithmic mixes",
];

fn back(label: &str, target: impl ToString) -> InlineKeyboard {
    InlineKeyboard::single(label, target.to_string())
}

fn feature_lines() -> String {
    FEATURES
        .iter()
        .map(|f| format!("   {f}\n"))
        .collect::<String>()
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn welcome() -> View {
    let text = format!(
        "🎵 Welcome to {PROGRAM_NAME}!\n\n📝 {PROGRAM_DESCRIPTION}\n\n✨ Features:\n{}\n🔑 Set your VK token with /token to get started",
        feature_lines()
    );
    View::plain(
        text,
        InlineKeyboard::one_per_row(vec![
            InlineButton::new("🔑 Set token", CallbackCommand::SetToken.to_string()),
            InlineButton::new("ℹ️ Info", CallbackCommand::Info.to_string()),
        ]),
    )
}

pub fn help() -> View {
    View::plain(
        format!(
            "🎵 {PROGRAM_NAME} - Help\n\n\
Commands:\n\
/start - Start working with the bot\n\
/token - Set your VK token\n\
/menu - Main menu\n\
/help - Show this help\n\n\
The bot needs a VK token with audio access."
        ),
        InlineKeyboard::default(),
    )
}

pub fn unknown_bot_command() -> View {
    View::plain(
        "❓ Unknown command. Use /help to see the list of commands.",
        InlineKeyboard::default(),
    )
}

pub fn token_prompt() -> View {
    View::plain(
        format!(
            "🔑 Please send your VK token. You can get one here: {TOKEN_HELP_URL}\n\n⚠️ Never share your token with anyone!"
        ),
        main_menu_keyboard(),
    )
}

pub const NO_TOKEN: &str = "token is not set";

/// Shown instead of the main menu when no usable token is stored.
pub fn credential_prompt(reason: &str) -> View {
    View::plain(
        format!("❌ VK token problem: {reason}\n\n🔑 Set your VK token to continue."),
        InlineKeyboard::single("🔑 Set token", CallbackCommand::SetToken.to_string()),
    )
}

pub fn main_menu(identity: &Identity) -> View {
    let entry = |label: &str, cmd: CallbackCommand| InlineButton::new(label, cmd.to_string());
    View::plain(
        format!("👤 {}\n🎵 Choose an action:", identity.display_name()),
        InlineKeyboard::one_per_row(vec![
            entry("🎵 My music", CallbackCommand::Browse(SourceTag::MyMusic)),
            entry("👥 Friends' music", CallbackCommand::Browse(SourceTag::FriendsMusic)),
            entry("👥 Groups' music", CallbackCommand::Browse(SourceTag::GroupsMusic)),
            entry("📋 My playlists", CallbackCommand::Browse(SourceTag::Playlists)),
            entry("🔍 Search music", CallbackCommand::Browse(SourceTag::Search)),
            entry("📻 Recommendations", CallbackCommand::Browse(SourceTag::Recommendations)),
            entry(
                "🤖 Algorithmic mixes",
                CallbackCommand::Browse(SourceTag::AlgorithmicMixes),
            ),
            entry("⚙️ Token management", CallbackCommand::TokenManagement),
            entry("ℹ️ About", CallbackCommand::ProgramInfo),
        ]),
    )
}

pub fn program_info() -> View {
    let text = format!(
        "🤖 <b>{}</b> v{}\n\n📝 {}\n\n✨ Features:\n{}",
        escape_html(PROGRAM_NAME),
        env!("CARGO_PKG_VERSION"),
        escape_html(PROGRAM_DESCRIPTION),
        escape_html(&feature_lines())
    );
    View::html(text, back("🔙 Back", CallbackCommand::MainMenu))
}

pub fn token_management() -> View {
    View::plain(
        "⚙️ Token management:",
        InlineKeyboard::one_per_row(vec![
            InlineButton::new("🔄 Check token", CallbackCommand::CheckToken.to_string()),
            InlineButton::new("🔑 Change token", CallbackCommand::SetToken.to_string()),
            InlineButton::new("🔙 Back", CallbackCommand::MainMenu.to_string()),
        ]),
    )
}

pub fn token_check(result: Result<&Identity, &str>) -> View {
    let text = match result {
        Ok(identity) => format!("✅ Token is valid!\n👤 User: {}", identity.display_name()),
        Err(reason) => format!("❌ Token is invalid: {reason}"),
    };
    View::plain(text, back("🔙 Back", CallbackCommand::TokenManagement))
}

pub fn token_saved(identity: &Identity) -> View {
    View::plain(
        format!(
            "✅ Token saved!\n👤 User: {}\n\nOpen the main menu with /menu",
            identity.display_name()
        ),
        InlineKeyboard::default(),
    )
}

pub fn token_rejected(reason: &str) -> View {
    View::plain(format!("❌ Token is invalid: {reason}"), InlineKeyboard::default())
}

pub fn token_empty() -> View {
    View::plain("❌ Token cannot be empty", InlineKeyboard::default())
}

pub fn token_not_saved(reason: &str) -> View {
    View::plain(
        format!("❌ Token is valid but could not be saved: {reason}"),
        InlineKeyboard::default(),
    )
}

pub fn search_prompt() -> View {
    View::plain("🔍 Enter a search query:", main_menu_keyboard())
}

pub fn search_query_empty() -> View {
    View::plain("❌ Search query cannot be empty", main_menu_keyboard())
}

pub fn searching() -> View {
    View::plain("🔍 Searching...", InlineKeyboard::default())
}

pub fn search_header(query: &str) -> String {
    format!("🔍 Results for '{query}'\n\n")
}

/// Error text with a single back button.
pub fn failure(message: &str, back_to: &str) -> View {
    View::plain(format!("❌ Error: {message}"), back("🔙 Back", back_to))
}

/// Fallback for faults nobody handled more specifically.
pub fn fault(message: &str) -> View {
    View::plain(
        format!("❌ Something went wrong: {message}"),
        main_menu_keyboard(),
    )
}

pub fn unknown_command() -> View {
    View::plain("❌ Unknown command", main_menu_keyboard())
}

pub fn list_not_found() -> View {
    View::plain(
        "❌ Track list not found. Return to the menu.",
        main_menu_keyboard(),
    )
}

/// Message for a successful fetch that returned nothing.
pub fn empty_tracks(source: SourceTag, sub: Option<SubList>) -> View {
    let text = match (sub, source) {
        (Some(SubList::Friend), _) => "🎵 This friend has no tracks or access is restricted",
        (Some(SubList::Group), _) => "🎵 This group has no tracks or access is restricted",
        (Some(SubList::Playlist), _) => "🎵 The playlist is empty",
        (None, SourceTag::Recommendations) => "🎵 No recommendations",
        (None, SourceTag::AlgorithmicMixes) => "🤖 No algorithmic mixes",
        (None, SourceTag::Search) => "🎵 Nothing found",
        (None, _) => "🎵 You have no tracks",
    };
    let back_to = match sub {
        Some(s) => s.source().menu_command(),
        None => "main_menu",
    };
    View::plain(text, back("🔙 Back", back_to))
}

fn entity_menu(title: &str, buttons: Vec<InlineButton>) -> View {
    let mut keyboard = InlineKeyboard::one_per_row(buttons);
    keyboard.push_row(vec![main_menu_button()]);
    View::plain(title, keyboard)
}

pub fn friends(list: &[Friend], limit: usize) -> View {
    if list.is_empty() {
        return View::plain(
            "👥 You have no friends or access is restricted",
            main_menu_keyboard(),
        );
    }
    let buttons = list
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, f)| {
            InlineButton::new(
                format!("{}. {} {}", i + 1, f.first_name, f.last_name)
                    .trim_end()
                    .to_string(),
                CallbackCommand::Open(SubList::Friend, f.id.to_string()).to_string(),
            )
        })
        .collect();
    entity_menu("👥 Choose a friend to browse their music:", buttons)
}

pub fn groups(list: &[Group], limit: usize) -> View {
    if list.is_empty() {
        return View::plain(
            "👥 You have no groups or access is restricted",
            main_menu_keyboard(),
        );
    }
    let buttons = list
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, g)| {
            InlineButton::new(
                format!("{}. {}", i + 1, g.name),
                CallbackCommand::Open(SubList::Group, g.id.to_string()).to_string(),
            )
        })
        .collect();
    entity_menu("👥 Choose a group to browse its music:", buttons)
}

pub fn playlists(list: &[Playlist], limit: usize) -> View {
    if list.is_empty() {
        return View::plain("📋 You have no playlists", main_menu_keyboard());
    }
    let buttons = list
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, p)| {
            InlineButton::new(
                format!("{}. {} ({})", i + 1, p.title, p.count),
                CallbackCommand::Open(SubList::Playlist, p.id.to_string()).to_string(),
            )
        })
        .collect();
    entity_menu("📋 Choose a playlist:", buttons)
}

pub fn downloading(display_name: &str) -> View {
    View::plain(format!("📥 Downloading: {display_name}..."), InlineKeyboard::default())
}

pub fn download_failed(display_name: &str, back_to: SourceTag) -> View {
    View::plain(
        format!("❌ Download failed: {display_name}"),
        back("🔙 Back", back_to.menu_command()),
    )
}

pub fn send_failed(message: &str, back_to: SourceTag) -> View {
    View::plain(
        format!("❌ Failed to send audio: {message}"),
        back("🔙 Back", back_to.menu_command()),
    )
}

pub fn back_to_list(source: SourceTag) -> InlineKeyboard {
    back("🔙 Back to list", source.menu_command())
}
