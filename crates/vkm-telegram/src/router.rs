use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};
use tracing::{info, warn};

use vkm_core::messaging::throttled::{ThrottleConfig, ThrottledMessenger};
use vkm_core::{
    config::Config, credentials::CredentialStore, messaging::port::MessagingPort,
    music::AudioSource, router::CallbackRouter, session::SessionStore,
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub router: CallbackRouter,
}

pub async fn run_polling(
    cfg: Arc<Config>,
    source: Arc<dyn AudioSource>,
    credentials: Arc<CredentialStore>,
) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    match bot.get_me().await {
        Ok(me) => info!("vkm started: @{}", me.username()),
        Err(e) => warn!("get_me failed: {e}"),
    }
    info!(
        token_file = %credentials.path().display(),
        temp_dir = %cfg.browse.temp_dir.display(),
        page_size = cfg.browse.page_size,
        "configuration loaded"
    );

    // Best-effort: the bot works without the command menu.
    if let Err(e) = bot.set_my_commands(handlers::bot_commands()).await {
        warn!("set_my_commands failed: {e}");
    }

    // Browsing edits the same message on every page turn, so throttle outbound calls.
    // A 429 RetryAfter is still retried once at the Telegram adapter layer.
    let raw_messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let messenger: Arc<dyn MessagingPort> = Arc::new(ThrottledMessenger::new(
        raw_messenger,
        ThrottleConfig::default(),
    ));

    let sessions = SessionStore::new(cfg.session_capacity, cfg.session_idle_timeout);
    let router = CallbackRouter::new(
        source,
        credentials,
        sessions,
        messenger,
        cfg.browse.clone(),
    );

    let state = Arc::new(AppState { router });

    let handler = dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}
