use std::sync::Arc;

use tracing::info;

use vkm_core::{config::Config, credentials::CredentialStore, music::AudioSource};
use vkm_vk::VkClient;

#[tokio::main]
async fn main() -> Result<(), vkm_core::Error> {
    vkm_core::logging::init("vkm")?;

    let cfg = Arc::new(Config::load()?);
    info!(api = %cfg.vk_api_base, version = %cfg.vk_api_version, "starting VK music bot");

    let credentials = Arc::new(CredentialStore::load(cfg.token_file.clone()).await);
    let source: Arc<dyn AudioSource> = Arc::new(VkClient::from_config(&cfg)?);

    vkm_telegram::router::run_polling(cfg, source, credentials)
        .await
        .map_err(|e| vkm_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
