use std::sync::Arc;

use crate::auth::TokenCodec;
use crate::config::Config;
use crate::db::Store;
use crate::services::{GeminiClient, QlooClient, TasteGraph};

/// Shared application state. Built once at startup and cloned into every
/// handler; all heavy members are handles.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Store,
    pub taste: Arc<dyn TasteGraph>,
    pub gemini: GeminiClient,
    pub codec: TokenCodec,
}

impl AppState {
    pub fn new(config: Config, store: Store) -> Self {
        let taste = QlooClient::new(
            config.qloo_api_base_url.clone(),
            config.qloo_api_key.clone(),
        );
        let gemini = GeminiClient::new(config.gemini_api_key.clone(), config.gemini_model.clone());
        let codec = TokenCodec::new(&config.secret_key, config.access_token_expire_minutes);

        Self {
            config: Arc::new(config),
            store,
            taste: Arc::new(taste),
            gemini,
            codec,
        }
    }
}
