use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::db::store::Store;
use crate::services::wizard_sessions::WizardRegistry;

/// Shared by every worker through `web::Data`.
pub struct AppState {
    pub store: Arc<Store>,
    pub config: AppConfig,
    pub wizards: WizardRegistry,
}

impl AppState {
    pub fn new(store: Arc<Store>, config: AppConfig) -> Self {
        let wizard_ttl = Duration::from_secs(config.wizard_ttl_minutes.saturating_mul(60));
        Self {
            store,
            config,
            wizards: WizardRegistry::new(wizard_ttl),
        }
    }
}
