use std::sync::Arc;

use tracing::warn;

use crate::config::AppConfig;
use crate::store::{MemoryStore, PgStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let store = match &config.database {
            Some(db) => Arc::new(PgStore::connect(db).await?) as Arc<dyn Store>,
            None => {
                warn!("DATABASE_URL not set; using in-memory store, data is lost on exit");
                Arc::new(MemoryStore::new()) as Arc<dyn Store>
            }
        };
        Ok(Self::from_parts(store, Arc::new(config)))
    }

    pub fn from_parts(store: Arc<dyn Store>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        let config = AppConfig {
            database: None,
            host: "127.0.0.1".into(),
            port: 0,
        };
        Self::from_parts(Arc::new(MemoryStore::new()), Arc::new(config))
    }
}
