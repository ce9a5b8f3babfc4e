use std::sync::Arc;

use anyhow::Context;

use crate::config::{BackendKind, Config};
use crate::service::rate_limit::RateLimiter;
use crate::storage::{
    backend::TodoStore, file::FileStore, memory::MemoryStore, sqlite::SqliteStore,
};

/// Shared per-process services: the configuration, the injected storage
/// backend and the request quota. Built once at startup; handlers reach it
/// through axum state, never through globals.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn TodoStore>,
    pub limiter: RateLimiter,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Arc<Self>> {
        let store: Arc<dyn TodoStore> = match config.backend {
            BackendKind::Memory => Arc::new(MemoryStore::new()),
            BackendKind::File => Arc::new(FileStore::new(&config.data_path)),
            BackendKind::Sqlite => Arc::new(
                SqliteStore::open(&config.sqlite_path).with_context(|| {
                    format!(
                        "opening sqlite database at {}",
                        config.sqlite_path.display()
                    )
                })?,
            ),
        };

        let limiter = RateLimiter::new(config.rate_limit_max);

        Ok(Arc::new(Self {
            config,
            store,
            limiter,
        }))
    }
}
