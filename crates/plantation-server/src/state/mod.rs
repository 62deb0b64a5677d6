//! Shared application state handed to every request.

pub mod store;

use std::sync::Arc;

use anyhow::Result;

use crate::config::{Config, StorageBackend};
use crate::persistence;
use crate::service::{Deadline, PlantationService};
use store::{EstateStore, MemoryStore};

pub struct AppState {
    service: PlantationService,
    config: Config,
}

impl AppState {
    pub fn new(store: Arc<dyn EstateStore>, config: Config) -> Self {
        Self {
            service: PlantationService::new(store),
            config,
        }
    }

    /// Build state on the backend selected by `config.storage`.
    pub async fn from_config(config: Config) -> Result<Self> {
        let store: Arc<dyn EstateStore> = match config.storage {
            StorageBackend::Sqlite => Arc::new(
                persistence::init_database(
                    &config.database_path,
                    config.database_max_connections,
                )
                .await?,
            ),
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; estates are lost on restart");
                Arc::new(MemoryStore::new())
            }
        };
        Ok(Self::new(store, config))
    }

    pub fn service(&self) -> &PlantationService {
        &self.service
    }

    /// Deadline for a request starting now.
    pub fn request_deadline(&self) -> Deadline {
        Deadline::after(self.config.request_timeout)
    }
}
