use std::sync::Arc;

use crate::config::{AppConfig, StorageConfig};
use crate::notify::{LogNotifier, Notifier};
use crate::planner::repo::MealPlanStore;
use crate::recipes::repo::RecipeStore;
use crate::storage::{Storage, StorageClient};
use crate::timers::registry::TimerRegistry;

/// Process-wide shared state. Both stores sit behind explicit interfaces and
/// reach handlers only through axum's `State` extraction; nothing here is an
/// ambient global.
#[derive(Clone)]
pub struct AppState {
    pub recipes: Arc<RecipeStore>,
    pub plan: Arc<MealPlanStore>,
    pub timers: Arc<TimerRegistry>,
    pub config: Arc<AppConfig>,
    pub storage: Arc<dyn StorageClient>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let storage =
            Arc::new(Storage::connect(&config.storage).await?) as Arc<dyn StorageClient>;
        Ok(Self::from_parts(config, storage, Arc::new(LogNotifier)))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        storage: Arc<dyn StorageClient>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            recipes: Arc::new(RecipeStore::default()),
            plan: Arc::new(MealPlanStore::default()),
            timers: Arc::new(TimerRegistry::default()),
            config,
            storage,
            notifier,
        }
    }

    /// Test double: fresh stores, a storage fake that never leaves the
    /// process, and the log-backed notifier.
    pub fn fake() -> Self {
        use axum::async_trait;
        use bytes::Bytes;

        #[derive(Clone)]
        struct FakeStorage;

        #[async_trait]
        impl StorageClient for FakeStorage {
            async fn put_object(&self, _k: &str, _b: Bytes, _ct: &str) -> anyhow::Result<()> {
                Ok(())
            }
            async fn delete_object(&self, _k: &str) -> anyhow::Result<()> {
                Ok(())
            }
            async fn presign_get(&self, k: &str, _s: u64) -> anyhow::Result<String> {
                Ok(format!("https://fake.local/{k}"))
            }
        }

        let config = Arc::new(AppConfig {
            storage: StorageConfig {
                endpoint: "fake".into(),
                bucket: "recipe-images".into(),
                access_key: "fake".into(),
                secret_key: "fake".into(),
                region: "us-east-1".into(),
            },
            seed_samples: false,
            image_url_ttl_secs: 30 * 60,
        });

        Self::from_parts(config, Arc::new(FakeStorage), Arc::new(LogNotifier))
    }
}
