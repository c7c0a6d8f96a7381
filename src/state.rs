use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::auth::repo_types::User;
use crate::config::{AppConfig, StoreAdapter};
use crate::groceries::repo_types::GroceryList;
use crate::meals::repo_types::Meal;
use crate::recipes::repo_types::Recipe;
use crate::store::memory::MemoryRepository;
use crate::store::postgres::PgRepository;
use crate::store::DynRepo;

/// Shared per-request state: one repository handle per entity kind plus
/// the config. Handles are acquired once at startup; request handlers
/// hold no other mutable state.
#[derive(Clone)]
pub struct AppState {
    pub users: DynRepo<User>,
    pub recipes: DynRepo<Recipe>,
    pub meals: DynRepo<Meal>,
    pub groceries: DynRepo<GroceryList>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        match config.adapter {
            StoreAdapter::Memory => {
                tracing::info!("using in-memory store adapter");
                Ok(Self::with_memory_store(config))
            }
            StoreAdapter::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL not set")?;
                let pool = PgPoolOptions::new()
                    .max_connections(10)
                    .connect(url)
                    .await
                    .context("connect to database")?;
                if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
                    tracing::warn!(error = %e, "migration failed; continuing");
                }
                tracing::info!("using postgres store adapter");
                Ok(Self {
                    users: Arc::new(PgRepository::new(pool.clone())),
                    recipes: Arc::new(PgRepository::new(pool.clone())),
                    meals: Arc::new(PgRepository::new(pool.clone())),
                    groceries: Arc::new(PgRepository::new(pool)),
                    config,
                })
            }
        }
    }

    pub fn with_memory_store(config: Arc<AppConfig>) -> Self {
        Self {
            users: Arc::new(MemoryRepository::new()),
            recipes: Arc::new(MemoryRepository::new()),
            meals: Arc::new(MemoryRepository::new()),
            groceries: Arc::new(MemoryRepository::new()),
            config,
        }
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::with_memory_store(Arc::new(AppConfig::for_tests()))
    }
}
