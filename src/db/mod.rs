//! Database module - AppState and database operations
//!
//! Split into submodules by concern:
//! - `account` - login accounts and refresh sessions
//! - `catalog` - cargo/AFP/salud/territorial lookups and EPP/ODI catalogs
//! - `company` - company records
//! - `worker` - worker roster queries

mod account;
mod catalog;
mod company;
mod worker;

pub use catalog::{
    classify_conflict, Afp, Cargo, ConflictKind, EppCatalogItem, OdiCatalogEntry, Salud,
    Territorial,
};
pub use company::Empresa;
pub use worker::{NuevoTrabajador, TrabajadorResumen};

use moka::future::Cache;
use sqlx::PgPool;
use std::env;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// AFP and salud catalogs are global and change rarely; lookups are
    /// cached by lowercased name.
    pub afp_cache: Cache<String, Afp>,
    pub salud_cache: Cache<String, Salud>,
}

impl AppState {
    pub async fn new() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let database_url =
            env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(50)
            .min_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(900))
            .max_lifetime(Duration::from_secs(1800))
            .connect(&database_url)
            .await?;

        Ok(Self::with_pool(pool))
    }

    /// Build state over an existing pool (used by tests).
    pub fn with_pool(pool: PgPool) -> Self {
        let afp_cache = Cache::builder()
            .time_to_live(Duration::from_secs(10 * 60))
            .max_capacity(100)
            .build();
        let salud_cache = Cache::builder()
            .time_to_live(Duration::from_secs(10 * 60))
            .max_capacity(100)
            .build();

        AppState {
            pool,
            afp_cache,
            salud_cache,
        }
    }
}
