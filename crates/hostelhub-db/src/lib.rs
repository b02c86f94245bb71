//! # HostelHub DB
//!
//! The credential store for the HostelHub API, plus connection pool setup
//! and embedded migrations.
//!
//! - [`store`]: the [`IdentityStore`] trait and [`StoreError`]
//! - [`postgres`]: [`PgIdentityStore`], the production store
//! - [`memory`]: [`MemoryIdentityStore`], used by tests
//!
//! # Example
//!
//! ```ignore
//! use hostelhub_db::{PgIdentityStore, init_db_pool, run_migrations};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = init_db_pool().await?;
//!     run_migrations(&pool).await?;
//!     let store = PgIdentityStore::new(pool);
//!     Ok(())
//! }
//! ```

use std::env;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::MemoryIdentityStore;
pub use postgres::PgIdentityStore;
pub use store::{IdentityStore, StoreError};

// Re-export PgPool for convenience
pub use sqlx::PgPool;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Initializes a PostgreSQL connection pool.
///
/// Reads `DATABASE_URL` (required) and `DB_MAX_CONNECTIONS` (default 10).
/// Acquiring a connection gives up after five seconds so a dead database
/// surfaces as an error instead of a hung request.
pub async fn init_db_pool() -> anyhow::Result<PgPool> {
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let max_connections = match env::var("DB_MAX_CONNECTIONS") {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("DB_MAX_CONNECTIONS `{}` is not a number", raw))?,
        Err(_) => DEFAULT_MAX_CONNECTIONS,
    };

    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&database_url)
        .await
        .context("Failed to connect to database")
}

/// Applies the embedded migrations under `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}
