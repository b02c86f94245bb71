use std::sync::Arc;

use anyhow::Context;
use hostelhub_auth::TokenIssuer;
use hostelhub_config::{CorsConfig, JwtConfig};
use hostelhub_db::{IdentityStore, PgIdentityStore, init_db_pool, run_migrations};
use hostelhub_observability::{PrometheusHandle, init_metrics};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn IdentityStore>,
    pub tokens: Arc<TokenIssuer>,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub metrics: Option<PrometheusHandle>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("jwt_config", &self.jwt_config)
            .field("cors_config", &self.cors_config)
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        store: Arc<dyn IdentityStore>,
        jwt_config: JwtConfig,
        cors_config: CorsConfig,
    ) -> Self {
        Self {
            store,
            tokens: Arc::new(TokenIssuer::new(&jwt_config)),
            jwt_config,
            cors_config,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }
}

/// Loads configuration, connects to Postgres, and applies migrations.
///
/// Fails if `JWT_SECRET` is missing or too short, or the database cannot
/// be reached.
pub async fn init_app_state() -> anyhow::Result<AppState> {
    let jwt_config = JwtConfig::from_env().context("Invalid JWT configuration")?;
    let cors_config = CorsConfig::from_env();

    let pool = init_db_pool().await?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let store = Arc::new(PgIdentityStore::new(pool));

    Ok(AppState::new(store, jwt_config, cors_config).with_metrics(init_metrics()))
}
