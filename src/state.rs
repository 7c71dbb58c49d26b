use crate::config::Config;
use crate::scoring::PlacementLayout;
use axum::extract::FromRef;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    /// Layout used for placement tests that don't carry their own.
    pub layout: Arc<PlacementLayout>,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        Self {
            pool,
            config,
            layout: Arc::new(PlacementLayout::standard()),
        }
    }
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<PlacementLayout> {
    fn from_ref(state: &AppState) -> Self {
        state.layout.clone()
    }
}
