pub mod actions;
pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod schema;

pub use db::DbPool;

use config::Config;
use std::sync::Arc;

use crate::actions::ActionContext;
use crate::auth::CredentialsProvider;
use crate::cache::PathCache;

pub struct AppState {
    pub config: Config,
    pub db: DbPool,
    pub cache: Arc<PathCache>,
    pub actions: ActionContext,
}

impl AppState {
    pub fn new(config: Config, db: DbPool) -> Self {
        let cache = Arc::new(PathCache::new());
        let auth = Arc::new(CredentialsProvider::new(
            db.clone(),
            chrono::Duration::hours(config.auth.session_ttl_hours),
        ));
        let actions = ActionContext::new(db.clone(), cache.clone(), auth);
        Self {
            config,
            db,
            cache,
            actions,
        }
    }
}
