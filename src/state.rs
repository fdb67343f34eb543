use crate::auth::{
    memory::InMemoryUserRepository,
    repo::{PgUserRepository, UserRepository},
    services::AuthService,
};
use crate::config::AppConfig;
use anyhow::Context;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: AuthService,
    pub db: Option<PgPool>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let (db, repo) = match &config.database_url {
            Some(url) => {
                let db = sqlx::postgres::PgPoolOptions::new()
                    .max_connections(config.database_max_connections)
                    .connect(url)
                    .await
                    .context("connect to database")?;
                let repo = Arc::new(PgUserRepository::new(db.clone())) as Arc<dyn UserRepository>;
                (Some(db), repo)
            }
            None => {
                warn!("DATABASE_URL not set; users are kept in memory and lost on restart");
                let repo = Arc::new(InMemoryUserRepository::new()) as Arc<dyn UserRepository>;
                (None, repo)
            }
        };

        Ok(Self::from_parts(config, repo, db))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        repo: Arc<dyn UserRepository>,
        db: Option<PgPool>,
    ) -> Self {
        Self {
            config,
            auth: AuthService::new(repo),
            db,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            database_url: None,
            database_max_connections: 1,
            host: "127.0.0.1".into(),
            port: 0,
            session_cookie: "session_id".into(),
        });
        Self::from_parts(config, Arc::new(InMemoryUserRepository::new()), None)
    }
}
