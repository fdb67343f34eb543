use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::User;

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("user not found")]
    NotFound,
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// Storage capability consumed by the auth service.
///
/// Lookups report absence as `Ok(None)`. Email uniqueness is the store's
/// responsibility and a duplicate insert must surface as `DuplicateEmail`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_session(&self, session_id: &str) -> Result<Option<User>, RepoError>;

    async fn insert(&self, email: &str, password_hash: &str) -> Result<User, RepoError>;

    /// Overwrites the user's session token; `None` clears it.
    async fn update_session(&self, user_id: Uuid, session_id: Option<&str>)
        -> Result<(), RepoError>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, session_id, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn find_by_session(&self, session_id: &str) -> Result<Option<User>, RepoError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, session_id, created_at
            FROM users
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.db)
        .await
        .context("find user by session")?;
        Ok(user)
    }

    async fn insert(&self, email: &str, password_hash: &str) -> Result<User, RepoError> {
        let res = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, session_id, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await;

        match res {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(RepoError::DuplicateEmail)
            }
            Err(e) => Err(anyhow::Error::new(e).context("insert user").into()),
        }
    }

    async fn update_session(
        &self,
        user_id: Uuid,
        session_id: Option<&str>,
    ) -> Result<(), RepoError> {
        let res = sqlx::query(
            r#"
            UPDATE users
               SET session_id = $2
             WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(session_id) // Option<&str> → NULL allowed
        .execute(&self.db)
        .await
        .context("update user session")?;

        if res.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    async fn repo() -> PgUserRepository {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL for postgres tests");
        let db = PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .expect("connect");
        sqlx::migrate!("./migrations").run(&db).await.expect("migrate");
        PgUserRepository::new(db)
    }

    fn unique_email() -> String {
        format!("{}@pg.test", Uuid::new_v4())
    }

    #[tokio::test]
    #[ignore = "needs a postgres DATABASE_URL"]
    async fn duplicate_email_maps_to_duplicate_error() {
        let repo = repo().await;
        let email = unique_email();
        repo.insert(&email, "h1").await.unwrap();
        let err = repo.insert(&email, "h2").await.unwrap_err();
        assert!(matches!(err, RepoError::DuplicateEmail));
    }

    #[tokio::test]
    #[ignore = "needs a postgres DATABASE_URL"]
    async fn update_session_on_missing_row_is_not_found() {
        let repo = repo().await;
        let err = repo
            .update_session(Uuid::new_v4(), Some("tok"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
    }

    #[tokio::test]
    #[ignore = "needs a postgres DATABASE_URL"]
    async fn session_set_lookup_and_clear() {
        let repo = repo().await;
        let user = repo.insert(&unique_email(), "h").await.unwrap();
        let token = Uuid::new_v4().to_string();

        repo.update_session(user.id, Some(&token)).await.unwrap();
        let found = repo.find_by_session(&token).await.unwrap().unwrap();
        assert_eq!(found.id, user.id);

        repo.update_session(user.id, None).await.unwrap();
        assert!(repo.find_by_session(&token).await.unwrap().is_none());
    }
}
