use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{
    repo::{RepoError, UserRepository},
    repo_types::User,
};

/// Process-local user store with the same contract as the Postgres repository.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn users(&self) -> Result<MutexGuard<'_, HashMap<Uuid, User>>, RepoError> {
        self.users
            .lock()
            .map_err(|_| anyhow::anyhow!("in-memory user store poisoned").into())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let users = self.users()?;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_session(&self, session_id: &str) -> Result<Option<User>, RepoError> {
        let users = self.users()?;
        Ok(users
            .values()
            .find(|u| u.session_id.as_deref() == Some(session_id))
            .cloned())
    }

    async fn insert(&self, email: &str, password_hash: &str) -> Result<User, RepoError> {
        let mut users = self.users()?;
        if users.values().any(|u| u.email == email) {
            return Err(RepoError::DuplicateEmail);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_owned(),
            password_hash: password_hash.to_owned(),
            session_id: None,
            created_at: OffsetDateTime::now_utc(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_session(
        &self,
        user_id: Uuid,
        session_id: Option<&str>,
    ) -> Result<(), RepoError> {
        let mut users = self.users()?;
        let user = users.get_mut(&user_id).ok_or(RepoError::NotFound)?;
        user.session_id = session_id.map(str::to_owned);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_then_find_by_email() {
        let repo = InMemoryUserRepository::new();
        let user = repo.insert("a@x.com", "hash").await.unwrap();
        assert!(user.session_id.is_none());

        let found = repo.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(repo.find_by_email("A@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.insert("a@x.com", "h1").await.unwrap();
        let err = repo.insert("a@x.com", "h2").await.unwrap_err();
        assert!(matches!(err, RepoError::DuplicateEmail));
    }

    #[tokio::test]
    async fn session_can_be_set_found_and_cleared() {
        let repo = InMemoryUserRepository::new();
        let user = repo.insert("a@x.com", "hash").await.unwrap();

        repo.update_session(user.id, Some("tok")).await.unwrap();
        let found = repo.find_by_session("tok").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);

        repo.update_session(user.id, None).await.unwrap();
        assert!(repo.find_by_session("tok").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_session_unknown_user_is_not_found() {
        let repo = InMemoryUserRepository::new();
        let err = repo
            .update_session(Uuid::new_v4(), Some("tok"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
    }
}
