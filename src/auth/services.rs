use std::sync::Arc;

use lazy_static::lazy_static;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{
    password::{hash_password, verify_password},
    repo::{RepoError, UserRepository},
    repo_types::User,
    token::new_session_token,
};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("email already registered")]
    AlreadyRegistered,
    #[error("invalid email")]
    InvalidEmail,
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<RepoError> for AuthError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::DuplicateEmail => AuthError::AlreadyRegistered,
            RepoError::NotFound => AuthError::Unexpected(anyhow::anyhow!("user not found")),
            RepoError::Unexpected(e) => AuthError::Unexpected(e),
        }
    }
}

lazy_static! {
    /// Verified against when the email is unknown, so a miss costs one Argon2 run too.
    static ref DUMMY_HASH: Option<String> = hash_password("user-auth-dummy-password").ok();
}

/// Registration, credential checks and session lifecycle on top of a [`UserRepository`].
///
/// "No such user" and "no such session" are reported as `false`/`None`, never
/// as errors, so callers cannot tell an unknown email from a wrong password.
/// `AuthError::Unexpected` is reserved for storage and entropy faults.
#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn UserRepository>,
}

impl AuthService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, password))]
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        if email.trim().is_empty() {
            warn!("empty email");
            return Err(AuthError::InvalidEmail);
        }

        if self.repo.find_by_email(email).await?.is_some() {
            warn!("email already registered");
            return Err(AuthError::AlreadyRegistered);
        }

        let hash = hash_password(password)?;
        // A concurrent register can still win the insert; the store reports it
        // as a duplicate, which converts to AlreadyRegistered.
        let user = self.repo.insert(email, &hash).await?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    #[instrument(skip(self, password))]
    pub async fn valid_login(&self, email: &str, password: &str) -> Result<bool, AuthError> {
        let Some(user) = self.repo.find_by_email(email).await? else {
            debug!("login for unknown email");
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                verify_password(password, dummy);
            }
            return Ok(false);
        };
        let ok = verify_password(password, &user.password_hash);
        if !ok {
            debug!(user_id = %user.id, "login with wrong password");
        }
        Ok(ok)
    }

    /// Issues a fresh session token for `email`, replacing any previous one.
    #[instrument(skip(self))]
    pub async fn create_session(&self, email: &str) -> Result<Option<String>, AuthError> {
        let Some(user) = self.repo.find_by_email(email).await? else {
            debug!("no user for session");
            return Ok(None);
        };
        let token = new_session_token()?;
        match self.repo.update_session(user.id, Some(&token)).await {
            Ok(()) => {}
            Err(RepoError::NotFound) => {
                warn!(user_id = %user.id, "user vanished before session was stored");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        }
        info!(user_id = %user.id, "session created");
        Ok(Some(token))
    }

    #[instrument(skip_all)]
    pub async fn get_user_from_session(
        &self,
        session_id: Option<&str>,
    ) -> Result<Option<User>, AuthError> {
        let Some(session_id) = session_id.filter(|s| !s.is_empty()) else {
            return Ok(None);
        };
        Ok(self.repo.find_by_session(session_id).await?)
    }

    /// Clears the user's session. Clearing an absent session or an unknown
    /// user is a no-op.
    #[instrument(skip(self))]
    pub async fn destroy_session(&self, user_id: Uuid) -> Result<(), AuthError> {
        match self.repo.update_session(user_id, None).await {
            Ok(()) => {
                info!("session destroyed");
                Ok(())
            }
            Err(RepoError::NotFound) => {
                debug!("destroy_session for unknown user");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
