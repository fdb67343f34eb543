use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;
use tracing::warn;

use super::repo_types::User;
use crate::{error::ApiError, state::AppState};

/// Resolves the session cookie to its user, rejecting with 403 otherwise.
pub struct SessionUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(&state.config.session_cookie)
            .map(|c| c.value().to_owned());

        match state.auth.get_user_from_session(token.as_deref()).await? {
            Some(user) => Ok(SessionUser(user)),
            None => {
                warn!(has_cookie = token.is_some(), "session not resolved");
                Err(ApiError::Forbidden)
            }
        }
    }
}
