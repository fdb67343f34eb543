use axum::{
    extract::State,
    response::Redirect,
    routing::{delete, get, post},
    Form, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AccountResponse, CredentialsForm, MessageResponse, ProfileResponse},
        extractors::SessionUser,
    },
    error::ApiError,
    state::AppState,
};

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/users", post(register))
        .route("/profile", get(profile))
}

pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(login).delete(logout))
        .route("/session", delete(logout))
}

pub async fn home() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Bienvenue",
    })
}

#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Json<AccountResponse>, ApiError> {
    let user = state.auth.register(&form.email, &form.password).await?;
    Ok(Json(AccountResponse {
        email: user.email,
        message: "user created",
    }))
}

#[instrument(skip(state, jar, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<(CookieJar, Json<AccountResponse>), ApiError> {
    if !state.auth.valid_login(&form.email, &form.password).await? {
        warn!("invalid credentials");
        return Err(ApiError::Unauthorized);
    }

    // The user may disappear between the check and session creation.
    let token = state
        .auth
        .create_session(&form.email)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    let cookie = Cookie::build((state.config.session_cookie.clone(), token))
        .path("/")
        .http_only(true);

    info!("user logged in");
    Ok((
        jar.add(cookie),
        Json(AccountResponse {
            email: form.email,
            message: "logged in",
        }),
    ))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    SessionUser(user): SessionUser,
) -> Result<(CookieJar, Redirect), ApiError> {
    state.auth.destroy_session(user.id).await?;
    let removal = Cookie::build(state.config.session_cookie.clone()).path("/");
    Ok((jar.remove(removal), Redirect::to("/")))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn profile(SessionUser(user): SessionUser) -> Json<ProfileResponse> {
    Json(ProfileResponse { email: user.email })
}
