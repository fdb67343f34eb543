use serde::{Deserialize, Serialize};

/// Form body for registration and login.
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub email: String,
    pub password: String,
}

/// Response to registration and login: `{email, message}`.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub email: String,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
