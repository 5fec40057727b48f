use serde::{Deserialize, Serialize};

/// Body of `POST /auth/signin`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Body of `POST /auth/signup`.
#[derive(Debug, Clone, Serialize)]
pub struct Registration<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// The part of a user record the session keeps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInfo {
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl From<&AuthResponse> for UserInfo {
    fn from(response: &AuthResponse) -> Self {
        Self {
            display_name: response.username.clone(),
            email: response.email.clone(),
        }
    }
}
