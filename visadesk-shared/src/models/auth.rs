use serde::{Deserialize, Serialize};

use super::user::{Profile, User};

/// Successful authentication: a bearer token and the identity it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    pub user: User,
    #[serde(default, rename = "profil", skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Plain acknowledgement carrying only a message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

/// `POST /auth/register` answers either with credentials or with a confirmation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RegisterResponse {
    Authenticated(AuthResponse),
    Confirmation(MessageResponse),
}

impl RegisterResponse {
    /// Server-provided message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Authenticated(auth) => auth.message.as_deref(),
            Self::Confirmation(confirmation) => Some(confirmation.message.as_str()),
        }
    }
}

/// `GET /users/me` returns the user either wrapped or bare, depending on the backend version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum MeResponse {
    Wrapped { user: User },
    Bare(User),
}

impl MeResponse {
    pub fn into_user(self) -> User {
        match self {
            Self::Wrapped { user } | Self::Bare(user) => user,
        }
    }
}

/// Result of `PUT /user/update/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: User,
    #[serde(default, rename = "profil", skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
}
