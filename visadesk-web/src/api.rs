use crate::config::FrontendConfig;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, header::ACCEPT};
use serde::de::DeserializeOwned;
use shared::models::{
    AuthResponse, ErrorResponse, LoginRequest, MeResponse, RegisterRequest, RegisterResponse,
    UpdateUserRequest, User, UserId, UserResponse,
};
use std::collections::BTreeMap;
use thiserror::Error;

/// Failure of an identity-service call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// No response was received.
    #[error("network error: {0}")]
    Network(String),
    /// Credentials rejected or token no longer valid.
    #[error("unauthorized: {}", .message.as_deref().unwrap_or("no message"))]
    Unauthorized { message: Option<String> },
    /// Input rejected by the server (or locally, before sending).
    #[error("validation failed: {}", .message.as_deref().unwrap_or("no message"))]
    Validation {
        message: Option<String>,
        fields: BTreeMap<String, Vec<String>>,
    },
    /// Any other failure, including an undecodable success body.
    #[error("request failed (status {status:?}): {}", .message.as_deref().unwrap_or("no message"))]
    Unknown {
        status: Option<u16>,
        message: Option<String>,
    },
}

impl IdentityError {
    /// A local validation failure with a single message.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::Validation {
            message: Some(message.into()),
            fields: BTreeMap::new(),
        }
    }

    /// Message suitable for showing to the user, when one was provided.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Network(_) => None,
            Self::Unauthorized { message }
            | Self::Validation { message, .. }
            | Self::Unknown { message, .. } => message.as_deref(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

/// Map a non-success HTTP status and its body to an [`IdentityError`].
pub fn classify_failure(status: u16, body: &str) -> IdentityError {
    let parsed = serde_json::from_str::<ErrorResponse>(body).ok();
    if let Some(error) = &parsed {
        log::debug!("identity service answered {status}: {error}");
    }
    let message = parsed
        .as_ref()
        .map(|error| error.message.trim())
        .filter(|message| !message.is_empty())
        .map(str::to_string);

    match StatusCode::from_u16(status) {
        Ok(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
            IdentityError::Unauthorized { message }
        }
        Ok(StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY) => {
            // Some validation bodies only carry per-field messages.
            let message = message.or_else(|| {
                parsed
                    .as_ref()
                    .and_then(ErrorResponse::first_field_error)
                    .map(str::to_string)
            });
            IdentityError::Validation {
                message,
                fields: parsed.map(|error| error.errors).unwrap_or_default(),
            }
        }
        _ => IdentityError::Unknown {
            status: Some(status),
            message,
        },
    }
}

/// The external identity service.
#[async_trait(?Send)]
pub trait IdentityService {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, IdentityError>;

    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, IdentityError>;

    /// Invalidate `token` server-side.
    async fn logout(&self, token: &str) -> Result<(), IdentityError>;

    /// Identity currently bound to `token`.
    async fn current_user(&self, token: &str) -> Result<User, IdentityError>;

    async fn update_user(
        &self,
        token: &str,
        id: UserId,
        request: &UpdateUserRequest,
    ) -> Result<UserResponse, IdentityError>;
}

/// HTTP client for the VisaDesk identity endpoints.
#[derive(Clone, Debug)]
pub struct VisaDeskClient {
    base_url: String,
    client: Client,
}

impl VisaDeskClient {
    /// Create a new API client with the provided base URL.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn from_config(config: &FrontendConfig) -> Self {
        Self::new(config.api_base_url())
    }

    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, IdentityError> {
        let response = request
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| IdentityError::Network(err.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify_failure(status.as_u16(), &body))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, IdentityError> {
        let response = self.send(request).await?;
        let status = response.status().as_u16();
        response.json::<T>().await.map_err(|err| {
            log::warn!("undecodable identity response (status {status}): {err}");
            IdentityError::Unknown {
                status: Some(status),
                message: None,
            }
        })
    }
}

#[async_trait(?Send)]
impl IdentityService for VisaDeskClient {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, IdentityError> {
        let url = self.api_url("auth/login");
        self.send_json(self.client.post(url).json(request)).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, IdentityError> {
        let url = self.api_url("auth/register");
        self.send_json(self.client.post(url).json(request)).await
    }

    async fn logout(&self, token: &str) -> Result<(), IdentityError> {
        let url = self.api_url("auth/logout");
        self.send(self.client.post(url).bearer_auth(token)).await?;
        Ok(())
    }

    async fn current_user(&self, token: &str) -> Result<User, IdentityError> {
        let url = self.api_url("users/me");
        let response: MeResponse = self.send_json(self.client.get(url).bearer_auth(token)).await?;
        Ok(response.into_user())
    }

    async fn update_user(
        &self,
        token: &str,
        id: UserId,
        request: &UpdateUserRequest,
    ) -> Result<UserResponse, IdentityError> {
        let url = self.api_url(&format!("user/update/{id}"));
        self.send_json(self.client.put(url).bearer_auth(token).json(request))
            .await
    }
}
