//! Frontend configuration module
//!
//! Values are baked in at build time from `VISADESK_*` environment variables,
//! falling back to local development defaults.

use std::str::FromStr;

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";

/// What a successful registration does to the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RegistrationMode {
    /// Sign the new account in when the server returns credentials.
    #[default]
    SignIn,
    /// Only confirm; the user signs in afterwards.
    ConfirmOnly,
}

impl FromStr for RegistrationMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "sign_in" => Ok(Self::SignIn),
            "confirm_only" => Ok(Self::ConfirmOnly),
            other => Err(format!("unknown registration mode `{other}`")),
        }
    }
}

/// Frontend configuration for the identity service and session behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontendConfig {
    /// Base URL of the identity/REST API
    pub api_base_url: String,
    /// Behavior after `register`
    pub registration_mode: RegistrationMode,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self::from_values(
            option_env!("VISADESK_API_BASE_URL"),
            option_env!("VISADESK_REGISTRATION_MODE"),
        )
    }
}

impl FrontendConfig {
    /// Create a new frontend configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve configuration from optional raw values. Unparsable values fall back to defaults.
    pub fn from_values(api_base_url: Option<&str>, registration_mode: Option<&str>) -> Self {
        let registration_mode = registration_mode
            .map(RegistrationMode::from_str)
            .transpose()
            .unwrap_or_else(|err| {
                log::warn!("{err}; using default registration mode");
                None
            })
            .unwrap_or_default();

        Self {
            api_base_url: api_base_url
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(DEFAULT_API_BASE_URL)
                .to_string(),
            registration_mode,
        }
    }

    /// Get the API base URL
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }
}
