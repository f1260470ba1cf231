use shared::models::{Profile, Role, User};
use std::fmt;

/// An identity paired with the bearer token issued for it.
///
/// User and token only exist together, so a session can never hold one
/// without the other.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: User,
    pub token: String,
}

impl Credentials {
    pub fn new(user: User, token: impl Into<String>) -> Self {
        Self {
            user,
            token: token.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// In-memory record of the current authenticated identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    credentials: Option<Credentials>,
    profile: Option<Profile>,
    loading: bool,
    last_error: Option<String>,
}

impl Session {
    pub(crate) fn restored(credentials: Option<Credentials>, profile: Option<Profile>) -> Self {
        let profile = credentials.as_ref().and(profile);
        Self {
            credentials,
            profile,
            ..Self::default()
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.credentials.as_ref().map(|credentials| &credentials.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.credentials
            .as_ref()
            .map(|credentials| credentials.token.as_str())
    }

    pub fn role(&self) -> Option<Role> {
        self.current_user().map(|user| user.role)
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// An identity request is in flight.
    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub(crate) fn authenticate(&mut self, credentials: Credentials, profile: Option<Profile>) {
        self.credentials = Some(credentials);
        self.profile = profile;
        self.last_error = None;
    }

    /// Drops the identity, token and profile in one step. `last_error` is kept
    /// so a failed invalidation can still be reported.
    pub(crate) fn clear(&mut self) {
        self.credentials = None;
        self.profile = None;
    }

    /// Replace the stored user if it is the same account. Returns whether it did.
    pub(crate) fn refresh_user(&mut self, user: User) -> bool {
        match self.credentials.as_mut() {
            Some(credentials) if credentials.user.id == user.id => {
                credentials.user = user;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn set_profile(&mut self, profile: Profile) {
        if self.credentials.is_some() {
            self.profile = Some(profile);
        }
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub(crate) fn set_error(&mut self, message: Option<String>) {
        self.last_error = message;
    }
}
