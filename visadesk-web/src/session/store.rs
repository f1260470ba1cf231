//! The session state container.
//!
//! One [`SessionStore`] is constructed per running client and shared by handle
//! (Yew context, route guard, pages). Every action awaits the identity service
//! without holding a borrow of the state, then commits all of its field
//! changes in a single borrow, so readers only ever see whole actions.

use super::{
    state::{Credentials, Session},
    storage::{self, DurableStorage, StorageError},
};
use crate::{
    api::{IdentityError, IdentityService},
    config::RegistrationMode,
    routes::{Route, landing_route},
};
use shared::models::{
    AuthResponse, LoginRequest, RegisterRequest, RegisterResponse, Role, UpdateUserRequest, User,
    UserId, UserResponse,
};
use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

pub const LOGIN_FAILED: &str = "Login failed. Check your credentials.";
pub const REGISTER_FAILED: &str = "Registration failed.";
pub const LOGOUT_FAILED: &str = "The server could not end the session; you have been signed out locally.";
pub const SESSION_EXPIRED: &str = "Your session has expired. Please sign in again.";
pub const VALIDATE_FAILED: &str = "Could not verify your session.";
pub const PROFILE_UPDATE_FAILED: &str = "Profile update failed.";

/// Where session actions send the user after they complete.
pub trait RouteNavigator {
    fn navigate(&self, route: Route);
}

impl RouteNavigator for yew_router::navigator::Navigator {
    fn navigate(&self, route: Route) {
        self.push(&route);
    }
}

type Observer = Rc<dyn Fn(&Session)>;

/// Shared handle to the process-wide session.
#[derive(Clone)]
pub struct SessionStore {
    inner: Rc<Inner>,
}

struct Inner {
    state: RefCell<Session>,
    pending: Cell<usize>,
    identity: Rc<dyn IdentityService>,
    storage: Rc<dyn DurableStorage>,
    navigator: Rc<dyn RouteNavigator>,
    registration_mode: RegistrationMode,
    observer: RefCell<Option<Observer>>,
}

/// Keeps `loading` raised until every in-flight request has finished,
/// whichever way it exits.
struct InFlight<'a> {
    store: &'a SessionStore,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let pending = &self.store.inner.pending;
        pending.set(pending.get().saturating_sub(1));
        let still_loading = pending.get() > 0;
        self.store.commit(|session| session.set_loading(still_loading));
    }
}

impl SessionStore {
    /// Build the store and rehydrate it from `storage`.
    pub fn new(
        identity: Rc<dyn IdentityService>,
        storage: Rc<dyn DurableStorage>,
        navigator: Rc<dyn RouteNavigator>,
        registration_mode: RegistrationMode,
    ) -> Self {
        let store = Self {
            inner: Rc::new(Inner {
                state: RefCell::new(Session::default()),
                pending: Cell::new(0),
                identity,
                storage,
                navigator,
                registration_mode,
                observer: RefCell::new(None),
            }),
        };
        store.rehydrate();
        store
    }

    /// Register the callback invoked with every committed state.
    pub fn on_change(&self, observer: impl Fn(&Session) + 'static) {
        *self.inner.observer.borrow_mut() = Some(Rc::new(observer));
    }

    pub fn snapshot(&self) -> Session {
        self.inner.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    pub fn role(&self) -> Option<Role> {
        self.inner.state.borrow().role()
    }

    pub fn current_user(&self) -> Option<User> {
        self.inner.state.borrow().current_user().cloned()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.state.borrow().token().map(str::to_string)
    }

    pub fn loading(&self) -> bool {
        self.inner.state.borrow().loading()
    }

    pub fn last_error(&self) -> Option<String> {
        self.inner.state.borrow().last_error().map(str::to_string)
    }

    /// Reload the session from durable storage. Never fails: anything missing
    /// or malformed yields an anonymous session. No network call is made.
    pub fn rehydrate(&self) {
        let persisted = storage::load(self.storage());
        let authenticated = persisted.credentials.is_some();
        self.commit(|session| {
            let loading = session.loading();
            *session = Session::restored(persisted.credentials, persisted.profile);
            session.set_loading(loading);
        });
        log::debug!("session rehydrated (authenticated: {authenticated})");
    }

    /// Authenticate with email and password, then go to the role's landing route.
    pub async fn login(&self, credentials: LoginRequest) -> Result<AuthResponse, IdentityError> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(self.fail(
                IdentityError::invalid_input("Email and password are required."),
                LOGIN_FAILED,
            ));
        }

        let _in_flight = self.begin_request();
        match self.inner.identity.login(&credentials).await {
            Ok(response) => {
                self.sign_in(&response);
                Ok(response)
            }
            Err(err) => Err(self.fail(err, LOGIN_FAILED)),
        }
    }

    /// Create an account. Whether the new account is signed in depends on the
    /// configured [`RegistrationMode`] and on the server returning credentials.
    pub async fn register(
        &self,
        request: RegisterRequest,
    ) -> Result<RegisterResponse, IdentityError> {
        let missing = [&request.name, &request.email, &request.password]
            .iter()
            .any(|field| field.trim().is_empty());
        if missing {
            return Err(self.fail(
                IdentityError::invalid_input("Name, email and password are required."),
                REGISTER_FAILED,
            ));
        }

        let _in_flight = self.begin_request();
        match self.inner.identity.register(&request).await {
            Ok(response) => {
                match (&response, self.inner.registration_mode) {
                    (RegisterResponse::Authenticated(auth), RegistrationMode::SignIn) => {
                        self.sign_in(auth);
                    }
                    _ => {
                        log::info!("account registered for {}; sign-in required", request.email);
                        self.inner.navigator.navigate(Route::Login);
                    }
                }
                Ok(response)
            }
            Err(err) => Err(self.fail(err, REGISTER_FAILED)),
        }
    }

    /// End the session. Server-side invalidation is best-effort; local teardown
    /// always happens.
    pub async fn logout(&self) {
        let _in_flight = self.begin_request();
        if let Some(token) = self.token() {
            if let Err(err) = self.inner.identity.logout(&token).await {
                self.fail(err, LOGOUT_FAILED);
            }
        }
        self.teardown();
        log::info!("signed out");
        self.inner.navigator.navigate(Route::Login);
    }

    /// Confirm the rehydrated token with the identity service.
    ///
    /// Returns `Ok(None)` without a request when there is no session. An
    /// unauthorized answer tears the session down and redirects to login.
    pub async fn validate(&self) -> Result<Option<User>, IdentityError> {
        let Some(token) = self.token() else {
            return Ok(None);
        };

        let _in_flight = self.begin_request();
        match self.inner.identity.current_user(&token).await {
            Ok(user) => {
                if self.holds_token(&token) {
                    self.apply_user(user.clone());
                }
                Ok(Some(user))
            }
            // A newer login may have replaced the token while we waited; its
            // session is left alone.
            Err(err) if !self.holds_token(&token) => {
                log::debug!("ignoring validation result for a replaced token: {err}");
                Err(err)
            }
            Err(err) if err.is_unauthorized() => {
                let err = self.fail(err, SESSION_EXPIRED);
                self.teardown();
                self.inner.navigator.navigate(Route::Login);
                Err(err)
            }
            Err(err) => Err(self.fail(err, VALIDATE_FAILED)),
        }
    }

    /// Update an account. When it is the signed-in account, the session user
    /// (and applicant profile, if returned) are replaced together.
    pub async fn update_profile(
        &self,
        id: UserId,
        changes: UpdateUserRequest,
    ) -> Result<UserResponse, IdentityError> {
        let Some(token) = self.token() else {
            return Err(self.fail(
                IdentityError::Unauthorized { message: None },
                PROFILE_UPDATE_FAILED,
            ));
        };

        let _in_flight = self.begin_request();
        match self.inner.identity.update_user(&token, id, &changes).await {
            Ok(response) => {
                let own_account = self
                    .current_user()
                    .is_some_and(|user| user.id == response.user.id);
                if own_account {
                    persist("user", storage::save_user(self.storage(), &response.user));
                    if let Some(profile) = &response.profile {
                        persist("profile", storage::save_profile(self.storage(), Some(profile)));
                    }
                    let user = response.user.clone();
                    let profile = response.profile.clone();
                    self.commit(|session| {
                        if session.refresh_user(user) {
                            if let Some(profile) = profile {
                                session.set_profile(profile);
                            }
                        }
                    });
                }
                Ok(response)
            }
            Err(err) => Err(self.fail(err, PROFILE_UPDATE_FAILED)),
        }
    }

    fn storage(&self) -> &dyn DurableStorage {
        &*self.inner.storage
    }

    fn commit(&self, change: impl FnOnce(&mut Session)) {
        let snapshot = {
            let mut state = self.inner.state.borrow_mut();
            change(&mut state);
            state.clone()
        };
        let observer = self.inner.observer.borrow().clone();
        if let Some(observer) = observer {
            observer(&snapshot);
        }
    }

    fn begin_request(&self) -> InFlight<'_> {
        let pending = &self.inner.pending;
        pending.set(pending.get() + 1);
        self.commit(|session| {
            session.set_loading(true);
            session.set_error(None);
        });
        InFlight { store: self }
    }

    /// Record `err` as the visible error, preferring the server's message.
    fn fail(&self, err: IdentityError, fallback: &str) -> IdentityError {
        log::warn!("{fallback} ({err})");
        let message = err.server_message().unwrap_or(fallback).to_string();
        self.commit(|session| session.set_error(Some(message)));
        err
    }

    fn sign_in(&self, response: &AuthResponse) {
        let credentials = Credentials::new(response.user.clone(), response.access_token.clone());
        let role = credentials.user.role;
        persist("credentials", storage::save_credentials(self.storage(), &credentials));
        persist(
            "profile",
            storage::save_profile(self.storage(), response.profile.as_ref()),
        );
        self.commit(|session| session.authenticate(credentials, response.profile.clone()));
        log::info!("signed in as {role}");
        self.inner.navigator.navigate(landing_route(Some(role)));
    }

    fn apply_user(&self, user: User) {
        let mut refreshed = false;
        let stored = user.clone();
        self.commit(|session| refreshed = session.refresh_user(user));
        if refreshed {
            persist("user", storage::save_user(self.storage(), &stored));
        } else {
            log::warn!("identity service returned a different account; keeping session user");
        }
    }

    fn holds_token(&self, token: &str) -> bool {
        self.inner.state.borrow().token() == Some(token)
    }

    fn teardown(&self) {
        storage::clear(self.storage());
        self.commit(Session::clear);
    }
}

/// Storage failures are logged and never fail an action.
fn persist(what: &str, result: Result<(), StorageError>) {
    if let Err(err) = result {
        log::warn!("could not persist {what}: {err}");
    }
}

impl PartialEq for SessionStore {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &*self.inner.state.borrow())
            .field("registration_mode", &self.inner.registration_mode)
            .finish_non_exhaustive()
    }
}
