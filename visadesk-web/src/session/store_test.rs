//! Tests for the session store
//!
//! Drives every session action against a scripted identity service and an
//! in-memory storage, checking state, persistence and navigation together.

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use crate::api::{IdentityError, IdentityService, test_implementations::ScriptedIdentityService};
    use crate::config::RegistrationMode;
    use crate::routes::Route;
    use crate::session::storage::{MemoryStorage, PROFILE_KEY, TOKEN_KEY, USER_KEY};
    use crate::session::store::{
        LOGIN_FAILED, LOGOUT_FAILED, PROFILE_UPDATE_FAILED, REGISTER_FAILED, RouteNavigator,
        SessionStore,
    };
    use crate::session::{DurableStorage, Session};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use shared::models::{
        AuthResponse, Gender, LoginRequest, MaritalStatus, MessageResponse, Profile,
        RegisterRequest, RegisterResponse, Role, UpdateUserRequest, User, UserId, UserResponse,
    };
    use std::{cell::RefCell, rc::Rc};
    use tokio::sync::oneshot;

    #[derive(Default)]
    struct RecordingNavigator {
        visited: RefCell<Vec<Route>>,
    }

    impl RouteNavigator for RecordingNavigator {
        fn navigate(&self, route: Route) {
            self.visited.borrow_mut().push(route);
        }
    }

    impl RecordingNavigator {
        fn last(&self) -> Option<Route> {
            self.visited.borrow().last().copied()
        }
    }

    struct Harness {
        identity: Rc<ScriptedIdentityService>,
        storage: Rc<MemoryStorage>,
        navigator: Rc<RecordingNavigator>,
        store: SessionStore,
    }

    impl Harness {
        fn new() -> Self {
            Self::with(MemoryStorage::new(), RegistrationMode::SignIn)
        }

        fn with(storage: MemoryStorage, mode: RegistrationMode) -> Self {
            let _ = env_logger::builder().is_test(true).try_init();
            let identity = Rc::new(ScriptedIdentityService::default());
            let storage = Rc::new(storage);
            let navigator = Rc::new(RecordingNavigator::default());
            let store = SessionStore::new(identity.clone(), storage.clone(), navigator.clone(), mode);
            Self {
                identity,
                storage,
                navigator,
                store,
            }
        }

        /// A second client instance reading the same durable storage.
        fn reopen(&self) -> SessionStore {
            SessionStore::new(
                Rc::new(ScriptedIdentityService::default()),
                self.storage.clone(),
                Rc::new(RecordingNavigator::default()),
                RegistrationMode::SignIn,
            )
        }

        fn signed_in(role: Role) -> Self {
            let user_json = serde_json::to_string(&user(10, role)).unwrap();
            Self::with(
                MemoryStorage::with_entries([(USER_KEY, user_json.as_str()), (TOKEN_KEY, "old-token")]),
                RegistrationMode::SignIn,
            )
        }
    }

    fn user(id: u64, role: Role) -> User {
        User {
            id,
            name: format!("User {id}"),
            email: format!("user{id}@example.com"),
            phone: None,
            role,
        }
    }

    fn profile() -> Profile {
        Profile {
            first_name: "Mariama".to_string(),
            last_name: "Ba".to_string(),
            phone: "+221771234567".to_string(),
            gender: Gender::Female,
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 15).unwrap(),
            place_of_birth: "Thiès".to_string(),
            marital_status: MaritalStatus::Married,
            nationality: "Senegalese".to_string(),
        }
    }

    fn auth(user: User, token: &str) -> AuthResponse {
        AuthResponse {
            access_token: token.to_string(),
            token_type: Some("Bearer".to_string()),
            user,
            profile: None,
            message: None,
        }
    }

    fn credentials() -> LoginRequest {
        LoginRequest {
            email: "user@example.com".to_string(),
            password: "secret".to_string(),
        }
    }

    fn registration() -> RegisterRequest {
        RegisterRequest {
            name: "New Applicant".to_string(),
            email: "new@example.com".to_string(),
            phone: "770000000".to_string(),
            password: "secret123".to_string(),
            role: Role::Custom,
        }
    }

    fn assert_consistent(session: &Session) {
        assert_eq!(
            session.is_authenticated(),
            session.current_user().is_some() && session.token().is_some()
        );
    }

    #[tokio::test]
    async fn login_success_commits_persists_and_redirects() {
        let harness = Harness::new();
        harness
            .identity
            .login
            .borrow_mut()
            .push_back(Ok(auth(user(1, Role::Admin), "1|token")));

        let response = harness.store.login(credentials()).await.unwrap();

        assert_eq!(response.access_token, "1|token");
        assert!(harness.store.is_authenticated());
        assert_eq!(harness.store.role(), Some(Role::Admin));
        assert_eq!(harness.store.token().as_deref(), Some("1|token"));
        assert_eq!(harness.store.last_error(), None);
        assert!(!harness.store.loading());
        assert_eq!(harness.storage.read(TOKEN_KEY).as_deref(), Some("1|token"));
        assert!(harness.storage.read(USER_KEY).is_some());
        assert_eq!(harness.navigator.last(), Some(Route::AdminDashboard));
    }

    #[tokio::test]
    async fn login_then_rehydrate_on_fresh_instance_round_trips() {
        let harness = Harness::new();
        let mut response = auth(user(2, Role::Agent), "2|token");
        response.profile = Some(profile());
        harness.identity.login.borrow_mut().push_back(Ok(response));
        harness.store.login(credentials()).await.unwrap();

        let reopened = harness.reopen();

        assert!(reopened.is_authenticated());
        assert_eq!(reopened.role(), Some(Role::Agent));
        assert_eq!(reopened.token().as_deref(), Some("2|token"));
        assert_eq!(reopened.snapshot().profile(), Some(&profile()));
    }

    #[tokio::test]
    async fn login_rejected_with_server_message() {
        let harness = Harness::new();
        harness
            .identity
            .login
            .borrow_mut()
            .push_back(Err(IdentityError::Unauthorized {
                message: Some("Invalid credentials".to_string()),
            }));

        let result = harness.store.login(credentials()).await;

        assert!(matches!(result, Err(IdentityError::Unauthorized { .. })));
        assert!(!harness.store.is_authenticated());
        assert_eq!(harness.store.last_error().as_deref(), Some("Invalid credentials"));
        assert!(!harness.store.loading());
        assert!(harness.navigator.visited.borrow().is_empty());
        assert!(harness.storage.is_empty());
    }

    #[tokio::test]
    async fn login_network_failure_uses_fallback_and_keeps_prior_session() {
        let harness = Harness::signed_in(Role::Custom);
        assert!(harness.store.is_authenticated());

        // Nothing scripted: the fake answers with a network error.
        let result = harness.store.login(credentials()).await;

        assert!(matches!(result, Err(IdentityError::Network(_))));
        assert_eq!(harness.store.last_error().as_deref(), Some(LOGIN_FAILED));
        assert!(harness.store.is_authenticated());
        assert_eq!(harness.store.token().as_deref(), Some("old-token"));
        assert_eq!(harness.storage.read(TOKEN_KEY).as_deref(), Some("old-token"));
        assert!(!harness.store.loading());
    }

    #[tokio::test]
    async fn login_with_blank_fields_is_rejected_locally() {
        let harness = Harness::new();
        let result = harness
            .store
            .login(LoginRequest {
                email: "  ".to_string(),
                password: String::new(),
            })
            .await;

        assert!(matches!(result, Err(IdentityError::Validation { .. })));
        assert_eq!(harness.identity.calls.get(), 0);
        assert!(harness.store.last_error().is_some());
    }

    #[tokio::test]
    async fn loading_is_raised_during_request_and_every_snapshot_is_consistent() {
        let harness = Harness::new();
        let seen = Rc::new(RefCell::new(Vec::<Session>::new()));
        {
            let seen = seen.clone();
            harness
                .store
                .on_change(move |session| seen.borrow_mut().push(session.clone()));
        }
        harness
            .identity
            .login
            .borrow_mut()
            .push_back(Ok(auth(user(3, Role::Custom), "3|token")));

        harness.store.login(credentials()).await.unwrap();
        harness.store.logout().await;

        let seen = seen.borrow();
        assert!(seen.iter().any(Session::loading));
        assert!(!seen.last().unwrap().loading());
        seen.iter().for_each(assert_consistent);
    }

    #[tokio::test]
    async fn logout_tears_down_even_when_invalidation_fails() {
        let harness = Harness::signed_in(Role::Admin);
        harness
            .identity
            .logout
            .borrow_mut()
            .push_back(Err(IdentityError::Unknown {
                status: Some(500),
                message: None,
            }));

        harness.store.logout().await;

        assert!(!harness.store.is_authenticated());
        assert_eq!(harness.store.current_user(), None);
        assert!(harness.storage.is_empty());
        assert_eq!(harness.store.last_error().as_deref(), Some(LOGOUT_FAILED));
        assert_eq!(harness.navigator.last(), Some(Route::Login));
        assert_eq!(*harness.identity.tokens_seen.borrow(), vec!["old-token".to_string()]);
    }

    #[tokio::test]
    async fn logout_success_clears_profile_too() {
        let user_json = serde_json::to_string(&user(4, Role::Custom)).unwrap();
        let profile_json = serde_json::to_string(&profile()).unwrap();
        let harness = Harness::with(
            MemoryStorage::with_entries([
                (USER_KEY, user_json.as_str()),
                (TOKEN_KEY, "tok"),
                (PROFILE_KEY, profile_json.as_str()),
            ]),
            RegistrationMode::SignIn,
        );
        assert!(harness.store.snapshot().profile().is_some());
        harness.identity.logout.borrow_mut().push_back(Ok(()));

        harness.store.logout().await;

        assert_eq!(harness.store.snapshot(), Session::default());
        assert!(harness.storage.is_empty());
    }

    #[tokio::test]
    async fn logout_without_session_skips_invalidation() {
        let harness = Harness::new();
        harness.store.logout().await;

        assert_eq!(harness.identity.calls.get(), 0);
        assert!(!harness.store.is_authenticated());
        assert_eq!(harness.navigator.last(), Some(Route::Login));
    }

    #[test]
    fn rehydrate_with_null_token_and_no_user_is_anonymous() {
        let harness = Harness::with(
            MemoryStorage::with_entries([(TOKEN_KEY, "null")]),
            RegistrationMode::SignIn,
        );
        assert!(!harness.store.is_authenticated());
        assert_eq!(harness.store.snapshot(), Session::default());
    }

    #[test]
    fn rehydrate_is_idempotent() {
        let harness = Harness::signed_in(Role::Agent);
        harness.store.rehydrate();
        let first = harness.store.snapshot();
        harness.store.rehydrate();
        assert_eq!(harness.store.snapshot(), first);
        assert!(first.is_authenticated());
        assert_eq!(harness.identity.calls.get(), 0);
    }

    #[tokio::test]
    async fn validate_unauthorized_forces_teardown_and_login_redirect() {
        let harness = Harness::signed_in(Role::Custom);
        harness
            .identity
            .current_user
            .borrow_mut()
            .push_back(Err(IdentityError::Unauthorized { message: None }));

        let result = harness.store.validate().await;

        assert!(matches!(result, Err(IdentityError::Unauthorized { .. })));
        assert!(!harness.store.is_authenticated());
        assert!(harness.storage.is_empty());
        assert_eq!(harness.navigator.last(), Some(Route::Login));
    }

    #[tokio::test]
    async fn validate_success_refreshes_user() {
        let harness = Harness::signed_in(Role::Custom);
        let mut fresh = user(10, Role::Custom);
        fresh.name = "Updated Name".to_string();
        harness
            .identity
            .current_user
            .borrow_mut()
            .push_back(Ok(fresh.clone()));

        let validated = harness.store.validate().await.unwrap();

        assert_eq!(validated, Some(fresh.clone()));
        assert_eq!(harness.store.current_user(), Some(fresh));
        let stored: User = serde_json::from_str(&harness.storage.read(USER_KEY).unwrap()).unwrap();
        assert_eq!(stored.name, "Updated Name");
        assert!(harness.navigator.visited.borrow().is_empty());
    }

    #[tokio::test]
    async fn validate_transport_failure_keeps_session() {
        let harness = Harness::signed_in(Role::Admin);

        let result = harness.store.validate().await;

        assert!(matches!(result, Err(IdentityError::Network(_))));
        assert!(harness.store.is_authenticated());
        assert!(harness.store.last_error().is_some());
    }

    #[tokio::test]
    async fn validate_without_session_makes_no_request() {
        let harness = Harness::new();
        assert_eq!(harness.store.validate().await, Ok(None));
        assert_eq!(harness.identity.calls.get(), 0);
    }

    #[tokio::test]
    async fn register_signs_in_when_credentials_returned() {
        let harness = Harness::new();
        harness
            .identity
            .register
            .borrow_mut()
            .push_back(Ok(RegisterResponse::Authenticated(auth(
                user(20, Role::Custom),
                "20|token",
            ))));

        harness.store.register(registration()).await.unwrap();

        assert!(harness.store.is_authenticated());
        assert_eq!(harness.navigator.last(), Some(Route::CustomDashboard));
    }

    #[tokio::test]
    async fn register_confirmation_sends_user_to_login() {
        let harness = Harness::new();
        harness
            .identity
            .register
            .borrow_mut()
            .push_back(Ok(RegisterResponse::Confirmation(MessageResponse {
                message: "Account created".to_string(),
            })));

        let response = harness.store.register(registration()).await.unwrap();

        assert_eq!(response.message(), Some("Account created"));
        assert!(!harness.store.is_authenticated());
        assert_eq!(harness.navigator.last(), Some(Route::Login));
    }

    #[tokio::test]
    async fn register_confirm_only_mode_never_signs_in() {
        let harness = Harness::with(MemoryStorage::new(), RegistrationMode::ConfirmOnly);
        harness
            .identity
            .register
            .borrow_mut()
            .push_back(Ok(RegisterResponse::Authenticated(auth(
                user(21, Role::Custom),
                "21|token",
            ))));

        harness.store.register(registration()).await.unwrap();

        assert!(!harness.store.is_authenticated());
        assert!(harness.storage.is_empty());
        assert_eq!(harness.navigator.last(), Some(Route::Login));
    }

    #[tokio::test]
    async fn register_failure_reports_validation_message() {
        let harness = Harness::new();
        harness
            .identity
            .register
            .borrow_mut()
            .push_back(Err(IdentityError::Validation {
                message: Some("The email has already been taken.".to_string()),
                fields: Default::default(),
            }));

        let result = harness.store.register(registration()).await;

        assert!(result.is_err());
        assert_eq!(
            harness.store.last_error().as_deref(),
            Some("The email has already been taken.")
        );
        assert!(!harness.store.loading());
    }

    #[tokio::test]
    async fn update_profile_for_own_account_replaces_user_and_profile() {
        let harness = Harness::signed_in(Role::Custom);
        let mut updated = user(10, Role::Custom);
        updated.phone = Some("+221760000000".to_string());
        harness
            .identity
            .update_user
            .borrow_mut()
            .push_back(Ok(UserResponse {
                message: Some("updated".to_string()),
                user: updated.clone(),
                profile: Some(profile()),
            }));

        let changes = UpdateUserRequest {
            phone: updated.phone.clone(),
            ..UpdateUserRequest::default()
        };
        harness.store.update_profile(10, changes).await.unwrap();

        assert_eq!(harness.store.current_user(), Some(updated));
        assert_eq!(harness.store.token().as_deref(), Some("old-token"));
        assert_eq!(harness.store.snapshot().profile(), Some(&profile()));
        assert!(harness.storage.read(PROFILE_KEY).is_some());
    }

    #[tokio::test]
    async fn update_profile_for_other_account_leaves_session_user() {
        let harness = Harness::signed_in(Role::Admin);
        let before = harness.store.current_user();
        harness
            .identity
            .update_user
            .borrow_mut()
            .push_back(Ok(UserResponse {
                message: None,
                user: user(99, Role::Agent),
                profile: None,
            }));

        harness
            .store
            .update_profile(99, UpdateUserRequest::default())
            .await
            .unwrap();

        assert_eq!(harness.store.current_user(), before);
    }

    #[tokio::test]
    async fn update_profile_requires_session() {
        let harness = Harness::new();
        let result = harness
            .store
            .update_profile(1, UpdateUserRequest::default())
            .await;

        assert!(matches!(result, Err(IdentityError::Unauthorized { .. })));
        assert_eq!(
            harness.store.last_error().as_deref(),
            Some(PROFILE_UPDATE_FAILED)
        );
        assert_eq!(harness.identity.calls.get(), 0);
    }

    #[test]
    fn stores_compare_by_identity() {
        let harness = Harness::new();
        let other = harness.reopen();
        assert_eq!(harness.store, harness.store.clone());
        assert_ne!(harness.store, other);
    }

    /// Signs in immediately, but holds `current_user` until released and then
    /// rejects the token it was asked about.
    struct GatedIdentityService {
        gate: RefCell<Option<oneshot::Receiver<()>>>,
    }

    #[async_trait(?Send)]
    impl IdentityService for GatedIdentityService {
        async fn login(&self, _request: &LoginRequest) -> Result<AuthResponse, IdentityError> {
            Ok(auth(user(10, Role::Custom), "new-token"))
        }

        async fn register(
            &self,
            _request: &RegisterRequest,
        ) -> Result<RegisterResponse, IdentityError> {
            Err(IdentityError::Network("not scripted".to_string()))
        }

        async fn logout(&self, _token: &str) -> Result<(), IdentityError> {
            Ok(())
        }

        async fn current_user(&self, _token: &str) -> Result<User, IdentityError> {
            let gate = self.gate.borrow_mut().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            Err(IdentityError::Unauthorized { message: None })
        }

        async fn update_user(
            &self,
            _token: &str,
            _id: UserId,
            _request: &UpdateUserRequest,
        ) -> Result<UserResponse, IdentityError> {
            Err(IdentityError::Network("not scripted".to_string()))
        }
    }

    #[tokio::test]
    async fn validate_leaves_session_of_newer_login_untouched() {
        let _ = env_logger::builder().is_test(true).try_init();
        let (release, gate) = oneshot::channel();
        let user_json = serde_json::to_string(&user(10, Role::Custom)).unwrap();
        let storage = Rc::new(MemoryStorage::with_entries([
            (USER_KEY, user_json.as_str()),
            (TOKEN_KEY, "old-token"),
        ]));
        let navigator = Rc::new(RecordingNavigator::default());
        let store = SessionStore::new(
            Rc::new(GatedIdentityService {
                gate: RefCell::new(Some(gate)),
            }),
            storage.clone(),
            navigator.clone(),
            RegistrationMode::SignIn,
        );

        let (validated, ()) = tokio::join!(store.validate(), async {
            store.login(credentials()).await.unwrap();
            release.send(()).unwrap();
        });

        assert!(matches!(validated, Err(IdentityError::Unauthorized { .. })));
        assert!(store.is_authenticated());
        assert_eq!(store.token().as_deref(), Some("new-token"));
        assert_eq!(store.last_error(), None);
        assert!(!store.loading());
        assert_eq!(storage.read(TOKEN_KEY).as_deref(), Some("new-token"));
        assert_eq!(navigator.last(), Some(Route::CustomDashboard));
    }

    #[tokio::test]
    async fn update_profile_publishes_user_and_profile_together() {
        let harness = Harness::signed_in(Role::Custom);
        let seen = Rc::new(RefCell::new(Vec::<Session>::new()));
        {
            let seen = seen.clone();
            harness
                .store
                .on_change(move |session| seen.borrow_mut().push(session.clone()));
        }
        let mut renamed = user(10, Role::Custom);
        renamed.name = "Renamed".to_string();
        harness
            .identity
            .update_user
            .borrow_mut()
            .push_back(Ok(UserResponse {
                message: None,
                user: renamed.clone(),
                profile: Some(profile()),
            }));

        harness
            .store
            .update_profile(10, UpdateUserRequest::default())
            .await
            .unwrap();

        let seen = seen.borrow();
        let expected_profile = profile();
        let half_applied = seen
            .iter()
            .filter(|session| {
                (session.current_user() == Some(&renamed))
                    != (session.profile() == Some(&expected_profile))
            })
            .count();
        assert_eq!(half_applied, 0);
        assert!(seen.iter().any(|session| session.current_user() == Some(&renamed)));
    }

    #[tokio::test]
    async fn register_network_failure_uses_fallback() {
        let harness = Harness::new();

        let result = harness.store.register(registration()).await;

        assert!(matches!(result, Err(IdentityError::Network(_))));
        assert_eq!(harness.store.last_error().as_deref(), Some(REGISTER_FAILED));
        assert!(!harness.store.is_authenticated());
        assert!(!harness.store.loading());
        assert!(harness.navigator.visited.borrow().is_empty());
    }
}
