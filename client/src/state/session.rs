//! Session store: sole owner of authentication state.
//!
//! ARCHITECTURE
//! ============
//! `SessionStore` is created once by the root component and handed to the tree
//! as a [`SessionHandle`] context. It keeps three things consistent:
//!
//! - the in-memory [`AuthState`] published to listeners (the UI signal),
//! - the durable token in [`TokenStorage`],
//! - every [`TokenObserver`], the `ApiClient` header set among them.
//!
//! All three are derived from a single `update` path, so a token can never be
//! persisted without the HTTP layer seeing it, or the other way round.
//!
//! CONCURRENCY
//! ===========
//! Operations run on the single-threaded UI loop but may overlap at network
//! suspension points. `loading` tracks an in-flight counter rather than a
//! boolean toggle, and a session epoch (bumped whenever the token identity
//! changes or on logout) lets late responses detect that the session they
//! were started for is gone. Such responses are dropped and reported as
//! [`SessionError::Superseded`].

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{Map, Value};

use crate::net::api;
use crate::net::http::{ApiClient, ApiError, TokenObserver};
use crate::net::types::{AuthResponse, RegisterRequest, User};
use crate::state::auth::AuthState;
use crate::util::token_storage::TokenStorage;

pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please try again.";
pub const REGISTER_FAILED_MESSAGE: &str = "Registration failed. Please try again.";
pub const PROFILE_UPDATE_FAILED_MESSAGE: &str = "Profile update failed. Please try again.";
pub const PASSWORD_CHANGE_FAILED_MESSAGE: &str = "Password change failed. Please try again.";
pub const NOT_SIGNED_IN_MESSAGE: &str = "You must be signed in to do that.";

/// Failures propagated by session operations.
///
/// The same text is recorded in [`AuthState::error`] before the error is
/// returned, except for [`SessionError::Superseded`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The backend or transport rejected the request.
    #[error("{message}")]
    Request {
        message: String,
        #[source]
        source: ApiError,
    },

    /// The operation needs a signed-in user.
    #[error("you must be signed in to do that")]
    Unauthenticated,

    /// The session changed (e.g. logout) while the request was in flight.
    #[error("session changed before the request completed")]
    Superseded,
}

pub type SubscriptionId = u64;

type Listener = Arc<dyn Fn(&AuthState) + Send + Sync>;

struct Inner {
    state: AuthState,
    pending: usize,
    epoch: u64,
}

pub struct SessionStore {
    api: Arc<ApiClient>,
    storage: Arc<dyn TokenStorage>,
    inner: Mutex<Inner>,
    token_observers: Mutex<Vec<Arc<dyn TokenObserver>>>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_subscription: AtomicU64,
}

/// Keeps `loading` raised for the lifetime of one backend operation.
///
/// Dropping it (completion, early return, or the future being dropped)
/// releases the in-flight slot.
struct Operation<'a> {
    store: &'a SessionStore,
    epoch: u64,
}

impl Drop for Operation<'_> {
    fn drop(&mut self) {
        self.store.update(|inner| {
            inner.pending = inner.pending.saturating_sub(1);
            inner.state.loading = inner.pending > 0;
        });
    }
}

impl SessionStore {
    /// Create the store, adopting any token left in `storage`.
    ///
    /// The store starts with `loading = true`: the session is unresolved
    /// until [`SessionStore::initialize`] runs. `api` is registered as a
    /// token observer and immediately receives the persisted token.
    pub fn new(api: Arc<ApiClient>, storage: Arc<dyn TokenStorage>) -> Self {
        let token = storage.load();
        let store = Self {
            api: api.clone(),
            storage,
            inner: Mutex::new(Inner {
                state: AuthState { token, user: None, loading: true, error: None },
                pending: 0,
                epoch: 0,
            }),
            token_observers: Mutex::new(Vec::new()),
            listeners: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
        };
        store.observe_token(api);
        store
    }

    #[must_use]
    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    /// Read-only copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> AuthState {
        lock(&self.inner).state.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        lock(&self.inner).state.is_authenticated()
    }

    /// Call `listener` after every state transition.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&AuthState) + Send + Sync + 'static,
    {
        let id = self.next_subscription.fetch_add(1, Ordering::Relaxed);
        lock(&self.listeners).push((id, Arc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        lock(&self.listeners).retain(|(listener_id, _)| *listener_id != id);
    }

    /// Register `observer` for token changes. It is told the current token
    /// right away.
    pub fn observe_token(&self, observer: Arc<dyn TokenObserver>) {
        let token = self.snapshot().token;
        observer.token_changed(token.as_deref());
        lock(&self.token_observers).push(observer);
    }

    /// Detach every listener and observer. State and storage are untouched.
    pub fn dispose(&self) {
        lock(&self.listeners).clear();
        lock(&self.token_observers).clear();
    }

    /// Resolve the persisted token into a user.
    ///
    /// Never fails: a rejected token (or any failure resolving it) ends the
    /// session and leaves [`SESSION_EXPIRED_MESSAGE`] in `error`.
    pub async fn initialize(&self) {
        if self.snapshot().token.is_none() {
            self.update(|inner| inner.state.loading = inner.pending > 0);
            return;
        }

        let op = self.begin();
        match api::fetch_current_user(&self.api).await {
            Ok(user) => {
                let username = user.username.clone();
                let applied = self.apply_if_current(op.epoch, |state| {
                    state.user = Some(user);
                    state.error = None;
                });
                if applied {
                    leptos::logging::log!("session restored for {username}");
                } else {
                    leptos::logging::warn!("discarding session resolution for {username}: session changed");
                }
            }
            Err(err) => {
                leptos::logging::warn!("stored session rejected: {err}");
                self.apply_if_current(op.epoch, |state| {
                    state.token = None;
                    state.user = None;
                    state.error = Some(SESSION_EXPIRED_MESSAGE.to_owned());
                });
            }
        }
    }

    /// Sign in with username and password.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Request`] with the backend message (or a
    /// generic fallback) when the login is rejected, and
    /// [`SessionError::Superseded`] if the session changed mid-flight.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, SessionError> {
        let op = self.begin();
        let result = api::login(&self.api, username, password).await;
        self.finish_authentication(&op, result, LOGIN_FAILED_MESSAGE)
    }

    /// Create an account and sign in with it.
    ///
    /// # Errors
    ///
    /// Same as [`SessionStore::login`].
    pub async fn register(&self, profile: &RegisterRequest) -> Result<AuthResponse, SessionError> {
        let op = self.begin();
        let result = api::register(&self.api, profile).await;
        self.finish_authentication(&op, result, REGISTER_FAILED_MESSAGE)
    }

    /// End the session locally. Idempotent; no backend call.
    pub fn logout(&self) {
        self.storage.clear();
        self.update(|inner| {
            inner.epoch += 1;
            inner.state.token = None;
            inner.state.user = None;
        });
        leptos::logging::log!("signed out");
    }

    /// Update the signed-in user's profile and merge the echoed fields.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Unauthenticated`] without a user, otherwise
    /// the same errors as [`SessionStore::login`].
    pub async fn update_profile(&self, patch: &Map<String, Value>) -> Result<User, SessionError> {
        let Some(user_id) = self.snapshot().user.map(|user| user.id) else {
            self.update(|inner| inner.state.error = Some(NOT_SIGNED_IN_MESSAGE.to_owned()));
            return Err(SessionError::Unauthenticated);
        };

        let op = self.begin();
        let fields = match api::update_profile(&self.api, &user_id, patch).await {
            Ok(fields) => fields,
            Err(err) => return Err(self.fail(&op, err, PROFILE_UPDATE_FAILED_MESSAGE)),
        };
        // Merge against the user as it is now: other updates may have landed
        // while this request was in flight.
        let mut merged = None;
        self.apply_if_current(op.epoch, |state| {
            let Some(user) = state.user.as_ref() else {
                return;
            };
            let result = user.merged(&fields);
            if let Ok(updated) = &result {
                state.user = Some(updated.clone());
                state.error = None;
            }
            merged = Some(result);
        });

        match merged {
            Some(Ok(updated)) => Ok(updated),
            Some(Err(err)) => Err(self.fail(&op, ApiError::Decode(err.to_string()), PROFILE_UPDATE_FAILED_MESSAGE)),
            None => {
                leptos::logging::warn!("discarding profile update: session changed");
                Err(SessionError::Superseded)
            }
        }
    }

    /// Change the password. Session state is unchanged on success.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Request`] when the change is rejected.
    pub async fn change_password(&self, current_password: &str, new_password: &str) -> Result<Value, SessionError> {
        let op = self.begin();
        match api::change_password(&self.api, current_password, new_password).await {
            Ok(confirmation) => Ok(confirmation),
            Err(err) => Err(self.fail(&op, err, PASSWORD_CHANGE_FAILED_MESSAGE)),
        }
    }

    pub fn clear_error(&self) {
        self.update(|inner| inner.state.error = None);
    }

    fn finish_authentication(
        &self,
        op: &Operation<'_>,
        result: Result<AuthResponse, ApiError>,
        fallback: &str,
    ) -> Result<AuthResponse, SessionError> {
        let response = match result {
            Ok(response) => response,
            Err(err) => return Err(self.fail(op, err, fallback)),
        };

        let applied = self.apply_if_current(op.epoch, |state| {
            state.token = Some(response.token.clone());
            state.user = Some(response.user.clone());
            state.error = None;
        });
        if !applied {
            leptos::logging::warn!("discarding sign-in for {}: session changed", response.user.username);
            return Err(SessionError::Superseded);
        }
        leptos::logging::log!("signed in as {} ({})", response.user.username, response.user.role);
        Ok(response)
    }

    /// Record a user-facing message for `err` and build the propagated error.
    fn fail(&self, op: &Operation<'_>, err: ApiError, fallback: &str) -> SessionError {
        let message = failure_message(&err, fallback);
        leptos::logging::warn!("session request failed: {err}");
        self.apply_if_current(op.epoch, |state| state.error = Some(message.clone()));
        SessionError::Request { message, source: err }
    }

    fn begin(&self) -> Operation<'_> {
        let mut epoch = 0;
        self.update(|inner| {
            inner.pending += 1;
            inner.state.loading = true;
            inner.state.error = None;
            epoch = inner.epoch;
        });
        Operation { store: self, epoch }
    }

    fn apply_if_current(&self, epoch: u64, mutate: impl FnOnce(&mut AuthState)) -> bool {
        let mut applied = false;
        self.update(|inner| {
            if inner.epoch == epoch {
                mutate(&mut inner.state);
                applied = true;
            }
        });
        applied
    }

    /// The only mutation path. Persists and broadcasts token changes, then
    /// notifies listeners, all outside the state lock.
    fn update(&self, mutate: impl FnOnce(&mut Inner)) {
        let (snapshot, token_change) = {
            let mut inner = lock(&self.inner);
            let before = inner.state.clone();
            mutate(&mut *inner);
            if inner.state == before {
                return;
            }
            let token_change = (inner.state.token != before.token).then(|| inner.state.token.clone());
            if token_change.is_some() {
                inner.epoch += 1;
            }
            (inner.state.clone(), token_change)
        };

        if let Some(token) = token_change {
            match token.as_deref() {
                Some(token) => self.storage.save(token),
                None => self.storage.clear(),
            }
            let observers = lock(&self.token_observers).clone();
            for observer in observers {
                observer.token_changed(token.as_deref());
            }
        }

        let listeners: Vec<Listener> = lock(&self.listeners)
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(&snapshot);
        }
    }
}

fn failure_message(err: &ApiError, fallback: &str) -> String {
    err.server_message().map_or_else(|| fallback.to_owned(), str::to_owned)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Cloneable context handle to the application's session store.
#[derive(Clone)]
pub struct SessionHandle(Arc<SessionStore>);

impl SessionHandle {
    #[must_use]
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self(store)
    }
}

impl Deref for SessionHandle {
    type Target = SessionStore;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Fetch the session handle provided by `App`.
///
/// # Panics
///
/// Panics if called outside the `App` component tree.
pub fn use_session() -> SessionHandle {
    leptos::prelude::expect_context::<SessionHandle>()
}
