//! Session lifecycle management.
//!
//! The session manager is the single writer of the session fields in
//! storage (`token`, `user_id`, `user_info`); the dispatcher and every
//! other reader only observe them. Two states: `unauthenticated` and
//! `authenticated`, keyed on token presence.
//!
//! A 401 on any non-login endpoint forces the `authenticated →
//! unauthenticated` transition centrally (see
//! [`Dispatcher`](crate::http::Dispatcher)): the session is purged and
//! navigation is replaced to the login route carrying the originally
//! intended destination. The login endpoints themselves are exempt - a 401
//! there means wrong credentials, and redirecting would loop.

use std::sync::{Arc, Mutex};

use order_ease_core::{ShopId, UserId};

use crate::api::paths;
use crate::models::UserInfo;
use crate::routes;
use crate::storage::{Storage, keys};

/// Where the app navigates when the session layer forces a redirect.
///
/// The route table owns actual navigation; this capability is injected so
/// the session manager stays testable and UI-free.
pub trait Navigator: Send + Sync {
    /// The path the user is currently on, used as the post-login return
    /// target.
    fn current_path(&self) -> String;

    /// Replace the current history entry (no back-navigation to the
    /// expired page).
    fn replace(&self, path: &str);
}

/// Navigator for headless use: reports the root path, drops replacements.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn current_path(&self) -> String {
        "/".to_string()
    }

    fn replace(&self, _path: &str) {}
}

/// In-memory session mirror. The durable copy lives in storage.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub token: Option<String>,
    pub user_id: Option<UserId>,
    pub shop_id: Option<ShopId>,
}

impl Session {
    /// Whether the session holds a usable token.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.as_ref().is_some_and(|token| !token.is_empty())
    }
}

/// Owns the current auth token and user identity.
///
/// Cheaply cloneable; clones share state.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    storage: Storage,
    navigator: Arc<dyn Navigator>,
    state: Mutex<Session>,
}

impl SessionManager {
    /// Create a session manager over the given storage and navigator.
    #[must_use]
    pub fn new(storage: Storage, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                storage,
                navigator,
                state: Mutex::new(Session::default()),
            }),
        }
    }

    /// Restore session fields from storage. Called once at app start;
    /// hydration is explicit, not automatic.
    pub fn hydrate(&self) {
        let storage = &self.inner.storage;
        let mut state = self.lock_state();

        state.token = storage.get_string(keys::TOKEN).filter(|t| !t.is_empty());
        state.user_id = storage
            .get_string(keys::USER_ID)
            .filter(|id| !id.is_empty())
            .map(UserId::new);
        state.shop_id = storage
            .get_string(keys::SHOP_ID)
            .filter(|id| !id.is_empty())
            .map(ShopId::new);
    }

    /// Current session snapshot.
    #[must_use]
    pub fn session(&self) -> Session {
        self.lock_state().clone()
    }

    /// Whether a user is currently authenticated.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock_state().is_authenticated()
    }

    /// `unauthenticated → authenticated`: apply a successful
    /// login/registration/token-exchange response.
    pub fn apply_login(&self, token: &str, user: &UserInfo) {
        let storage = &self.inner.storage;
        storage.set(keys::TOKEN, token);
        storage.set(keys::USER_ID, user.id.as_str());
        storage.set(keys::USER_INFO, user);

        let mut state = self.lock_state();
        state.token = Some(token.to_owned());
        state.user_id = Some(user.id.clone());

        tracing::info!(user_id = %user.id, "session established");
    }

    /// Select the shop venue. `shop_id` is venue-scoped, not
    /// session-scoped: it survives logout.
    pub fn set_shop(&self, shop_id: &ShopId) {
        self.inner.storage.set(keys::SHOP_ID, shop_id.as_str());
        self.lock_state().shop_id = Some(shop_id.clone());
    }

    /// `authenticated → unauthenticated` via explicit logout: clears the
    /// full user identity (token, profile, and user id). `shop_id` stays.
    pub fn logout(&self) {
        let storage = &self.inner.storage;
        storage.remove(keys::TOKEN);
        storage.remove(keys::USER_INFO);
        storage.remove(keys::USER_ID);

        let mut state = self.lock_state();
        state.token = None;
        state.user_id = None;

        tracing::info!("session cleared");
    }

    /// `authenticated → unauthenticated` forced by an unauthorized
    /// response on a non-login endpoint.
    ///
    /// Clears the token and profile but keeps `shop_id` (venue-scoped) and
    /// the stored `user_id`, then replaces navigation to the login route
    /// with the current path preserved as the return target. Already being
    /// on the login route suppresses the redirect.
    pub fn handle_unauthorized(&self) {
        let storage = &self.inner.storage;
        storage.remove(keys::TOKEN);
        storage.remove(keys::USER_INFO);

        self.lock_state().token = None;

        let current = self.inner.navigator.current_path();
        if !current.starts_with(routes::LOGIN_ROUTE) {
            self.inner.navigator.replace(&routes::login_redirect(&current));
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, Session> {
        // There is no parallelism in the client event loop; a poisoned
        // lock means a panic already unwound mid-mutation, and the session
        // mirror is still safe to read
        match self.inner.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Whether a request URL targets one of the session-minting endpoints.
///
/// A 401 from these means bad credentials, not an expired session.
#[must_use]
pub fn is_login_endpoint(url: &str) -> bool {
    [paths::USER_LOGIN, paths::USER_REGISTER, paths::SHOP_TEMP_LOGIN]
        .iter()
        .any(|path| url.contains(path))
}
