//! Named backend endpoint surface.
//!
//! Thin wrappers that build descriptors and hand them to the dispatcher.
//! Context injection (shop, user, auth) happens in the dispatcher, not
//! here; the one thing these methods add is failing fast when an endpoint
//! is meaningless without context the session cannot supply.

use std::sync::Arc;

use serde_json::json;
use tracing::instrument;

use order_ease_core::{OrderId, TagId};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::{Dispatcher, NormalizedResponse, RequestDescriptor};
use crate::models::{LoginPayload, RegisterRequest};
use crate::session::{Navigator, SessionManager};
use crate::storage::{Storage, keys};

/// Backend endpoint paths.
pub mod paths {
    pub const SHOP_DETAIL: &str = "/shop/detail";
    pub const TAG_LIST: &str = "/tag/list";
    pub const TAG_BOUND_PRODUCTS: &str = "/tag/bound-products";
    pub const ORDER_CREATE: &str = "/order/create";
    pub const ORDER_USER_LIST: &str = "/order/user/list";
    pub const ORDER_DETAIL: &str = "/order/detail";
    pub const USER_LOGIN: &str = "/user/login";
    pub const USER_REGISTER: &str = "/user/register";
    pub const SHOP_TEMP_LOGIN: &str = "/shop/temp-login";
}

/// Outcome of a session-minting call.
///
/// A non-200 response is data, not an error: wrong credentials surface as
/// `Rejected` carrying the normalized response for the caller to display.
#[derive(Debug)]
pub enum LoginResult {
    /// The session was established.
    Authenticated(LoginPayload),
    /// The backend declined; the session is unchanged.
    Rejected(NormalizedResponse),
}

/// The client context object: storage, session, dispatcher, and the named
/// endpoint surface, wired together once at startup.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    config: ClientConfig,
    storage: Storage,
    session: SessionManager,
    dispatcher: Dispatcher,
}

impl ApiClient {
    /// Wire a client from explicit parts (tests inject doubles here).
    #[must_use]
    pub fn new(config: ClientConfig, storage: Storage, session: SessionManager) -> Self {
        let dispatcher = Dispatcher::new(&config, storage.clone(), session.clone());
        Self {
            inner: Arc::new(ApiClientInner {
                config,
                storage,
                session,
                dispatcher,
            }),
        }
    }

    /// Wire the full stack from configuration: storage backend, session
    /// manager, dispatcher.
    #[must_use]
    pub fn from_config(config: ClientConfig, navigator: Arc<dyn Navigator>) -> Self {
        let storage = Storage::from_config(&config);
        let session = SessionManager::new(storage.clone(), navigator);
        Self::new(config, storage, session)
    }

    /// The client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The storage facade.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.inner.storage
    }

    /// The session manager.
    #[must_use]
    pub fn session(&self) -> &SessionManager {
        &self.inner.session
    }

    /// The request dispatcher, for calls outside the named surface.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.inner.dispatcher
    }

    // =========================================================================
    // Shop & catalog
    // =========================================================================

    /// Fetch the current shop's detail.
    ///
    /// # Errors
    ///
    /// Fails fast with `MissingContext` when no shop has been selected;
    /// otherwise errors as `dispatch` does.
    #[instrument(skip(self))]
    pub async fn shop_detail(&self) -> Result<NormalizedResponse, ClientError> {
        self.require_context(keys::SHOP_ID)?;
        self.inner
            .dispatcher
            .dispatch(RequestDescriptor::get(paths::SHOP_DETAIL))
            .await
    }

    /// Fetch the shop's tag (menu category) list.
    ///
    /// # Errors
    ///
    /// Errors as `dispatch` does.
    #[instrument(skip(self))]
    pub async fn tag_list(&self) -> Result<NormalizedResponse, ClientError> {
        self.inner
            .dispatcher
            .dispatch(RequestDescriptor::get(paths::TAG_LIST))
            .await
    }

    /// Fetch one page of the products bound to a tag.
    ///
    /// # Errors
    ///
    /// Errors as `dispatch` does.
    #[instrument(skip(self))]
    pub async fn tag_bound_products(
        &self,
        tag_id: &TagId,
        page: u32,
        page_size: usize,
    ) -> Result<NormalizedResponse, ClientError> {
        let descriptor = RequestDescriptor::get(paths::TAG_BOUND_PRODUCTS)
            .with_param("tag_id", tag_id.as_str())
            .with_param("page", page.to_string())
            .with_param("pageSize", page_size.to_string());
        self.inner.dispatcher.dispatch(descriptor).await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Submit an order. The dispatcher merges `shop_id`/`user_id` into the
    /// body.
    ///
    /// # Errors
    ///
    /// Errors as `dispatch` does.
    #[instrument(skip_all)]
    pub async fn create_order(
        &self,
        order: serde_json::Value,
    ) -> Result<NormalizedResponse, ClientError> {
        self.inner
            .dispatcher
            .dispatch(RequestDescriptor::post(paths::ORDER_CREATE, order))
            .await
    }

    /// Fetch one page of the current user's order history.
    ///
    /// # Errors
    ///
    /// Fails fast with `MissingContext` when no user is logged in;
    /// otherwise errors as `dispatch` does.
    #[instrument(skip(self))]
    pub async fn user_orders(
        &self,
        page: u32,
        page_size: usize,
    ) -> Result<NormalizedResponse, ClientError> {
        self.require_context(keys::USER_ID)?;
        let descriptor = RequestDescriptor::get(paths::ORDER_USER_LIST)
            .with_param("page", page.to_string())
            .with_param("pageSize", page_size.to_string());
        self.inner.dispatcher.dispatch(descriptor).await
    }

    /// Fetch one order's detail.
    ///
    /// # Errors
    ///
    /// Errors as `dispatch` does.
    #[instrument(skip(self))]
    pub async fn order_detail(&self, id: &OrderId) -> Result<NormalizedResponse, ClientError> {
        let descriptor =
            RequestDescriptor::get(paths::ORDER_DETAIL).with_param("id", id.as_str());
        self.inner.dispatcher.dispatch(descriptor).await
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Log in with username and password. On success the session
    /// transition is applied before returning.
    ///
    /// # Errors
    ///
    /// Errors as `dispatch` does, or `Parse` when a 200 response does not
    /// carry a login payload.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResult, ClientError> {
        let body = json!({ "username": username, "password": password });
        self.mint_session(RequestDescriptor::post(paths::USER_LOGIN, body))
            .await
    }

    /// Register a new account. A successful registration also logs in.
    ///
    /// # Errors
    ///
    /// Errors as `dispatch` does, or `Parse` when a 200 response does not
    /// carry a login payload.
    #[instrument(skip_all)]
    pub async fn register(&self, request: &RegisterRequest) -> Result<LoginResult, ClientError> {
        let body = serde_json::to_value(request)?;
        self.mint_session(RequestDescriptor::post(paths::USER_REGISTER, body))
            .await
    }

    /// Exchange an externally issued token for a session (shop-scoped
    /// guest login).
    ///
    /// # Errors
    ///
    /// Errors as `dispatch` does, or `Parse` when a 200 response does not
    /// carry a login payload.
    #[instrument(skip_all)]
    pub async fn temp_login(&self, token: &str) -> Result<LoginResult, ClientError> {
        let body = json!({ "token": token });
        self.mint_session(RequestDescriptor::post(paths::SHOP_TEMP_LOGIN, body))
            .await
    }

    /// Dispatch a session-minting request and apply the transition on
    /// success.
    async fn mint_session(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<LoginResult, ClientError> {
        let response = self.inner.dispatcher.dispatch(descriptor).await?;
        if !response.is_ok() {
            return Ok(LoginResult::Rejected(response));
        }

        let payload: LoginPayload = response.data_as()?;
        self.inner.session.apply_login(&payload.token, &payload.user);
        Ok(LoginResult::Authenticated(payload))
    }

    /// Fail fast when a required session field is absent from storage.
    fn require_context(&self, key: &'static str) -> Result<(), ClientError> {
        self.inner
            .storage
            .get_string(key)
            .filter(|value| !value.is_empty())
            .map(|_| ())
            .ok_or(ClientError::MissingContext(key))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use crate::session::NoopNavigator;
    use crate::storage::MemoryBackend;

    fn client() -> ApiClient {
        let config = ClientConfig::default();
        let storage = Storage::new(Arc::new(MemoryBackend::new()));
        let session = SessionManager::new(storage.clone(), Arc::new(NoopNavigator));
        ApiClient::new(config, storage, session)
    }

    #[tokio::test]
    async fn test_shop_detail_fails_fast_without_shop() {
        let client = client();
        let result = client.shop_detail().await;
        assert!(matches!(result, Err(ClientError::MissingContext("shop_id"))));
    }

    #[tokio::test]
    async fn test_user_orders_fail_fast_without_user() {
        let client = client();
        let result = client.user_orders(1, 20).await;
        assert!(matches!(result, Err(ClientError::MissingContext("user_id"))));
    }

    #[tokio::test]
    async fn test_empty_stored_shop_id_still_fails_fast() {
        let client = client();
        client.storage().set(keys::SHOP_ID, "");
        let result = client.shop_detail().await;
        assert!(matches!(result, Err(ClientError::MissingContext("shop_id"))));
    }

    #[test]
    fn test_paths_are_rooted() {
        for path in [
            paths::SHOP_DETAIL,
            paths::TAG_LIST,
            paths::TAG_BOUND_PRODUCTS,
            paths::ORDER_CREATE,
            paths::ORDER_USER_LIST,
            paths::ORDER_DETAIL,
            paths::USER_LOGIN,
            paths::USER_REGISTER,
            paths::SHOP_TEMP_LOGIN,
        ] {
            assert!(path.starts_with('/'));
        }
    }
}
