//! Request dispatch: the single path every outgoing call goes through.
//!
//! Historically this logic was duplicated across client builds; it is
//! consolidated here behind one contract. The dispatcher:
//!
//! 1. reads the session context (`shop_id`, `user_id`, `token`) from
//!    storage - never from the descriptor,
//! 2. resolves the target URL against the configured base URL,
//! 3. injects the context into query parameters or the JSON body according
//!    to the parameter-placement rule (the backend depends on where these
//!    fields arrive, so the rule is reproduced exactly),
//! 4. issues the call with a default 5000 ms timeout, and
//! 5. normalizes the outcome: any received response resolves (non-200
//!    statuses are data), only transport-level failures reject.
//!
//! Request building is a pure function ([`prepare`]) over the context and
//! descriptor; the async shell around it owns the transport.

mod types;

pub use types::{
    FilePart, Method, NormalizedResponse, PreparedRequest, RequestBody, RequestDescriptor,
};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::instrument;
use url::Url;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::session::{self, SessionManager};
use crate::storage::{Storage, keys};

/// Header carrying the client-generated request ID, for log correlation
/// with the backend.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Session fields injected into outgoing requests.
///
/// Read from storage at dispatch time; empty strings count as absent (the
/// host storage layer cannot distinguish the two).
#[derive(Debug, Clone, Default)]
pub(crate) struct SessionContext {
    pub shop_id: Option<String>,
    pub user_id: Option<String>,
    pub token: Option<String>,
}

impl SessionContext {
    pub(crate) fn from_storage(storage: &Storage) -> Self {
        let read = |key: &str| storage.get_string(key).filter(|value| !value.is_empty());

        Self {
            shop_id: read(keys::SHOP_ID),
            user_id: read(keys::USER_ID),
            token: read(keys::TOKEN),
        }
    }
}

/// Issues HTTP calls with session context injected.
///
/// Cheaply cloneable; clones share the same transport connection pool.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    client: reqwest::Client,
    base_url: String,
    default_timeout: Duration,
    storage: Storage,
    session: SessionManager,
}

impl Dispatcher {
    /// Create a dispatcher over the given storage and session manager.
    #[must_use]
    pub fn new(config: &ClientConfig, storage: Storage, session: SessionManager) -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                default_timeout: Duration::from_millis(config.timeout_ms),
                storage,
                session,
            }),
        }
    }

    /// Issue a single call. Resolves or rejects exactly once.
    ///
    /// Any response that arrived resolves - including 401, whose session
    /// side effect (purge + redirect to login) fires here regardless of
    /// whether the caller inspects the result.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Transport` when no response was received
    /// (DNS, connect, timeout), or `ClientError::Url` when the target URL
    /// cannot be constructed.
    #[instrument(
        skip_all,
        fields(method = %descriptor.method, url = %descriptor.url, request_id = tracing::field::Empty)
    )]
    pub async fn dispatch(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<NormalizedResponse, ClientError> {
        let request_id = Uuid::new_v4();
        tracing::Span::current().record("request_id", tracing::field::display(&request_id));

        let context = SessionContext::from_storage(&self.inner.storage);
        let prepared = prepare(
            &self.inner.base_url,
            self.inner.default_timeout,
            &context,
            &descriptor,
        )?;

        let mut request = self
            .inner
            .client
            .request(prepared.method.clone(), prepared.url.clone())
            .timeout(prepared.timeout)
            .header(REQUEST_ID_HEADER, request_id.to_string());

        for (name, value) in &prepared.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        request = match prepared.body {
            RequestBody::Empty => request,
            RequestBody::Json(ref value) => request.json(value),
            RequestBody::Multipart(parts) => request.multipart(build_form(parts)?),
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(%error, "transport failure");
                return Err(ClientError::Transport(error));
            }
        };

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_owned(), v.to_owned()))
            })
            .collect();

        // Body read failures mean we never got a usable response
        let text = response.text().await.map_err(ClientError::Transport)?;
        let data = if text.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
        };

        let normalized = NormalizedResponse {
            status,
            data,
            headers,
            config: descriptor,
        };

        self.interpret(&normalized);
        Ok(normalized)
    }

    /// Apply central response policy: a 401 on any non-login endpoint
    /// expires the session.
    fn interpret(&self, response: &NormalizedResponse) {
        if response.status == 401 && !session::is_login_endpoint(&response.config.url) {
            tracing::warn!(url = %response.config.url, "unauthorized response, expiring session");
            self.inner.session.handle_unauthorized();
        } else if !response.is_ok() {
            tracing::debug!(
                status = response.status,
                url = %response.config.url,
                "non-success response"
            );
        }
    }
}

/// Build the outgoing request from the base URL, session context, and
/// descriptor. Pure: no I/O, no clock, no randomness.
///
/// # Errors
///
/// Returns `ClientError::Url` when the target URL cannot be parsed.
pub(crate) fn prepare(
    base_url: &str,
    default_timeout: Duration,
    context: &SessionContext,
    descriptor: &RequestDescriptor,
) -> Result<PreparedRequest, ClientError> {
    // Descriptor URLs carrying a scheme are used as-is; everything else is
    // appended to the configured base URL verbatim (no path normalization -
    // the base URL carries a path prefix that Url::join would discard).
    let target = if descriptor.url.starts_with("http") {
        descriptor.url.clone()
    } else {
        format!("{base_url}{}", descriptor.url)
    };
    let mut url = Url::parse(&target)?;

    let mut params = descriptor.params.clone();
    let mut body = descriptor.body.clone();

    let is_write = descriptor.method == Method::POST || descriptor.method == Method::PUT;
    let inject_into_body = is_write && body.has_json_payload();

    if inject_into_body {
        if let RequestBody::Json(value) = &mut body {
            if let Some(object) = value.as_object_mut() {
                // The stored context is authoritative: it overwrites any
                // caller-supplied shop_id/user_id in the body.
                if let Some(shop_id) = &context.shop_id {
                    object.insert(keys::SHOP_ID.to_owned(), serde_json::json!(shop_id));
                }
                if let Some(user_id) = &context.user_id {
                    object.insert(keys::USER_ID.to_owned(), serde_json::json!(user_id));
                }
            } else {
                // Present but unmergeable (non-object) body: fall back to
                // query placement rather than corrupting the payload
                inject_params(&mut params, context);
            }
        }
    } else {
        // GET/DELETE, multipart uploads (body reserved for the file), and
        // empty write bodies all place context in the query
        inject_params(&mut params, context);
    }

    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &params {
            pairs.append_pair(key, value);
        }
    }

    // Default headers first, then caller overrides, then Authorization -
    // the token always wins
    let mut headers: Vec<(String, String)> = Vec::new();
    if !matches!(body, RequestBody::Multipart(_)) {
        headers.push(("Content-Type".to_owned(), "application/json".to_owned()));
    }
    for (name, value) in &descriptor.headers {
        upsert_header(&mut headers, name, value.clone());
    }
    if let Some(token) = &context.token {
        upsert_header(&mut headers, "Authorization", format!("Bearer {token}"));
    }

    let timeout = descriptor
        .timeout_ms
        .map_or(default_timeout, Duration::from_millis);

    Ok(PreparedRequest {
        url,
        method: descriptor.method.clone(),
        headers,
        body,
        timeout,
    })
}

fn inject_params(params: &mut Vec<(String, String)>, context: &SessionContext) {
    if let Some(shop_id) = &context.shop_id {
        params.push((keys::SHOP_ID.to_owned(), shop_id.clone()));
    }
    if let Some(user_id) = &context.user_id {
        params.push((keys::USER_ID.to_owned(), user_id.clone()));
    }
}

fn upsert_header(headers: &mut Vec<(String, String)>, name: &str, value: String) {
    if let Some(entry) = headers
        .iter_mut()
        .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
    {
        entry.1 = value;
    } else {
        headers.push((name.to_owned(), value));
    }
}

fn build_form(parts: Vec<FilePart>) -> Result<reqwest::multipart::Form, ClientError> {
    let mut form = reqwest::multipart::Form::new();
    for part in parts {
        let mut piece = reqwest::multipart::Part::bytes(part.bytes).file_name(part.file_name);
        if let Some(mime) = &part.mime {
            piece = piece.mime_str(mime).map_err(ClientError::Transport)?;
        }
        form = form.part(part.name, piece);
    }
    Ok(form)
}
