//! OrderEase client core library.
//!
//! The unified request/session layer shared by the OrderEase storefront
//! builds. Views and route tables sit on top of this crate; the backend REST
//! API sits below it.
//!
//! # Architecture
//!
//! - [`storage`] - key-value persistence over one of two host backends,
//!   selected once at startup
//! - [`http`] - the request dispatcher: session context injection, parameter
//!   placement, response normalization
//! - [`session`] - session lifecycle, including forced logout on 401
//! - [`stores`] - client-side cart and order-list state
//! - [`api`] - the named backend endpoint surface
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use order_ease_client::session::NoopNavigator;
//! use order_ease_client::{ApiClient, ClientConfig};
//!
//! let config = ClientConfig::from_env()?;
//! let client = ApiClient::from_config(config, Arc::new(NoopNavigator));
//!
//! client.session().hydrate();
//! let shop = client.shop_detail().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod routes;
pub mod session;
pub mod storage;
pub mod stores;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::ClientError;
pub use http::{Dispatcher, NormalizedResponse, RequestDescriptor};
pub use session::{Navigator, SessionManager};
pub use storage::Storage;
pub use stores::{CartStore, OrderListStore};
