//! Wire and state models for the client layer.
//!
//! Server-origin shapes (orders, shop, products) use the backend's
//! snake_case field names. The cart snapshot keeps the camelCase keys every
//! historical client build has persisted under `cart_data`; changing them
//! would empty carts on upgrade.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use order_ease_core::{OrderId, OrderStatus, Price, ProductId, ShopId, TagId, UserId};

// =============================================================================
// Session / auth
// =============================================================================

/// User profile blob returned by login endpoints.
///
/// Persisted verbatim under the `user_info` storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// User's backend ID.
    pub id: UserId,
    /// Login name, absent for temp-login guests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    /// Avatar image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Payload of a successful login/registration/token-exchange response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginPayload {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// The authenticated user's profile.
    pub user: UserInfo,
}

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

// =============================================================================
// Cart
// =============================================================================

/// One cart line.
///
/// `cart_item_id` is a caller-computed composite of product and selected
/// options; two lines never share one. The merge-on-add rule in the cart
/// store assumes price and options are identical for identical IDs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Composite line key (product + selected options).
    pub cart_item_id: String,
    /// The underlying product.
    pub product_id: ProductId,
    /// Selected option names.
    #[serde(default)]
    pub options: Vec<String>,
    /// Line quantity. Never persisted as zero - a zero removes the line.
    pub count: u32,
    /// Unit price with option adjustments applied.
    pub final_price: Price,
}

impl CartItem {
    /// Line subtotal.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.final_price.times(self.count)
    }
}

// =============================================================================
// Orders
// =============================================================================

/// One line of an order, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    /// Unit price at order time.
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Server-origin order record. Read-only from the client's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub total_price: Price,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<OrderLineItem>,
}

// =============================================================================
// Shop / catalog
// =============================================================================

/// A product tag (menu category).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

/// Shop detail as returned by `GET /shop/detail`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopDetail {
    pub id: ShopId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// A product bound to a tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Paginated list envelope used by the list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: usize,
    pub page: u32,
    #[serde(rename = "pageSize")]
    pub page_size: usize,
}
