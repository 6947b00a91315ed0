//! Order status vocabulary.
//!
//! The backend reports order lifecycle states as snake_case string codes.
//! The display mapping must be total: a client build that predates a new
//! server-side status still has to render the order list, so every
//! unrecognized code folds into [`OrderStatus::Unknown`].

use serde::{Deserialize, Serialize};

/// Order lifecycle status as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Preparing,
    Ready,
    Completed,
    Cancelled,
    /// Any status code this client version does not recognize.
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Parse a wire status code, folding unrecognized codes into `Unknown`.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "pending" => Self::Pending,
            "paid" => Self::Paid,
            "preparing" => Self::Preparing,
            "ready" => Self::Ready,
            "completed" => Self::Completed,
            "cancelled" => Self::Cancelled,
            _ => Self::Unknown,
        }
    }

    /// Human-readable status text shown in order lists.
    #[must_use]
    pub const fn display_text(self) -> &'static str {
        match self {
            Self::Pending => "awaiting payment",
            Self::Paid => "paid",
            Self::Preparing => "preparing",
            Self::Ready => "ready for pickup",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown status",
        }
    }

    /// Icon shown next to the status text.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Pending => "⏰",
            Self::Paid => "💰",
            Self::Preparing => "👨‍🍳",
            Self::Ready => "📦",
            Self::Completed => "✅",
            Self::Cancelled => "❌",
            Self::Unknown => "📋",
        }
    }

    /// All recognized statuses, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Paid,
        Self::Preparing,
        Self::Ready,
        Self::Completed,
        Self::Cancelled,
    ];
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        };
        write!(f, "{code}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_recognized() {
        assert_eq!(OrderStatus::from_code("pending"), OrderStatus::Pending);
        assert_eq!(OrderStatus::from_code("cancelled"), OrderStatus::Cancelled);
    }

    #[test]
    fn test_from_code_unrecognized_folds_to_unknown() {
        assert_eq!(
            OrderStatus::from_code("refund_requested"),
            OrderStatus::Unknown
        );
    }

    #[test]
    fn test_serde_other_fallback() {
        let status: OrderStatus = serde_json::from_str("\"not_a_status\"").unwrap();
        assert_eq!(status, OrderStatus::Unknown);

        let status: OrderStatus = serde_json::from_str("\"preparing\"").unwrap();
        assert_eq!(status, OrderStatus::Preparing);
    }

    #[test]
    fn test_display_mapping_is_total() {
        for status in OrderStatus::ALL.into_iter().chain([OrderStatus::Unknown]) {
            assert!(!status.display_text().is_empty());
            assert!(!status.icon().is_empty());
        }
    }
}
