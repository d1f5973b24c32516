//! Order types

use super::AnalyticsState;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Store Scope
// ============================================================================

/// Store view identifier, the scope configuration is resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct StoreId(pub i64);

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for StoreId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

// ============================================================================
// Order Status
// ============================================================================

/// Order status as reported by the shop
///
/// Custom statuses configured in the shop deserialize to [`OrderStatus::Unknown`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    PendingPayment,
    Processing,
    Holded,
    Complete,
    Closed,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }
}

// ============================================================================
// Order
// ============================================================================

/// Order line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub item_id: i64,
    /// Parent line for bundle / configurable children
    #[serde(default)]
    pub parent_item_id: Option<i64>,
    pub sku: String,
    pub name: String,
    /// Unit price in base currency
    pub base_price: Decimal,
    pub qty_ordered: i32,
    #[serde(default)]
    pub base_discount_amount: Decimal,
    #[serde(default)]
    pub is_deleted: bool,
}

impl OrderItem {
    /// Top-level line that is still part of the order
    pub fn is_reportable(&self) -> bool {
        !self.is_deleted && self.parent_item_id.is_none()
    }
}

/// Order aggregate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub entity_id: i64,
    /// Business identifier shown to customers (e.g. "100000123")
    pub increment_id: String,
    pub store_id: StoreId,
    pub store_name: String,
    pub status: OrderStatus,
    pub order_currency_code: String,
    pub base_grand_total: Decimal,
    pub base_tax_amount: Decimal,
    pub base_shipping_amount: Decimal,
    #[serde(default)]
    pub coupon_code: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub analytics: AnalyticsState,
}

impl Order {
    pub fn is_canceled(&self) -> bool {
        self.status.is_canceled()
    }

    /// Coupon code, if one was applied and is not blank
    pub fn coupon(&self) -> Option<&str> {
        self.coupon_code.as_deref().filter(|c| !c.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_deserialize() {
        let status: OrderStatus = serde_json::from_str("\"canceled\"").unwrap();
        assert!(status.is_canceled());

        let status: OrderStatus = serde_json::from_str("\"pending_payment\"").unwrap();
        assert_eq!(status, OrderStatus::PendingPayment);

        let status: OrderStatus = serde_json::from_str("\"fraud_review\"").unwrap();
        assert_eq!(status, OrderStatus::Unknown);
    }

    #[test]
    fn test_order_from_json() {
        let json = r#"{
            "entity_id": 7,
            "increment_id": "100000123",
            "store_id": 1,
            "store_name": "Main Website Store",
            "status": "processing",
            "order_currency_code": "EUR",
            "base_grand_total": 59.98,
            "base_tax_amount": 4.98,
            "base_shipping_amount": 5.0,
            "coupon_code": "",
            "items": [{
                "item_id": 1,
                "sku": "A1",
                "name": "Widget",
                "base_price": 49.98,
                "qty_ordered": 1
            }],
            "analytics": { "ga_user_id": "123456789.1700000000" }
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.store_id, StoreId(1));
        assert_eq!(order.base_grand_total, Decimal::new(5998, 2));
        assert_eq!(order.coupon(), None);
        assert!(order.items[0].is_reportable());
        assert_eq!(
            order.analytics.client_id(),
            Some("123456789.1700000000")
        );
        assert!(!order.analytics.sent_to_analytics);
    }
}
