//! Credit memo (refund document)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Credit memo line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreditMemoItem {
    /// Refunded order line
    pub order_item_id: i64,
    /// Parent of the refunded order line (bundle / configurable child)
    #[serde(default)]
    pub order_item_parent_id: Option<i64>,
    pub sku: String,
    pub name: String,
    pub base_price: Decimal,
    pub qty: i32,
    #[serde(default)]
    pub base_discount_amount: Option<Decimal>,
    #[serde(default)]
    pub is_deleted: bool,
}

impl CreditMemoItem {
    pub fn is_reportable(&self) -> bool {
        !self.is_deleted && self.order_item_parent_id.is_none()
    }
}

/// Refund raised against an order, carrying its own totals
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreditMemo {
    pub entity_id: i64,
    pub order_currency_code: String,
    pub base_grand_total: Decimal,
    pub base_tax_amount: Decimal,
    pub base_shipping_amount: Decimal,
    #[serde(default)]
    pub items: Vec<CreditMemoItem>,
}
