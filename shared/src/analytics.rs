//! Analytics records built from orders
//!
//! [`MonetaryEvent`] and [`LineItem`] are constructed fresh for every send
//! attempt and never persisted. [`Identity`] is resolved once per order and
//! stored on its [`AnalyticsState`](crate::order::AnalyticsState).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Client / session identity of the shopper who placed an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    /// `"<numeric>.<unix timestamp>"`
    pub client_id: String,
    pub session_id: Option<String>,
    pub session_number: Option<String>,
}

/// Measurement event type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Purchase,
    Refund,
}

impl EventKind {
    /// Event name on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::Refund => "refund",
        }
    }
}

/// Item line of a [`MonetaryEvent`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub sku: String,
    pub name: String,
    pub unit_price: Decimal,
    /// Negative for the lines of a canceled purchase
    pub quantity: i32,
    pub discount: Option<Decimal>,
}

/// Purchase or refund, ready to be mapped onto the provider's wire format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonetaryEvent {
    pub kind: EventKind,
    pub transaction_id: String,
    pub currency: String,
    pub affiliation: String,
    /// Grand total minus tax
    pub value: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub coupon: Option<String>,
    pub session_id: Option<String>,
    pub session_number: Option<String>,
    pub items: Vec<LineItem>,
}
