//! Measurement Protocol request body

use rust_decimal::prelude::*;
use serde::Serialize;
use shared::analytics::{LineItem, MonetaryEvent};

/// Decimal places for totals on the wire
const MONEY_DP: u32 = 2;
/// Decimal places for unit prices on the wire
const PRICE_DP: u32 = 4;

/// Convert Decimal to f64 for the wire, rounded half away from zero
#[inline]
fn to_f64(value: Decimal, dp: u32) -> f64 {
    value
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Item parameter
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ItemParams {
    pub item_id: String,
    pub item_name: String,
    pub price: f64,
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
}

impl From<&LineItem> for ItemParams {
    fn from(item: &LineItem) -> Self {
        Self {
            item_id: item.sku.clone(),
            item_name: item.name.clone(),
            price: to_f64(item.unit_price, PRICE_DP),
            quantity: item.quantity,
            discount: item.discount.map(|d| to_f64(d, MONEY_DP)),
        }
    }
}

/// Purchase / refund parameters
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EventParams {
    pub transaction_id: String,
    pub currency: String,
    pub affiliation: String,
    pub value: f64,
    pub shipping: f64,
    pub tax: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_number: Option<String>,
    pub items: Vec<ItemParams>,
}

/// Named event
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MeasurementEvent {
    pub name: String,
    pub params: EventParams,
}

impl From<&MonetaryEvent> for MeasurementEvent {
    fn from(event: &MonetaryEvent) -> Self {
        Self {
            name: event.kind.name().to_string(),
            params: EventParams {
                transaction_id: event.transaction_id.clone(),
                currency: event.currency.clone(),
                affiliation: event.affiliation.clone(),
                value: to_f64(event.value, MONEY_DP),
                shipping: to_f64(event.shipping, MONEY_DP),
                tax: to_f64(event.tax, MONEY_DP),
                coupon: event.coupon.clone(),
                session_id: event.session_id.clone(),
                session_number: event.session_number.clone(),
                items: event.items.iter().map(ItemParams::from).collect(),
            },
        }
    }
}

/// Request body: one client, one event per request
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MeasurementRequest {
    pub client_id: String,
    pub events: Vec<MeasurementEvent>,
}

impl MeasurementRequest {
    pub fn new(client_id: impl Into<String>, event: &MonetaryEvent) -> Self {
        Self {
            client_id: client_id.into(),
            events: vec![MeasurementEvent::from(event)],
        }
    }

    /// JSON form, as logged after a live send
    pub fn export(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
