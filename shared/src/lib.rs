//! Shared types for Crab measurement
//!
//! Order aggregate, credit memo and the analytics records derived from
//! them. Kept free of transport and configuration concerns so that both the
//! measurement bridge and host integrations can depend on it.

pub mod analytics;
pub mod order;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use analytics::{EventKind, Identity, LineItem, MonetaryEvent};
pub use order::{AnalyticsState, CreditMemo, CreditMemoItem, Order, OrderItem, OrderStatus, StoreId};
