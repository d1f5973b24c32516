//! Order aggregate as seen by the measurement bridge
//!
//! - [`Order`]: read-only order totals and lines, plus the attached
//!   [`AnalyticsState`] record
//! - [`CreditMemo`]: refund document with its own totals
//! - [`AnalyticsState`]: identity and idempotency flags persisted on the order

pub mod credit_memo;
pub mod state;
pub mod types;

// Re-exports
pub use credit_memo::{CreditMemo, CreditMemoItem};
pub use state::{AnalyticsField, AnalyticsState};
pub use types::{Order, OrderItem, OrderStatus, StoreId};
