//! Order persistence port
//!
//! The bridge only writes single analytics columns back to the order, the
//! same way the host saves individual attributes without re-saving the
//! whole aggregate.

use async_trait::async_trait;
use dashmap::DashMap;
use shared::order::{AnalyticsField, AnalyticsState, Order};
use thiserror::Error;

/// Persistence error
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Write access to the analytics columns of an order
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist the current value of `field` from `order.analytics`
    async fn save_attribute(&self, order: &Order, field: AnalyticsField) -> Result<(), RepositoryError>;
}

/// In-memory repository keyed by order increment id
#[derive(Debug, Default)]
pub struct MemoryOrderRepository {
    states: DashMap<String, AnalyticsState>,
}

impl MemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track an order so its attributes can be saved
    pub fn insert(&self, order: &Order) {
        self.states
            .insert(order.increment_id.clone(), order.analytics.clone());
    }

    /// Persisted state of an order
    pub fn get(&self, increment_id: &str) -> Option<AnalyticsState> {
        self.states.get(increment_id).map(|s| s.clone())
    }
}

#[async_trait]
impl OrderRepository for MemoryOrderRepository {
    async fn save_attribute(&self, order: &Order, field: AnalyticsField) -> Result<(), RepositoryError> {
        let mut stored = self
            .states
            .get_mut(&order.increment_id)
            .ok_or_else(|| RepositoryError::OrderNotFound(order.increment_id.clone()))?;

        let current = &order.analytics;
        match field {
            AnalyticsField::ClientId => stored.client_id = current.client_id.clone(),
            AnalyticsField::SessionId => stored.session_id = current.session_id.clone(),
            AnalyticsField::SessionNumber => stored.session_number = current.session_number.clone(),
            AnalyticsField::SentToAnalytics => stored.sent_to_analytics = current.sent_to_analytics,
            AnalyticsField::CancellationSentToAnalytics => {
                stored.cancellation_sent_to_analytics = current.cancellation_sent_to_analytics
            }
        }

        tracing::debug!(order = %order.increment_id, field = %field, "Saved order attribute");
        Ok(())
    }
}
