//! Identity capture when an order is placed

use super::MeasurementDispatcher;
use crate::cookies::CookieSource;
use crate::repository::RepositoryError;
use shared::order::{AnalyticsField, Order};

impl MeasurementDispatcher {
    /// Resolve the shopper identity from the request cookies and store it on
    /// the order. An identity already on the order is never replaced.
    ///
    /// Returns `true` when a new identity was stored. The host persists the
    /// order after this notification; use [`persist_identity`](Self::persist_identity)
    /// when the order is already saved.
    pub fn on_order_place_before(&self, order: &mut Order, cookies: &dyn CookieSource) -> bool {
        let store = order.store_id;

        if !self.settings.is_active(store) {
            return false;
        }
        let Some(credentials) = self.settings.required_parameters(store) else {
            return false;
        };
        if order.analytics.has_identity() {
            tracing::debug!(order = %order.increment_id, "GA4 identity already resolved");
            return false;
        }

        let identity = self
            .resolver
            .resolve(cookies, &credentials.measurement_id, &order.increment_id);
        tracing::debug!(
            order = %order.increment_id,
            client_id = %identity.client_id,
            session_id = identity.session_id.as_deref().unwrap_or_default(),
            "GA4 identity resolved"
        );
        order.analytics.set_identity(identity);
        true
    }

    /// Write the identity columns of an already saved order
    pub async fn persist_identity(&self, order: &Order) -> Result<(), RepositoryError> {
        for field in [
            AnalyticsField::ClientId,
            AnalyticsField::SessionId,
            AnalyticsField::SessionNumber,
        ] {
            self.repository.save_attribute(order, field).await?;
        }
        Ok(())
    }
}
