//! Purchase / cancellation notification

use super::{DispatchError, DispatchOutcome, MeasurementDispatcher, SkipReason, failed, skipped};
use crate::config::Credentials;
use crate::event_builder;
use crate::hooks::{BeforeSendContext, HookPoint};
use crate::sender::MeasurementRequest;
use shared::analytics::{EventKind, Identity};
use shared::order::{AnalyticsField, Order};

const KIND: EventKind = EventKind::Purchase;

impl MeasurementDispatcher {
    /// Report a saved order as a purchase, or as a negative purchase once it
    /// is canceled. Each is sent at most once per order.
    pub async fn on_order_saved(&self, order: &mut Order) -> DispatchOutcome {
        let store = order.store_id;

        if !self.settings.is_active(store) {
            return skipped(KIND, &order.increment_id, SkipReason::Inactive);
        }
        let Some(identity) = order.analytics.identity() else {
            return skipped(KIND, &order.increment_id, SkipReason::MissingIdentity);
        };
        if !order.is_canceled() && order.analytics.sent_to_analytics {
            return skipped(KIND, &order.increment_id, SkipReason::AlreadySent);
        }

        let mut ctx = BeforeSendContext::new(HookPoint::PurchaseBefore, order, None);
        let skip_event = self.hooks.dispatch(&mut ctx);

        // 只能取消已上报且尚未取消的订单
        if order.is_canceled()
            && (order.analytics.cancellation_sent_to_analytics || !order.analytics.sent_to_analytics)
        {
            return skipped(KIND, &order.increment_id, SkipReason::CancellationNotReportable);
        }
        if order.base_grand_total.is_zero() {
            return skipped(KIND, &order.increment_id, SkipReason::ZeroTotal);
        }
        if skip_event {
            return skipped(KIND, &order.increment_id, SkipReason::VetoedByHook);
        }
        let Some(credentials) = self.settings.required_parameters(store) else {
            return skipped(KIND, &order.increment_id, SkipReason::MissingCredentials);
        };

        match self.send_purchase(order, &identity, &credentials).await {
            Ok(outcome) => outcome,
            Err(e) => failed(KIND, &order.increment_id, e),
        }
    }

    async fn send_purchase(
        &self,
        order: &mut Order,
        identity: &Identity,
        credentials: &Credentials,
    ) -> Result<DispatchOutcome, DispatchError> {
        let event = event_builder::build_purchase(order, identity);
        let request = MeasurementRequest::new(identity.client_id.clone(), &event);

        if self.settings.is_debug_mode(order.store_id) {
            self.transmit_debug(KIND, credentials, &request).await?;
            return Ok(DispatchOutcome::SentDebug);
        }

        self.transmit_live(KIND, credentials, &request).await?;

        if !order.analytics.sent_to_analytics {
            order.analytics.sent_to_analytics = true;
            self.repository
                .save_attribute(order, AnalyticsField::SentToAnalytics)
                .await?;
        }
        if order.is_canceled() {
            order.analytics.cancellation_sent_to_analytics = true;
            self.repository
                .save_attribute(order, AnalyticsField::CancellationSentToAnalytics)
                .await?;
        }

        tracing::info!(
            order = %order.increment_id,
            canceled = order.is_canceled(),
            value = %event.value,
            "Purchase reported to GA4"
        );
        Ok(DispatchOutcome::SentLive)
    }
}
