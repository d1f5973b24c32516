//! Refund notification
//!
//! Refunds carry no "already sent" flag: every credit memo notification that
//! passes the guards is reported.

use super::{DispatchError, DispatchOutcome, MeasurementDispatcher, SkipReason, failed, skipped};
use crate::config::Credentials;
use crate::event_builder;
use crate::hooks::{BeforeSendContext, HookPoint};
use crate::sender::MeasurementRequest;
use shared::analytics::{EventKind, Identity};
use shared::order::{CreditMemo, Order};

const KIND: EventKind = EventKind::Refund;

impl MeasurementDispatcher {
    /// Report a saved credit memo as a refund of `order`
    pub async fn on_credit_memo_saved(&self, order: &Order, memo: &CreditMemo) -> DispatchOutcome {
        let store = order.store_id;

        if !self.settings.is_active(store) {
            return skipped(KIND, &order.increment_id, SkipReason::Inactive);
        }
        let Some(identity) = order.analytics.identity() else {
            return skipped(KIND, &order.increment_id, SkipReason::MissingIdentity);
        };

        let mut ctx = BeforeSendContext::new(HookPoint::RefundBefore, order, Some(memo));
        if self.hooks.dispatch(&mut ctx) {
            return skipped(KIND, &order.increment_id, SkipReason::VetoedByHook);
        }

        let Some(credentials) = self.settings.required_parameters(store) else {
            return skipped(KIND, &order.increment_id, SkipReason::MissingCredentials);
        };

        match self.send_refund(order, memo, &identity, &credentials).await {
            Ok(outcome) => outcome,
            Err(e) => failed(KIND, &order.increment_id, e),
        }
    }

    async fn send_refund(
        &self,
        order: &Order,
        memo: &CreditMemo,
        identity: &Identity,
        credentials: &Credentials,
    ) -> Result<DispatchOutcome, DispatchError> {
        let event = event_builder::build_refund(order, memo, identity);
        let request = MeasurementRequest::new(identity.client_id.clone(), &event);

        if self.settings.is_debug_mode(order.store_id) {
            self.transmit_debug(KIND, credentials, &request).await?;
            return Ok(DispatchOutcome::SentDebug);
        }

        self.transmit_live(KIND, credentials, &request).await?;
        tracing::info!(
            order = %order.increment_id,
            credit_memo = memo.entity_id,
            value = %event.value,
            "Refund reported to GA4"
        );
        Ok(DispatchOutcome::SentLive)
    }
}
