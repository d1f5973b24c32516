//! Pre-send hooks
//!
//! Handlers registered for a [`HookPoint`] run synchronously, in registration
//! order, right before an event is sent. Any of them may veto the send via
//! [`BeforeSendContext::set_skip_event`]; the last write wins.

use shared::order::{CreditMemo, Order};
use std::sync::Arc;

/// Where in the dispatch flow a hook runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    PurchaseBefore,
    RefundBefore,
}

impl HookPoint {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PurchaseBefore => "ga_measurement_protocol_purchase_before",
            Self::RefundBefore => "ga_measurement_protocol_refund_before",
        }
    }
}

/// State handed to hooks
#[derive(Debug)]
pub struct BeforeSendContext<'a> {
    pub point: HookPoint,
    pub order: &'a Order,
    pub credit_memo: Option<&'a CreditMemo>,
    skip_event: bool,
}

impl<'a> BeforeSendContext<'a> {
    pub fn new(point: HookPoint, order: &'a Order, credit_memo: Option<&'a CreditMemo>) -> Self {
        Self {
            point,
            order,
            credit_memo,
            skip_event: false,
        }
    }

    pub fn set_skip_event(&mut self, skip_event: bool) {
        self.skip_event = skip_event;
    }

    pub fn skip_event(&self) -> bool {
        self.skip_event
    }
}

/// Listener invoked before an event is sent
pub trait PreSendHook: Send + Sync {
    fn before_send(&self, ctx: &mut BeforeSendContext<'_>);
}

impl<F> PreSendHook for F
where
    F: Fn(&mut BeforeSendContext<'_>) + Send + Sync,
{
    fn before_send(&self, ctx: &mut BeforeSendContext<'_>) {
        self(ctx)
    }
}

/// Registered hooks, per hook point
#[derive(Clone, Default)]
pub struct HookRegistry {
    hooks: Vec<(HookPoint, Arc<dyn PreSendHook>)>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, point: HookPoint, hook: Arc<dyn PreSendHook>) {
        self.hooks.push((point, hook));
    }

    /// Builder form of [`register`](Self::register)
    pub fn with_hook(mut self, point: HookPoint, hook: impl PreSendHook + 'static) -> Self {
        self.register(point, Arc::new(hook));
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run every hook registered for `ctx.point`; returns the skip flag
    pub fn dispatch(&self, ctx: &mut BeforeSendContext<'_>) -> bool {
        for (point, hook) in &self.hooks {
            if *point == ctx.point {
                hook.before_send(ctx);
            }
        }
        if ctx.skip_event() {
            tracing::debug!(
                hook = ctx.point.name(),
                order = %ctx.order.increment_id,
                "Send vetoed by pre-send hook"
            );
        }
        ctx.skip_event()
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hooks", &self.hooks.iter().map(|(p, _)| p.name()).collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::order::{AnalyticsState, OrderStatus, StoreId};
    use std::sync::Mutex;

    fn order() -> Order {
        Order {
            entity_id: 1,
            increment_id: "100000001".to_string(),
            store_id: StoreId(1),
            store_name: "Default".to_string(),
            status: OrderStatus::Processing,
            order_currency_code: "EUR".to_string(),
            base_grand_total: Decimal::ONE,
            base_tax_amount: Decimal::ZERO,
            base_shipping_amount: Decimal::ZERO,
            coupon_code: None,
            items: vec![],
            analytics: AnalyticsState::default(),
        }
    }

    #[test]
    fn test_hooks_run_in_registration_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let (c1, c2) = (calls.clone(), calls.clone());

        let registry = HookRegistry::new()
            .with_hook(HookPoint::PurchaseBefore, move |_: &mut BeforeSendContext<'_>| {
                c1.lock().unwrap().push("first")
            })
            .with_hook(HookPoint::PurchaseBefore, move |_: &mut BeforeSendContext<'_>| {
                c2.lock().unwrap().push("second")
            });

        let order = order();
        let mut ctx = BeforeSendContext::new(HookPoint::PurchaseBefore, &order, None);
        assert!(!registry.dispatch(&mut ctx));
        assert_eq!(*calls.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_only_matching_point_runs() {
        let registry = HookRegistry::new().with_hook(
            HookPoint::RefundBefore,
            |ctx: &mut BeforeSendContext<'_>| ctx.set_skip_event(true),
        );

        let order = order();
        let mut purchase = BeforeSendContext::new(HookPoint::PurchaseBefore, &order, None);
        assert!(!registry.dispatch(&mut purchase));

        let mut refund = BeforeSendContext::new(HookPoint::RefundBefore, &order, None);
        assert!(registry.dispatch(&mut refund));
    }

    #[test]
    fn test_last_writer_wins() {
        let registry = HookRegistry::new()
            .with_hook(HookPoint::PurchaseBefore, |ctx: &mut BeforeSendContext<'_>| {
                ctx.set_skip_event(true)
            })
            .with_hook(HookPoint::PurchaseBefore, |ctx: &mut BeforeSendContext<'_>| {
                ctx.set_skip_event(false)
            });

        let order = order();
        let mut ctx = BeforeSendContext::new(HookPoint::PurchaseBefore, &order, None);
        assert!(!registry.dispatch(&mut ctx));
        assert_eq!(registry.len(), 2);
    }
}
