//! Purchase / refund event construction
//!
//! A cancellation is reported as a purchase with negated value, shipping, tax
//! and item quantities. A credit memo is always reported as a positive refund.

use rust_decimal::Decimal;
use shared::analytics::{EventKind, Identity, LineItem, MonetaryEvent};
use shared::order::{CreditMemo, Order};

/// Build the event for `order`, or for `credit_memo` when one is given
pub fn build(order: &Order, credit_memo: Option<&CreditMemo>, identity: &Identity) -> MonetaryEvent {
    match credit_memo {
        Some(memo) => build_refund(order, memo, identity),
        None => build_purchase(order, identity),
    }
}

/// Purchase event; negative when the order is canceled
pub fn build_purchase(order: &Order, identity: &Identity) -> MonetaryEvent {
    let sign = if order.is_canceled() {
        Decimal::NEGATIVE_ONE
    } else {
        Decimal::ONE
    };

    let items = order
        .items
        .iter()
        .filter(|item| item.is_reportable())
        .map(|item| LineItem {
            sku: item.sku.clone(),
            name: item.name.clone(),
            unit_price: item.base_price,
            quantity: if order.is_canceled() {
                -item.qty_ordered
            } else {
                item.qty_ordered
            },
            discount: Some(item.base_discount_amount).filter(|d| !d.is_zero()),
        })
        .collect();

    MonetaryEvent {
        kind: EventKind::Purchase,
        transaction_id: order.increment_id.clone(),
        currency: order.order_currency_code.clone(),
        affiliation: order.store_name.clone(),
        value: (order.base_grand_total - order.base_tax_amount) * sign,
        shipping: order.base_shipping_amount * sign,
        tax: order.base_tax_amount * sign,
        coupon: order.coupon().map(str::to_string),
        session_id: identity.session_id.clone(),
        session_number: identity.session_number.clone(),
        items,
    }
}

/// Refund event from the credit memo's own totals
pub fn build_refund(order: &Order, memo: &CreditMemo, identity: &Identity) -> MonetaryEvent {
    let items = memo
        .items
        .iter()
        .filter(|item| item.is_reportable())
        .map(|item| LineItem {
            sku: item.sku.clone(),
            name: item.name.clone(),
            unit_price: item.base_price,
            quantity: item.qty,
            discount: item.base_discount_amount.filter(|d| !d.is_zero()),
        })
        .collect();

    MonetaryEvent {
        kind: EventKind::Refund,
        transaction_id: order.increment_id.clone(),
        currency: memo.order_currency_code.clone(),
        affiliation: order.store_name.clone(),
        value: memo.base_grand_total - memo.base_tax_amount,
        shipping: memo.base_shipping_amount,
        tax: memo.base_tax_amount,
        coupon: None,
        session_id: identity.session_id.clone(),
        session_number: identity.session_number.clone(),
        items,
    }
}
