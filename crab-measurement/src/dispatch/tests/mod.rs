use super::*;
use crate::config::{PATH_ACTIVE, PATH_API_SECRET, PATH_DEBUG_MODE, PATH_MEASUREMENT_ID, StoreConfig};
use crate::repository::MemoryOrderRepository;
use crate::sender::DebugResponse;
use async_trait::async_trait;
use rust_decimal_macros::dec;
use shared::order::{AnalyticsState, Order, OrderItem, OrderStatus, StoreId};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};


// ========================================================================
// Recording sender
// ========================================================================

#[derive(Default)]
struct RecordingSender {
    live: Mutex<Vec<MeasurementRequest>>,
    debug: Mutex<Vec<MeasurementRequest>>,
    fail: AtomicBool,
}

impl RecordingSender {
    fn failing() -> Self {
        let sender = Self::default();
        sender.fail.store(true, Ordering::SeqCst);
        sender
    }

    fn live(&self) -> Vec<MeasurementRequest> {
        self.live.lock().unwrap().clone()
    }

    fn debug(&self) -> Vec<MeasurementRequest> {
        self.debug.lock().unwrap().clone()
    }

    fn total(&self) -> usize {
        self.live.lock().unwrap().len() + self.debug.lock().unwrap().len()
    }
}

#[async_trait]
impl MeasurementSender for RecordingSender {
    async fn send(
        &self,
        _credentials: &Credentials,
        request: &MeasurementRequest,
    ) -> Result<(), SendError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SendError::Rejected {
                status: 500,
                body: "backend unavailable".to_string(),
            });
        }
        self.live.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn send_debug(
        &self,
        _credentials: &Credentials,
        request: &MeasurementRequest,
    ) -> Result<DebugResponse, SendError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SendError::Rejected {
                status: 500,
                body: "backend unavailable".to_string(),
            });
        }
        self.debug.lock().unwrap().push(request.clone());
        Ok(DebugResponse {
            status_code: 200,
            body: r#"{"validationMessages":[]}"#.to_string(),
        })
    }

    fn endpoint(&self, debug: bool) -> String {
        if debug {
            "memory://debug/mp/collect".to_string()
        } else {
            "memory://mp/collect".to_string()
        }
    }
}

// ========================================================================
// Fixtures
// ========================================================================

struct Harness {
    dispatcher: MeasurementDispatcher,
    sender: Arc<RecordingSender>,
    repo: Arc<MemoryOrderRepository>,
}

fn harness_with(config: StoreConfig, sender: RecordingSender) -> Harness {
    let sender = Arc::new(sender);
    let repo = Arc::new(MemoryOrderRepository::new());
    let dispatcher = MeasurementDispatcher::new(Arc::new(config), sender.clone(), repo.clone());
    Harness {
        dispatcher,
        sender,
        repo,
    }
}

fn harness(config: StoreConfig) -> Harness {
    harness_with(config, RecordingSender::default())
}

fn active_config() -> StoreConfig {
    StoreConfig::new()
        .with_value(PATH_ACTIVE, "1")
        .with_value(PATH_DEBUG_MODE, "0")
        .with_value(PATH_API_SECRET, "test-secret")
        .with_value(PATH_MEASUREMENT_ID, "G-TEST123")
}

fn debug_config() -> StoreConfig {
    active_config().with_value(PATH_DEBUG_MODE, "1")
}

fn widget_line() -> OrderItem {
    OrderItem {
        item_id: 1,
        parent_item_id: None,
        sku: "A1".to_string(),
        name: "Widget".to_string(),
        base_price: dec!(49.98),
        qty_ordered: 1,
        base_discount_amount: dec!(0),
        is_deleted: false,
    }
}

/// Order 100000123 with an identity already resolved
fn sample_order() -> Order {
    Order {
        entity_id: 123,
        increment_id: "100000123".to_string(),
        store_id: StoreId(1),
        store_name: "Main Website Store".to_string(),
        status: OrderStatus::Processing,
        order_currency_code: "EUR".to_string(),
        base_grand_total: dec!(59.98),
        base_tax_amount: dec!(4.98),
        base_shipping_amount: dec!(5.00),
        coupon_code: None,
        items: vec![widget_line()],
        analytics: AnalyticsState {
            client_id: Some("123456789.1700000000".to_string()),
            ..Default::default()
        },
    }
}

fn assert_close(value: &serde_json::Value, expected: f64) {
    let actual = value.as_f64().expect("numeric value");
    assert!((actual - expected).abs() < 1e-9, "{} != {}", actual, expected);
}
