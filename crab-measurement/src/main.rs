//! ga4-replay - report a stored order (or one of its refunds) to GA4
//!
//! ```text
//! ga4-replay <order.json> [credit_memo.json]
//! ```
//!
//! `GA4_COOKIE_HEADER` may carry a raw `Cookie:` header used to resolve the
//! identity of an order that has none yet.

use anyhow::{Context, bail};
use crab_measurement::{
    Config, Ga4Client, MeasurementDispatcher, MemoryOrderRepository, RequestCookies,
    init_logger_with_file,
};
use serde::de::DeserializeOwned;
use shared::order::{CreditMemo, Order};
use std::path::Path;
use std::sync::Arc;

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 环境与日志
    let _ = dotenv::dotenv();
    let config = Config::from_env();
    init_logger_with_file(&config.log_level, config.log_json, config.log_dir.as_deref())?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (order_path, memo_path) = match args.as_slice() {
        [order] => (order, None),
        [order, memo] => (order, Some(memo)),
        _ => bail!("usage: ga4-replay <order.json> [credit_memo.json]"),
    };

    // 2. 读取订单
    let mut order: Order = read_json(Path::new(order_path))?;
    let memo: Option<CreditMemo> = memo_path
        .map(|p| read_json(Path::new(p)))
        .transpose()?;

    // 3. 组装 dispatcher
    let sender = Arc::new(Ga4Client::from_config(&config)?);
    let repository = Arc::new(MemoryOrderRepository::new());
    repository.insert(&order);
    let dispatcher =
        MeasurementDispatcher::new(Arc::new(config.store_config()), sender, repository.clone());

    if let Ok(header) = std::env::var("GA4_COOKIE_HEADER")
        && !order.analytics.has_identity()
    {
        let cookies = RequestCookies::parse(&header);
        if dispatcher.on_order_place_before(&mut order, &cookies) {
            dispatcher.persist_identity(&order).await?;
        }
    }

    // 4. 上报
    let outcome = match &memo {
        Some(memo) => dispatcher.on_credit_memo_saved(&order, memo).await,
        None => dispatcher.on_order_saved(&mut order).await,
    };
    tracing::info!(order = %order.increment_id, outcome = ?outcome, "Replay finished");

    let state = repository
        .get(&order.increment_id)
        .unwrap_or_else(|| order.analytics.clone());
    println!("{}", serde_json::to_string_pretty(&state)?);

    Ok(())
}
