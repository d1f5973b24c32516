//! Configuration
//!
//! - [`Config`]: process level settings loaded from the environment
//! - [`ConfigProvider`]: store scoped key/value lookup used by the handlers
//! - [`StoreConfig`]: in-memory provider with a default scope and per-store overrides
//! - [`Ga4Settings`]: typed accessors for the measurement protocol settings

use shared::order::StoreId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Measurement protocol active flag
pub const PATH_ACTIVE: &str = "google/measurement_protocol_ga4/active";
/// Send through the validation endpoint instead of the collect endpoint
pub const PATH_DEBUG_MODE: &str = "google/measurement_protocol_ga4/debug_mode";
pub const PATH_API_SECRET: &str = "google/measurement_protocol_ga4/api_secret";
pub const PATH_MEASUREMENT_ID: &str = "google/measurement_protocol_ga4/measurement_id";

/// Default collect host
pub const DEFAULT_ENDPOINT: &str = "https://www.google-analytics.com";

/// 进程配置 - 所有配置项都可以通过环境变量覆盖
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | GA4_ACTIVE | false | 默认作用域是否启用 |
/// | GA4_DEBUG_MODE | false | 默认作用域调试模式 |
/// | GA4_API_SECRET | - | Measurement Protocol API secret |
/// | GA4_MEASUREMENT_ID | - | Measurement ID (G-XXXXXXX) |
/// | GA4_ENDPOINT | https://www.google-analytics.com | 采集服务地址 |
/// | GA4_REQUEST_TIMEOUT_MS | 10000 | 请求超时(毫秒) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 日志格式 |
/// | LOG_DIR | - | 滚动日志目录 |
#[derive(Debug, Clone)]
pub struct Config {
    pub active: bool,
    pub debug_mode: bool,
    pub api_secret: Option<String>,
    pub measurement_id: Option<String>,
    pub endpoint: String,
    pub request_timeout_ms: u64,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        Self {
            active: env_flag("GA4_ACTIVE"),
            debug_mode: env_flag("GA4_DEBUG_MODE"),
            api_secret: std::env::var("GA4_API_SECRET").ok(),
            measurement_id: std::env::var("GA4_MEASUREMENT_ID").ok(),
            endpoint: std::env::var("GA4_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.into()),
            request_timeout_ms: std::env::var("GA4_REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_flag("LOG_JSON"),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    /// Default-scope store configuration built from these settings
    pub fn store_config(&self) -> StoreConfig {
        let mut store_config = StoreConfig::new()
            .with_value(PATH_ACTIVE, self.active.to_string())
            .with_value(PATH_DEBUG_MODE, self.debug_mode.to_string());
        if let Some(secret) = &self.api_secret {
            store_config = store_config.with_value(PATH_API_SECRET, secret.clone());
        }
        if let Some(id) = &self.measurement_id {
            store_config = store_config.with_value(PATH_MEASUREMENT_ID, id.clone());
        }
        store_config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name).map(|v| parse_flag(&v)).unwrap_or(false)
}

/// Shop style boolean: "1", "true", "yes", "on"
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ============================================================================
// Store scoped lookup
// ============================================================================

/// Store scoped configuration source
pub trait ConfigProvider: Send + Sync {
    fn get_string(&self, path: &str, store: StoreId) -> Option<String>;

    fn get_bool(&self, path: &str, store: StoreId) -> bool {
        self.get_string(path, store)
            .map(|v| parse_flag(&v))
            .unwrap_or(false)
    }
}

/// In-memory configuration: store values fall back to the default scope
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    defaults: HashMap<String, String>,
    stores: HashMap<StoreId, HashMap<String, String>>,
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a default-scope value
    pub fn with_value(mut self, path: &str, value: impl Into<String>) -> Self {
        self.defaults.insert(path.to_string(), value.into());
        self
    }

    /// Set a value for one store, overriding the default scope
    pub fn with_store_value(mut self, store: StoreId, path: &str, value: impl Into<String>) -> Self {
        self.stores
            .entry(store)
            .or_default()
            .insert(path.to_string(), value.into());
        self
    }
}

impl ConfigProvider for StoreConfig {
    fn get_string(&self, path: &str, store: StoreId) -> Option<String> {
        self.stores
            .get(&store)
            .and_then(|values| values.get(path))
            .or_else(|| self.defaults.get(path))
            .cloned()
    }
}

// ============================================================================
// Typed settings
// ============================================================================

/// API secret and measurement id of one store
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_secret: String,
    /// `G-XXXXXXX`
    pub measurement_id: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_secret", &"***")
            .field("measurement_id", &self.measurement_id)
            .finish()
    }
}

/// Measurement protocol settings resolved per store
#[derive(Clone)]
pub struct Ga4Settings {
    provider: Arc<dyn ConfigProvider>,
}

impl Ga4Settings {
    pub fn new(provider: Arc<dyn ConfigProvider>) -> Self {
        Self { provider }
    }

    pub fn is_active(&self, store: StoreId) -> bool {
        self.provider.get_bool(PATH_ACTIVE, store)
    }

    pub fn is_debug_mode(&self, store: StoreId) -> bool {
        self.provider.get_bool(PATH_DEBUG_MODE, store)
    }

    /// Credentials required for any request, `None` (logged) when incomplete
    pub fn required_parameters(&self, store: StoreId) -> Option<Credentials> {
        let api_secret = self
            .provider
            .get_string(PATH_API_SECRET, store)
            .filter(|v| !v.is_empty());
        let measurement_id = self
            .provider
            .get_string(PATH_MEASUREMENT_ID, store)
            .filter(|v| !v.is_empty());

        let Some(api_secret) = api_secret else {
            tracing::warn!(
                store = %store,
                "API secret for Google Analytics is missing - no data can be sent to measurement protocol"
            );
            return None;
        };
        let Some(measurement_id) = measurement_id else {
            tracing::warn!(
                store = %store,
                "Measurement ID for Google Analytics is missing - no data can be sent to measurement protocol"
            );
            return None;
        };

        Some(Credentials {
            api_secret,
            measurement_id,
        })
    }
}
