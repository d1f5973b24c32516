//! Crab Measurement - GA4 Measurement Protocol 订单上报
//!
//! # 架构概述
//!
//! 订单生命周期通知 → 身份解析 / 事件构建 → Measurement Protocol 发送
//!
//! - **身份** (`identity`, `cookies`): `_ga` / `_ga_<STREAM>` cookie 解析，缺失时生成临时值
//! - **事件** (`event_builder`): purchase / 取消 (负值 purchase) / refund
//! - **发送** (`sender`): reqwest GA4 客户端，live 与 debug 端点
//! - **策略** (`dispatch`): 幂等标记、守卫顺序、pre-send hooks
//!
//! # 模块结构
//!
//! ```text
//! crab-measurement/src/
//! ├── config.rs        # 环境变量 + 按店铺配置
//! ├── cookies.rs       # Cookie 来源
//! ├── identity.rs      # client id / session 解析
//! ├── event_builder.rs # 订单 → MonetaryEvent
//! ├── hooks.rs         # 发送前钩子
//! ├── sender/          # 请求体与 HTTP 客户端
//! ├── repository.rs    # 订单属性持久化
//! ├── dispatch/        # 通知处理
//! └── logger.rs        # 日志
//! ```

pub mod config;
pub mod cookies;
pub mod dispatch;
pub mod event_builder;
pub mod hooks;
pub mod identity;
pub mod logger;
pub mod repository;
pub mod sender;

// Re-export 公共类型
pub use config::{Config, ConfigProvider, Credentials, Ga4Settings, StoreConfig};
pub use cookies::{CookieSource, RequestCookies};
pub use dispatch::{DispatchError, DispatchOutcome, MeasurementDispatcher, SkipReason};
pub use hooks::{BeforeSendContext, HookPoint, HookRegistry, PreSendHook};
pub use identity::IdentityResolver;
pub use repository::{MemoryOrderRepository, OrderRepository, RepositoryError};
pub use sender::{DebugResponse, Ga4Client, MeasurementRequest, MeasurementSender, SendError};

// Re-export logger functions
pub use logger::{cleanup_old_logs, init_logger, init_logger_with_file};
