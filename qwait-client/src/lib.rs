//! Qwait Client - 看板客户端库
//!
//! 员工看板通过本 crate 与 qwait-server 通信：
//!
//! - [`HttpClient`]: REST 调用 (变更全部走 HTTP)
//! - [`DashboardConnection`]: WebSocket 事件流 + 本地状态同步
//! - [`WaitlistSync`]: 本地队列镜像，按事件幂等合并并重算位置
//!
//! # 同步模型
//!
//! 服务端事件流没有回放，客户端遵循"先连接、再全量重载"：
//!
//! ```text
//! connect WS ──▶ GET /api/waitlist (full reload) ──▶ apply events
//!      ▲                                                  │
//!      └──────────── reconnect on drop ◀──────────────────┘
//! ```

mod config;
mod error;
mod http;
mod sync;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use sync::{DashboardConnection, WaitlistSync};

// Re-export shared types callers need
pub use shared::message::WaitlistEvent;
pub use shared::models::{
    ActiveList, EntryCreate, EntryStatus, EntryUpdate, WaitlistColumn, WaitlistConfig,
    WaitlistEntry,
};
