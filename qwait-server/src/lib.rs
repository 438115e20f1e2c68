//! Qwait Server - 餐厅排队管理服务
//!
//! # 架构概述
//!
//! 本模块是排队服务的主入口，提供以下核心功能：
//!
//! - **排队领域** (`waitlist`): 队列编排、状态机、重复守卫
//! - **数据库** (`db`): 嵌入式 SQLite 存储 (sqlx)
//! - **广播** (`broadcast`): 每餐厅实时事件扇出
//! - **HTTP API** (`api`): 员工接口、顾客 join、WebSocket 事件流
//!
//! # 模块结构
//!
//! ```text
//! qwait-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # 餐厅作用域提取
//! ├── api/           # HTTP 路由和处理器
//! ├── waitlist/      # 领域逻辑
//! ├── broadcast/     # 事件广播
//! ├── utils/         # 错误、验证、日志
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod auth;
pub mod broadcast;
pub mod core;
pub mod db;
pub mod utils;
pub mod waitlist;

// Re-export 公共类型
pub use auth::RestaurantScope;
pub use broadcast::WaitlistBroadcaster;
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

/// 设置运行环境 (dotenv + 日志)
///
/// 日志目录不存在时退回纯 stdout 输出。
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = config.log_dir();
    init_logger_with_file(log_level.as_deref(), log_dir.to_str());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ____            _ __
  / __ \_      ____ _(_) /_
 / / / / | /| / / __ `/ / __/
/ /_/ /| |/ |/ / /_/ / / /_
\___\_\|__/|__/\__,_/_/\__/
    "#
    );
}
