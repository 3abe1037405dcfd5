//! Canteen Server - 校园食堂点餐服务
//!
//! # 架构概述
//!
//! - **取餐号** (`call_number`): 唯一、递增的 raw 号码分配 (memory / database)
//! - **订单** (`orders`): 下单流程、订单状态机、取餐小票
//! - **数据库** (`db`): SQLite (sqlx) + migrations
//! - **HTTP API** (`api`): axum 路由
//!
//! ```text
//! canteen-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # 调用方身份、管理员中间件
//! ├── call_number/   # 取餐号分配器
//! ├── orders/        # 下单服务、小票
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 连接池、repository
//! └── utils/         # 错误类型、日志
//! ```

pub mod api;
pub mod auth;
pub mod call_number;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

pub use auth::CurrentUser;
pub use call_number::{CallNumberAllocator, CallNumberBackend, MemoryAllocator, SqliteAllocator};
pub use core::{Config, Server, ServerState};
pub use orders::OrderService;
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use utils::logger::{cleanup_old_logs, init_logger_with_file};

/// Audit log - records order and menu changes to the permanent audit file
///
/// ```ignore
/// audit_log!(user.id, "create", format!("order:{id}"));
/// audit_log!(user.id, "update_status", format!("order:{id}"), "PAID -> READY");
/// ```
#[macro_export]
macro_rules! audit_log {
    ($user_id:expr, $action:expr, $resource:expr) => {
        tracing::info!(
            target: "audit",
            user_id = %$user_id,
            action = %$action,
            resource = %$resource,
            timestamp = %chrono::Local::now().to_rfc3339(),
            "AUDIT"
        );
    };
    ($user_id:expr, $action:expr, $resource:expr, $details:expr) => {
        tracing::info!(
            target: "audit",
            user_id = %$user_id,
            action = %$action,
            resource = %$resource,
            details = %$details,
            timestamp = %chrono::Local::now().to_rfc3339(),
            "AUDIT"
        );
    };
}

/// 创建日志目录并初始化日志
pub fn setup_environment(config: &Config) -> anyhow::Result<()> {
    let log_dir = config.logs_dir();
    std::fs::create_dir_all(&log_dir)?;
    init_logger_with_file(
        &config.log_level,
        config.is_production(),
        Some(&log_dir.to_string_lossy()),
    )?;
    config.warn_ignored_env();
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ______            __
  / ____/___ _____  / /____  ___  ____
 / /   / __ `/ __ \/ __/ _ \/ _ \/ __ \
/ /___/ /_/ / / / / /_/  __/  __/ / / /
\____/\__,_/_/ /_/\__/\___/\___/_/ /_/
    "#
    );
}
