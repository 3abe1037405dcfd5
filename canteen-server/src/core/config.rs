use std::path::PathBuf;

use shared::DisplayRange;
use shared::call_number::{DEFAULT_DISPLAY_BASE, DEFAULT_DISPLAY_RANGE};

use crate::call_number::CallNumberBackend;
use crate::utils::{AppError, AppResult, ErrorCode};

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./work_dir | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | CALL_NUMBER_BACKEND | database | 取餐号分配器: memory \| database |
/// | CALL_NUMBER_START | 201 | 取餐号起始值 (raw) |
/// | CALL_NUMBER_DISPLAY_BASE | 201 | 显示号码起点 |
/// | CALL_NUMBER_DISPLAY_RANGE | 99 | 显示号码个数 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/canteen CALL_NUMBER_BACKEND=memory cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub log_level: String,
    /// Raw allocator backend name, checked by [`Config::validate`]
    pub call_number_backend: String,
    /// Seed for a fresh allocator
    pub call_number_start: i64,
    pub display_base: i64,
    pub display_range: i64,
    /// Variables that were set but did not parse; their defaults are in use
    pub ignored_env: Vec<String>,
}

/// Parse `raw` for `key`, falling back to `default` when it is missing or
/// malformed. Malformed keys are recorded in `ignored`.
fn parse_or<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T, ignored: &mut Vec<String>) -> T {
    match raw {
        None => default,
        Some(v) => v.trim().parse().unwrap_or_else(|_| {
            ignored.push(format!("{key}={v}"));
            default
        }),
    }
}

impl Config {
    /// 从环境变量加载配置，未设置时使用默认值
    pub fn from_env() -> Self {
        let mut ignored_env = Vec::new();
        let mut env_or = |key: &str, default: i64| parse_or(key, std::env::var(key).ok(), default, &mut ignored_env);
        let http_port = env_or("HTTP_PORT", 3000);
        let call_number_start = env_or("CALL_NUMBER_START", 201);
        let display_base = env_or("CALL_NUMBER_DISPLAY_BASE", DEFAULT_DISPLAY_BASE);
        let display_range = env_or("CALL_NUMBER_DISPLAY_RANGE", DEFAULT_DISPLAY_RANGE);
        let http_port = u16::try_from(http_port).unwrap_or_else(|_| {
            ignored_env.push(format!("HTTP_PORT={http_port}"));
            3000
        });

        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./work_dir".into()),
            http_port,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            call_number_backend: std::env::var("CALL_NUMBER_BACKEND")
                .unwrap_or_else(|_| CallNumberBackend::Database.as_str().into()),
            call_number_start,
            display_base,
            display_range,
            ignored_env,
        }
    }

    /// 使用自定义工作目录 (测试)
    pub fn with_work_dir(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config
    }

    pub fn validate(&self) -> AppResult<()> {
        self.call_number_backend()?;
        if self.display_range < 1 {
            return Err(config_error(format!(
                "CALL_NUMBER_DISPLAY_RANGE must be >= 1, got {}",
                self.display_range
            )));
        }
        if self.display_base.checked_add(self.display_range).is_none() {
            return Err(config_error("CALL_NUMBER_DISPLAY_BASE + CALL_NUMBER_DISPLAY_RANGE overflows"));
        }
        Ok(())
    }

    pub fn call_number_backend(&self) -> AppResult<CallNumberBackend> {
        self.call_number_backend.parse().map_err(config_error)
    }

    pub fn display_range(&self) -> DisplayRange {
        DisplayRange::new(self.display_base, self.display_range)
    }

    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_dir().join("canteen.db")
    }

    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 日志初始化后调用: 报告被忽略的环境变量
    pub fn warn_ignored_env(&self) {
        for entry in &self.ignored_env {
            tracing::warn!(env = %entry, "Unparsable environment variable ignored, using default");
        }
    }
}

fn config_error(msg: impl Into<String>) -> AppError {
    AppError::with_message(ErrorCode::ConfigError, msg)
}
