use std::sync::Arc;

use shared::DisplayRange;
use sqlx::SqlitePool;

use crate::call_number::{CallNumberAllocator, build_allocator};
use crate::core::Config;
use crate::db::DbService;
use crate::orders::OrderService;
use crate::utils::{AppError, AppResult};

/// 服务器状态 - 持有所有服务的共享引用
///
/// Cheap to clone: every field is a pool handle or an `Arc`.
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | pool | SQLite 连接池 |
/// | allocator | 取餐号分配器 (每个部署唯一) |
/// | orders | 下单与订单状态服务 |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub allocator: Arc<dyn CallNumberAllocator>,
    pub orders: OrderService,
}

impl ServerState {
    /// 手动构造 (测试时注入分配器)
    pub fn new(config: Config, pool: SqlitePool, allocator: Arc<dyn CallNumberAllocator>) -> Self {
        let orders = OrderService::new(pool.clone(), allocator.clone(), config.display_range());
        Self {
            config,
            pool,
            allocator,
            orders,
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/canteen.db) + migrations
    /// 3. 取餐号分配器 (CALL_NUMBER_BACKEND)
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        config.validate()?;
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.database_path();
        let db = DbService::new(&db_path.to_string_lossy()).await?;

        let backend = config.call_number_backend()?;
        let allocator = build_allocator(backend, config.call_number_start, &db.pool).await?;
        let next_raw = allocator.peek().await?;
        tracing::info!(
            backend = %backend,
            next_raw,
            next_display = config.display_range().display(next_raw),
            "Call number allocator initialized"
        );

        Ok(Self::new(config.clone(), db.pool, allocator))
    }

    pub fn display_range(&self) -> &DisplayRange {
        self.orders.display()
    }
}
