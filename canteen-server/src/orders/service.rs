//! Order Service
//!
//! Checkout: cart → time slot check → pricing → call number → one
//! transaction (slot capacity, cart re-check, order, items, cart). The call
//! number is taken outside the transaction and stays consumed if anything
//! after it fails.

use std::sync::Arc;

use shared::DisplayRange;
use shared::models::{CallNumberStatus, CartLine, Order, OrderListQuery, OrderStatus};
use sqlx::SqlitePool;

use crate::audit_log;
use crate::call_number::CallNumberAllocator;
use crate::db::repository::{
    RepoError, cart as cart_repo, order as order_repo, time_slot as time_slot_repo,
};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Default page size for order lists
const DEFAULT_PAGE_SIZE: i64 = 50;

#[derive(Debug, Clone)]
pub struct OrderService {
    pool: SqlitePool,
    allocator: Arc<dyn CallNumberAllocator>,
    display: DisplayRange,
}

/// Priced cart line (line total already checked for overflow)
struct PricedLine<'a> {
    line: &'a CartLine,
    line_total: i64,
}

impl OrderService {
    pub fn new(pool: SqlitePool, allocator: Arc<dyn CallNumberAllocator>, display: DisplayRange) -> Self {
        Self {
            pool,
            allocator,
            display,
        }
    }

    pub fn allocator(&self) -> &Arc<dyn CallNumberAllocator> {
        &self.allocator
    }

    pub fn display(&self) -> &DisplayRange {
        &self.display
    }

    /// Place an order from the user's cart for the given pickup slot
    pub async fn create_order(&self, user_id: &str, time_slot_id: i64) -> AppResult<Order> {
        let lines = cart_repo::find_lines(&self.pool, user_id).await?;
        if lines.is_empty() {
            return Err(AppError::new(ErrorCode::CartEmpty));
        }

        let slot = time_slot_repo::find_by_id(&self.pool, time_slot_id)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::TimeSlotNotFound).with_detail("time_slot_id", time_slot_id)
            })?;
        if slot.is_full() {
            return Err(AppError::new(ErrorCode::TimeSlotFull).with_detail("time_slot_id", time_slot_id));
        }

        let (priced, total) = price_lines(&lines)?;

        // Nothing is locked while the allocator runs
        let call_number = self.allocator.next().await?;

        let order_id = match self
            .persist(user_id, time_slot_id, total, call_number, &priced)
            .await
        {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(
                    user_id = %user_id,
                    call_number,
                    code = ?e.code,
                    "Order creation failed after allocation, call number left unused"
                );
                return Err(e);
            }
        };

        let order = self.get(order_id).await?;
        let display_number = self.display.display(call_number);

        tracing::info!(
            order_id,
            user_id = %user_id,
            time_slot_id,
            total,
            call_number_raw = call_number,
            call_number = display_number,
            "Order created"
        );
        audit_log!(user_id, "create", format!("order:{order_id}"), format!("call_number={display_number}"));

        self.warn_on_display_pressure().await;

        Ok(order)
    }

    async fn persist(
        &self,
        user_id: &str,
        time_slot_id: i64,
        total: i64,
        call_number: i64,
        priced: &[PricedLine<'_>],
    ) -> AppResult<i64> {
        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;

        // First statement is a write so the transaction takes the write lock up front
        if !time_slot_repo::reserve(&mut tx, time_slot_id).await? {
            return Err(AppError::new(ErrorCode::TimeSlotFull).with_detail("time_slot_id", time_slot_id));
        }

        // The cart may have been edited while the call number was allocated
        let current = cart_repo::find_lines_in(&mut tx, user_id).await?;
        if !cart_matches(priced, &current) {
            return Err(AppError::new(ErrorCode::CartChanged));
        }

        let order_id = order_repo::insert(&mut tx, user_id, time_slot_id, total, call_number).await?;
        for p in priced {
            order_repo::insert_item(&mut tx, order_id, p.line, p.line_total).await?;
        }
        cart_repo::clear(&mut tx, user_id).await?;

        tx.commit().await.map_err(RepoError::from)?;
        Ok(order_id)
    }

    /// Warn when active orders could share a display number
    async fn warn_on_display_pressure(&self) {
        match order_repo::count_active(&self.pool).await {
            Ok(active) if active >= self.display.range_size => {
                tracing::warn!(
                    active,
                    display_range = self.display.range_size,
                    "Active orders reached the display range, call numbers may repeat at the counter"
                );
            }
            Ok(_) => {}
            Err(e) => tracing::debug!(error = %e, "Failed to count active orders"),
        }
    }

    pub async fn get(&self, order_id: i64) -> AppResult<Order> {
        order_repo::find_by_id(&self.pool, order_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", order_id))
    }

    pub async fn list(&self, query: &OrderListQuery) -> AppResult<Vec<Order>> {
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        let offset = query.offset.unwrap_or(0);
        Ok(order_repo::list(&self.pool, query.status, limit, offset).await?)
    }

    pub async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<Order>> {
        Ok(order_repo::list_by_user(&self.pool, user_id).await?)
    }

    /// Payment confirmed for the caller's own order (PENDING → PAID)
    pub async fn mark_paid(&self, user_id: &str, order_id: i64) -> AppResult<Order> {
        let order = self.get(order_id).await?;
        if order.user_id != user_id {
            return Err(AppError::new(ErrorCode::PermissionDenied).with_detail("order_id", order_id));
        }
        self.transition(order, OrderStatus::Paid, user_id).await
    }

    /// Staff-driven status change
    pub async fn update_status(&self, order_id: i64, next: OrderStatus, operator: &str) -> AppResult<Order> {
        let order = self.get(order_id).await?;
        self.transition(order, next, operator).await
    }

    async fn transition(&self, order: Order, next: OrderStatus, operator: &str) -> AppResult<Order> {
        let current = order.status;
        if current == OrderStatus::Paid && next == OrderStatus::Paid {
            return Err(AppError::new(ErrorCode::OrderAlreadyPaid).with_detail("order_id", order.id));
        }
        if current == OrderStatus::Cancelled {
            return Err(AppError::new(ErrorCode::OrderAlreadyCancelled).with_detail("order_id", order.id));
        }
        if !current.can_transition_to(next) {
            return Err(invalid_transition(order.id, current, next));
        }

        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;
        if !order_repo::update_status(&mut tx, order.id, current, next).await? {
            // Someone else moved the order first
            return Err(invalid_transition(order.id, current, next));
        }
        if next == OrderStatus::Cancelled {
            time_slot_repo::release(&mut tx, order.time_slot_id).await?;
        }
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            order_id = order.id,
            from = current.as_str(),
            to = next.as_str(),
            "Order status changed"
        );
        audit_log!(
            operator,
            "update_status",
            format!("order:{}", order.id),
            format!("{} -> {}", current.as_str(), next.as_str())
        );

        self.get(order.id).await
    }

    /// Allocator backend and the number the next order will get
    pub async fn call_number_status(&self) -> AppResult<CallNumberStatus> {
        let next_raw = self.allocator.peek().await?;
        Ok(CallNumberStatus {
            backend: self.allocator.backend().to_string(),
            next_raw,
            next_display: self.display.display(next_raw),
            display_base: self.display.base,
            display_range: self.display.range_size,
        })
    }
}

/// Cart lines are unique per product, so equal length plus containment is equality
fn cart_matches(priced: &[PricedLine<'_>], current: &[CartLine]) -> bool {
    priced.len() == current.len() && current.iter().all(|c| priced.iter().any(|p| p.line == c))
}

fn invalid_transition(order_id: i64, from: OrderStatus, to: OrderStatus) -> AppError {
    AppError::new(ErrorCode::InvalidStatusTransition)
        .with_detail("order_id", order_id)
        .with_detail("from", from.as_str())
        .with_detail("to", to.as_str())
}

/// Validate lines and compute totals with checked arithmetic
fn price_lines(lines: &[CartLine]) -> AppResult<(Vec<PricedLine<'_>>, i64)> {
    let mut priced = Vec::with_capacity(lines.len());
    let mut total: i64 = 0;

    for line in lines {
        if !line.is_available {
            return Err(AppError::new(ErrorCode::ProductUnavailable).with_detail("product_id", line.product_id));
        }
        if line.quantity <= 0 {
            return Err(AppError::new(ErrorCode::InvalidQuantity).with_detail("product_id", line.product_id));
        }
        let line_total = line
            .line_total()
            .ok_or_else(|| AppError::new(ErrorCode::InvalidPrice).with_detail("product_id", line.product_id))?;
        total = total
            .checked_add(line_total)
            .ok_or_else(|| AppError::new(ErrorCode::InvalidPrice))?;
        priced.push(PricedLine { line, line_total });
    }

    Ok((priced, total))
}
