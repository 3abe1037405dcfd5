//! 订单模块
//!
//! - [`OrderService`] - checkout workflow and order lifecycle
//! - [`receipt`] - plain-text pickup ticket

pub mod receipt;
mod service;

pub use receipt::render_receipt;
pub use service::OrderService;
