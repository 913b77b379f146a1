//! 采购与结算核心的统一错误类型

use thiserror::Error;

use crate::models::OrderStatus;

#[derive(Debug, Error)]
pub enum ProcurementError {
    /// 数据源不可达或返回格式错误; 可重试, 不会应用部分状态
    #[error("Failed to fetch purchase rows: {0}")]
    Fetch(String),

    #[error("Order {order_number}: cannot move from {from} to {to}")]
    InvalidTransition {
        order_number: String,
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Order {0} not found")]
    OrderNotFound(String),

    #[error("Action declined: {0}")]
    Declined(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProcurementError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }
}

pub type Result<T> = std::result::Result<T, ProcurementError>;
