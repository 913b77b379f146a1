use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 采购订单状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Approved,
    Ordered,
    Shipped,
    Received,
    Rejected,
    Cancelled,
}

/// 状态迁移表: (源状态, 允许的目标状态)
const TRANSITIONS: &[(OrderStatus, &[OrderStatus])] = &[
    (
        OrderStatus::Pending,
        &[OrderStatus::Approved, OrderStatus::Rejected, OrderStatus::Cancelled],
    ),
    (OrderStatus::Approved, &[OrderStatus::Ordered, OrderStatus::Cancelled]),
    (OrderStatus::Ordered, &[OrderStatus::Shipped, OrderStatus::Cancelled]),
    (OrderStatus::Shipped, &[OrderStatus::Received]),
    (OrderStatus::Received, &[]),
    (OrderStatus::Rejected, &[]),
    (OrderStatus::Cancelled, &[]),
];

impl OrderStatus {
    /// 生命周期顺序 (用于统计展示)
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Pending,
        OrderStatus::Approved,
        OrderStatus::Ordered,
        OrderStatus::Shipped,
        OrderStatus::Received,
        OrderStatus::Rejected,
        OrderStatus::Cancelled,
    ];

    /// 从数据源原始字符串解析; 大小写敏感, 未知值(含空串)一律视为 pending
    pub fn from_source(raw: &str) -> Self {
        match raw.trim() {
            "approved" => Self::Approved,
            "rejected" => Self::Rejected,
            "ordered" => Self::Ordered,
            "shipped" => Self::Shipped,
            "received" => Self::Received,
            "cancelled" => Self::Cancelled,
            _ => Self::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Ordered => "ordered",
            Self::Shipped => "shipped",
            Self::Received => "received",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    /// 当前状态允许迁移到的目标状态
    pub fn allowed_targets(&self) -> &'static [OrderStatus] {
        TRANSITIONS
            .iter()
            .find(|(from, _)| from == self)
            .map(|(_, to)| *to)
            .unwrap_or(&[])
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_targets().is_empty()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    /// 严格解析 (API 输入), 与 `from_source` 的宽松回退不同
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown order status: {}", s))
    }
}
