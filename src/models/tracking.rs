use serde::Serialize;

use super::LineDate;

/// 跟踪事件 (按需生成, 不独立存储或修改)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingEvent {
    pub order_number: String,
    pub timestamp: LineDate,
    pub status_label: String,
    pub description: String,
    pub actor: String,
}
