use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::{LineDate, OrderStatus, PurchaseOrder, TrackingEvent};

const ACTOR_MANAGER: &str = "Manager";
const ACTOR_PROCUREMENT: &str = "Procurement";
const ACTOR_SUPPLIER: &str = "Supplier";
const ACTOR_WAREHOUSE: &str = "Warehouse";

/// 时间线来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimelineMode {
    /// 按当前状态推导
    #[default]
    Derived,
    /// 优先使用迁移时记录的事件, 无记录的订单回退到推导
    Recorded,
}

fn milestone_label(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "Created",
        OrderStatus::Approved => "Approved",
        OrderStatus::Ordered => "Ordered",
        OrderStatus::Shipped => "Shipped",
        OrderStatus::Received => "Received",
        OrderStatus::Rejected => "Rejected",
        OrderStatus::Cancelled => "Cancelled",
    }
}

fn event(
    order: &PurchaseOrder,
    status: OrderStatus,
    timestamp: LineDate,
    description: String,
    actor: &str,
) -> TrackingEvent {
    TrackingEvent {
        order_number: order.order_number.clone(),
        timestamp,
        status_label: milestone_label(status).to_string(),
        description,
        actor: actor.to_string(),
    }
}

fn created_event(order: &PurchaseOrder) -> TrackingEvent {
    event(
        order,
        OrderStatus::Pending,
        order.order_date,
        format!(
            "Purchase order created with {} item(s) from {}",
            order.item_count, order.supplier
        ),
        order.requested_by(),
    )
}

/// 根据当前状态推导里程碑事件 (近似展示, 非审计记录)
pub fn derive_timeline(order: &PurchaseOrder) -> Vec<TrackingEvent> {
    let status = order.status;
    let mut events = vec![created_event(order)];

    let approved = !matches!(
        status,
        OrderStatus::Pending | OrderStatus::Rejected | OrderStatus::Cancelled
    );
    if approved {
        events.push(event(
            order,
            OrderStatus::Approved,
            order.order_date.plus_days(1),
            "Purchase order approved".to_string(),
            order.approved_by().unwrap_or(ACTOR_MANAGER),
        ));
    }

    if matches!(
        status,
        OrderStatus::Ordered | OrderStatus::Shipped | OrderStatus::Received
    ) {
        events.push(event(
            order,
            OrderStatus::Ordered,
            order.order_date.plus_days(2),
            format!("Order placed with {}", order.supplier),
            ACTOR_PROCUREMENT,
        ));
    }

    let shipped_at = order.order_date.plus_days(3);
    if matches!(status, OrderStatus::Shipped | OrderStatus::Received) {
        events.push(event(
            order,
            OrderStatus::Shipped,
            shipped_at,
            "Goods shipped by supplier".to_string(),
            ACTOR_SUPPLIER,
        ));
    }

    if status == OrderStatus::Received {
        // 预计到货早于推导的发货日时取发货日, 保证时间不倒退
        events.push(event(
            order,
            OrderStatus::Received,
            order.expected_delivery.max(shipped_at),
            "Goods received at warehouse".to_string(),
            ACTOR_WAREHOUSE,
        ));
    }

    events
}

/// 单个订单的迁移记录
#[derive(Debug, Clone)]
struct RecordedHistory {
    /// 首次迁移前 (数据源中) 的状态
    origin: OrderStatus,
    events: Vec<TrackingEvent>,
}

/// 迁移事件日志 (只追加)
#[derive(Debug, Clone, Default)]
pub struct TransitionLog {
    orders: IndexMap<String, RecordedHistory>,
}

impl TransitionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次已生效的迁移; `from` 为迁移前状态
    pub fn record(&mut self, from: OrderStatus, order: &PurchaseOrder, actor: &str, on: NaiveDate) {
        let description = match (order.status, order.rejection_reason()) {
            (OrderStatus::Rejected, Some(reason)) => format!("Purchase order rejected: {}", reason),
            (status, _) => format!("Status changed to {}", status),
        };
        let recorded = event(order, order.status, LineDate::Known(on), description, actor);
        self.orders
            .entry(order.order_number.clone())
            .or_insert_with(|| RecordedHistory {
                origin: from,
                events: Vec::new(),
            })
            .events
            .push(recorded);
    }

    pub fn events_for(&self, order_number: &str) -> &[TrackingEvent] {
        self.orders
            .get(order_number)
            .map(|history| history.events.as_slice())
            .unwrap_or(&[])
    }

    /// 首次记录的迁移之前订单所处的状态
    pub fn origin_of(&self, order_number: &str) -> Option<OrderStatus> {
        self.orders.get(order_number).map(|history| history.origin)
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn clear(&mut self) {
        self.orders.clear();
    }
}

/// 按模式生成时间线
///
/// Recorded 模式: 先按首次迁移前的状态推导已隐含的里程碑, 再追加记录的事件;
/// 记录事件的时间不早于前一事件.
pub fn timeline(order: &PurchaseOrder, log: &TransitionLog, mode: TimelineMode) -> Vec<TrackingEvent> {
    let recorded = log.events_for(&order.order_number);
    let origin = match (mode, log.origin_of(&order.order_number)) {
        (TimelineMode::Recorded, Some(origin)) if !recorded.is_empty() => origin,
        _ => return derive_timeline(order),
    };

    let mut before = order.clone();
    before.status = origin;
    let mut events = derive_timeline(&before);
    for recorded_event in recorded {
        let mut next = recorded_event.clone();
        if let Some(previous) = events.last() {
            next.timestamp = next.timestamp.max(previous.timestamp);
        }
        events.push(next);
    }
    events
}
