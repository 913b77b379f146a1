use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::{OrderStatus, PurchaseLine, PurchaseOrder};

/// 同一订单号下明细头部字段不一致时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GroupingPolicy {
    /// 以首行为准
    #[default]
    FirstLineWins,
    /// 剔除不一致的订单并报告
    RejectInconsistent,
}

/// 聚合结果: 订单号 -> 订单, 按订单号首次出现顺序排列
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregation {
    pub orders: IndexMap<String, PurchaseOrder>,
    /// RejectInconsistent 策略下被剔除的订单号
    pub inconsistent: Vec<String>,
}

impl Aggregation {
    /// 按状态过滤 (二级视图, 不单独存储)
    pub fn with_status(&self, status: OrderStatus) -> impl Iterator<Item = &PurchaseOrder> {
        self.orders.values().filter(move |order| order.status == status)
    }

    /// 各状态订单数, 按生命周期顺序
    pub fn status_counts(&self) -> IndexMap<OrderStatus, usize> {
        let mut counts: IndexMap<OrderStatus, usize> =
            OrderStatus::ALL.iter().map(|status| (*status, 0)).collect();
        for order in self.orders.values() {
            *counts.entry(order.status).or_insert(0) += 1;
        }
        counts
    }
}

/// 单次遍历按订单号分组
pub fn aggregate(lines: &[PurchaseLine], policy: GroupingPolicy) -> Aggregation {
    let mut orders: IndexMap<String, PurchaseOrder> = IndexMap::new();

    for line in lines {
        match orders.get_mut(&line.order_number) {
            Some(order) => order.add_line(line.clone()),
            None => {
                orders.insert(
                    line.order_number.clone(),
                    PurchaseOrder::from_first_line(line.clone()),
                );
            }
        }
    }

    let mut inconsistent = Vec::new();
    if policy == GroupingPolicy::RejectInconsistent {
        orders.retain(|order_number, order| {
            if order.is_consistent() {
                return true;
            }
            tracing::warn!(
                "Order {}: lines disagree on supplier/date/status, excluded",
                order_number
            );
            inconsistent.push(order_number.clone());
            false
        });
    }

    Aggregation {
        orders,
        inconsistent,
    }
}
