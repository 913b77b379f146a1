use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;
use serde::Serialize;

use super::{LineDate, OrderStatus, PurchaseLine};

/// 采购订单 (同一订单号下所有明细的聚合, 不单独持久化)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseOrder {
    pub order_number: String,
    pub supplier: String,
    pub order_date: LineDate,
    pub expected_delivery: LineDate,
    pub status: OrderStatus,
    pub item_count: usize,
    pub total_amount: BigDecimal,
    pub lines: Vec<PurchaseLine>,
}

impl PurchaseOrder {
    /// 以首行创建订单; 头部字段取自首行
    pub fn from_first_line(line: PurchaseLine) -> Self {
        let mut order = Self {
            order_number: line.order_number.clone(),
            supplier: line.supplier.clone(),
            order_date: line.order_date,
            expected_delivery: line.expected_delivery,
            status: line.status,
            item_count: 0,
            total_amount: BigDecimal::zero(),
            lines: Vec::new(),
        };
        order.add_line(line);
        order
    }

    pub fn add_line(&mut self, line: PurchaseLine) {
        self.total_amount += &line.total;
        self.item_count += 1;
        self.lines.push(line);
    }

    /// 检查明细头部字段是否与首行一致
    pub fn is_consistent(&self) -> bool {
        self.lines.iter().all(|line| {
            line.supplier == self.supplier
                && line.order_date == self.order_date
                && line.expected_delivery == self.expected_delivery
                && line.status == self.status
        })
    }

    pub fn requested_by(&self) -> &str {
        self.lines.first().map(|l| l.requested_by.as_str()).unwrap_or("")
    }

    pub fn approved_by(&self) -> Option<&str> {
        self.lines.first().and_then(|l| l.approved_by.as_deref())
    }

    pub fn approved_date(&self) -> Option<NaiveDate> {
        self.lines.first().and_then(|l| l.approved_date)
    }

    pub fn shipped_date(&self) -> Option<NaiveDate> {
        self.lines.first().and_then(|l| l.shipped_date)
    }

    pub fn received_date(&self) -> Option<NaiveDate> {
        self.lines.first().and_then(|l| l.received_date)
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        self.lines.first().and_then(|l| l.rejection_reason.as_deref())
    }
}
