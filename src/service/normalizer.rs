use bigdecimal::{BigDecimal, ToPrimitive, Zero};
use chrono::{DateTime, NaiveDate};
use std::str::FromStr;

use crate::models::{LineDate, OrderStatus, PurchaseLine, RawRow};

/// 采购单表格列位置
pub mod columns {
    pub const ORDER_NUMBER: usize = 0;
    pub const SUPPLIER: usize = 1;
    pub const ORDER_DATE: usize = 2;
    pub const EXPECTED_DELIVERY: usize = 3;
    pub const STATUS: usize = 4;
    pub const PRODUCT: usize = 5;
    // 6: 未使用
    pub const QUANTITY: usize = 7;
    pub const UNIT_PRICE: usize = 8;
    pub const TOTAL: usize = 9;
    pub const NOTES: usize = 10;
}

pub const MISSING_ORDER_NUMBER: &str = "N/A";
pub const DEFAULT_REQUESTER: &str = "Staff";

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// 行规范化器: 原始行 -> 采购明细, 永不失败
#[derive(Debug, Clone)]
pub struct RowNormalizer {
    currency_prefix: String,
}

impl Default for RowNormalizer {
    fn default() -> Self {
        Self::new("Rp")
    }
}

impl RowNormalizer {
    pub fn new(currency_prefix: impl Into<String>) -> Self {
        Self {
            currency_prefix: currency_prefix.into(),
        }
    }

    pub fn normalize(&self, row: &RawRow) -> PurchaseLine {
        let order_number = match row.field(columns::ORDER_NUMBER) {
            "" => MISSING_ORDER_NUMBER.to_string(),
            value => value.to_string(),
        };

        let quantity = self.parse_quantity(row.field(columns::QUANTITY));
        let unit_price = self.parse_money(row.field(columns::UNIT_PRICE));
        let total = self.parse_money(row.field(columns::TOTAL));

        if quantity.is_none() || unit_price.is_none() || total.is_none() {
            tracing::debug!(
                "Row {} ({}): numeric field defaulted to 0",
                row.index, order_number
            );
        }

        PurchaseLine {
            order_number,
            supplier: row.field(columns::SUPPLIER).to_string(),
            order_date: parse_date(row.field(columns::ORDER_DATE)),
            expected_delivery: parse_date(row.field(columns::EXPECTED_DELIVERY)),
            status: OrderStatus::from_source(row.field(columns::STATUS)),
            product: row.field(columns::PRODUCT).to_string(),
            quantity: quantity.unwrap_or(0),
            unit_price: unit_price.map(non_negative).unwrap_or_else(BigDecimal::zero),
            total: total.unwrap_or_else(BigDecimal::zero),
            notes: row.field(columns::NOTES).to_string(),
            requested_by: DEFAULT_REQUESTER.to_string(),
            approved_by: None,
            approved_date: None,
            shipped_date: None,
            received_date: None,
            rejection_reason: None,
        }
    }

    /// 去除货币前缀与千分位后解析金额; 无法解析返回 None
    pub fn parse_money(&self, raw: &str) -> Option<BigDecimal> {
        let cleaned = self.clean_numeric(raw);
        if cleaned.is_empty() {
            return None;
        }
        BigDecimal::from_str(&cleaned).ok()
    }

    fn parse_quantity(&self, raw: &str) -> Option<u32> {
        let cleaned = self.clean_numeric(raw);
        if let Ok(qty) = cleaned.parse::<i64>() {
            return Some(qty.clamp(0, u32::MAX as i64) as u32);
        }
        // 兼容 "10.0" 这类整数值小数
        let value = BigDecimal::from_str(&cleaned).ok()?;
        if !value.is_integer() {
            return None;
        }
        if value < BigDecimal::zero() {
            return Some(0);
        }
        // 超出范围与整数文本一致, 取 u32::MAX
        Some(
            value
                .to_u64()
                .map(|qty| qty.min(u32::MAX as u64) as u32)
                .unwrap_or(u32::MAX),
        )
    }

    fn clean_numeric(&self, raw: &str) -> String {
        let mut value = raw.trim();
        let prefix = self.currency_prefix.as_str();
        if !prefix.is_empty()
            && value.len() >= prefix.len()
            && value.is_char_boundary(prefix.len())
            && value[..prefix.len()].eq_ignore_ascii_case(prefix)
        {
            value = &value[prefix.len()..];
        }
        value
            .chars()
            .filter(|c| *c != ',' && !c.is_whitespace())
            .collect()
    }
}

fn non_negative(value: BigDecimal) -> BigDecimal {
    if value < BigDecimal::zero() {
        BigDecimal::zero()
    } else {
        value
    }
}

/// 解析日期; 支持 ISO 日期、RFC 3339 时间戳、YYYY/MM/DD、MM/DD/YYYY
pub fn parse_date(raw: &str) -> LineDate {
    let raw = raw.trim();
    if raw.is_empty() {
        return LineDate::Unknown;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return LineDate::Known(date);
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| LineDate::Known(ts.date_naive()))
        .unwrap_or(LineDate::Unknown)
}
