use bigdecimal::BigDecimal;
use chrono::{Duration, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;

use super::OrderStatus;

/// 无法解析日期时的占位文本
pub const UNKNOWN_DATE: &str = "Unknown Date";

/// 数据源中的日期: 可能缺失或格式不可解析
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LineDate {
    // Unknown 排在所有已知日期之前
    Unknown,
    Known(NaiveDate),
}

impl LineDate {
    pub fn known(&self) -> Option<NaiveDate> {
        match self {
            Self::Known(date) => Some(*date),
            Self::Unknown => None,
        }
    }

    /// 日期偏移; 未知日期保持未知
    pub fn plus_days(&self, days: i64) -> Self {
        match self {
            Self::Known(date) => date
                .checked_add_signed(Duration::days(days))
                .map(Self::Known)
                .unwrap_or(Self::Unknown),
            Self::Unknown => Self::Unknown,
        }
    }
}

impl From<NaiveDate> for LineDate {
    fn from(date: NaiveDate) -> Self {
        Self::Known(date)
    }
}

impl fmt::Display for LineDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Unknown => f.write_str(UNKNOWN_DATE),
        }
    }
}

impl Serialize for LineDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// 数据源原始行 (按列顺序的字符串字段)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub index: usize,
    pub fields: Vec<String>,
}

impl RawRow {
    pub fn new(index: usize, fields: Vec<String>) -> Self {
        Self { index, fields }
    }

    /// 取列值; 越界视为空
    pub fn field(&self, column: usize) -> &str {
        self.fields.get(column).map(|s| s.trim()).unwrap_or("")
    }

    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|f| f.trim().is_empty())
    }
}

/// 采购明细行 (一个订单中的一个采购商品)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseLine {
    pub order_number: String,
    pub supplier: String,
    pub order_date: LineDate,
    pub expected_delivery: LineDate,
    pub status: OrderStatus,
    pub product: String,
    pub quantity: u32,
    pub unit_price: BigDecimal,
    /// 以存储的合计为准, 不与 quantity * unit_price 校验
    pub total: BigDecimal,
    pub notes: String,
    pub requested_by: String,
    pub approved_by: Option<String>,
    pub approved_date: Option<NaiveDate>,
    pub shipped_date: Option<NaiveDate>,
    pub received_date: Option<NaiveDate>,
    pub rejection_reason: Option<String>,
}
