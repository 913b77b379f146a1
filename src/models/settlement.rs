use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 结算条目类型: 已付 / 已退
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    Paid,
    Credited,
}

impl SettlementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Credited => "credited",
        }
    }
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettlementStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "paid" => Ok(Self::Paid),
            "credited" => Ok(Self::Credited),
            other => Err(format!("Unknown settlement status: {}", other)),
        }
    }
}

/// 结算条目
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettlementEntry {
    pub id: String,
    pub description: String,
    pub reference: Option<String>,
    pub amount: BigDecimal,
    pub status: SettlementStatus,
    /// 创建日期, 创建后不变
    pub date: NaiveDate,
}

/// 结算汇总
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettlementSummary {
    pub total_paid: BigDecimal,
    pub total_credited: BigDecimal,
    pub net_settlement: BigDecimal,
    pub entry_count: usize,
}
