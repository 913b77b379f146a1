use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::{ProcurementError, Result};
use crate::models::{PurchaseLine, SettlementEntry, SettlementStatus, SettlementSummary};

/// 结算台账: 已付/已退条目, 汇总值每次读取时重新计算
#[derive(Debug, Clone, Default)]
pub struct SettlementLedger {
    entries: Vec<SettlementEntry>,
}

impl SettlementLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[SettlementEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&SettlementEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// 新增条目; 描述为空或金额非正时拒绝, 台账不变
    pub fn add_entry(
        &mut self,
        description: &str,
        amount: BigDecimal,
        status: SettlementStatus,
        reference: Option<String>,
        on: NaiveDate,
    ) -> Result<SettlementEntry> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ProcurementError::Validation(
                "settlement description must not be empty".to_string(),
            ));
        }
        if amount <= BigDecimal::zero() {
            return Err(ProcurementError::Validation(format!(
                "settlement amount must be positive, got {}",
                amount
            )));
        }

        let entry = SettlementEntry {
            id: Uuid::new_v4().to_string(),
            description: description.to_string(),
            reference: reference
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
            amount,
            status,
            date: on,
        };
        self.entries.push(entry.clone());
        Ok(entry)
    }

    /// 从采购明细生成一条已付条目 (复制数据, 不建立关联)
    pub fn seed_from_purchase(&mut self, line: &PurchaseLine, on: NaiveDate) -> Result<SettlementEntry> {
        let product = match line.product.trim() {
            "" => "Purchase",
            product => product,
        };
        let description = format!("{} - {}", product, line.order_number);
        self.add_entry(
            &description,
            line.total.clone(),
            SettlementStatus::Paid,
            Some(line.order_number.clone()),
            on,
        )
    }

    /// 删除条目; 不存在时静默忽略
    pub fn remove_entry(&mut self, id: &str) -> Option<SettlementEntry> {
        let position = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(position))
    }

    /// 修改条目类型; 返回是否找到
    pub fn set_status(&mut self, id: &str, status: SettlementStatus) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.status = status;
                true
            }
            None => false,
        }
    }

    fn sum_where(&self, status: SettlementStatus) -> BigDecimal {
        let mut sum = BigDecimal::zero();
        for entry in self.entries.iter().filter(|e| e.status == status) {
            sum += &entry.amount;
        }
        sum
    }

    pub fn total_paid(&self) -> BigDecimal {
        self.sum_where(SettlementStatus::Paid)
    }

    pub fn total_credited(&self) -> BigDecimal {
        self.sum_where(SettlementStatus::Credited)
    }

    pub fn net_settlement(&self) -> BigDecimal {
        self.total_paid() - self.total_credited()
    }

    pub fn summary(&self) -> SettlementSummary {
        let total_paid = self.total_paid();
        let total_credited = self.total_credited();
        SettlementSummary {
            net_settlement: &total_paid - &total_credited,
            total_paid,
            total_credited,
            entry_count: self.entries.len(),
        }
    }
}
