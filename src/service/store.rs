use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

use crate::config::AppConfig;
use crate::error::{ProcurementError, Result};
use crate::models::{
    OrderStatus, PurchaseLine, PurchaseOrder, SettlementEntry, SettlementStatus,
    SettlementSummary, TrackingEvent,
};
use crate::service::aggregator::{aggregate, Aggregation, GroupingPolicy};
use crate::service::ledger::SettlementLedger;
use crate::service::lifecycle::{apply_transition, TransitionRequest};
use crate::service::normalizer::RowNormalizer;
use crate::service::timeline::{timeline, TimelineMode, TransitionLog};
use crate::source::RowSource;

/// 日期来源
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// 破坏性操作 (驳回、删除结算条目) 前的确认
pub trait Confirmation: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl Confirmation for AutoConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// 刷新结果统计
#[derive(Debug, Clone, Serialize)]
pub struct RefreshSummary {
    pub rows: usize,
    pub lines: usize,
    pub orders: usize,
    pub inconsistent: Vec<String>,
}

/// 采购订单与结算台账的会话内状态; 所有修改都经由此处
pub struct ProcurementStore {
    source: Box<dyn RowSource>,
    normalizer: RowNormalizer,
    grouping: GroupingPolicy,
    timeline_mode: TimelineMode,
    has_header: bool,
    session_actor: String,
    clock: Box<dyn Clock>,
    confirmation: Box<dyn Confirmation>,
    lines: Vec<PurchaseLine>,
    aggregation: Aggregation,
    log: TransitionLog,
    ledger: SettlementLedger,
}

impl ProcurementStore {
    pub fn new(source: impl RowSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            normalizer: RowNormalizer::default(),
            grouping: GroupingPolicy::default(),
            timeline_mode: TimelineMode::default(),
            has_header: true,
            session_actor: "Manager".to_string(),
            clock: Box::new(SystemClock),
            confirmation: Box::new(AutoConfirm),
            lines: Vec::new(),
            aggregation: Aggregation::default(),
            log: TransitionLog::new(),
            ledger: SettlementLedger::new(),
        }
    }

    pub fn from_config(config: &AppConfig, source: impl RowSource + 'static) -> Self {
        Self::new(source)
            .with_normalizer(RowNormalizer::new(config.normalizer.currency_prefix.clone()))
            .with_grouping(config.orders.grouping)
            .with_timeline_mode(config.orders.timeline)
            .with_header(config.source.has_header)
            .with_session_actor(config.session.actor.clone())
    }

    pub fn with_normalizer(mut self, normalizer: RowNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_grouping(mut self, grouping: GroupingPolicy) -> Self {
        self.grouping = grouping;
        self
    }

    pub fn with_timeline_mode(mut self, mode: TimelineMode) -> Self {
        self.timeline_mode = mode;
        self
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_session_actor(mut self, actor: impl Into<String>) -> Self {
        self.session_actor = actor.into();
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_confirmation(mut self, confirmation: impl Confirmation + 'static) -> Self {
        self.confirmation = Box::new(confirmation);
        self
    }

    /// 拉取完整快照并替换所有明细与派生数据; 失败时保持原状态
    pub fn refresh(&mut self) -> Result<RefreshSummary> {
        let rows = self.source.fetch_rows().map_err(|e| {
            tracing::warn!("Refresh failed, keeping previous snapshot: {}", e);
            e
        })?;

        let skip = usize::from(self.has_header);
        let lines: Vec<PurchaseLine> = rows
            .iter()
            .skip(skip)
            .filter(|row| !row.is_blank())
            .map(|row| self.normalizer.normalize(row))
            .collect();
        let aggregation = aggregate(&lines, self.grouping);

        let summary = RefreshSummary {
            rows: rows.len(),
            lines: lines.len(),
            orders: aggregation.orders.len(),
            inconsistent: aggregation.inconsistent.clone(),
        };

        // 本地编辑未回写数据源, 刷新后一并丢弃
        self.lines = lines;
        self.aggregation = aggregation;
        self.log.clear();

        tracing::info!(
            "Refreshed purchase orders: {} rows, {} lines, {} orders",
            summary.rows, summary.lines, summary.orders
        );
        Ok(summary)
    }

    pub fn lines(&self) -> &[PurchaseLine] {
        &self.lines
    }

    pub fn orders(&self) -> &IndexMap<String, PurchaseOrder> {
        &self.aggregation.orders
    }

    pub fn inconsistent_orders(&self) -> &[String] {
        &self.aggregation.inconsistent
    }

    pub fn order(&self, order_number: &str) -> Result<&PurchaseOrder> {
        self.aggregation
            .orders
            .get(order_number)
            .ok_or_else(|| ProcurementError::OrderNotFound(order_number.to_string()))
    }

    pub fn orders_with_status(&self, status: OrderStatus) -> Vec<&PurchaseOrder> {
        self.aggregation.with_status(status).collect()
    }

    pub fn status_counts(&self) -> IndexMap<OrderStatus, usize> {
        self.aggregation.status_counts()
    }

    pub fn timeline(&self, order_number: &str) -> Result<Vec<TrackingEvent>> {
        let order = self.order(order_number)?;
        Ok(timeline(order, &self.log, self.timeline_mode))
    }

    pub fn approve(&mut self, order_number: &str, actor: &str) -> Result<PurchaseOrder> {
        self.transition_to(order_number, OrderStatus::Approved, actor, None)
    }

    pub fn reject(&mut self, order_number: &str, reason: &str) -> Result<PurchaseOrder> {
        let actor = self.session_actor.clone();
        self.transition_to(order_number, OrderStatus::Rejected, &actor, Some(reason))
    }

    /// 以当天日期迁移到任意目标状态
    pub fn transition_to(
        &mut self,
        order_number: &str,
        to: OrderStatus,
        actor: &str,
        reason: Option<&str>,
    ) -> Result<PurchaseOrder> {
        let mut request = TransitionRequest::new(to, actor, self.clock.today());
        if let Some(reason) = reason {
            request = request.with_reason(reason);
        }
        self.transition(order_number, request)
    }

    /// 通用状态迁移入口
    pub fn transition(&mut self, order_number: &str, request: TransitionRequest) -> Result<PurchaseOrder> {
        let order = self.order(order_number)?;
        let from = order.status;
        let updated = apply_transition(order, &request).map_err(|e| {
            tracing::warn!("Transition rejected: {}", e);
            e
        })?;

        if request.to == OrderStatus::Rejected {
            let prompt = format!("Reject purchase order {}?", order_number);
            if !self.confirmation.confirm(&prompt) {
                tracing::info!("Rejection of order {} declined", order_number);
                return Err(ProcurementError::Declined(prompt));
            }
        }

        self.commit_order(updated.clone());
        self.log.record(from, &updated, &request.actor, request.on);
        tracing::info!(
            "Order {} moved to {} by {}",
            order_number, updated.status, request.actor
        );
        Ok(updated)
    }

    fn commit_order(&mut self, updated: PurchaseOrder) {
        let mut replacements = updated.lines.iter();
        for line in self
            .lines
            .iter_mut()
            .filter(|l| l.order_number == updated.order_number)
        {
            match replacements.next() {
                Some(replacement) => *line = replacement.clone(),
                None => break,
            }
        }
        self.aggregation
            .orders
            .insert(updated.order_number.clone(), updated);
    }

    pub fn ledger(&self) -> &SettlementLedger {
        &self.ledger
    }

    pub fn ledger_summary(&self) -> SettlementSummary {
        self.ledger.summary()
    }

    /// 新增结算条目; 金额为自由文本, 解析规则同数据源金额字段
    pub fn add_settlement_entry(
        &mut self,
        description: &str,
        amount: &str,
        status: SettlementStatus,
        reference: Option<&str>,
    ) -> Result<SettlementEntry> {
        let parsed = self.normalizer.parse_money(amount).ok_or_else(|| {
            ProcurementError::Validation(format!("settlement amount is not a number: {:?}", amount))
        });
        let result = parsed.and_then(|amount| {
            self.ledger.add_entry(
                description,
                amount,
                status,
                reference.map(str::to_string),
                self.clock.today(),
            )
        });
        match &result {
            Ok(entry) => tracing::info!(
                "Settlement entry {} added: {} {} ({})",
                entry.id, entry.status, entry.amount, entry.description
            ),
            Err(e) => tracing::warn!("Settlement entry rejected: {}", e),
        }
        result
    }

    /// 从订单明细生成结算条目
    pub fn seed_settlement_from_line(&mut self, order_number: &str, line: usize) -> Result<SettlementEntry> {
        let order = self.order(order_number)?;
        let source = order.lines.get(line).cloned().ok_or_else(|| {
            ProcurementError::Validation(format!(
                "order {} has no line {} ({} lines)",
                order_number, line, order.item_count
            ))
        })?;
        let entry = self.ledger.seed_from_purchase(&source, self.clock.today())?;
        tracing::info!("Settlement entry {} seeded from order {}", entry.id, order_number);
        Ok(entry)
    }

    /// 删除结算条目; 不存在时返回 None, 不视为错误
    pub fn remove_settlement_entry(&mut self, id: &str) -> Result<Option<SettlementEntry>> {
        let Some(entry) = self.ledger.get(id) else {
            return Ok(None);
        };
        let prompt = format!("Delete settlement entry \"{}\"?", entry.description);
        if !self.confirmation.confirm(&prompt) {
            tracing::info!("Removal of settlement entry {} declined", id);
            return Err(ProcurementError::Declined(prompt));
        }
        let removed = self.ledger.remove_entry(id);
        tracing::info!("Settlement entry {} removed", id);
        Ok(removed)
    }

    /// 修改结算条目类型; 返回是否找到
    pub fn set_settlement_status(&mut self, id: &str, status: SettlementStatus) -> bool {
        let found = self.ledger.set_status(id, status);
        if found {
            tracing::info!("Settlement entry {} marked {}", id, status);
        }
        found
    }
}
