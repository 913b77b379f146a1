use chrono::NaiveDate;

use crate::error::{ProcurementError, Result};
use crate::models::{OrderStatus, PurchaseOrder};

/// 状态迁移请求
#[derive(Debug, Clone)]
pub struct TransitionRequest {
    pub to: OrderStatus,
    pub actor: String,
    /// 驳回时必填
    pub reason: Option<String>,
    pub on: NaiveDate,
}

impl TransitionRequest {
    pub fn new(to: OrderStatus, actor: impl Into<String>, on: NaiveDate) -> Self {
        Self {
            to,
            actor: actor.into(),
            reason: None,
            on,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    from.allowed_targets().contains(&to)
}

/// 执行状态迁移, 返回更新后的订单副本; 原订单不变
pub fn apply_transition(order: &PurchaseOrder, request: &TransitionRequest) -> Result<PurchaseOrder> {
    if !can_transition(order.status, request.to) {
        return Err(ProcurementError::InvalidTransition {
            order_number: order.order_number.clone(),
            from: order.status,
            to: request.to,
        });
    }

    let reason = match request.to {
        OrderStatus::Rejected => {
            let reason = request.reason.as_deref().map(str::trim).unwrap_or("");
            if reason.is_empty() {
                return Err(ProcurementError::Validation(format!(
                    "Order {}: a rejection reason is required",
                    order.order_number
                )));
            }
            Some(reason.to_string())
        }
        _ => None,
    };

    let mut updated = order.clone();
    updated.status = request.to;
    for line in updated.lines.iter_mut() {
        line.status = request.to;
        match request.to {
            OrderStatus::Approved => {
                line.approved_by = Some(request.actor.clone());
                line.approved_date = Some(request.on);
            }
            OrderStatus::Shipped => line.shipped_date = Some(request.on),
            OrderStatus::Received => line.received_date = Some(request.on),
            OrderStatus::Rejected => line.rejection_reason = reason.clone(),
            OrderStatus::Pending | OrderStatus::Ordered | OrderStatus::Cancelled => {}
        }
    }

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawRow;
    use crate::service::RowNormalizer;

    fn order_with_status(status: OrderStatus) -> PurchaseOrder {
        let fields = [
            "PO-1", "Acme", "2024-01-01", "2024-01-10", status.as_str(), "Widget", "", "2", "5",
            "10", "",
        ];
        let line = RowNormalizer::default().normalize(&RawRow::new(
            1,
            fields.iter().map(|f| f.to_string()).collect(),
        ));
        let mut order = PurchaseOrder::from_first_line(line.clone());
        order.add_line(line);
        order
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
    }

    #[test]
    fn exactly_the_table_edges_succeed() {
        let mut allowed = Vec::new();
        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                let request = TransitionRequest::new(to, "mgr", today()).with_reason("no budget");
                let result = apply_transition(&order_with_status(from), &request);
                assert_eq!(result.is_ok(), can_transition(from, to), "{} -> {}", from, to);
                if result.is_ok() {
                    allowed.push((from, to));
                }
            }
        }
        assert_eq!(allowed.len(), 8);
        assert!(allowed.contains(&(OrderStatus::Pending, OrderStatus::Rejected)));
        assert!(allowed.contains(&(OrderStatus::Shipped, OrderStatus::Received)));
        assert!(!allowed.contains(&(OrderStatus::Shipped, OrderStatus::Cancelled)));
    }

    #[test]
    fn received_order_cannot_be_approved() {
        let order = order_with_status(OrderStatus::Received);
        let err = apply_transition(&order, &TransitionRequest::new(OrderStatus::Approved, "mgr", today()))
            .unwrap_err();
        assert!(matches!(err, ProcurementError::InvalidTransition { .. }));
    }

    #[test]
    fn approval_stamps_every_line() {
        let order = order_with_status(OrderStatus::Pending);
        let updated =
            apply_transition(&order, &TransitionRequest::new(OrderStatus::Approved, "Dewi", today()))
                .unwrap();
        assert_eq!(updated.status, OrderStatus::Approved);
        assert!(updated.lines.iter().all(|l| l.status == OrderStatus::Approved
            && l.approved_by.as_deref() == Some("Dewi")
            && l.approved_date == Some(today())));
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn shipping_and_receiving_set_dates() {
        let shipped = apply_transition(
            &order_with_status(OrderStatus::Ordered),
            &TransitionRequest::new(OrderStatus::Shipped, "supplier", today()),
        )
        .unwrap();
        assert_eq!(shipped.shipped_date(), Some(today()));

        let received = apply_transition(
            &shipped,
            &TransitionRequest::new(OrderStatus::Received, "warehouse", today()),
        )
        .unwrap();
        assert_eq!(received.received_date(), Some(today()));
    }

    #[test]
    fn rejection_requires_reason() {
        let order = order_with_status(OrderStatus::Pending);
        let missing = TransitionRequest::new(OrderStatus::Rejected, "mgr", today());
        assert!(matches!(
            apply_transition(&order, &missing),
            Err(ProcurementError::Validation(_))
        ));
        let blank = missing.clone().with_reason("   ");
        assert!(matches!(
            apply_transition(&order, &blank),
            Err(ProcurementError::Validation(_))
        ));

        let rejected = apply_transition(&order, &missing.with_reason(" over budget ")).unwrap();
        assert_eq!(rejected.status, OrderStatus::Rejected);
        assert_eq!(rejected.rejection_reason(), Some("over budget"));
    }
}
