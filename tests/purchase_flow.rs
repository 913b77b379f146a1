use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use purchase_settlement::models::{LineDate, OrderStatus, SettlementStatus};
use purchase_settlement::service::{FixedClock, GroupingPolicy, TimelineMode};
use purchase_settlement::{MemoryRowSource, ProcurementError, ProcurementStore};
use std::str::FromStr;

const HEADER: [&str; 11] = [
    "Order Number", "Supplier", "Order Date", "Expected Delivery", "Status", "Product", "SKU",
    "Quantity", "Unit Price", "Total", "Notes",
];

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn sheet() -> Vec<Vec<&'static str>> {
    vec![
        HEADER.to_vec(),
        vec!["PO-1", "Acme", "2024-01-01", "2024-01-10", "received", "Widget", "", "10", "100", "1000", ""],
        vec!["PO-2", "Bolt Co", "2024-02-01", "2024-02-07", "", "Nut", "", "100", "Rp 50", "Rp 5,000", ""],
        vec!["PO-2", "Bolt Co", "2024-02-01", "2024-02-07", "", "Washer", "", "x", "2", "??", "bad total"],
        vec!["", "", "", "", "", "", "", "", "", "", ""],
        vec!["PO-3", "Cargo", "garbage", "", "approved", "Crate", "", "1", "75", "75", ""],
    ]
}

fn store_with(source: MemoryRowSource) -> ProcurementStore {
    ProcurementStore::new(source).with_clock(FixedClock(date("2024-03-01")))
}

#[test]
fn single_received_row_yields_five_event_timeline() {
    let source = MemoryRowSource::new(vec![
        HEADER.to_vec(),
        vec!["PO-1", "Acme", "2024-01-01", "2024-01-10", "received", "Widget", "", "10", "100", "1000", ""],
    ]);
    let mut store = store_with(source);
    store.refresh().unwrap();

    assert_eq!(store.orders().len(), 1);
    let order = store.order("PO-1").unwrap();
    assert_eq!(order.total_amount, dec("1000"));

    let events = store.timeline("PO-1").unwrap();
    assert_eq!(events.len(), 5);
    let last = events.last().unwrap();
    assert_eq!(last.status_label, "Received");
    assert_eq!(last.timestamp, LineDate::Known(date("2024-01-10")));
}

#[test]
fn settlement_scenario_nets_to_220000() {
    let mut store = store_with(MemoryRowSource::default());
    store
        .add_settlement_entry("Rent", "250000", SettlementStatus::Paid, None)
        .unwrap();
    store
        .add_settlement_entry("Ad refund", "30000", SettlementStatus::Credited, None)
        .unwrap();

    let summary = store.ledger_summary();
    assert_eq!(summary.total_paid, dec("250000"));
    assert_eq!(summary.total_credited, dec("30000"));
    assert_eq!(summary.net_settlement, dec("220000"));
}

#[test]
fn received_order_cannot_go_back_to_approved() {
    let mut store = store_with(MemoryRowSource::new(sheet()));
    store.refresh().unwrap();

    let err = store.approve("PO-1", "Dewi").unwrap_err();
    assert!(matches!(err, ProcurementError::InvalidTransition { .. }));
    assert_eq!(store.order("PO-1").unwrap().status, OrderStatus::Received);
}

#[test]
fn bad_rows_degrade_instead_of_aborting() {
    let mut store = store_with(MemoryRowSource::new(sheet()));
    let summary = store.refresh().unwrap();

    // 表头跳过, 空行跳过
    assert_eq!(summary.rows, 6);
    assert_eq!(summary.lines, 4);
    assert_eq!(summary.orders, 3);

    let po2 = store.order("PO-2").unwrap();
    assert_eq!(po2.item_count, 2);
    assert_eq!(po2.total_amount, dec("5000"));
    assert_eq!(po2.lines[1].quantity, 0);

    let po3 = store.order("PO-3").unwrap();
    assert_eq!(po3.order_date, LineDate::Unknown);
    assert_eq!(store.timeline("PO-3").unwrap().len(), 2);
}

#[test]
fn grouping_preserves_totals() {
    let mut store = store_with(MemoryRowSource::new(sheet()));
    store.refresh().unwrap();

    let mut line_sum = BigDecimal::from(0);
    for line in store.lines() {
        line_sum += &line.total;
        assert!(store.orders().contains_key(&line.order_number));
    }
    let mut order_sum = BigDecimal::from(0);
    for order in store.orders().values() {
        order_sum += &order.total_amount;
    }
    assert_eq!(line_sum, order_sum);
}

#[test]
fn refresh_is_idempotent() {
    let mut store = store_with(MemoryRowSource::new(sheet()));
    store.refresh().unwrap();
    let first = serde_json::to_string(store.orders()).unwrap();
    store.refresh().unwrap();
    let second = serde_json::to_string(store.orders()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn refresh_discards_local_edits() {
    let mut store = store_with(MemoryRowSource::new(sheet()));
    store.refresh().unwrap();
    store.approve("PO-2", "Dewi").unwrap();
    assert_eq!(store.order("PO-2").unwrap().status, OrderStatus::Approved);

    store.refresh().unwrap();
    assert_eq!(store.order("PO-2").unwrap().status, OrderStatus::Pending);
}

#[test]
fn failed_refresh_keeps_previous_snapshot() {
    let source = MemoryRowSource::new(sheet());
    let mut store = store_with(source.clone());
    store.refresh().unwrap();

    source.set_failure(Some("sheet unreachable"));
    let err = store.refresh().unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(store.orders().len(), 3);

    source.set_failure(None);
    source.replace_rows(vec![HEADER.to_vec()]);
    store.refresh().unwrap();
    assert!(store.orders().is_empty());
}

#[test]
fn reject_requires_reason_and_is_terminal() {
    let mut store = store_with(MemoryRowSource::new(sheet()));
    store.refresh().unwrap();

    assert!(matches!(
        store.reject("PO-2", ""),
        Err(ProcurementError::Validation(_))
    ));
    let rejected = store.reject("PO-2", "Supplier blacklisted").unwrap();
    assert_eq!(rejected.status, OrderStatus::Rejected);
    assert_eq!(rejected.rejection_reason(), Some("Supplier blacklisted"));
    assert!(store.approve("PO-2", "Dewi").is_err());
    assert_eq!(store.timeline("PO-2").unwrap().len(), 1);
}

#[test]
fn full_happy_path_with_recorded_timeline() {
    let mut store = store_with(MemoryRowSource::new(sheet())).with_timeline_mode(TimelineMode::Recorded);
    store.refresh().unwrap();

    store.approve("PO-2", "Dewi").unwrap();
    store
        .transition_to("PO-2", OrderStatus::Ordered, "Procurement", None)
        .unwrap();
    store
        .transition_to("PO-2", OrderStatus::Shipped, "Bolt Co", None)
        .unwrap();
    let received = store
        .transition_to("PO-2", OrderStatus::Received, "Warehouse", None)
        .unwrap();
    assert_eq!(received.received_date(), Some(date("2024-03-01")));
    assert_eq!(received.approved_by(), Some("Dewi"));

    let events = store.timeline("PO-2").unwrap();
    let labels: Vec<&str> = events.iter().map(|e| e.status_label.as_str()).collect();
    assert_eq!(labels, vec!["Created", "Approved", "Ordered", "Shipped", "Received"]);
    assert!(events[1..]
        .iter()
        .all(|e| e.timestamp == LineDate::Known(date("2024-03-01"))));
}

#[test]
fn strict_grouping_excludes_inconsistent_orders() {
    let source = MemoryRowSource::new(vec![
        HEADER.to_vec(),
        vec!["PO-5", "Acme", "2024-01-01", "2024-01-10", "pending", "A", "", "1", "1", "1", ""],
        vec!["PO-5", "Acme", "2024-01-01", "2024-01-10", "approved", "B", "", "1", "1", "1", ""],
        vec!["PO-6", "Acme", "2024-01-01", "2024-01-10", "pending", "C", "", "1", "1", "1", ""],
    ]);
    let mut store = store_with(source).with_grouping(GroupingPolicy::RejectInconsistent);
    let summary = store.refresh().unwrap();

    assert_eq!(summary.inconsistent, vec!["PO-5".to_string()]);
    assert!(matches!(store.order("PO-5"), Err(ProcurementError::OrderNotFound(_))));
    assert!(store.order("PO-6").is_ok());
}

#[test]
fn ledger_netting_holds_after_every_operation() {
    let mut store = store_with(MemoryRowSource::new(sheet()));
    store.refresh().unwrap();

    let check = |store: &ProcurementStore| {
        let s = store.ledger_summary();
        assert_eq!(s.net_settlement, &s.total_paid - &s.total_credited);
    };

    let a = store.add_settlement_entry("Deposit", "1,000", SettlementStatus::Paid, None).unwrap();
    check(&store);
    let b = store.seed_settlement_from_line("PO-1", 0).unwrap();
    check(&store);
    assert!(store.add_settlement_entry("", "10", SettlementStatus::Paid, None).is_err());
    check(&store);
    assert!(store.set_settlement_status(&b.id, SettlementStatus::Credited));
    check(&store);
    assert_eq!(store.ledger_summary().net_settlement, dec("0"));
    store.remove_settlement_entry(&a.id).unwrap();
    check(&store);
    assert!(store.remove_settlement_entry(&a.id).unwrap().is_none());
    assert_eq!(store.ledger_summary().net_settlement, dec("-1000"));
}

#[test]
fn recorded_timeline_keeps_source_milestones_for_future_dated_order() {
    let source = MemoryRowSource::new(vec![
        HEADER.to_vec(),
        vec!["PO-4", "Acme", "2024-05-01", "2024-05-10", "approved", "Kettle", "", "2", "40", "80", ""],
    ]);
    // 时钟 (2024-03-01) 早于下单日期
    let mut store = store_with(source).with_timeline_mode(TimelineMode::Recorded);
    store.refresh().unwrap();
    store
        .transition_to("PO-4", OrderStatus::Ordered, "Procurement", None)
        .unwrap();

    let events = store.timeline("PO-4").unwrap();
    let labels: Vec<&str> = events.iter().map(|e| e.status_label.as_str()).collect();
    assert_eq!(labels, vec!["Created", "Approved", "Ordered"]);
    assert!(events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    assert_eq!(events[2].timestamp, LineDate::Known(date("2024-05-02")));
    assert_eq!(events[2].actor, "Procurement");
}
