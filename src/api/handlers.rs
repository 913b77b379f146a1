use axum::{
    extract::{Json, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::MutexGuard;

use super::AppState;
use crate::error::ProcurementError;
use crate::export;
use crate::models::{OrderStatus, PurchaseOrder, SettlementEntry, SettlementStatus, SettlementSummary};
use crate::service::ProcurementStore;

/// 统一响应体
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

fn ok<T: Serialize>(message: impl Into<String>, data: T) -> Response {
    let response = ApiResponse {
        success: true,
        message: message.into(),
        data: Some(data),
    };
    (StatusCode::OK, Json(response)).into_response()
}

fn failure(status: StatusCode, message: String) -> Response {
    let response: ApiResponse<()> = ApiResponse {
        success: false,
        message,
        data: None,
    };
    (status, Json(response)).into_response()
}

impl IntoResponse for ProcurementError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProcurementError::Fetch(_) => StatusCode::SERVICE_UNAVAILABLE,
            ProcurementError::InvalidTransition { .. } | ProcurementError::Declined(_) => {
                StatusCode::CONFLICT
            }
            ProcurementError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ProcurementError::OrderNotFound(_) => StatusCode::NOT_FOUND,
            ProcurementError::Csv(_) | ProcurementError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        failure(status, format!("Error: {}", self))
    }
}

fn lock(state: &AppState) -> Result<MutexGuard<'_, ProcurementStore>, Response> {
    state.lock().map_err(|_| {
        tracing::error!("Store lock poisoned");
        failure(StatusCode::INTERNAL_SERVER_ERROR, "Error: store unavailable".to_string())
    })
}

fn csv_response(body: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        body,
    )
        .into_response()
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 重新拉取数据源快照
pub async fn refresh(State(state): State<AppState>) -> Response {
    let mut store = match lock(&state) {
        Ok(store) => store,
        Err(response) => return response,
    };
    match store.refresh() {
        Ok(summary) => ok(format!("Loaded {} orders", summary.orders), summary),
        Err(e) => e.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct OrderFilter {
    pub status: Option<String>,
}

pub async fn list_orders(State(state): State<AppState>, Query(filter): Query<OrderFilter>) -> Response {
    let store = match lock(&state) {
        Ok(store) => store,
        Err(response) => return response,
    };
    let orders: Vec<&PurchaseOrder> = match filter.status.as_deref() {
        Some(raw) => match raw.parse::<OrderStatus>() {
            Ok(status) => store.orders_with_status(status),
            Err(e) => return ProcurementError::Validation(e).into_response(),
        },
        None => store.orders().values().collect(),
    };
    ok(format!("{} orders", orders.len()), orders)
}

#[derive(Debug, Serialize)]
pub struct OrderSummaryResponse {
    pub total_orders: usize,
    pub status_counts: IndexMap<OrderStatus, usize>,
    pub inconsistent: Vec<String>,
}

pub async fn order_summary(State(state): State<AppState>) -> Response {
    let store = match lock(&state) {
        Ok(store) => store,
        Err(response) => return response,
    };
    let summary = OrderSummaryResponse {
        total_orders: store.orders().len(),
        status_counts: store.status_counts(),
        inconsistent: store.inconsistent_orders().to_vec(),
    };
    ok("Order summary", summary)
}

pub async fn get_order(State(state): State<AppState>, Path(order_number): Path<String>) -> Response {
    let store = match lock(&state) {
        Ok(store) => store,
        Err(response) => return response,
    };
    match store.order(&order_number) {
        Ok(order) => ok(format!("Order {}", order_number), order),
        Err(e) => e.into_response(),
    }
}

pub async fn order_timeline(State(state): State<AppState>, Path(order_number): Path<String>) -> Response {
    let store = match lock(&state) {
        Ok(store) => store,
        Err(response) => return response,
    };
    match store.timeline(&order_number) {
        Ok(events) => ok(format!("{} events", events.len()), events),
        Err(e) => e.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    pub actor: String,
}

pub async fn approve_order(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
    Json(req): Json<ApproveRequest>,
) -> Response {
    let mut store = match lock(&state) {
        Ok(store) => store,
        Err(response) => return response,
    };
    match store.approve(&order_number, &req.actor) {
        Ok(order) => ok(format!("Order {} approved", order_number), order),
        Err(e) => e.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    #[serde(default)]
    pub reason: String,
}

pub async fn reject_order(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
    Json(req): Json<RejectRequest>,
) -> Response {
    let mut store = match lock(&state) {
        Ok(store) => store,
        Err(response) => return response,
    };
    match store.reject(&order_number, &req.reason) {
        Ok(order) => ok(format!("Order {} rejected", order_number), order),
        Err(e) => e.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct TransitionBody {
    pub status: OrderStatus,
    pub actor: String,
    pub reason: Option<String>,
}

pub async fn transition_order(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
    Json(req): Json<TransitionBody>,
) -> Response {
    let mut store = match lock(&state) {
        Ok(store) => store,
        Err(response) => return response,
    };
    match store.transition_to(&order_number, req.status, &req.actor, req.reason.as_deref()) {
        Ok(order) => ok(format!("Order {} is now {}", order_number, order.status), order),
        Err(e) => e.into_response(),
    }
}

#[derive(Debug, Serialize)]
pub struct LedgerResponse {
    pub entries: Vec<SettlementEntry>,
    pub summary: SettlementSummary,
}

pub async fn list_settlements(State(state): State<AppState>) -> Response {
    let store = match lock(&state) {
        Ok(store) => store,
        Err(response) => return response,
    };
    let ledger = LedgerResponse {
        entries: store.ledger().entries().to_vec(),
        summary: store.ledger_summary(),
    };
    ok(format!("{} settlement entries", ledger.entries.len()), ledger)
}

#[derive(Debug, Deserialize)]
pub struct AddSettlementRequest {
    pub description: String,
    /// 字符串或数字
    pub amount: serde_json::Value,
    pub status: SettlementStatus,
    pub reference: Option<String>,
}

pub async fn add_settlement(State(state): State<AppState>, Json(req): Json<AddSettlementRequest>) -> Response {
    let amount = match &req.amount {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Number(number) => number.to_string(),
        other => {
            return ProcurementError::Validation(format!("unsupported amount: {}", other)).into_response()
        }
    };
    let mut store = match lock(&state) {
        Ok(store) => store,
        Err(response) => return response,
    };
    match store.add_settlement_entry(&req.description, &amount, req.status, req.reference.as_deref()) {
        Ok(entry) => ok("Settlement entry added", entry),
        Err(e) => e.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct SeedSettlementRequest {
    pub order_number: String,
    #[serde(default)]
    pub line: usize,
}

pub async fn seed_settlement(State(state): State<AppState>, Json(req): Json<SeedSettlementRequest>) -> Response {
    let mut store = match lock(&state) {
        Ok(store) => store,
        Err(response) => return response,
    };
    match store.seed_settlement_from_line(&req.order_number, req.line) {
        Ok(entry) => ok(format!("Settlement entry seeded from {}", req.order_number), entry),
        Err(e) => e.into_response(),
    }
}

pub async fn remove_settlement(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let mut store = match lock(&state) {
        Ok(store) => store,
        Err(response) => return response,
    };
    match store.remove_settlement_entry(&id) {
        Ok(removed) => ok(
            if removed.is_some() { "Settlement entry removed" } else { "Settlement entry not found" },
            removed.is_some(),
        ),
        Err(e) => e.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct SettlementStatusRequest {
    pub status: SettlementStatus,
}

pub async fn set_settlement_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SettlementStatusRequest>,
) -> Response {
    let mut store = match lock(&state) {
        Ok(store) => store,
        Err(response) => return response,
    };
    let updated = store.set_settlement_status(&id, req.status);
    ok(
        if updated { "Settlement status updated" } else { "Settlement entry not found" },
        updated,
    )
}

pub async fn export_lines(State(state): State<AppState>) -> Response {
    let store = match lock(&state) {
        Ok(store) => store,
        Err(response) => return response,
    };
    let mut body = Vec::new();
    match export::write_lines_csv(&mut body, store.lines()) {
        Ok(()) => csv_response(body),
        Err(e) => e.into_response(),
    }
}

pub async fn export_settlements(State(state): State<AppState>) -> Response {
    let store = match lock(&state) {
        Ok(store) => store,
        Err(response) => return response,
    };
    let mut body = Vec::new();
    match export::write_settlements_csv(&mut body, store.ledger().entries()) {
        Ok(()) => csv_response(body),
        Err(e) => e.into_response(),
    }
}
