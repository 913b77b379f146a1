pub mod handlers;

pub use handlers::*;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::{Arc, Mutex};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::service::ProcurementStore;

/// 共享状态: 所有请求串行访问同一个 store
pub type AppState = Arc<Mutex<ProcurementStore>>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/refresh", post(refresh))
        .route("/api/orders", get(list_orders))
        .route("/api/orders/summary", get(order_summary))
        .route("/api/orders/:order_number", get(get_order))
        .route("/api/orders/:order_number/timeline", get(order_timeline))
        .route("/api/orders/:order_number/approve", post(approve_order))
        .route("/api/orders/:order_number/reject", post(reject_order))
        .route("/api/orders/:order_number/transition", post(transition_order))
        .route("/api/settlements", get(list_settlements).post(add_settlement))
        .route("/api/settlements/seed", post(seed_settlement))
        .route("/api/settlements/:id", delete(remove_settlement))
        .route("/api/settlements/:id/status", put(set_settlement_status))
        .route("/api/export/lines.csv", get(export_lines))
        .route("/api/export/settlements.csv", get(export_settlements))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
