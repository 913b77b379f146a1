use purchase_settlement::{api, AppConfig, CsvRowSource, ProcurementStore};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 本地时间格式, 可用 RUST_LOG 调整级别
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load().unwrap_or_else(|e| {
        warn!("Invalid configuration ({}), using defaults", e);
        AppConfig::default()
    });
    info!("Starting server with config: {:?}", config);

    // 首次加载失败不退出, 可通过 /api/refresh 重试
    let source = CsvRowSource::new(&config.source.path);
    let mut store = ProcurementStore::from_config(&config, source);
    match store.refresh() {
        Ok(summary) => info!(
            "Initial snapshot: {} lines, {} orders",
            summary.lines, summary.orders
        ),
        Err(e) => warn!("Initial refresh failed, retry via POST /api/refresh: {}", e),
    }

    let state = Arc::new(Mutex::new(store));
    let app = api::router(state);

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET  /api/orders                        - purchase orders (?status=)");
    info!("  GET  /api/orders/:order_number/timeline - tracking events");
    info!("  POST /api/orders/:order_number/approve  - approve pending order");
    info!("  POST /api/orders/:order_number/reject   - reject pending order");
    info!("  GET  /api/settlements                   - settlement ledger");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
