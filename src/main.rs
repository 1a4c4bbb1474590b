use irsaliye_ocr::{api, open_store, AppConfig, AzureDocumentAnalyzer, ReceiptExtractor};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 可选
    let _ = dotenvy::dotenv();

    // 初始化日志 - 本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);
    if config.analysis.credentials().is_none() {
        tracing::warn!("Azure Form Recognizer credentials not configured, /upload will fail");
    }

    // 选择存储
    let store = open_store(&config.database).await?;
    info!("Record store: {}", store.backend());

    let analyzer = Arc::new(AzureDocumentAnalyzer::new(config.analysis.clone())?);
    let state = api::AppState {
        store,
        extractor: Arc::new(ReceiptExtractor::new(analyzer)),
        max_upload_bytes: config.upload.max_bytes,
    };
    let app = api::router(state);

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST   /upload          - image → extracted fields");
    info!("  POST   /save            - persist reviewed record");
    info!("  GET    /records         - list records (newest first)");
    info!("  GET    /records/:id     - single record");
    info!("  PUT    /records/:id     - update record");
    info!("  DELETE /records/:id     - delete record");
    info!("  GET    /export/csv      - CSV export");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
