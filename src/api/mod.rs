pub mod handlers;

pub use handlers::*;

use crate::db::RecordStore;
use crate::service::ReceiptExtractor;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// multipart 边界与其它字段预留的余量
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// 共享状态
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub extractor: Arc<ReceiptExtractor>,
    pub max_upload_bytes: usize,
}

/// 构建路由
pub fn router(state: AppState) -> Router {
    // 放宽上传接口的请求体限制, 超限文件交由处理函数返回 400
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes + MULTIPART_OVERHEAD);

    Router::new()
        .route("/health", get(health_check))
        .route("/upload", post(upload).layer(upload_limit))
        .route("/save", post(save))
        .route("/records", get(list_records))
        .route(
            "/records/:id",
            get(get_record).put(update_record).delete(delete_record),
        )
        .route("/export/csv", get(export_csv))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
