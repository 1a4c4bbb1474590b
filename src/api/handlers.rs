use super::AppState;
use crate::db::{export_to_bytes, CSV_FILENAME};
use crate::error::AppError;
use crate::models::{NewRecord, RecordUpdate, StoredRecord};
use crate::service::Extraction;
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
        Json, Multipart, Path, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

const UPLOAD_FAILED: &str = "İrsaliye işlenirken bir hata oluştu";
const SAVE_FAILED: &str = "İrsaliye kaydedilirken bir hata oluştu";
const LIST_FAILED: &str = "Kayıtlar alınırken bir hata oluştu";
const GET_FAILED: &str = "Kayıt alınırken bir hata oluştu";
const UPDATE_FAILED: &str = "Kayıt güncellenirken bir hata oluştu";
const DELETE_FAILED: &str = "Kayıt silinirken bir hata oluştu";
const EXPORT_FAILED: &str = "CSV dışa aktarılırken bir hata oluştu";

/// 简单消息响应体
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 上传图片并识别 (multipart 字段名 file)
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Extraction>, AppError> {
    let mut multipart = multipart.map_err(|e| AppError::InvalidMultipart {
        message: e.body_text(),
    })?;

    let (bytes, content_type) = read_image(&mut multipart, state.max_upload_bytes).await?;
    tracing::info!("Received image: {} bytes, {}", bytes.len(), content_type);

    state
        .extractor
        .extract(bytes, &content_type)
        .await
        .map(Json)
        .map_err(|e| e.during(UPLOAD_FAILED))
}

/// 读取 file 字段: 缺失 → 大小 → 类型 依次校验
async fn read_image(multipart: &mut Multipart, limit: usize) -> Result<(Vec<u8>, String), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|e| multipart_error(e, limit))?;

        if bytes.len() > limit {
            return Err(AppError::FileTooLarge { limit });
        }
        if !content_type.starts_with("image/") {
            return Err(AppError::UnsupportedFileType { content_type });
        }
        return Ok((bytes.to_vec(), content_type));
    }

    Err(AppError::MissingFile)
}

fn multipart_error(err: MultipartError, limit: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::FileTooLarge { limit }
    } else {
        AppError::InvalidMultipart {
            message: err.body_text(),
        }
    }
}

fn body_error(rejection: JsonRejection) -> AppError {
    AppError::InvalidBody {
        message: rejection.body_text(),
    }
}

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.trim().parse().map_err(|_| AppError::InvalidId {
        raw: raw.to_string(),
    })
}

/// 保存审核后的识别结果
pub async fn save(
    State(state): State<AppState>,
    body: Result<Json<NewRecord>, JsonRejection>,
) -> Result<Json<StoredRecord>, AppError> {
    let Json(record) = body.map_err(body_error)?;
    record.validate()?;

    let saved = state
        .store
        .create(record)
        .await
        .map_err(|e| e.during(SAVE_FAILED))?;

    tracing::info!("Saved record {} ({})", saved.id, saved.invoice_number);
    Ok(Json(saved))
}

/// 全部记录, 新的在前
pub async fn list_records(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredRecord>>, AppError> {
    let records = state.store.list().await.map_err(|e| e.during(LIST_FAILED))?;
    Ok(Json(records))
}

pub async fn get_record(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<StoredRecord>, AppError> {
    let id = parse_id(&raw_id)?;

    state
        .store
        .get_by_id(id)
        .await
        .map_err(|e| e.during(GET_FAILED))?
        .map(Json)
        .ok_or(AppError::RecordNotFound { id })
}

pub async fn update_record(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<Json<RecordUpdate>, JsonRejection>,
) -> Result<Json<StoredRecord>, AppError> {
    let id = parse_id(&raw_id)?;
    let Json(update) = body.map_err(body_error)?;
    update.validate()?;

    let updated = state
        .store
        .update(id, update)
        .await
        .map_err(|e| e.during(UPDATE_FAILED))?
        .ok_or(AppError::RecordNotFound { id })?;

    tracing::info!("Updated record {}", id);
    Ok(Json(updated))
}

pub async fn delete_record(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&raw_id)?;

    let deleted = state
        .store
        .delete(id)
        .await
        .map_err(|e| e.during(DELETE_FAILED))?;
    if !deleted {
        return Err(AppError::RecordNotFound { id });
    }

    tracing::info!("Deleted record {}", id);
    Ok(Json(MessageResponse {
        message: "Kayıt silindi".to_string(),
    }))
}

/// 导出 CSV 附件
pub async fn export_csv(State(state): State<AppState>) -> Result<Response, AppError> {
    let records = state.store.list().await.map_err(|e| e.during(EXPORT_FAILED))?;
    let body = export_to_bytes(&records).map_err(|e| e.during(EXPORT_FAILED))?;

    tracing::info!("Exported {} records to CSV", records.len());
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv;charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", CSV_FILENAME),
            ),
        ],
        body,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("abc"), Err(AppError::InvalidId { .. })));
        assert!(matches!(parse_id("4.5"), Err(AppError::InvalidId { .. })));
    }
}
