//! 统一错误类型
//!
//! 所有错误在请求边界转换为 `{"error": "<土耳其语提示>"}`:
//! 校验错误 → 400, 记录不存在 → 404, 上游/存储失败 → 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    // 校验错误
    #[error("invalid record id: {raw}")]
    InvalidId { raw: String },

    #[error("multipart field 'file' is missing")]
    MissingFile,

    #[error("file exceeds limit of {limit} bytes")]
    FileTooLarge { limit: usize },

    #[error("unsupported content type: {content_type}")]
    UnsupportedFileType { content_type: String },

    #[error("invalid multipart body: {message}")]
    InvalidMultipart { message: String },

    #[error("invalid request body: {message}")]
    InvalidBody { message: String },

    #[error("invalid record: {message}")]
    InvalidRecord { message: String },

    // 资源错误
    #[error("record not found: {id}")]
    RecordNotFound { id: i64 },

    // 文档分析服务
    #[error("Azure Form Recognizer credentials not configured")]
    AnalysisNotConfigured,

    #[error("document analysis failed: {message}")]
    Analysis { message: String },

    #[error("no documents found in the analysis result")]
    NoDocuments,

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    // 存储
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("CSV export failed: {message}")]
    Export { message: String },

    /// 附带面向用户的操作级提示
    #[error("{message}: {source}")]
    Operation {
        message: &'static str,
        #[source]
        source: Box<AppError>,
    },
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidId { .. }
            | AppError::MissingFile
            | AppError::FileTooLarge { .. }
            | AppError::UnsupportedFileType { .. }
            | AppError::InvalidMultipart { .. }
            | AppError::InvalidBody { .. }
            | AppError::InvalidRecord { .. } => StatusCode::BAD_REQUEST,

            AppError::RecordNotFound { .. } => StatusCode::NOT_FOUND,

            AppError::AnalysisNotConfigured
            | AppError::Analysis { .. }
            | AppError::NoDocuments
            | AppError::Http(_)
            | AppError::Database(_)
            | AppError::Export { .. } => StatusCode::INTERNAL_SERVER_ERROR,

            AppError::Operation { source, .. } => source.status_code(),
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// 返回给用户的提示
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidId { .. } => "Geçersiz ID".to_string(),
            AppError::MissingFile => "Dosya bulunamadı".to_string(),
            AppError::FileTooLarge { limit } => {
                format!("Dosya boyutu {}'dan büyük olamaz", size_label(*limit))
            }
            AppError::UnsupportedFileType { .. } => {
                "Sadece resim dosyaları kabul edilir".to_string()
            }
            AppError::InvalidMultipart { .. } => "Dosya okunamadı".to_string(),
            AppError::InvalidBody { .. } => "Geçersiz istek gövdesi".to_string(),
            AppError::InvalidRecord { .. } => "Geçersiz kayıt verisi".to_string(),
            AppError::RecordNotFound { .. } => "Kayıt bulunamadı".to_string(),
            AppError::AnalysisNotConfigured => "Analiz servisi yapılandırılmamış".to_string(),
            AppError::Analysis { .. } | AppError::Http(_) => {
                "Analiz servisi hatası".to_string()
            }
            AppError::NoDocuments => "Belgede veri bulunamadı".to_string(),
            AppError::Database(_) => "Veritabanı hatası".to_string(),
            AppError::Export { .. } => "CSV dışa aktarılırken bir hata oluştu".to_string(),
            AppError::Operation { message, .. } => message.to_string(),
        }
    }

    /// 服务端错误替换为操作级提示, 客户端错误保持原样
    pub fn during(self, message: &'static str) -> AppError {
        if self.is_server_error() && !matches!(self, AppError::Operation { .. }) {
            AppError::Operation {
                message,
                source: Box::new(self),
            }
        } else {
            self
        }
    }
}

/// 10485760 → 10MB, 1572864 → 1.5MB, 204800 → 200KB, 16 → 16B
fn size_label(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * 1024;

    let (value, suffix) = if bytes >= MB {
        (bytes as f64 / MB as f64, "MB")
    } else if bytes >= KB {
        (bytes as f64 / KB as f64, "KB")
    } else {
        return format!("{}B", bytes);
    };

    let number = format!("{:.1}", value);
    format!("{}{}", number.trim_end_matches(".0"), suffix)
}

/// 错误响应体
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Server error");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Client error");
        }

        let body = ErrorResponse {
            error: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Export {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Export {
            message: err.to_string(),
        }
    }
}
