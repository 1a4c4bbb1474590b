//! 文档分析服务客户端 (Azure Form Recognizer REST)
//!
//! 提交图片后服务返回 202 与 `Operation-Location`, 之后轮询该地址直到
//! `succeeded` 或 `failed`. 轮询次数有上限, 超出视为上游错误.

use crate::config::AnalysisConfig;
use crate::error::{AppError, Result};
use crate::models::AnalyzeResult;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    /// 图片字节进, 结构化字段 + 全文出
    async fn analyze(&self, image: Vec<u8>, content_type: &str) -> Result<AnalyzeResult>;
}

/// 轮询返回体
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationStatus {
    status: String,
    analyze_result: Option<AnalyzeResult>,
    error: Option<OperationError>,
}

#[derive(Debug, Deserialize)]
struct OperationError {
    code: Option<String>,
    message: Option<String>,
}

impl OperationError {
    fn describe(&self) -> String {
        format!(
            "{}: {}",
            self.code.as_deref().unwrap_or("Unknown"),
            self.message.as_deref().unwrap_or("no message")
        )
    }
}

pub struct AzureDocumentAnalyzer {
    client: reqwest::Client,
    config: AnalysisConfig,
}

impl AzureDocumentAnalyzer {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self { client, config })
    }

    fn analyze_url(&self, endpoint: &str) -> String {
        format!(
            "{}/formrecognizer/documentModels/{}:analyze?api-version={}",
            endpoint.trim_end_matches('/'),
            self.config.model_id,
            self.config.api_version
        )
    }

    /// 提交图片, 返回 Operation-Location
    async fn submit(&self, endpoint: &str, key: &str, image: Vec<u8>, content_type: &str) -> Result<String> {
        let response = self
            .client
            .post(self.analyze_url(endpoint))
            .header("Ocp-Apim-Subscription-Key", key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(image)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Analysis {
                message: format!("submit failed ({}): {}", status, body),
            });
        }

        response
            .headers()
            .get("Operation-Location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| AppError::Analysis {
                message: "no Operation-Location in response".to_string(),
            })
    }

    async fn poll(&self, operation_url: &str, key: &str) -> Result<AnalyzeResult> {
        for attempt in 1..=self.config.max_polls {
            tokio::time::sleep(self.config.poll_interval()).await;

            let status: OperationStatus = self
                .client
                .get(operation_url)
                .header("Ocp-Apim-Subscription-Key", key)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            match status.status.as_str() {
                "succeeded" => {
                    tracing::debug!("Analysis succeeded after {} polls", attempt);
                    return status.analyze_result.ok_or_else(|| AppError::Analysis {
                        message: "succeeded without analyzeResult".to_string(),
                    });
                }
                "failed" => {
                    let message = status
                        .error
                        .map(|e| e.describe())
                        .unwrap_or_else(|| "analysis failed".to_string());
                    return Err(AppError::Analysis { message });
                }
                other => tracing::debug!("Analysis status {} (poll {})", other, attempt),
            }
        }

        Err(AppError::Analysis {
            message: format!("timed out after {} polls", self.config.max_polls),
        })
    }
}

#[async_trait]
impl DocumentAnalyzer for AzureDocumentAnalyzer {
    async fn analyze(&self, image: Vec<u8>, content_type: &str) -> Result<AnalyzeResult> {
        let Some((endpoint, key)) = self.config.credentials() else {
            return Err(AppError::AnalysisNotConfigured);
        };

        let size = image.len();
        let operation_url = self.submit(endpoint, key, image, content_type).await?;
        tracing::info!("Submitted {} bytes for analysis ({})", size, self.config.model_id);

        self.poll(&operation_url, key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_credentials() {
        let analyzer = AzureDocumentAnalyzer::new(AnalysisConfig::default()).unwrap();
        let err = analyzer.analyze(vec![0u8; 4], "image/png").await.unwrap_err();
        assert!(matches!(err, AppError::AnalysisNotConfigured));
    }

    #[test]
    fn test_analyze_url() {
        let analyzer = AzureDocumentAnalyzer::new(AnalysisConfig::default()).unwrap();
        assert_eq!(
            analyzer.analyze_url("https://demo.cognitiveservices.azure.com/"),
            "https://demo.cognitiveservices.azure.com/formrecognizer/documentModels/prebuilt-invoice:analyze?api-version=2023-07-31"
        );
    }

    #[test]
    fn test_parse_operation_status() {
        let status: OperationStatus = serde_json::from_value(json!({
            "status": "succeeded",
            "createdDateTime": "2024-05-10T08:00:00Z",
            "analyzeResult": {
                "apiVersion": "2023-07-31",
                "modelId": "prebuilt-invoice",
                "content": "IR-1 10/05/2024",
                "documents": [{ "docType": "invoice", "fields": {}, "confidence": 1.0 }]
            }
        }))
        .unwrap();

        let result = status.analyze_result.unwrap();
        assert_eq!(result.documents.len(), 1);
        assert_eq!(result.content, "IR-1 10/05/2024");

        let failed: OperationStatus = serde_json::from_value(json!({
            "status": "failed",
            "error": { "code": "InvalidImage", "message": "corrupt" }
        }))
        .unwrap();
        assert_eq!(failed.error.unwrap().describe(), "InvalidImage: corrupt");
    }
}
