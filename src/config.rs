use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub analysis: AnalysisConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// 未配置时使用内存存储
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    /// 超过此耗时的语句记 warn 日志
    pub slow_statement_ms: u64,
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn slow_statement_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_statement_ms)
    }
}

/// 文档分析服务 (Azure Form Recognizer)
#[derive(Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub model_id: String,
    pub api_version: String,
    pub poll_interval_ms: u64,
    pub max_polls: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub max_bytes: usize,
}

// 不把 key 打到日志里
impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("model_id", &self.model_id)
            .field("api_version", &self.api_version)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("max_polls", &self.max_polls)
            .finish()
    }
}

impl AnalysisConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// endpoint 与 key 同时存在才算已配置
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let endpoint = self.endpoint.as_deref().filter(|s| !s.is_empty())?;
        let key = self.api_key.as_deref().filter(|s| !s.is_empty())?;
        Some((endpoint, key))
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            model_id: "prebuilt-invoice".to_string(),
            api_version: "2023-07-31".to_string(),
            poll_interval_ms: 1000,
            max_polls: 60,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 5,
                acquire_timeout_secs: 5,
                slow_statement_ms: 500,
            },
            analysis: AnalysisConfig::default(),
            upload: UploadConfig {
                max_bytes: 10 * 1024 * 1024,
            },
        }
    }
}

impl AppConfig {
    /// 加载配置: 默认值 → irsaliye.{toml,yaml} (可选) → 环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let source = Config::builder()
            .add_source(File::with_name("irsaliye").required(false))
            .add_source(Environment::default())
            .build()?;

        Self::from_source(&source)
    }

    fn from_source(source: &Config) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            server: ServerConfig {
                host: get_or(source, "server_host", defaults.server.host)?,
                port: get_or(source, "server_port", defaults.server.port)?,
            },
            database: DatabaseConfig {
                url: optional_string(source, "database_url")?,
                max_connections: get_or(
                    source,
                    "database_max_connections",
                    defaults.database.max_connections,
                )?,
                acquire_timeout_secs: get_or(
                    source,
                    "database_acquire_timeout_secs",
                    defaults.database.acquire_timeout_secs,
                )?,
                slow_statement_ms: get_or(
                    source,
                    "database_slow_statement_ms",
                    defaults.database.slow_statement_ms,
                )?,
            },
            analysis: AnalysisConfig {
                endpoint: optional_string(source, "azure_form_recognizer_endpoint")?,
                api_key: optional_string(source, "azure_form_recognizer_key")?,
                model_id: get_or(
                    source,
                    "azure_form_recognizer_model",
                    defaults.analysis.model_id,
                )?,
                api_version: get_or(
                    source,
                    "azure_form_recognizer_api_version",
                    defaults.analysis.api_version,
                )?,
                poll_interval_ms: get_or(
                    source,
                    "analysis_poll_interval_ms",
                    defaults.analysis.poll_interval_ms,
                )?,
                max_polls: get_or(source, "analysis_max_polls", defaults.analysis.max_polls)?,
            },
            upload: UploadConfig {
                max_bytes: get_or(source, "upload_max_bytes", defaults.upload.max_bytes)?,
            },
        })
    }
}

fn get_or<T: serde::de::DeserializeOwned>(
    source: &Config,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match source.get::<T>(key) {
        Ok(value) => Ok(value),
        Err(ConfigError::NotFound(_)) => Ok(default),
        Err(e) => Err(e),
    }
}

/// 空字符串视为未配置
fn optional_string(source: &Config, key: &str) -> Result<Option<String>, ConfigError> {
    let value: Option<String> = get_or(source, key, None)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(pairs: &[(&str, &str)]) -> Config {
        let mut builder = Config::builder();
        for (key, value) in pairs {
            builder = builder.set_override(*key, *value).unwrap();
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_source(&source(&[])).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.upload.max_bytes, 10 * 1024 * 1024);
        assert!(config.database.url.is_none());
        assert!(config.analysis.credentials().is_none());
        assert_eq!(config.analysis.model_id, "prebuilt-invoice");
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_source(&source(&[
            ("server_port", "9090"),
            ("database_max_connections", "20"),
            ("database_url", "postgres://localhost/irsaliye"),
            ("azure_form_recognizer_endpoint", "https://example.cognitiveservices.azure.com/"),
            ("azure_form_recognizer_key", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.database.acquire_timeout_secs, 5);
        assert_eq!(
            config.database.url.as_deref(),
            Some("postgres://localhost/irsaliye")
        );
        assert!(config.analysis.credentials().is_some());
        assert!(!format!("{:?}", config.analysis).contains("secret"));
    }

    #[test]
    fn test_empty_database_url_means_memory() {
        let config = AppConfig::from_source(&source(&[("database_url", "")])).unwrap();
        assert!(config.database.url.is_none());
    }
}
