use crate::core::ConfigProvider;
use crate::domain::model::{DuplicatePolicy, StorageKind};
use crate::utils::error::{Result, WaitlistError};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub app: AppConfig,
    pub api: ApiConfig,
    pub cache: CacheConfig,
    pub intake: IntakeConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub name: String,
    pub environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "Cliro".to_string(),
            environment: "development".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub url: String,
    pub config_timeout_seconds: u64,
    pub submit_timeout_seconds: u64,
    pub health_timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000".to_string(),
            config_timeout_seconds: 10,
            submit_timeout_seconds: 15,
            health_timeout_seconds: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
    pub fallback: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 300,
            fallback: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    pub max_languages: usize,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self { max_languages: 3 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub kind: StorageKind,
    pub path: String,
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: StorageKind::Jsonl,
            path: "./data/waitlist.jsonl".to_string(),
            duplicate_policy: DuplicatePolicy::Accept,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(WaitlistError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| WaitlistError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 有指定檔案就載入，否則使用預設值
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// 替換環境變數 (例如 ${CLIRO_API_URL})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| WaitlistError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_non_empty_string("app.environment", &self.app.environment)?;
        validate_url("api.url", &self.api.url)?;

        if self.app.environment == "production" && self.api.url.contains("localhost") {
            return Err(WaitlistError::ConfigValidationError {
                field: "api.url".to_string(),
                message: "a non-local API URL is required in production".to_string(),
            });
        }

        validate_positive_number("api.config_timeout_seconds", self.api.config_timeout_seconds, 1)?;
        validate_positive_number("api.submit_timeout_seconds", self.api.submit_timeout_seconds, 1)?;
        validate_positive_number("api.health_timeout_seconds", self.api.health_timeout_seconds, 1)?;
        validate_range("intake.max_languages", self.intake.max_languages, 1, 10)?;

        match self.storage.kind {
            StorageKind::Jsonl => validate_path("storage.path", &self.storage.path)?,
            StorageKind::S3 => {
                return Err(WaitlistError::InvalidConfigValueError {
                    field: "storage.kind".to_string(),
                    value: self.storage.kind.to_string(),
                    reason: "S3 storage is only available in the Lambda build".to_string(),
                })
            }
            StorageKind::Remote | StorageKind::Log => {}
        }

        Ok(())
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api.url = url.into();
        self
    }
}

impl ConfigProvider for TomlConfig {
    fn api_url(&self) -> &str {
        &self.api.url
    }

    fn environment(&self) -> &str {
        &self.app.environment
    }

    fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_seconds)
    }

    fn fallback_enabled(&self) -> bool {
        self.cache.fallback
    }

    fn max_languages(&self) -> usize {
        self.intake.max_languages
    }

    fn storage_kind(&self) -> StorageKind {
        self.storage.kind
    }

    fn storage_path(&self) -> &str {
        &self.storage.path
    }

    fn duplicate_policy(&self) -> DuplicatePolicy {
        self.storage.duplicate_policy
    }

    fn config_timeout(&self) -> Duration {
        Duration::from_secs(self.api.config_timeout_seconds)
    }

    fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.api.submit_timeout_seconds)
    }

    fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.api.health_timeout_seconds)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
