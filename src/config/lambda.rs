use crate::core::ConfigProvider;
use crate::domain::model::{DuplicatePolicy, StorageKind};
use crate::utils::error::{Result, WaitlistError};
use crate::utils::validation::{invalid_value, validate_non_empty_string};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub api_url: String,
    pub environment: String,
    pub s3_bucket: String,
    pub s3_prefix: String,
    pub s3_region: String,
    pub cache_ttl_seconds: u64,
    pub max_languages: usize,
    pub duplicate_policy: DuplicatePolicy,
    pub config_timeout_seconds: u64,
    pub submit_timeout_seconds: u64,
    pub health_timeout_seconds: u64,
}

/// 讀取數值型環境變數；未設定或無法解析時使用預設值
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_url: env::var("API_URL").unwrap_or_else(|_| "http://localhost:8000".to_string()),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "production".to_string()),
            s3_bucket: env::var("S3_BUCKET").map_err(|_| WaitlistError::MissingConfigError {
                field: "S3_BUCKET".to_string(),
            })?,
            s3_prefix: env::var("S3_PREFIX").unwrap_or_else(|_| "waitlist".to_string()),
            s3_region: env::var("S3_REGION").unwrap_or_else(|_| "ap-southeast-2".to_string()),
            cache_ttl_seconds: env_or("CACHE_TTL_SECONDS", 300),
            max_languages: env_or("MAX_LANGUAGES", 3),
            duplicate_policy: match env::var("DUPLICATE_POLICY").as_deref() {
                Ok("reject") => DuplicatePolicy::Reject,
                _ => DuplicatePolicy::Accept,
            },
            config_timeout_seconds: env_or("CONFIG_TIMEOUT_SECONDS", 10),
            submit_timeout_seconds: env_or("SUBMIT_TIMEOUT_SECONDS", 15),
            health_timeout_seconds: env_or("HEALTH_TIMEOUT_SECONDS", 5),
        })
    }
}

impl ConfigProvider for LambdaConfig {
    fn api_url(&self) -> &str {
        &self.api_url
    }

    fn environment(&self) -> &str {
        &self.environment
    }

    fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    fn fallback_enabled(&self) -> bool {
        true
    }

    fn max_languages(&self) -> usize {
        self.max_languages
    }

    fn storage_kind(&self) -> StorageKind {
        StorageKind::S3
    }

    fn storage_path(&self) -> &str {
        &self.s3_prefix
    }

    fn duplicate_policy(&self) -> DuplicatePolicy {
        self.duplicate_policy
    }

    fn config_timeout(&self) -> Duration {
        Duration::from_secs(self.config_timeout_seconds)
    }

    fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.submit_timeout_seconds)
    }

    fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout_seconds)
    }
}

impl crate::utils::validation::Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_url("API_URL", &self.api_url)?;
        validate_s3_bucket_name("S3_BUCKET", &self.s3_bucket)?;
        validate_non_empty_string("S3_PREFIX", &self.s3_prefix)?;
        validate_aws_region("S3_REGION", &self.s3_region)?;
        validate_range("MAX_LANGUAGES", self.max_languages, 1, 10)?;
        validate_positive_number("CONFIG_TIMEOUT_SECONDS", self.config_timeout_seconds, 1)?;
        validate_positive_number("SUBMIT_TIMEOUT_SECONDS", self.submit_timeout_seconds, 1)?;
        validate_positive_number("HEALTH_TIMEOUT_SECONDS", self.health_timeout_seconds, 1)?;

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}

fn validate_s3_bucket_name(field_name: &str, bucket_name: &str) -> Result<()> {
    let invalid = |reason: &str| invalid_value(field_name, bucket_name, reason);

    if bucket_name.len() < 3 || bucket_name.len() > 63 {
        return Err(invalid("S3 bucket name must be between 3 and 63 characters"));
    }

    if !bucket_name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(invalid(
            "S3 bucket name can only contain lowercase letters, numbers, hyphens, and dots",
        ));
    }

    if bucket_name.starts_with('-') || bucket_name.ends_with('-') {
        return Err(invalid("S3 bucket name cannot start or end with a hyphen"));
    }

    Ok(())
}

fn validate_aws_region(field_name: &str, region: &str) -> Result<()> {
    validate_non_empty_string(field_name, region)?;

    if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(invalid_value(
            field_name,
            region,
            "AWS region can only contain lowercase letters, numbers, and hyphens",
        ));
    }

    Ok(())
}
