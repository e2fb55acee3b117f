use crate::domain::catalog::PublicConfig;
use crate::domain::model::{CanonicalSignup, DuplicatePolicy, StorageKind};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// 公開配置的來源 (遠端 API、靜態預設值等)
#[async_trait]
pub trait ConfigSource: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch(&self) -> Result<PublicConfig>;
}

/// 報名紀錄的儲存端；去重與唯一性由實作自行決定
#[async_trait]
pub trait SignupSink: Send + Sync {
    async fn insert(&self, record: &CanonicalSignup) -> Result<()>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_url(&self) -> &str;
    fn environment(&self) -> &str;
    fn cache_ttl(&self) -> Duration;
    fn fallback_enabled(&self) -> bool;
    fn max_languages(&self) -> usize;
    fn storage_kind(&self) -> StorageKind;
    fn storage_path(&self) -> &str;
    fn duplicate_policy(&self) -> DuplicatePolicy;
    fn config_timeout(&self) -> Duration;
    fn submit_timeout(&self) -> Duration;
    fn health_timeout(&self) -> Duration;
}
