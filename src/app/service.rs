use crate::adapters::clock::SystemClock;
use crate::adapters::http::{HttpBackend, HttpTimeouts};
use crate::adapters::static_config::StaticConfigSource;
use crate::adapters::storage::{AuditLogSink, JsonlStorage};
use crate::core::config_cache::ConfigCache;
use crate::core::intake::WaitlistIntake;
use crate::core::{CanonicalSignup, ConfigProvider, PublicConfig, SignupRequest, SignupSink};
use crate::domain::model::StorageKind;
use crate::utils::error::{Result, WaitlistError};
use std::sync::Arc;

/// 依配置組裝後端客戶端、配置快取、儲存端與報名流程
pub struct WaitlistService {
    backend: HttpBackend,
    cache: Arc<ConfigCache>,
    intake: WaitlistIntake,
}

impl WaitlistService {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let backend = Self::backend(config);

        let sink: Arc<dyn SignupSink> = match config.storage_kind() {
            StorageKind::Jsonl => Arc::new(JsonlStorage::new(
                config.storage_path(),
                config.duplicate_policy(),
            )),
            StorageKind::Remote => Arc::new(backend.clone()),
            StorageKind::Log => Arc::new(AuditLogSink),
            StorageKind::S3 => {
                return Err(WaitlistError::ConfigError {
                    message: "S3 storage must be wired with WaitlistService::with_sink".to_string(),
                })
            }
        };

        tracing::info!(
            "🔧 Waitlist service: api={}, storage={}, env={}",
            config.api_url(),
            config.storage_kind(),
            config.environment()
        );
        Ok(Self::assemble(config, backend, sink))
    }

    pub fn with_sink<C: ConfigProvider>(config: &C, sink: Arc<dyn SignupSink>) -> Self {
        let backend = Self::backend(config);
        Self::assemble(config, backend, sink)
    }

    fn backend<C: ConfigProvider>(config: &C) -> HttpBackend {
        HttpBackend::new(config.api_url()).with_timeouts(HttpTimeouts {
            config: config.config_timeout(),
            submit: config.submit_timeout(),
            health: config.health_timeout(),
        })
    }

    fn assemble<C: ConfigProvider>(
        config: &C,
        backend: HttpBackend,
        sink: Arc<dyn SignupSink>,
    ) -> Self {
        let mut cache = ConfigCache::new(
            Arc::new(backend.clone()),
            Arc::new(SystemClock),
            config.cache_ttl(),
        );
        if config.fallback_enabled() {
            cache = cache.with_fallback(Arc::new(StaticConfigSource::fallback()));
        }
        let cache = Arc::new(cache);

        let intake = WaitlistIntake::new(cache.clone(), sink)
            .with_max_languages(config.max_languages());

        Self {
            backend,
            cache,
            intake,
        }
    }

    pub async fn submit(&self, request: &SignupRequest) -> Result<CanonicalSignup> {
        self.intake.submit(request).await
    }

    pub async fn public_config(&self) -> Result<PublicConfig> {
        self.cache.get_or_fetch().await
    }

    pub async fn health(&self) -> bool {
        self.backend.health().await
    }
}
