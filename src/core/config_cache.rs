use crate::domain::catalog::PublicConfig;
use crate::domain::ports::{Clock, ConfigSource};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};
use std::time::Duration;

pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct CachedConfig {
    config: PublicConfig,
    fetched_at: DateTime<Utc>,
}

/// 公開配置的 TTL 快取
///
/// 主要來源成功時寫入快取；失敗時改問備援來源，但備援結果不寫入快取，
/// 下一次呼叫會再嘗試主要來源。併發的快取未命中可能各自抓取一次，
/// 結果相同，因此鎖只在讀寫快取槽時短暫持有，不跨越 `.await`。
pub struct ConfigCache {
    primary: Arc<dyn ConfigSource>,
    fallback: Option<Arc<dyn ConfigSource>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    slot: RwLock<Option<CachedConfig>>,
}

impl ConfigCache {
    pub fn new(primary: Arc<dyn ConfigSource>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            primary,
            fallback: None,
            clock,
            ttl,
            slot: RwLock::new(None),
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn ConfigSource>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn get_or_fetch(&self) -> Result<PublicConfig> {
        let now = self.clock.now();

        if let Some(config) = self.cached(now) {
            tracing::debug!("Serving public config from cache");
            return Ok(config);
        }

        tracing::debug!("Fetching public config from {}", self.primary.name());
        match self.primary.fetch().await {
            Ok(config) => {
                self.store(config.clone(), now);
                Ok(config)
            }
            Err(e) => match &self.fallback {
                Some(fallback) => {
                    tracing::warn!(
                        "⚠️ Failed to fetch config from {}: {}. Using {}",
                        self.primary.name(),
                        e,
                        fallback.name()
                    );
                    fallback.fetch().await
                }
                None => Err(e),
            },
        }
    }

    pub fn invalidate(&self) {
        if let Ok(mut slot) = self.slot.write() {
            *slot = None;
        }
    }

    fn cached(&self, now: DateTime<Utc>) -> Option<PublicConfig> {
        let slot = self.slot.read().ok()?;
        let entry = slot.as_ref()?;

        // 時鐘倒退 (age 為負) 時視為過期
        let age = now.signed_duration_since(entry.fetched_at).to_std().ok()?;
        if age < self.ttl {
            Some(entry.config.clone())
        } else {
            None
        }
    }

    fn store(&self, config: PublicConfig, fetched_at: DateTime<Utc>) {
        if let Ok(mut slot) = self.slot.write() {
            *slot = Some(CachedConfig { config, fetched_at });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::static_config::StaticConfigSource;
    use crate::domain::catalog::InterestReason;
    use crate::utils::error::WaitlistError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                now: Mutex::new(Utc::now()),
            }
        }

        fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap();
            *now += chrono::Duration::from_std(by).unwrap();
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    struct CountingSource {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingSource {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ConfigSource for CountingSource {
        fn name(&self) -> &str {
            "counting"
        }

        async fn fetch(&self) -> Result<PublicConfig> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                return Err(WaitlistError::RemoteError {
                    status: 503,
                    message: "unavailable".to_string(),
                });
            }
            Ok(PublicConfig {
                interest_reasons: vec![InterestReason {
                    id: format!("reason-{}", call),
                    label: "Live".to_string(),
                    description: None,
                }],
                supported_languages: vec![],
            })
        }
    }

    #[tokio::test]
    async fn test_cache_hit_within_ttl() {
        let source = Arc::new(CountingSource::ok());
        let clock = Arc::new(ManualClock::new());
        let cache = ConfigCache::new(source.clone(), clock.clone(), DEFAULT_TTL);

        let first = cache.get_or_fetch().await.unwrap();
        clock.advance(Duration::from_secs(299));
        let second = cache.get_or_fetch().await.unwrap();

        assert_eq!(source.calls(), 1);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_cache_refetches_after_ttl() {
        let source = Arc::new(CountingSource::ok());
        let clock = Arc::new(ManualClock::new());
        let cache = ConfigCache::new(source.clone(), clock.clone(), DEFAULT_TTL);

        cache.get_or_fetch().await.unwrap();
        clock.advance(Duration::from_secs(300));
        let refreshed = cache.get_or_fetch().await.unwrap();

        assert_eq!(source.calls(), 2);
        assert_eq!(refreshed.interest_reasons[0].id, "reason-2");
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let source = Arc::new(CountingSource::ok());
        let clock = Arc::new(ManualClock::new());
        let cache = ConfigCache::new(source.clone(), clock, DEFAULT_TTL);

        cache.get_or_fetch().await.unwrap();
        cache.invalidate();
        cache.get_or_fetch().await.unwrap();

        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_fallback_is_served_but_not_cached() {
        let source = Arc::new(CountingSource::failing());
        let clock = Arc::new(ManualClock::new());
        let cache = ConfigCache::new(source.clone(), clock, DEFAULT_TTL)
            .with_fallback(Arc::new(StaticConfigSource::fallback()));

        let first = cache.get_or_fetch().await.unwrap();
        let second = cache.get_or_fetch().await.unwrap();

        assert_eq!(first, PublicConfig::fallback());
        assert_eq!(second, PublicConfig::fallback());
        // Every call retries the live source
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_without_fallback_error_propagates() {
        let source = Arc::new(CountingSource::failing());
        let clock = Arc::new(ManualClock::new());
        let cache = ConfigCache::new(source, clock, DEFAULT_TTL);

        let err = cache.get_or_fetch().await.unwrap_err();
        assert!(matches!(err, WaitlistError::RemoteError { status: 503, .. }));
    }
}
