use crate::domain::catalog::PublicConfig;
use crate::domain::ports::ConfigSource;
use crate::utils::error::Result;
use async_trait::async_trait;

/// 回傳固定配置的來源，正式環境用作遠端失敗時的備援
#[derive(Debug, Clone)]
pub struct StaticConfigSource {
    name: String,
    config: PublicConfig,
}

impl StaticConfigSource {
    pub fn new(name: impl Into<String>, config: PublicConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    pub fn fallback() -> Self {
        Self::new("built-in fallback", PublicConfig::fallback())
    }
}

#[async_trait]
impl ConfigSource for StaticConfigSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<PublicConfig> {
        Ok(self.config.clone())
    }
}
