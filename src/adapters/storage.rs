use crate::domain::model::{CanonicalSignup, DuplicatePolicy};
use crate::domain::ports::SignupSink;
use crate::utils::error::{Result, WaitlistError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// 儲存端實際寫入的資料：正規化紀錄加上提交時間
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSignup {
    #[serde(flatten)]
    pub record: CanonicalSignup,
    pub submitted_at: DateTime<Utc>,
}

impl StoredSignup {
    pub fn now(record: &CanonicalSignup) -> Self {
        Self {
            record: record.clone(),
            submitted_at: Utc::now(),
        }
    }
}

pub fn duplicate_error(email: &str) -> WaitlistError {
    WaitlistError::CollaboratorFailure {
        message: format!("{} is already on the waitlist", email),
    }
}

/// 本機 JSON Lines 檔案，一行一筆報名
#[derive(Debug)]
pub struct JsonlStorage {
    path: PathBuf,
    policy: DuplicatePolicy,
    // 同一程序內串行化「檢查重複 + 附加」
    write_lock: Mutex<()>,
}

impl JsonlStorage {
    pub fn new(path: impl Into<PathBuf>, policy: DuplicatePolicy) -> Self {
        Self {
            path: path.into(),
            policy,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load_all(&self) -> Result<Vec<StoredSignup>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut signups = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<StoredSignup>(line) {
                Ok(signup) => signups.push(signup),
                Err(e) => tracing::warn!(
                    "Skipping malformed line {} in {}: {}",
                    index + 1,
                    self.path.display(),
                    e
                ),
            }
        }
        Ok(signups)
    }
}

#[async_trait]
impl SignupSink for JsonlStorage {
    async fn insert(&self, record: &CanonicalSignup) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        if self.policy == DuplicatePolicy::Reject {
            let existing = self.load_all().await?;
            if existing.iter().any(|s| s.record.email == record.email) {
                return Err(duplicate_error(&record.email));
            }
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut line = serde_json::to_string(&StoredSignup::now(record))?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!("Appended signup to {}", self.path.display());
        Ok(())
    }
}

/// 不落地，只寫稽核日誌
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditLogSink;

#[async_trait]
impl SignupSink for AuditLogSink {
    async fn insert(&self, record: &CanonicalSignup) -> Result<()> {
        tracing::info!("[waitlist] signup: {}", serde_json::to_string(record)?);
        Ok(())
    }
}
