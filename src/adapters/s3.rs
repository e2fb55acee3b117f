use crate::adapters::storage::{duplicate_error, StoredSignup};
use crate::domain::model::{CanonicalSignup, DuplicatePolicy};
use crate::domain::ports::SignupSink;
use crate::utils::error::{Result, WaitlistError};
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;

const PRECONDITION_FAILED: u16 = 412;

/// 每筆報名一個 S3 物件
///
/// `reject` 政策下以 email 為鍵 (`{prefix}/by-email/{email}.json`) 並做條件寫入，
/// 物件已存在時 S3 回傳 412；`accept` 政策下鍵名帶提交時間。
#[derive(Debug, Clone)]
pub struct S3SignupStore {
    client: S3Client,
    bucket: String,
    prefix: String,
    policy: DuplicatePolicy,
}

impl S3SignupStore {
    pub fn new(client: S3Client, bucket: String, prefix: String, policy: DuplicatePolicy) -> Self {
        Self {
            client,
            bucket,
            prefix: prefix.trim_end_matches('/').to_string(),
            policy,
        }
    }

    fn object_key(&self, stored: &StoredSignup) -> String {
        match self.policy {
            DuplicatePolicy::Reject => {
                format!("{}/by-email/{}.json", self.prefix, stored.record.email)
            }
            DuplicatePolicy::Accept => format!(
                "{}/{}-{}.json",
                self.prefix,
                stored.submitted_at.format("%Y%m%dT%H%M%S%3fZ"),
                stored.record.email
            ),
        }
    }
}

#[async_trait]
impl SignupSink for S3SignupStore {
    async fn insert(&self, record: &CanonicalSignup) -> Result<()> {
        let stored = StoredSignup::now(record);
        let key = self.object_key(&stored);

        // reject 政策下以條件寫入 (If-None-Match: *) 原子地檢查並寫入
        let if_none_match = match self.policy {
            DuplicatePolicy::Reject => Some("*".to_string()),
            DuplicatePolicy::Accept => None,
        };

        let body = serde_json::to_vec(&stored)?;
        let result = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type("application/json")
            .set_if_none_match(if_none_match)
            .body(ByteStream::from(body))
            .send()
            .await;

        if let Err(err) = result {
            let status = err.raw_response().map(|response| response.status().as_u16());
            if status == Some(PRECONDITION_FAILED) {
                return Err(duplicate_error(&record.email));
            }
            return Err(WaitlistError::CollaboratorFailure {
                message: format!("Failed to write to S3: {}", err),
            });
        }

        tracing::debug!("Stored signup at s3://{}/{}", self.bucket, key);
        Ok(())
    }
}
