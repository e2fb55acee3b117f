use crate::core::config_cache::ConfigCache;
use crate::core::selection::MAX_LANGUAGES;
use crate::domain::catalog::PublicConfig;
use crate::domain::model::{CanonicalSignup, SignupRequest};
use crate::domain::ports::SignupSink;
use crate::utils::error::{ErrorKind, Result, WaitlistError};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

const MIN_NAME_CHARS: usize = 2;

/// 驗證、正規化報名資料並寫入儲存端
///
/// 每次成功驗證恰好寫入一次；任何驗證失敗都不會寫入。
pub struct WaitlistIntake {
    config: Arc<ConfigCache>,
    sink: Arc<dyn SignupSink>,
    max_languages: usize,
}

impl WaitlistIntake {
    pub fn new(config: Arc<ConfigCache>, sink: Arc<dyn SignupSink>) -> Self {
        Self {
            config,
            sink,
            max_languages: MAX_LANGUAGES,
        }
    }

    pub fn with_max_languages(mut self, max_languages: usize) -> Self {
        self.max_languages = max_languages;
        self
    }

    pub async fn submit(&self, request: &SignupRequest) -> Result<CanonicalSignup> {
        let record = match self.prepare(request).await {
            Ok(record) => record,
            Err(e) => {
                tracing::info!("🚫 Waitlist signup rejected ({:?}): {}", e.kind(), e);
                return Err(e);
            }
        };

        if let Err(e) = self.sink.insert(&record).await {
            let failure = match e {
                failure @ WaitlistError::CollaboratorFailure { .. } => failure,
                other => WaitlistError::CollaboratorFailure {
                    message: other.to_string(),
                },
            };
            tracing::error!("❌ Failed to persist signup for {}: {}", record.email, failure);
            return Err(failure);
        }

        tracing::info!(
            "📝 Waitlist signup: email={}, interest={}, languages={:?}",
            record.email,
            record.interest_reason,
            record.preferred_languages
        );
        Ok(record)
    }

    /// 聯絡資料的檢查不需要配置，必須在抓取配置之前完成
    async fn prepare(&self, request: &SignupRequest) -> Result<CanonicalSignup> {
        let (email, name) = check_contact(request)?;
        let catalog = self.config.get_or_fetch().await?;
        let (reason, languages) = check_selection(request, &catalog, self.max_languages)?;
        Ok(normalise(email, name, reason, languages))
    }
}

/// 依序驗證 (第一個錯誤即返回) 後正規化
pub fn validate(
    request: &SignupRequest,
    catalog: &PublicConfig,
    max_languages: usize,
) -> Result<CanonicalSignup> {
    let (email, name) = check_contact(request)?;
    let (reason, languages) = check_selection(request, catalog, max_languages)?;
    Ok(normalise(email, name, reason, languages))
}

fn check_contact(request: &SignupRequest) -> Result<(&str, &str)> {
    let email = request.email.as_deref().map(str::trim).unwrap_or_default();
    if email.is_empty() || !email.contains('@') {
        return Err(WaitlistError::invalid_email());
    }

    let name = request.name.as_deref().map(str::trim).unwrap_or_default();
    if name.chars().count() < MIN_NAME_CHARS {
        return Err(WaitlistError::invalid_name());
    }

    Ok((email, name))
}

fn check_selection<'a>(
    request: &'a SignupRequest,
    catalog: &PublicConfig,
    max_languages: usize,
) -> Result<(&'a str, &'a [String])> {
    // 單選語意：多個原因時只保留第一個
    let interest_reason = request
        .interest_reason
        .first()
        .ok_or_else(WaitlistError::missing_interest_reason)?;
    if catalog.find_reason(interest_reason).is_none() {
        return Err(WaitlistError::MissingInterestReason {
            message: format!("Unknown interest reason '{}'", interest_reason),
        });
    }

    let languages = request.preferred_languages.as_slice();
    check_languages(languages, catalog, max_languages)?;

    Ok((interest_reason, languages))
}

fn normalise(email: &str, name: &str, reason: &str, languages: &[String]) -> CanonicalSignup {
    CanonicalSignup {
        email: email.to_lowercase(),
        name: name.to_string(),
        interest_reason: reason.to_string(),
        preferred_languages: languages.to_vec(),
    }
}

fn check_languages(languages: &[String], catalog: &PublicConfig, max: usize) -> Result<()> {
    if languages.is_empty() {
        return Err(WaitlistError::missing_languages());
    }

    // 上游已做 FIFO 淘汰；超量代表呼叫端繞過了選取邏輯，直接拒絕而不截斷
    if languages.len() > max {
        return Err(WaitlistError::MissingLanguages {
            message: format!("Please select at most {} languages", max),
        });
    }

    let mut seen = HashSet::new();
    for code in languages {
        if !seen.insert(code.as_str()) {
            return Err(WaitlistError::MissingLanguages {
                message: format!("Language '{}' was selected more than once", code),
            });
        }
        if !catalog.supports_language(code) {
            return Err(WaitlistError::MissingLanguages {
                message: format!("Unsupported language '{}'", code),
            });
        }
    }

    Ok(())
}

/// 傳輸層 (CLI、Lambda) 共用的回應格式
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub data: Option<CanonicalSignup>,
}

impl From<&Result<CanonicalSignup>> for SubmitResponse {
    fn from(result: &Result<CanonicalSignup>) -> Self {
        match result {
            Ok(record) => Self {
                success: true,
                message: Some("Successfully joined the waitlist!".to_string()),
                kind: None,
                error: None,
                data: Some(record.clone()),
            },
            Err(e) => Self {
                success: false,
                message: None,
                kind: Some(e.kind()),
                error: Some(e.user_friendly_message()),
                data: None,
            },
        }
    }
}
