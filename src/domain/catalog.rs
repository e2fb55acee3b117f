use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestReason {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
}

/// 報名表單所需的公開配置：可選的興趣原因與支援語言
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicConfig {
    #[serde(alias = "interestReasons")]
    pub interest_reasons: Vec<InterestReason>,
    #[serde(alias = "supportedLanguages")]
    pub supported_languages: Vec<Language>,
}

const FALLBACK_REASONS: &[(&str, &str)] = &[
    ("productivity", "Productivity"),
    ("writing", "Writing"),
    ("learning", "Learning"),
    ("content", "Content Creation"),
    ("students", "Student Work"),
    ("business", "Business"),
    ("accessibility", "Accessibility"),
    ("other", "Other"),
];

const FALLBACK_LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
];

const UNKNOWN_FLAG: &str = "🌐";

pub fn flag_for(code: &str) -> &'static str {
    match code {
        "en" => "🇺🇸",
        "es" => "🇪🇸",
        "fr" => "🇫🇷",
        "de" => "🇩🇪",
        "it" => "🇮🇹",
        "pt" => "🇵🇹",
        _ => UNKNOWN_FLAG,
    }
}

impl PublicConfig {
    /// 後端無法連線時使用的預設配置
    pub fn fallback() -> Self {
        Self {
            interest_reasons: FALLBACK_REASONS
                .iter()
                .map(|(id, label)| InterestReason {
                    id: id.to_string(),
                    label: label.to_string(),
                    description: None,
                })
                .collect(),
            supported_languages: FALLBACK_LANGUAGES
                .iter()
                .map(|(code, name)| Language {
                    code: code.to_string(),
                    name: name.to_string(),
                    flag: Some(flag_for(code).to_string()),
                })
                .collect(),
        }
    }

    /// 正規化後端回傳的配置；缺少或格式錯誤的區段各自以預設值取代
    pub fn from_remote(data: &Value) -> Self {
        let PublicConfig {
            interest_reasons: fallback_reasons,
            supported_languages: fallback_languages,
        } = Self::fallback();

        let interest_reasons = section(data, "interest_reasons", "interestReasons")
            .map(|items| items.iter().filter_map(InterestReason::from_remote).collect())
            .unwrap_or(fallback_reasons);

        let supported_languages = section(data, "supported_languages", "supportedLanguages")
            .map(|items| items.iter().filter_map(Language::from_remote).collect())
            .unwrap_or(fallback_languages);

        Self {
            interest_reasons,
            supported_languages,
        }
    }

    pub fn find_reason(&self, id: &str) -> Option<&InterestReason> {
        self.interest_reasons.iter().find(|reason| reason.id == id)
    }

    pub fn supports_language(&self, code: &str) -> bool {
        self.supported_languages.iter().any(|lang| lang.code == code)
    }
}

fn section<'a>(data: &'a Value, key: &str, alias: &str) -> Option<&'a Vec<Value>> {
    data.get(key)
        .or_else(|| data.get(alias))
        .and_then(Value::as_array)
}

fn non_empty<'a>(data: &'a Value, key: &str) -> Option<&'a str> {
    data.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

impl InterestReason {
    fn from_remote(item: &Value) -> Option<Self> {
        match item {
            Value::String(id) if !id.is_empty() => Some(Self {
                id: id.clone(),
                label: id.clone(),
                description: None,
            }),
            Value::Object(_) => {
                let id = non_empty(item, "id")?;
                let label = non_empty(item, "label")
                    .or_else(|| non_empty(item, "name"))
                    .unwrap_or(id);
                Some(Self {
                    id: id.to_string(),
                    label: label.to_string(),
                    description: non_empty(item, "description").map(str::to_string),
                })
            }
            _ => None,
        }
    }
}

impl Language {
    fn from_remote(item: &Value) -> Option<Self> {
        match item {
            Value::String(code) if !code.is_empty() => Some(Self {
                code: code.clone(),
                name: code.clone(),
                flag: Some(flag_for(code).to_string()),
            }),
            Value::Object(_) => {
                let code = non_empty(item, "code")?;
                let name = non_empty(item, "name")
                    .or_else(|| non_empty(item, "label"))
                    .unwrap_or(code);
                let flag = non_empty(item, "flag").unwrap_or_else(|| flag_for(code));
                Some(Self {
                    code: code.to_string(),
                    name: name.to_string(),
                    flag: Some(flag.to_string()),
                })
            }
            _ => None,
        }
    }
}
