use serde::{Deserialize, Deserializer, Serialize};

/// 一組由使用者挑選的識別碼 (興趣原因或語言代碼)
///
/// 傳輸層上可能是單一字串、字串陣列，或帶 `id` / `code` 的物件陣列；
/// 這裡一律收斂成有序的字串清單，空白項目會被丟棄。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Selection(Vec<String>);

impl Selection {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            items
                .into_iter()
                .map(Into::<String>::into)
                .filter(|item| !item.trim().is_empty())
                .collect(),
        )
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SelectionItem {
    Id(String),
    Object {
        #[serde(alias = "code")]
        id: String,
    },
    Other(serde_json::Value),
}

impl SelectionItem {
    fn into_id(self) -> Option<String> {
        match self {
            SelectionItem::Id(id) | SelectionItem::Object { id } => Some(id),
            SelectionItem::Other(_) => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SelectionWire {
    Many(Vec<SelectionItem>),
    One(SelectionItem),
}

impl<'de> Deserialize<'de> for Selection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let items = match Option::<SelectionWire>::deserialize(deserializer)? {
            Some(SelectionWire::Many(items)) => items,
            Some(SelectionWire::One(item)) => vec![item],
            None => Vec::new(),
        };
        Ok(Selection::new(
            items.into_iter().filter_map(SelectionItem::into_id),
        ))
    }
}

/// 非字串值 (數字、物件、null) 一律視為未提供，讓驗證階段回報錯誤
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

/// 未經驗證的報名請求
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,

    #[serde(
        default,
        alias = "interestReason",
        alias = "interest_reasons",
        alias = "whyCliro"
    )]
    pub interest_reason: Selection,

    #[serde(default, alias = "preferredLanguages", alias = "mainLanguages")]
    pub preferred_languages: Selection,
}

impl SignupRequest {
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        interest_reason: Selection,
        preferred_languages: Selection,
    ) -> Self {
        Self {
            email: Some(email.into()),
            name: Some(name.into()),
            interest_reason,
            preferred_languages,
        }
    }
}

/// 驗證並正規化後、可交給儲存端的報名紀錄
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalSignup {
    pub email: String,
    pub name: String,
    pub interest_reason: String,
    pub preferred_languages: Vec<String>,
}

/// 重複 email 的處理方式，由儲存端負責執行
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    #[default]
    Accept,
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Jsonl,
    Remote,
    Log,
    S3,
}

impl std::fmt::Display for StorageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageKind::Jsonl => write!(f, "jsonl"),
            StorageKind::Remote => write!(f, "remote"),
            StorageKind::Log => write!(f, "log"),
            StorageKind::S3 => write!(f, "s3"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_accepts_list_and_aliases() {
        let request: SignupRequest = serde_json::from_value(json!({
            "email": "ada@example.com",
            "name": "Ada",
            "whyCliro": ["writing", "learning"],
            "mainLanguages": ["en", "fr"]
        }))
        .unwrap();

        assert_eq!(request.email.as_deref(), Some("ada@example.com"));
        assert_eq!(request.interest_reason.as_slice(), ["writing", "learning"]);
        assert_eq!(request.preferred_languages.as_slice(), ["en", "fr"]);
    }

    #[test]
    fn test_request_accepts_single_values_and_objects() {
        let request: SignupRequest = serde_json::from_value(json!({
            "email": "ada@example.com",
            "name": "Ada",
            "interest_reason": "productivity",
            "preferred_languages": [{"code": "de", "name": "German"}, "es"]
        }))
        .unwrap();

        assert_eq!(request.interest_reason.first(), Some("productivity"));
        assert_eq!(request.preferred_languages.as_slice(), ["de", "es"]);
    }

    #[test]
    fn test_request_with_missing_or_mistyped_fields() {
        let request: SignupRequest = serde_json::from_value(json!({
            "email": 42,
            "interest_reason": null,
            "preferred_languages": ["", "  ", 7]
        }))
        .unwrap();

        assert!(request.email.is_none());
        assert!(request.name.is_none());
        assert!(request.interest_reason.is_empty());
        assert!(request.preferred_languages.is_empty());
    }

    #[test]
    fn test_canonical_record_wire_format() {
        let record = CanonicalSignup {
            email: "a@b.com".to_string(),
            name: "Jo".to_string(),
            interest_reason: "productivity".to_string(),
            preferred_languages: vec!["en".to_string(), "fr".to_string()],
        };

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "email": "a@b.com",
                "name": "Jo",
                "interest_reason": "productivity",
                "preferred_languages": ["en", "fr"]
            })
        );
    }
}
