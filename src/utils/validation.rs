use crate::utils::error::{Result, WaitlistError};
use url::Url;

/// 配置載入後、組裝服務前執行的檢查
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 建立欄位值無效的錯誤；`lambda` 設定的 S3 規則也共用這個格式
pub(crate) fn invalid_value(
    field: &str,
    value: impl ToString,
    reason: impl Into<String>,
) -> WaitlistError {
    WaitlistError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// 後端 API 位址：必須可解析，且只接受 http / https
pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid_value(field_name, url_str, "URL cannot be empty"));
    }

    let url = Url::parse(url_str)
        .map_err(|e| invalid_value(field_name, url_str, format!("Invalid URL format: {}", e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid_value(
            field_name,
            url_str,
            format!("Unsupported URL scheme: {}", scheme),
        )),
    }
}

/// 本機儲存路徑；檔案與上層目錄會在第一次寫入時建立，這裡不檢查是否存在
pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid_value(field_name, path, "Path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid_value(field_name, path, "Path contains null bytes"));
    }
    Ok(())
}

/// 逾時秒數這類下限檢查
pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(invalid_value(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid_value(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

/// 閉區間 `[min, max]`，例如每筆報名可選的語言數上限
pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid_value(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("api.url", "https://api.cliro.app").is_ok());
        assert!(validate_url("api.url", "http://localhost:8000").is_ok());
        assert!(validate_url("api.url", "").is_err());
        assert!(validate_url("api.url", "invalid-url").is_err());
        assert!(validate_url("api.url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_invalid_value_carries_field_and_reason() {
        let err = validate_range("intake.max_languages", 12, 1, 10).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value '12' for 'intake.max_languages': Value must be between 1 and 10"
        );
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("api.submit_timeout_seconds", 15, 1).is_ok());
        assert!(validate_positive_number("api.submit_timeout_seconds", 0, 1).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("intake.max_languages", 3, 1, 10).is_ok());
        assert!(validate_range("intake.max_languages", 0, 1, 10).is_err());
        assert!(validate_range("intake.max_languages", 11, 1, 10).is_err());
    }

    #[test]
    fn test_validate_path_and_strings() {
        assert!(validate_path("storage.path", "./data/waitlist.jsonl").is_ok());
        assert!(validate_path("storage.path", "").is_err());
        assert!(validate_path("storage.path", "   ").is_err());
        assert!(validate_non_empty_string("app.environment", "   ").is_err());
    }
}
