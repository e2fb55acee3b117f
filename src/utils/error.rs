use thiserror::Error;

#[derive(Error, Debug)]
pub enum WaitlistError {
    #[error("{message}")]
    InvalidEmail { message: String },

    #[error("{message}")]
    InvalidName { message: String },

    #[error("{message}")]
    MissingInterestReason { message: String },

    #[error("{message}")]
    MissingLanguages { message: String },

    #[error("{message}")]
    CollaboratorFailure { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Remote endpoint returned {status}: {message}")]
    RemoteError { status: u16, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

pub type Result<T> = std::result::Result<T, WaitlistError>;

/// 提交結果的判別種類，傳輸層依此對應回應碼
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidEmail,
    InvalidName,
    MissingInterestReason,
    MissingLanguages,
    CollaboratorFailure,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Persistence,
    Network,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// 可重試 (遠端或儲存暫時失敗)
    Medium,
    /// 使用者輸入錯誤，修正後重新提交
    High,
    /// 配置或系統錯誤
    Critical,
}

impl WaitlistError {
    pub fn invalid_email() -> Self {
        Self::InvalidEmail {
            message: "Please enter a valid email address".to_string(),
        }
    }

    pub fn invalid_name() -> Self {
        Self::InvalidName {
            message: "Please enter your name (minimum 2 characters)".to_string(),
        }
    }

    pub fn missing_interest_reason() -> Self {
        Self::MissingInterestReason {
            message: "Please select why you're interested in Cliro".to_string(),
        }
    }

    pub fn missing_languages() -> Self {
        Self::MissingLanguages {
            message: "Please select at least one language".to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidEmail { .. } => ErrorKind::InvalidEmail,
            Self::InvalidName { .. } => ErrorKind::InvalidName,
            Self::MissingInterestReason { .. } => ErrorKind::MissingInterestReason,
            Self::MissingLanguages { .. } => ErrorKind::MissingLanguages,
            Self::CollaboratorFailure { .. } => ErrorKind::CollaboratorFailure,
            _ => ErrorKind::Internal,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidEmail { .. }
            | Self::InvalidName { .. }
            | Self::MissingInterestReason { .. }
            | Self::MissingLanguages { .. } => ErrorCategory::Input,
            Self::CollaboratorFailure { .. } => ErrorCategory::Persistence,
            Self::ApiError(_) | Self::RemoteError { .. } => ErrorCategory::Network,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Persistence | ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 輸入錯誤與儲存失敗都可由呼叫端重新提交；核心本身不重試
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Input | ErrorCategory::Persistence | ErrorCategory::Network
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Persistence => self.to_string(),
            ErrorCategory::Network => "Network error. Please check your connection.".to_string(),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::System => "An unexpected error occurred".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.kind() {
            ErrorKind::InvalidEmail => "Check the email address and submit again",
            ErrorKind::InvalidName => "Provide a name of at least 2 characters",
            ErrorKind::MissingInterestReason => "Pick one of the listed interest reasons",
            ErrorKind::MissingLanguages => "Pick between one and three supported languages",
            ErrorKind::CollaboratorFailure => "The waitlist store is unavailable, try again later",
            ErrorKind::Internal => match self.category() {
                ErrorCategory::Configuration => "Fix the configuration file and run again",
                ErrorCategory::Network => "Check that the backend API is reachable",
                _ => "Re-run with --verbose and inspect the logs",
            },
        }
    }
}
