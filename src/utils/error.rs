use serde::Serialize;
use thiserror::Error;

/// 單筆錯誤物件，對應 API 回應中的 `errors[]` 項目
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorObject {
    /// 寬鬆解析：status 可能是字串或數字，其餘欄位缺漏時保留為 None
    pub fn from_value(value: &serde_json::Value) -> Self {
        let text = |key: &str| -> Option<String> {
            match value.get(key)? {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Null => None,
                other => Some(other.to_string()),
            }
        };

        Self {
            status: text("status"),
            detail: text("detail"),
            message: text("message"),
        }
    }

    pub fn detail_or_message(&self) -> Option<&str> {
        self.detail.as_deref().or(self.message.as_deref())
    }
}

#[derive(Error, Debug)]
pub enum SourcesError {
    #[error("API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// 2xx 回應內含非空的 `errors` 陣列
    #[error("API returned an error: {detail}")]
    ApiError { detail: String },

    #[error("HTTP {status}: {}", describe_errors(.errors))]
    HttpError { status: u16, errors: Vec<ErrorObject> },

    /// 由 orchestrator 重新包裝後交給 UI 的錯誤
    #[error("{}", describe_operation(.title, .detail))]
    OperationFailed {
        title: Option<String>,
        detail: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, SourcesError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Application,
    Http,
    Operation,
    Serialization,
    Config,
    Io,
}

/// UI 端看到的錯誤形狀：`{detail}` 或 `{error: {title?, detail}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum UiError {
    Detail { detail: String },
    Wrapped { error: UiErrorBody },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub detail: String,
}

impl SourcesError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SourcesError::RequestError(_) => ErrorKind::Transport,
            SourcesError::SerializationError(_) => ErrorKind::Serialization,
            SourcesError::IoError(_) => ErrorKind::Io,
            SourcesError::ApiError { .. } => ErrorKind::Application,
            SourcesError::HttpError { .. } => ErrorKind::Http,
            SourcesError::OperationFailed { .. } => ErrorKind::Operation,
            SourcesError::ConfigError { .. } | SourcesError::InvalidConfigValueError { .. } => {
                ErrorKind::Config
            }
        }
    }

    /// 取出第一筆錯誤說明，供 orchestrator 重新包裝
    pub fn first_detail(&self) -> String {
        match self {
            SourcesError::HttpError { errors, .. } => errors
                .first()
                .and_then(ErrorObject::detail_or_message)
                .map(str::to_string)
                .unwrap_or_else(|| self.to_string()),
            SourcesError::ApiError { detail } => detail.clone(),
            SourcesError::OperationFailed { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }

    pub fn to_ui_error(&self) -> UiError {
        match self {
            SourcesError::OperationFailed { title, detail } => UiError::Wrapped {
                error: UiErrorBody {
                    title: title.clone(),
                    detail: detail.clone(),
                },
            },
            other => UiError::Detail {
                detail: other.first_detail(),
            },
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.kind() {
            ErrorKind::Transport => format!("Could not reach the Sources API: {}", self),
            ErrorKind::Config => format!("Invalid configuration: {}", self),
            ErrorKind::Serialization => format!("Unexpected response from the Sources API: {}", self),
            _ => self.first_detail(),
        }
    }
}

fn describe_errors(errors: &[ErrorObject]) -> String {
    errors
        .first()
        .and_then(ErrorObject::detail_or_message)
        .unwrap_or("no error detail")
        .to_string()
}

fn describe_operation(title: &Option<String>, detail: &str) -> String {
    match title {
        Some(title) => format!("{}: {}", title, detail),
        None => detail.to_string(),
    }
}
