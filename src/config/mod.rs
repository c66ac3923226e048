#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, SourcesError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_API_BASE: &str = "http://localhost:3000/api/sources/v1.0";
pub const API_BASE_ENV: &str = "SOURCES_API_BASE";
pub const API_TIMEOUT_ENV: &str = "SOURCES_API_TIMEOUT";

/// 直接組裝的連線設定，共用 client 預設由環境變數建立
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSettings {
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl ClientSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_seconds: None,
            headers: HashMap::new(),
        }
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(API_BASE_ENV).unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let mut settings = Self::new(base_url);

        if let Ok(raw) = std::env::var(API_TIMEOUT_ENV) {
            let seconds = raw.trim().parse::<u64>().map_err(|e| {
                SourcesError::InvalidConfigValueError {
                    field: API_TIMEOUT_ENV.to_string(),
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?;
            settings.timeout_seconds = Some(seconds);
        }

        Ok(settings)
    }
}

impl ConfigProvider for ClientSettings {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }

    fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }
}

impl Validate for ClientSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("base_url", &self.base_url)?;
        if let Some(timeout) = self.timeout_seconds {
            validation::validate_positive_number("timeout_seconds", timeout, 1)?;
        }
        for (name, value) in &self.headers {
            validation::validate_header(name, value)?;
        }
        Ok(())
    }
}
