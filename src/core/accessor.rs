use crate::config::ClientSettings;
use crate::core::client::SourcesClient;
use crate::utils::error::{Result, SourcesError};
use crate::utils::validation::Validate;
use std::sync::{Arc, OnceLock};

static API: OnceLock<Arc<SourcesClient>> = OnceLock::new();

/// 取得共用的 `SourcesClient`；第一次呼叫時依環境變數建立，之後都回傳同一個實例
pub fn get_api() -> Result<Arc<SourcesClient>> {
    if let Some(api) = API.get() {
        return Ok(Arc::clone(api));
    }

    let settings = ClientSettings::from_env()?;
    let client = Arc::new(build_client(&settings)?);
    tracing::debug!("🔌 Shared Sources client bound to {}", settings.base_url);

    // 併發初始化時以先寫入者為準
    Ok(Arc::clone(API.get_or_init(|| client)))
}

fn build_client(settings: &ClientSettings) -> Result<SourcesClient> {
    settings.validate()?;
    SourcesClient::from_config(settings)
}

/// 在第一次使用前安裝預先設定好的 client
pub fn install_api(client: SourcesClient) -> Result<Arc<SourcesClient>> {
    let client = Arc::new(client);
    API.set(Arc::clone(&client))
        .map_err(|_| SourcesError::ConfigError {
            message: "Shared Sources client is already initialized".to_string(),
        })?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_api_is_memoized() {
        let first = get_api().unwrap();
        let second = get_api().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        // 已初始化後不能再安裝
        let another = SourcesClient::from_config(&ClientSettings::new("http://localhost:9")).unwrap();
        let err = install_api(another).unwrap_err();
        assert!(matches!(err, SourcesError::ConfigError { .. }));
    }

    #[test]
    fn test_build_client_rejects_invalid_base_url() {
        let err = build_client(&ClientSettings::new("ftp://sources.example.com")).unwrap_err();
        assert!(matches!(err, SourcesError::InvalidConfigValueError { ref field, .. } if field == "base_url"));
        assert_eq!(err.kind(), crate::utils::error::ErrorKind::Config);
    }
}
