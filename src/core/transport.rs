use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ErrorObject, Result, SourcesError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// 預先設定好的 HTTP client，負責攔截錯誤封包
#[derive(Debug, Clone)]
pub struct Transport {
    base_url: String,
    client: Client,
}

impl Transport {
    pub fn new<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (key, value) in config.headers() {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                SourcesError::InvalidConfigValueError {
                    field: "headers".to_string(),
                    value: key.clone(),
                    reason: e.to_string(),
                }
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                SourcesError::InvalidConfigValueError {
                    field: format!("headers.{}", key),
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
            headers.insert(name, value);
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout_seconds() {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        Ok(Self {
            base_url: config.base_url().trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let value = self.send(Method::GET, path, self.client.get(self.url(path))).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.client.post(self.url(path)).json(body);
        let value = self.send(Method::POST, path, request).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send(Method::DELETE, path, self.client.delete(self.url(path)))
            .await?;
        Ok(())
    }

    async fn send(&self, method: Method, path: &str, request: RequestBuilder) -> Result<Value> {
        tracing::debug!("📡 {} {}{}", method, self.base_url, path);

        let response = request.send().await.map_err(|e| {
            tracing::warn!("❌ {} {} failed: {}", method, path, e);
            SourcesError::RequestError(e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await?;
        tracing::debug!("📡 {} {} -> {} ({} bytes)", method, path, status, bytes.len());

        if !status.is_success() {
            // 錯誤回應不一定是 JSON，解析失敗時視為沒有 errors
            let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            let errors = body
                .get("errors")
                .and_then(Value::as_array)
                .map(|items| items.iter().map(ErrorObject::from_value).collect())
                .unwrap_or_default();
            let err = SourcesError::HttpError {
                status: status.as_u16(),
                errors,
            };
            tracing::warn!("❌ {} {} rejected: {}", method, path, err);
            return Err(err);
        }

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        intercept(body).inspect_err(|err| {
            tracing::warn!("❌ {} {} returned an error envelope: {}", method, path, err);
        })
    }
}

/// 2xx 回應若帶有非空的 `errors` 陣列，改為回傳 `{detail: errors[0].message}`
pub fn intercept(body: Value) -> Result<Value> {
    let first = body
        .get("errors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first());

    if let Some(first) = first {
        let entry = ErrorObject::from_value(first);
        let detail = entry
            .message
            .or(entry.detail)
            .or_else(|| first.as_str().map(str::to_string))
            .unwrap_or_else(|| first.to_string());
        return Err(SourcesError::ApiError { detail });
    }

    Ok(body)
}
