use crate::domain::model::{
    Application, ApplicationType, Authentication, Collection, CreateApplication, Endpoint,
    GraphQlRequest, GraphQlResponse, Source,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn timeout_seconds(&self) -> Option<u64>;
    fn headers(&self) -> &HashMap<String, String>;
}

/// Sources API 的各項操作；正式實作是 `SourcesClient`，測試可以換成 mock
#[async_trait]
pub trait SourcesApi: Send + Sync {
    async fn show_source(&self, id: &str) -> Result<Source>;
    async fn list_source_endpoints(&self, source_id: &str) -> Result<Collection<Endpoint>>;
    async fn list_source_applications(&self, source_id: &str) -> Result<Collection<Application>>;
    async fn list_endpoint_authentications(
        &self,
        endpoint_id: &str,
    ) -> Result<Collection<Authentication>>;
    async fn delete_source(&self, id: &str) -> Result<()>;
    async fn create_application(&self, input: &CreateApplication) -> Result<Application>;
    async fn delete_application(&self, id: &str) -> Result<()>;
    async fn post_graphql(&self, request: &GraphQlRequest) -> Result<GraphQlResponse>;
    async fn list_application_types(&self) -> Result<Collection<ApplicationType>>;
    /// `query` 會原樣接在 `/sources?` 後面
    async fn list_sources(&self, query: &str) -> Result<Collection<Source>>;
}
