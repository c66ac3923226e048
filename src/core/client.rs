use crate::core::transport::Transport;
use crate::domain::model::{
    Application, ApplicationType, Authentication, Collection, CreateApplication, Endpoint,
    GraphQlRequest, GraphQlResponse, Source,
};
use crate::domain::ports::{ConfigProvider, SourcesApi};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 透過 REST/GraphQL 存取 Sources API
#[derive(Debug, Clone)]
pub struct SourcesClient {
    transport: Transport,
}

impl SourcesClient {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Ok(Self::new(Transport::new(config)?))
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }
}

#[async_trait]
impl SourcesApi for SourcesClient {
    async fn show_source(&self, id: &str) -> Result<Source> {
        self.transport.get(&format!("/sources/{}", id)).await
    }

    async fn list_source_endpoints(&self, source_id: &str) -> Result<Collection<Endpoint>> {
        self.transport
            .get(&format!("/sources/{}/endpoints", source_id))
            .await
    }

    async fn list_source_applications(&self, source_id: &str) -> Result<Collection<Application>> {
        self.transport
            .get(&format!("/sources/{}/applications", source_id))
            .await
    }

    async fn list_endpoint_authentications(
        &self,
        endpoint_id: &str,
    ) -> Result<Collection<Authentication>> {
        self.transport
            .get(&format!("/endpoints/{}/authentications", endpoint_id))
            .await
    }

    async fn delete_source(&self, id: &str) -> Result<()> {
        self.transport.delete(&format!("/sources/{}", id)).await
    }

    async fn create_application(&self, input: &CreateApplication) -> Result<Application> {
        self.transport.post("/applications", input).await
    }

    async fn delete_application(&self, id: &str) -> Result<()> {
        self.transport.delete(&format!("/applications/{}", id)).await
    }

    async fn post_graphql(&self, request: &GraphQlRequest) -> Result<GraphQlResponse> {
        self.transport.post("/graphql", request).await
    }

    async fn list_application_types(&self) -> Result<Collection<ApplicationType>> {
        self.transport.get("/application_types").await
    }

    async fn list_sources(&self, query: &str) -> Result<Collection<Source>> {
        self.transport.get(&format!("/sources?{}", query)).await
    }
}
