use crate::core::query;
use crate::domain::model::{
    Application, ApplicationType, Collection, CreateApplication, EntitiesQuery, FilterValue,
    GraphQlRequest, Source, SourceEditBundle, SourcesData,
};
use crate::domain::ports::SourcesApi;
use crate::utils::error::{Result, SourcesError};
use std::sync::Arc;

/// UI 層呼叫的操作；API client 由建構子注入
pub struct SourcesService<A: SourcesApi> {
    api: Arc<A>,
}

impl<A: SourcesApi> Clone for SourcesService<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
        }
    }
}

impl<A: SourcesApi> SourcesService<A> {
    pub fn new(api: A) -> Self {
        Self { api: Arc::new(api) }
    }

    pub fn from_shared(api: Arc<A>) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn load_app_types(&self) -> Result<Collection<ApplicationType>> {
        self.api.list_application_types().await
    }

    pub async fn remove_source(&self, id: &str) -> Result<()> {
        tracing::info!("🗑️ Removing source {}", id);
        self.api.delete_source(id).await.map_err(|e| {
            tracing::warn!("❌ Removing source {} failed: {}", id, e);
            SourcesError::OperationFailed {
                title: None,
                detail: e.first_detail(),
            }
        })
    }

    /// 同時讀取 source、endpoints、applications；有 endpoint 時再讀第一個 endpoint 的 authentications
    pub async fn load_source_for_edit(&self, id: &str) -> Result<SourceEditBundle> {
        let (source, endpoints, applications) = tokio::try_join!(
            self.api.show_source(id),
            self.api.list_source_endpoints(id),
            self.api.list_source_applications(id),
        )?;

        let endpoint_id = match endpoints.data.first() {
            Some(endpoint) => endpoint.id.clone(),
            None => {
                tracing::debug!("Source {} has no endpoint, skipping authentications", id);
                return Ok(SourceEditBundle {
                    source,
                    endpoints: None,
                    authentications: None,
                    applications: applications.data,
                });
            }
        };

        let authentications = self.api.list_endpoint_authentications(&endpoint_id).await?;

        Ok(SourceEditBundle {
            source,
            endpoints: Some(endpoints.data),
            authentications: Some(authentications.data),
            applications: applications.data,
        })
    }

    pub async fn load_entities(&self, params: &EntitiesQuery) -> Result<SourcesData> {
        self.graphql(query::entities_query(params)).await
    }

    pub async fn load_source(&self, id: &str) -> Result<SourcesData> {
        self.graphql(query::source_query(id)).await
    }

    pub async fn create_application(
        &self,
        source_id: &str,
        application_type_id: &str,
    ) -> Result<Application> {
        tracing::info!(
            "➕ Attaching application type {} to source {}",
            application_type_id,
            source_id
        );
        self.api
            .create_application(&CreateApplication {
                source_id: source_id.to_string(),
                application_type_id: application_type_id.to_string(),
            })
            .await
    }

    pub async fn delete_application(&self, id: &str, error_message: &str) -> Result<()> {
        tracing::info!("🗑️ Removing application {}", id);
        self.api.delete_application(id).await.map_err(|e| {
            tracing::warn!("❌ Removing application {} failed: {}", id, e);
            SourcesError::OperationFailed {
                title: Some(error_message.to_string()),
                detail: e.first_detail(),
            }
        })
    }

    pub async fn load_count_of_sources(&self, filter_value: &FilterValue) -> Result<Collection<Source>> {
        self.api
            .list_sources(&query::rest_filter_generator(filter_value))
            .await
    }

    async fn graphql(&self, query: String) -> Result<SourcesData> {
        tracing::debug!("GraphQL query: {}", query);
        let response = self.api.post_graphql(&GraphQlRequest { query }).await?;
        Ok(response.data.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{
        field, Authentication, CollectionMeta, Endpoint, GraphQlResponse,
    };
    use crate::utils::error::ErrorObject;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Barrier;

    fn collection<T>(data: Vec<T>) -> Collection<T> {
        Collection {
            meta: None,
            links: None,
            data,
        }
    }

    fn source(id: &str) -> Source {
        serde_json::from_value(json!({"id": id, "name": format!("source {}", id)})).unwrap()
    }

    fn endpoint(id: &str) -> Endpoint {
        serde_json::from_value(json!({"id": id, "host": "example.com"})).unwrap()
    }

    fn application(id: &str) -> Application {
        serde_json::from_value(json!({"id": id, "application_type_id": "2"})).unwrap()
    }

    fn not_found() -> SourcesError {
        SourcesError::HttpError {
            status: 404,
            errors: vec![ErrorObject {
                status: Some("404".to_string()),
                detail: Some("Record not found".to_string()),
                message: None,
            }],
        }
    }

    /// 記錄呼叫順序的 mock；可選擇讓前三個讀取在 barrier 上互相等待
    #[derive(Default)]
    struct MockApi {
        endpoints: Vec<Endpoint>,
        calls: Mutex<Vec<String>>,
        barrier: Option<Barrier>,
        fail_deletes: bool,
        graphql_query: Mutex<Option<String>>,
        list_query: Mutex<Option<String>>,
    }

    impl MockApi {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        async fn rendezvous(&self) {
            if let Some(barrier) = &self.barrier {
                barrier.wait().await;
            }
        }
    }

    #[async_trait]
    impl SourcesApi for MockApi {
        async fn show_source(&self, id: &str) -> Result<Source> {
            self.rendezvous().await;
            self.record(format!("show_source:{}", id));
            Ok(source(id))
        }

        async fn list_source_endpoints(&self, source_id: &str) -> Result<Collection<Endpoint>> {
            self.rendezvous().await;
            self.record(format!("list_source_endpoints:{}", source_id));
            Ok(collection(self.endpoints.clone()))
        }

        async fn list_source_applications(&self, source_id: &str) -> Result<Collection<Application>> {
            self.rendezvous().await;
            self.record(format!("list_source_applications:{}", source_id));
            Ok(collection(vec![application("30")]))
        }

        async fn list_endpoint_authentications(
            &self,
            endpoint_id: &str,
        ) -> Result<Collection<Authentication>> {
            self.record(format!("list_endpoint_authentications:{}", endpoint_id));
            Ok(collection(vec![serde_json::from_value(
                json!({"id": "40", "authtype": "arn", "resource_id": endpoint_id}),
            )
            .unwrap()]))
        }

        async fn delete_source(&self, id: &str) -> Result<()> {
            self.record(format!("delete_source:{}", id));
            if self.fail_deletes {
                Err(not_found())
            } else {
                Ok(())
            }
        }

        async fn create_application(&self, input: &CreateApplication) -> Result<Application> {
            self.record(format!(
                "create_application:{}:{}",
                input.source_id, input.application_type_id
            ));
            Ok(serde_json::from_value(json!({
                "id": "99",
                "source_id": input.source_id,
                "application_type_id": input.application_type_id
            }))
            .unwrap())
        }

        async fn delete_application(&self, id: &str) -> Result<()> {
            self.record(format!("delete_application:{}", id));
            if self.fail_deletes {
                Err(not_found())
            } else {
                Ok(())
            }
        }

        async fn post_graphql(&self, request: &GraphQlRequest) -> Result<GraphQlResponse> {
            *self.graphql_query.lock().unwrap() = Some(request.query.clone());
            Ok(GraphQlResponse {
                data: Some(SourcesData {
                    sources: vec![source("1")],
                }),
                errors: None,
            })
        }

        async fn list_application_types(&self) -> Result<Collection<ApplicationType>> {
            Ok(collection(vec![serde_json::from_value(
                json!({"id": "2", "name": "/insights/platform/cost-management"}),
            )
            .unwrap()]))
        }

        async fn list_sources(&self, query: &str) -> Result<Collection<Source>> {
            *self.list_query.lock().unwrap() = Some(query.to_string());
            Ok(Collection {
                meta: Some(CollectionMeta {
                    count: 7,
                    limit: 100,
                    offset: 0,
                }),
                links: None,
                data: vec![],
            })
        }
    }

    #[tokio::test]
    async fn test_load_source_for_edit_without_endpoint_bails_out() {
        let service = SourcesService::new(MockApi::default());

        let bundle = service.load_source_for_edit("5").await.unwrap();

        assert_eq!(bundle.source.id, "5");
        assert!(bundle.endpoints.is_none());
        assert!(bundle.authentications.is_none());
        assert_eq!(bundle.applications.len(), 1);
        assert!(!service
            .api()
            .calls()
            .iter()
            .any(|c| c.starts_with("list_endpoint_authentications")));
    }

    #[tokio::test]
    async fn test_load_source_for_edit_uses_first_endpoint_only() {
        let service = SourcesService::new(MockApi {
            endpoints: vec![endpoint("11"), endpoint("12")],
            ..Default::default()
        });

        let bundle = service.load_source_for_edit("5").await.unwrap();

        assert_eq!(bundle.endpoints.as_ref().map(Vec::len), Some(2));
        let authentications = bundle.authentications.unwrap();
        assert_eq!(field(&authentications[0].resource_id).map(String::as_str), Some("11"));

        let calls = service.api().calls();
        let auth_calls: Vec<_> = calls
            .iter()
            .filter(|c| c.starts_with("list_endpoint_authentications"))
            .collect();
        assert_eq!(auth_calls, vec!["list_endpoint_authentications:11"]);
        // 第四個讀取一定在前三個之後
        assert_eq!(calls.last().map(String::as_str), Some("list_endpoint_authentications:11"));
        assert_eq!(calls.len(), 4);
    }

    #[tokio::test]
    async fn test_load_source_for_edit_reads_concurrently() {
        // 三個讀取必須同時在 barrier 上等待才會放行；循序執行會卡住
        let service = SourcesService::new(MockApi {
            endpoints: vec![endpoint("11")],
            barrier: Some(Barrier::new(3)),
            ..Default::default()
        });

        let bundle = tokio::time::timeout(Duration::from_secs(5), service.load_source_for_edit("5"))
            .await
            .expect("initial reads were not issued concurrently")
            .unwrap();

        assert!(bundle.authentications.is_some());
    }

    #[tokio::test]
    async fn test_remove_source_reshapes_error() {
        let service = SourcesService::new(MockApi {
            fail_deletes: true,
            ..Default::default()
        });

        let err = service.remove_source("5").await.unwrap_err();

        match &err {
            SourcesError::OperationFailed { title, detail } => {
                assert!(title.is_none());
                assert_eq!(detail, "Record not found");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(
            serde_json::to_value(err.to_ui_error()).unwrap(),
            json!({"error": {"detail": "Record not found"}})
        );
    }

    #[tokio::test]
    async fn test_delete_application_adds_title() {
        let service = SourcesService::new(MockApi {
            fail_deletes: true,
            ..Default::default()
        });

        let err = service
            .delete_application("30", "Application removal failed")
            .await
            .unwrap_err();

        assert_eq!(
            serde_json::to_value(err.to_ui_error()).unwrap(),
            json!({"error": {"title": "Application removal failed", "detail": "Record not found"}})
        );
    }

    #[tokio::test]
    async fn test_successful_deletes_pass_through() {
        let service = SourcesService::new(MockApi::default());
        assert!(service.remove_source("5").await.is_ok());
        assert!(service.delete_application("30", "unused").await.is_ok());
        assert_eq!(service.api().calls(), vec!["delete_source:5", "delete_application:30"]);
    }

    #[tokio::test]
    async fn test_create_application_passes_ids() {
        let service = SourcesService::new(MockApi::default());
        let app = service.create_application("5", "2").await.unwrap();
        assert_eq!(app.id, "99");
        assert_eq!(field(&app.source_id).map(String::as_str), Some("5"));
        assert_eq!(service.api().calls(), vec!["create_application:5:2"]);
    }

    #[tokio::test]
    async fn test_load_entities_builds_query_and_returns_data() {
        let service = SourcesService::new(MockApi::default());
        let params = EntitiesQuery {
            page_size: 10,
            page_number: 2,
            sort_by: Some("created_at".to_string()),
            sort_direction: "desc".to_string(),
            filter_value: FilterValue {
                name: None,
                source_type_id: vec!["1".to_string()],
            },
        };

        let data = service.load_entities(&params).await.unwrap();

        assert_eq!(data.sources.len(), 1);
        let sent = service.api().graphql_query.lock().unwrap().clone().unwrap();
        assert!(sent.contains("limit:10, offset:10"));
        assert!(sent.contains("sort_by:\"created_at:desc\""));
        assert!(sent.contains("source_type_id: { eq: [\"1\"] }"));
    }

    #[tokio::test]
    async fn test_load_source_filters_by_id() {
        let service = SourcesService::new(MockApi::default());
        service.load_source("77").await.unwrap();
        let sent = service.api().graphql_query.lock().unwrap().clone().unwrap();
        assert!(sent.contains("id: { eq: 77}"));
    }

    #[tokio::test]
    async fn test_load_count_of_sources_uses_rest_filter() {
        let service = SourcesService::new(MockApi::default());
        let filter = FilterValue {
            name: Some("aws".to_string()),
            source_type_id: vec![],
        };

        let result = service.load_count_of_sources(&filter).await.unwrap();

        assert_eq!(result.count(), 7);
        assert_eq!(
            service.api().list_query.lock().unwrap().as_deref(),
            Some("filter[name][contains_i]=aws")
        );
    }

    #[tokio::test]
    async fn test_load_app_types_passes_through() {
        let service = SourcesService::new(MockApi::default());
        let types = service.load_app_types().await.unwrap();
        assert_eq!(types.data[0].id, "2");
    }
}
