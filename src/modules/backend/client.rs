use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::core::config::ApiConfig;
use crate::core::error::{AppError, Result};
use crate::features::applications::models::{ApplicationRequest, Volunteer, VolunteerApplication};
use crate::features::opportunities::models::OpportunityRecord;
use crate::shared::types::{ActionResponse, ErrorPayload};

/// Operations consumed from the volunteer/NGO backend
#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn list_opportunities(&self) -> Result<Vec<OpportunityRecord>>;

    async fn create_opportunity(&self, record: &OpportunityRecord) -> Result<ActionResponse>;

    async fn update_opportunity(&self, id: i64, record: &OpportunityRecord)
        -> Result<ActionResponse>;

    async fn delete_opportunity(&self, id: i64) -> Result<ActionResponse>;

    async fn submit_application(&self, application: &ApplicationRequest)
        -> Result<ActionResponse>;

    async fn list_volunteers(&self) -> Result<Vec<Volunteer>>;

    async fn list_volunteer_applications(
        &self,
        volunteer_id: i64,
    ) -> Result<Vec<VolunteerApplication>>;
}

/// HTTP client for the backend REST API
pub struct HttpBackendClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpBackendClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and return the raw status and body.
    ///
    /// Non-2xx answers become `Application`/`NotFound` errors carrying the
    /// backend's `detail`/`error` message when there is one.
    async fn send(&self, request: RequestBuilder, operation: &str) -> Result<(StatusCode, String)> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("Failed to {}: {}", operation, e);
            AppError::Transport(format!("Failed to {}: {}", operation, e))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!("Failed to read response to {}: {}", operation, e);
            AppError::Transport(format!("Failed to read response: {}", e))
        })?;

        if status.is_success() {
            return Ok((status, body));
        }

        let message = serde_json::from_str::<ErrorPayload>(&body)
            .ok()
            .and_then(|payload| payload.message())
            .unwrap_or_else(|| format!("Backend error: HTTP {}", status));

        tracing::error!("Backend API error on {}: HTTP {} - {}", operation, status, body);

        if status == StatusCode::NOT_FOUND {
            Err(AppError::NotFound(message))
        } else {
            Err(AppError::Application(message))
        }
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        operation: &str,
    ) -> Result<T> {
        let (_, body) = self.send(request, operation).await?;
        serde_json::from_str::<T>(&body).map_err(|e| {
            tracing::error!("Failed to parse response to {}: {}", operation, e);
            AppError::Transport(format!("Failed to parse response: {}", e))
        })
    }
}

#[async_trait]
impl BackendApi for HttpBackendClient {
    async fn list_opportunities(&self) -> Result<Vec<OpportunityRecord>> {
        tracing::debug!("Fetching opportunities");
        let request = self.http_client.get(self.url("/oportunidades/"));
        let opportunities: Vec<OpportunityRecord> =
            self.send_json(request, "list opportunities").await?;
        tracing::info!("Fetched {} opportunities", opportunities.len());
        Ok(opportunities)
    }

    async fn create_opportunity(&self, record: &OpportunityRecord) -> Result<ActionResponse> {
        tracing::debug!("Creating opportunity: {}", record.title);
        let request = self
            .http_client
            .post(self.url("/oportunidades/"))
            .json(record);
        self.send_json(request, "create opportunity").await
    }

    async fn update_opportunity(
        &self,
        id: i64,
        record: &OpportunityRecord,
    ) -> Result<ActionResponse> {
        tracing::debug!("Updating opportunity {}", id);
        let request = self
            .http_client
            .put(self.url(&format!("/oportunidades/{}/", id)))
            .json(record);
        self.send_json(request, "update opportunity").await
    }

    async fn delete_opportunity(&self, id: i64) -> Result<ActionResponse> {
        tracing::debug!("Deleting opportunity {}", id);
        let request = self
            .http_client
            .delete(self.url(&format!("/oportunidades/{}/", id)));
        let (status, body) = self.send(request, "delete opportunity").await?;

        if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
            return Ok(ActionResponse::ok(None));
        }
        serde_json::from_str::<ActionResponse>(&body)
            .map_err(|e| AppError::Transport(format!("Failed to parse response: {}", e)))
    }

    async fn submit_application(
        &self,
        application: &ApplicationRequest,
    ) -> Result<ActionResponse> {
        tracing::debug!(
            "Submitting application for opportunity {}",
            application.opportunity_id
        );
        let request = self
            .http_client
            .post(self.url("/inscricoes/"))
            .json(application);
        self.send_json(request, "submit application").await
    }

    async fn list_volunteers(&self) -> Result<Vec<Volunteer>> {
        let request = self.http_client.get(self.url("/voluntarios/"));
        self.send_json(request, "list volunteers").await
    }

    async fn list_volunteer_applications(
        &self,
        volunteer_id: i64,
    ) -> Result<Vec<VolunteerApplication>> {
        let request = self
            .http_client
            .get(self.url(&format!("/voluntarios/{}/inscricoes", volunteer_id)));
        self.send_json(request, "list volunteer applications").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::sample_record;
    use axum::{
        extract::Path,
        http::StatusCode as AxumStatus,
        response::IntoResponse,
        routing::{get, put},
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::time::Duration;

    async fn spawn_backend(router: Router) -> HttpBackendClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        HttpBackendClient::new(&ApiConfig {
            base_url: format!("http://{}/api/", addr),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn backend_router() -> Router {
        let record = serde_json::to_value(sample_record()).unwrap();
        Router::new()
            .route(
                "/api/oportunidades/",
                get(move || {
                    let record = record.clone();
                    async move { Json(json!([record])) }
                })
                .post(|Json(body): Json<Value>| async move {
                    if body["titulo"] == "duplicada" {
                        (
                            AxumStatus::OK,
                            Json(json!({"success": false, "error": "Oportunidade duplicada"})),
                        )
                    } else {
                        (AxumStatus::CREATED, Json(json!({"success": true, "id": 42})))
                    }
                }),
            )
            .route(
                "/api/oportunidades/{id}/",
                put(|Path(id): Path<i64>| async move {
                    if id == 404 {
                        (
                            AxumStatus::NOT_FOUND,
                            Json(json!({"detail": "Oportunidade não encontrada"})),
                        )
                    } else {
                        (
                            AxumStatus::OK,
                            Json(json!({"success": true, "message": "Oportunidade atualizada com sucesso."})),
                        )
                    }
                })
                .delete(|Path(id): Path<i64>| async move {
                    if id == 500 {
                        (AxumStatus::INTERNAL_SERVER_ERROR, Json(json!({"error": "db down"})))
                            .into_response()
                    } else {
                        AxumStatus::NO_CONTENT.into_response()
                    }
                }),
            )
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash_is_trimmed() {
        let client = HttpBackendClient::new(&ApiConfig {
            base_url: "http://localhost:8000/api/".to_string(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api");
    }

    #[tokio::test]
    async fn test_list_opportunities() {
        let client = spawn_backend(backend_router()).await;
        let list = client.list_opportunities().await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0], sample_record());
    }

    #[tokio::test]
    async fn test_create_reports_success_flag() {
        let client = spawn_backend(backend_router()).await;

        let mut record = sample_record();
        record.id = None;
        let response = client.create_opportunity(&record).await.unwrap();
        assert!(response.success);
        assert_eq!(response.id, Some(42));

        record.title = "duplicada".to_string();
        let response = client.create_opportunity(&record).await.unwrap();
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Oportunidade duplicada"));
    }

    #[tokio::test]
    async fn test_update_not_found_extracts_detail() {
        let client = spawn_backend(backend_router()).await;
        match client.update_opportunity(404, &sample_record()).await {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Oportunidade não encontrada"),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(client
            .update_opportunity(7, &sample_record())
            .await
            .unwrap()
            .success);
    }

    #[tokio::test]
    async fn test_delete_handles_no_content_and_errors() {
        let client = spawn_backend(backend_router()).await;
        assert!(client.delete_opportunity(7).await.unwrap().success);

        match client.delete_opportunity(500).await {
            Err(AppError::Application(msg)) => assert_eq!(msg, "db down"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpBackendClient::new(&ApiConfig {
            base_url: format!("http://{}/api", addr),
            timeout: Duration::from_secs(2),
        })
        .unwrap();

        assert!(matches!(
            client.list_opportunities().await,
            Err(AppError::Transport(_))
        ));
    }
}
