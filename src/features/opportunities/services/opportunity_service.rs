use std::sync::Arc;

use tokio::sync::RwLock;

use crate::core::error::Result;
use crate::features::opportunities::models::OpportunityRecord;
use crate::modules::backend::BackendApi;
use crate::shared::constants::{
    CREATE_FAILED_MESSAGE, DELETE_FAILED_MESSAGE, OPPORTUNITY_DELETED_MESSAGE,
    UPDATE_FAILED_MESSAGE,
};
use crate::shared::types::{ActionResponse, Alert};

/// NGO dashboard: the opportunity listing and the page-level alert
pub struct OpportunityService {
    api: Arc<dyn BackendApi>,
    listing: RwLock<Vec<OpportunityRecord>>,
    page_alert: RwLock<Option<Alert>>,
}

impl OpportunityService {
    pub fn new(api: Arc<dyn BackendApi>) -> Self {
        Self {
            api,
            listing: RwLock::new(Vec::new()),
            page_alert: RwLock::new(None),
        }
    }

    /// Refresh the listing.
    ///
    /// On failure the previous listing is kept and the page alert says why.
    pub async fn load(&self) -> Result<Vec<OpportunityRecord>> {
        match self.api.list_opportunities().await {
            Ok(opportunities) => {
                tracing::debug!("Loaded {} opportunities", opportunities.len());
                *self.listing.write().await = opportunities.clone();
                Ok(opportunities)
            }
            Err(e) => {
                tracing::error!("Failed to load opportunities: {}", e);
                self.set_page_alert(Alert::error(format!(
                    "Failed to load opportunities: {}",
                    e.user_message()
                )))
                .await;
                Err(e)
            }
        }
    }

    pub async fn opportunities(&self) -> Vec<OpportunityRecord> {
        self.listing.read().await.clone()
    }

    pub async fn find(&self, id: i64) -> Option<OpportunityRecord> {
        self.listing
            .read()
            .await
            .iter()
            .find(|o| o.id == Some(id))
            .cloned()
    }

    /// Create (`id` absent) or update an opportunity, then reload the listing
    pub async fn save(&self, id: Option<i64>, record: OpportunityRecord) -> Result<ActionResponse> {
        let response = match id {
            Some(id) => {
                tracing::info!("Updating opportunity {}", id);
                self.api
                    .update_opportunity(id, &record)
                    .await?
                    .into_result(UPDATE_FAILED_MESSAGE)?
            }
            None => {
                tracing::info!("Creating opportunity '{}'", record.title);
                self.api
                    .create_opportunity(&record)
                    .await?
                    .into_result(CREATE_FAILED_MESSAGE)?
            }
        };

        // The save itself succeeded; a failed refresh is reported on the page only.
        let _ = self.load().await;
        Ok(response)
    }

    pub async fn delete(&self, id: i64) -> Result<ActionResponse> {
        let result = match self.api.delete_opportunity(id).await {
            Ok(response) => response.into_result(DELETE_FAILED_MESSAGE),
            Err(e) => Err(e),
        };

        match result {
            Ok(response) => {
                tracing::info!("Deleted opportunity {}", id);
                self.set_page_alert(Alert::success(OPPORTUNITY_DELETED_MESSAGE))
                    .await;
                let _ = self.load().await;
                Ok(response)
            }
            Err(e) => {
                tracing::error!("Failed to delete opportunity {}: {}", id, e);
                self.set_page_alert(Alert::error(format!("Error: {}", e.user_message())))
                    .await;
                Err(e)
            }
        }
    }

    pub async fn page_alert(&self) -> Option<Alert> {
        self.page_alert.read().await.clone()
    }

    pub async fn set_page_alert(&self, alert: Alert) {
        *self.page_alert.write().await = Some(alert);
    }

    pub async fn clear_page_alert(&self) {
        *self.page_alert.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;
    use crate::shared::test_helpers::{fake_title, sample_record, FakeBackend};
    use crate::shared::types::AlertSeverity;

    fn service_with(backend: &Arc<FakeBackend>) -> OpportunityService {
        OpportunityService::new(backend.clone())
    }

    #[tokio::test]
    async fn test_load_and_find() {
        let backend = Arc::new(FakeBackend::with_opportunities(vec![sample_record()]));
        let service = service_with(&backend);

        assert_eq!(service.load().await.unwrap().len(), 1);
        assert_eq!(service.find(7).await, Some(sample_record()));
        assert_eq!(service.find(8).await, None);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_listing() {
        let backend = Arc::new(FakeBackend::with_opportunities(vec![sample_record()]));
        let service = service_with(&backend);
        service.load().await.unwrap();

        backend.fail_next_listing_with(AppError::Application("Banco indisponível".to_string()));
        assert!(service.load().await.is_err());

        assert_eq!(service.opportunities().await.len(), 1);
        let alert = service.page_alert().await.unwrap();
        assert_eq!(alert.severity, AlertSeverity::Error);
        assert_eq!(alert.message, "Failed to load opportunities: Banco indisponível");
    }

    #[tokio::test]
    async fn test_create_reloads_listing() {
        let backend = Arc::new(FakeBackend::with_opportunities(vec![sample_record()]));
        let service = service_with(&backend);

        let mut record = sample_record();
        record.id = None;
        record.title = fake_title();
        let response = service.save(None, record.clone()).await.unwrap();

        assert_eq!(response.id, Some(8));
        let listed = service.find(8).await.unwrap();
        assert_eq!(listed.title, record.title);
        assert_eq!(backend.created().len(), 1);
    }

    #[tokio::test]
    async fn test_declined_save_is_application_error() {
        let backend = Arc::new(FakeBackend::with_opportunities(vec![sample_record()]));
        let service = service_with(&backend);
        backend.decline_next_with("Oportunidade duplicada");

        match service.save(Some(7), sample_record()).await {
            Err(AppError::Application(msg)) => assert_eq!(msg, "Oportunidade duplicada"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_unknown_opportunity() {
        let backend = Arc::new(FakeBackend::default());
        let service = service_with(&backend);

        let err = service.save(Some(99), sample_record()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_sets_page_alert() {
        let backend = Arc::new(FakeBackend::with_opportunities(vec![sample_record()]));
        let service = service_with(&backend);
        service.load().await.unwrap();

        service.delete(7).await.unwrap();
        assert!(service.opportunities().await.is_empty());
        assert_eq!(
            service.page_alert().await,
            Some(Alert::success(OPPORTUNITY_DELETED_MESSAGE))
        );

        assert!(service.delete(7).await.is_err());
        let alert = service.page_alert().await.unwrap();
        assert_eq!(alert.severity, AlertSeverity::Error);
        assert!(alert.message.starts_with("Error: "));

        service.clear_page_alert().await;
        assert_eq!(service.page_alert().await, None);
    }
}
