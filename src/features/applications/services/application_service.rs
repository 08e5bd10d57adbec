use std::sync::Arc;

use futures::future::try_join_all;

use crate::core::error::{AppError, Result};
use crate::features::applications::dtos::SubscriptionForm;
use crate::features::applications::models::Applicant;
use crate::modules::backend::BackendApi;
use crate::shared::constants::{APPLICATION_FAILED_MESSAGE, NO_OPPORTUNITY_AVAILABLE_MESSAGE};
use crate::shared::types::ActionResponse;

/// Service for volunteer applications
pub struct ApplicationService {
    api: Arc<dyn BackendApi>,
}

impl ApplicationService {
    pub fn new(api: Arc<dyn BackendApi>) -> Self {
        Self { api }
    }

    /// Validate and submit a volunteer's application.
    ///
    /// Without an explicit `opportunity_id` the first listed opportunity is used.
    pub async fn subscribe(
        &self,
        form: &SubscriptionForm,
        opportunity_id: Option<i64>,
    ) -> Result<ActionResponse> {
        form.field_errors().into_result()?;

        let opportunity_id = match opportunity_id {
            Some(id) => id,
            None => self.first_opportunity_id().await?,
        };

        let response = self
            .api
            .submit_application(&form.to_request(opportunity_id))
            .await?
            .into_result(APPLICATION_FAILED_MESSAGE)?;

        tracing::info!("Application submitted for opportunity {}", opportunity_id);
        Ok(response)
    }

    async fn first_opportunity_id(&self) -> Result<i64> {
        let opportunities = self.api.list_opportunities().await?;
        opportunities
            .iter()
            .find_map(|o| o.id)
            .ok_or_else(|| {
                tracing::warn!("No opportunity found for subscription");
                AppError::NotFound(NO_OPPORTUNITY_AVAILABLE_MESSAGE.to_string())
            })
    }

    /// Volunteers who applied to `opportunity_id`
    pub async fn list_applicants(&self, opportunity_id: i64) -> Result<Vec<Applicant>> {
        let volunteers = self.api.list_volunteers().await?;

        let per_volunteer = try_join_all(
            volunteers
                .iter()
                .map(|v| self.api.list_volunteer_applications(v.id)),
        )
        .await?;

        let applicants: Vec<Applicant> = volunteers
            .into_iter()
            .zip(per_volunteer)
            .flat_map(|(volunteer, applications)| {
                applications
                    .into_iter()
                    .filter(|a| a.opportunity_id == opportunity_id)
                    .map(move |application| Applicant {
                        volunteer: volunteer.clone(),
                        application,
                    })
            })
            .collect();

        tracing::debug!(
            "Opportunity {} has {} applicant(s)",
            opportunity_id,
            applicants.len()
        );
        Ok(applicants)
    }
}
