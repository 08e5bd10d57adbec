use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use fake::Fake;

use crate::core::error::{AppError, Result};
use crate::features::applications::models::{ApplicationRequest, Volunteer, VolunteerApplication};
use crate::features::opportunities::dtos::OpportunityForm;
use crate::features::opportunities::models::{ActionType, OpportunityRecord, OpportunityStatus};
use crate::modules::backend::BackendApi;
use crate::shared::types::ActionResponse;

/// Saved opportunity with every optional field filled in
pub fn sample_record() -> OpportunityRecord {
    OpportunityRecord {
        id: Some(7),
        title: "Reforço escolar".to_string(),
        action_type: ActionType::Education,
        address: "Rua das Flores, 100 - Recife".to_string(),
        start_date: Some("10/05/2024".to_string()),
        end_date: Some("12/05/2024".to_string()),
        start_time: Some("08:00".to_string()),
        end_time: Some("12:00".to_string()),
        volunteer_profile: Some("Paciência com crianças".to_string()),
        description: "Aulas de reforço para o ensino fundamental".to_string(),
        organization_name: "Instituto Aprender".to_string(),
        slot_count: Some(5),
        status: OpportunityStatus::Active,
        published_at: None,
    }
}

/// Form that passes every rule
pub fn valid_form() -> OpportunityForm {
    OpportunityForm::from_record(&sample_record())
}

pub fn fake_title() -> String {
    Sentence(2..5).fake()
}

pub fn fake_volunteer(id: i64) -> Volunteer {
    Volunteer {
        id,
        name: Some(Name().fake()),
        email: Some(SafeEmail().fake()),
    }
}

#[derive(Default)]
struct FakeState {
    opportunities: Vec<OpportunityRecord>,
    next_id: i64,
    save_delay: Duration,
    decline_next: Option<String>,
    fail_next: Option<AppError>,
    fail_next_listing: Option<AppError>,
    created: Vec<OpportunityRecord>,
    updated: Vec<(i64, OpportunityRecord)>,
    deleted: Vec<i64>,
    applications: Vec<ApplicationRequest>,
    volunteers: Vec<(Volunteer, Vec<VolunteerApplication>)>,
}

/// In-memory backend.
///
/// Saves wait for the configured delay on the tokio clock, so paused-time
/// tests control exactly when they finish.
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<FakeState>,
}

impl FakeBackend {
    pub fn with_opportunities(opportunities: Vec<OpportunityRecord>) -> Self {
        let next_id = opportunities.iter().filter_map(|o| o.id).max().unwrap_or(0);
        Self {
            state: Mutex::new(FakeState {
                opportunities,
                next_id,
                ..FakeState::default()
            }),
        }
    }

    pub fn with_save_delay(self, delay: Duration) -> Self {
        self.state.lock().unwrap().save_delay = delay;
        self
    }

    /// Next mutating call answers `success: false` with `message`
    pub fn decline_next_with(&self, message: &str) {
        self.state.lock().unwrap().decline_next = Some(message.to_string());
    }

    /// Next mutating call fails with `error`
    pub fn fail_next_with(&self, error: AppError) {
        self.state.lock().unwrap().fail_next = Some(error);
    }

    pub fn fail_next_listing_with(&self, error: AppError) {
        self.state.lock().unwrap().fail_next_listing = Some(error);
    }

    pub fn add_volunteer(&self, volunteer: Volunteer, applications: Vec<VolunteerApplication>) {
        self.state
            .lock()
            .unwrap()
            .volunteers
            .push((volunteer, applications));
    }

    pub fn opportunities(&self) -> Vec<OpportunityRecord> {
        self.state.lock().unwrap().opportunities.clone()
    }

    pub fn created(&self) -> Vec<OpportunityRecord> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn updated(&self) -> Vec<(i64, OpportunityRecord)> {
        self.state.lock().unwrap().updated.clone()
    }

    pub fn deleted(&self) -> Vec<i64> {
        self.state.lock().unwrap().deleted.clone()
    }

    pub fn submitted_applications(&self) -> Vec<ApplicationRequest> {
        self.state.lock().unwrap().applications.clone()
    }

    async fn before_save(&self) -> Result<Option<ActionResponse>> {
        let delay = self.state.lock().unwrap().save_delay;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock().unwrap();
        if let Some(error) = state.fail_next.take() {
            return Err(error);
        }
        Ok(state.decline_next.take().map(|message| ActionResponse {
            success: false,
            id: None,
            message: None,
            detail: None,
            error: Some(message),
        }))
    }
}

#[async_trait]
impl BackendApi for FakeBackend {
    async fn list_opportunities(&self) -> Result<Vec<OpportunityRecord>> {
        let mut state = self.state.lock().unwrap();
        match state.fail_next_listing.take() {
            Some(error) => Err(error),
            None => Ok(state.opportunities.clone()),
        }
    }

    async fn create_opportunity(&self, record: &OpportunityRecord) -> Result<ActionResponse> {
        if let Some(declined) = self.before_save().await? {
            return Ok(declined);
        }

        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        state.created.push(record.clone());
        state.opportunities.push(OpportunityRecord {
            id: Some(id),
            ..record.clone()
        });

        Ok(ActionResponse {
            id: Some(id),
            ..ActionResponse::ok(None)
        })
    }

    async fn update_opportunity(&self, id: i64, record: &OpportunityRecord) -> Result<ActionResponse> {
        if let Some(declined) = self.before_save().await? {
            return Ok(declined);
        }

        let mut state = self.state.lock().unwrap();
        state.updated.push((id, record.clone()));
        match state.opportunities.iter_mut().find(|o| o.id == Some(id)) {
            Some(existing) => {
                *existing = OpportunityRecord {
                    id: Some(id),
                    ..record.clone()
                };
                Ok(ActionResponse::ok(Some("Oportunidade atualizada com sucesso.".to_string())))
            }
            None => Err(AppError::NotFound("Oportunidade não encontrada".to_string())),
        }
    }

    async fn delete_opportunity(&self, id: i64) -> Result<ActionResponse> {
        if let Some(declined) = self.before_save().await? {
            return Ok(declined);
        }

        let mut state = self.state.lock().unwrap();
        let before = state.opportunities.len();
        state.opportunities.retain(|o| o.id != Some(id));
        if state.opportunities.len() == before {
            return Err(AppError::NotFound("Oportunidade não encontrada".to_string()));
        }
        state.deleted.push(id);
        Ok(ActionResponse::ok(None))
    }

    async fn submit_application(&self, application: &ApplicationRequest) -> Result<ActionResponse> {
        if let Some(declined) = self.before_save().await? {
            return Ok(declined);
        }

        self.state
            .lock()
            .unwrap()
            .applications
            .push(application.clone());
        Ok(ActionResponse::ok(Some("Inscrição realizada com sucesso!".to_string())))
    }

    async fn list_volunteers(&self) -> Result<Vec<Volunteer>> {
        let state = self.state.lock().unwrap();
        Ok(state.volunteers.iter().map(|(v, _)| v.clone()).collect())
    }

    async fn list_volunteer_applications(&self, volunteer_id: i64) -> Result<Vec<VolunteerApplication>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .volunteers
            .iter()
            .find(|(v, _)| v.id == volunteer_id)
            .map(|(_, applications)| applications.clone())
            .unwrap_or_default())
    }
}
