use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;

use crate::core::config::SubmissionConfig;
use crate::core::error::{AppError, Result};
use crate::features::opportunities::dtos::{OpportunityField, OpportunityForm};
use crate::features::opportunities::models::OpportunityRecord;
use crate::features::opportunities::services::OpportunityService;
use crate::features::opportunities::validator::validate_opportunity;
use crate::features::submission::{BoundedSubmission, PendingSave, SubmitOutcome};
use crate::shared::constants::{
    NO_CHANGES_MESSAGE, OPPORTUNITY_CREATED_MESSAGE, OPPORTUNITY_UPDATED_MESSAGE,
};
use crate::shared::types::{ActionResponse, Alert};
use crate::shared::validation::FieldErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalMode {
    #[default]
    Create,
    Edit {
        id: i64,
    },
}

impl ModalMode {
    pub fn id(&self) -> Option<i64> {
        match self {
            ModalMode::Create => None,
            ModalMode::Edit { id } => Some(*id),
        }
    }
}

/// Everything the create/edit modal shows
#[derive(Debug, Clone, Default)]
pub struct ModalState {
    pub open: bool,
    pub mode: ModalMode,
    pub form: OpportunityForm,
    /// Form values captured when an edit was opened
    pub original: Option<OpportunityForm>,
    pub errors: FieldErrors,
    pub alert: Option<Alert>,
    pub submitting: bool,
}

/// What `submit` did once it returned
#[derive(Debug)]
pub enum SubmitStatus {
    /// Saved and closed; the page alert holds the outcome
    Closed,
    /// Closed at the upper bound, the save is still running
    StillSaving(LateSave),
    /// The modal was reopened or cancelled before it could close
    Superseded(LateSave),
}

/// Save that outlived its modal. Its outcome lands on the page alert.
#[derive(Debug)]
pub struct LateSave {
    handle: JoinHandle<Alert>,
}

impl LateSave {
    /// Wait for the save and return the alert it produced
    pub async fn finish(self) -> Result<Alert> {
        Ok(self.handle.await?)
    }
}

/// Create/edit modal for opportunities
pub struct OpportunityModal {
    state: Mutex<ModalState>,
    submission: BoundedSubmission,
    service: Arc<OpportunityService>,
}

impl OpportunityModal {
    pub fn new(service: Arc<OpportunityService>, window: SubmissionConfig) -> Self {
        Self {
            state: Mutex::new(ModalState::default()),
            submission: BoundedSubmission::new(window),
            service,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ModalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> ModalState {
        self.lock().clone()
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    pub fn errors(&self) -> FieldErrors {
        self.lock().errors.clone()
    }

    pub fn alert(&self) -> Option<Alert> {
        self.lock().alert.clone()
    }

    pub fn open_create(&self) {
        self.submission.invalidate_pending();
        *self.lock() = ModalState {
            open: true,
            ..ModalState::default()
        };
        tracing::debug!("Opened modal for a new opportunity");
    }

    pub fn open_edit(&self, record: &OpportunityRecord) -> Result<()> {
        let id = record.id.ok_or_else(|| {
            AppError::Internal("Cannot edit an opportunity that was never saved".to_string())
        })?;

        self.submission.invalidate_pending();
        let form = OpportunityForm::from_record(record);
        *self.lock() = ModalState {
            open: true,
            mode: ModalMode::Edit { id },
            original: Some(form.clone()),
            form,
            ..ModalState::default()
        };
        tracing::debug!("Opened modal for opportunity {}", id);
        Ok(())
    }

    /// Store a typed value and re-validate the whole form
    pub fn set_field(&self, field: OpportunityField, value: &str) -> Result<()> {
        let mut state = self.lock();
        if !state.open {
            return Err(AppError::Internal("The opportunity modal is not open".to_string()));
        }
        if field == OpportunityField::OrganizationName && matches!(state.mode, ModalMode::Edit { .. })
        {
            return Err(AppError::Application(
                "Organization name cannot be changed after publishing".to_string(),
            ));
        }

        state.form.set(field, value);
        state.errors = validate_opportunity(&state.form);
        Ok(())
    }

    pub fn cancel(&self) {
        self.submission.invalidate_pending();
        *self.lock() = ModalState::default();
        tracing::debug!("Modal cancelled");
    }

    fn close_after_save(&self) {
        *self.lock() = ModalState::default();
    }

    /// Validate, save, and close within the submission window.
    ///
    /// Returns the validation errors or the rejection when the modal stays open.
    pub async fn submit(&self) -> Result<SubmitStatus> {
        let (mode, record, unchanged) = {
            let mut state = self.lock();
            if !state.open {
                return Err(AppError::Internal("The opportunity modal is not open".to_string()));
            }
            if state.submitting {
                tracing::debug!("Submit ignored: a save is already in flight");
                return Err(AppError::Internal(
                    "A submission is already in progress".to_string(),
                ));
            }

            state.errors = validate_opportunity(&state.form);
            if !state.errors.is_empty() {
                tracing::debug!("Submit blocked: {}", state.errors);
                return Err(AppError::Validation(state.errors.clone()));
            }

            let record = state.form.to_record(state.mode.id())?;
            let unchanged = match (&state.mode, &state.original) {
                (ModalMode::Edit { .. }, Some(original)) => !state.form.has_changes_from(original),
                _ => false,
            };
            if unchanged {
                tracing::info!("Submitting an edit without changes");
            }

            state.alert = unchanged.then(|| Alert::info(NO_CHANGES_MESSAGE));
            state.submitting = true;
            (state.mode, record, unchanged)
        };

        let success = match (mode, unchanged) {
            (ModalMode::Edit { .. }, true) => Alert::info(NO_CHANGES_MESSAGE),
            (ModalMode::Edit { .. }, false) => Alert::success(OPPORTUNITY_UPDATED_MESSAGE),
            (ModalMode::Create, _) => Alert::success(OPPORTUNITY_CREATED_MESSAGE),
        };

        self.service.clear_page_alert().await;

        let service = self.service.clone();
        let outcome = self
            .submission
            .submit_and_schedule(
                async move { service.save(mode.id(), record).await },
                || self.close_after_save(),
            )
            .await;

        match outcome {
            SubmitOutcome::Closed(_) => {
                self.service.set_page_alert(success).await;
                Ok(SubmitStatus::Closed)
            }
            SubmitOutcome::ClosedWhileSaving(pending) => {
                Ok(SubmitStatus::StillSaving(self.track_late(pending, success)))
            }
            SubmitOutcome::Superseded(pending) => {
                Ok(SubmitStatus::Superseded(self.track_late(pending, success)))
            }
            SubmitOutcome::Rejected(e) => {
                let alert = Alert::error(format!("Error: {}", e.user_message()));
                {
                    let mut state = self.lock();
                    state.submitting = false;
                    state.alert = Some(alert.clone());
                }
                self.service.set_page_alert(alert).await;
                Err(e)
            }
        }
    }

    fn track_late(&self, pending: PendingSave<ActionResponse>, success: Alert) -> LateSave {
        let service = self.service.clone();
        let handle = tokio::spawn(async move {
            let alert = match pending.outcome().await {
                Ok(_) => success,
                Err(e) => {
                    tracing::error!("Save finished after the modal closed and failed: {}", e);
                    Alert::error(format!("Error: {}", e.user_message()))
                }
            };
            service.set_page_alert(alert.clone()).await;
            alert
        });
        LateSave { handle }
    }
}
