mod opportunity_modal;
mod opportunity_service;

pub use opportunity_modal::{ModalMode, OpportunityModal, SubmitStatus};
pub use opportunity_service::OpportunityService;
