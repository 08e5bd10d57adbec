mod opportunity_form_dto;

pub use opportunity_form_dto::{OpportunityField, OpportunityForm};
