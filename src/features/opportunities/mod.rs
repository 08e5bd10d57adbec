//! Opportunities posted by NGOs.
//!
//! Holds the form model and its validator, the dashboard listing, and the
//! create/edit modal that saves through the bounded submission controller.

pub mod dtos;
pub mod models;
pub mod services;
pub mod validator;

pub use services::{OpportunityModal, OpportunityService};
