//! Volunteer applications (subscriptions) to opportunities.

pub mod dtos;
pub mod models;
pub mod services;

pub use services::ApplicationService;
