//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the client for the volunteer/NGO backend REST API.

pub mod backend;
