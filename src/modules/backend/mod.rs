//! Backend REST API client
//!
//! The [`BackendApi`] trait is the seam services depend on; [`HttpBackendClient`]
//! talks to the real backend over reqwest.

mod client;

pub use client::{BackendApi, HttpBackendClient};
