//! Core library exports for the trainings service.
//!
//! The `data` feature exposes the domain types, Diesel models and schema.
//! The `server` feature adds repositories, services, forms and the
//! actix-web routes.

/// Role required for every mutating admin operation.
pub const ADMIN_ROLE: &str = "admin";

#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod schema;

#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
