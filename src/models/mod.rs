//! Diesel row types and their conversions to and from domain entities.

pub mod category;
pub mod config;
pub mod page;
pub mod registration;
pub mod resource;
pub mod training;
pub mod training_update;
