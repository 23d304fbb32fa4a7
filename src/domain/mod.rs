//! Domain entities and business rules independent of persistence.

pub mod capacity;
pub mod category;
pub mod lifecycle;
pub mod page;
pub mod registration;
pub mod resource;
pub mod training;
pub mod training_update;
pub mod types;
