//! Helpers for integration tests.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pushkind_common::db::{DbPool, establish_connection_pool};
use pushkind_trainings::domain::category::NewCategory;
use pushkind_trainings::domain::registration::NewRegistration;
use pushkind_trainings::domain::training::NewTraining;
use pushkind_trainings::domain::types::{
    CategoryColor, CategoryId, CategoryName, ParticipantEmail, ParticipantName,
    RegistrationMethod, SlotCount, TrainingDescription, TrainingId, TrainingName, TrainingStatus,
};
use tempfile::NamedTempFile;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Temporary database used in integration tests.
pub struct TestDb {
    _tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let tempfile = NamedTempFile::new().expect("Failed to create temp file");
        let pool = establish_connection_pool(tempfile.path().to_str().unwrap())
            .expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            _tempfile: tempfile,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

pub fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, day)
        .and_then(|d| d.and_hms_opt(hour, 0, 0))
        .expect("valid timestamp")
}

pub fn new_category(name: &str) -> NewCategory {
    NewCategory {
        name: CategoryName::new(name).expect("valid name"),
        color: CategoryColor::new("#336699").expect("valid color"),
    }
}

pub fn new_training(category_id: CategoryId, name: &str, slots: i32) -> NewTraining {
    NewTraining {
        name: TrainingName::new(name).expect("valid name"),
        description: TrainingDescription::new("Hands-on session").expect("valid description"),
        short_description: None,
        category_id,
        date: NaiveDate::from_ymd_opt(2026, 4, 1).expect("valid date"),
        end_date: None,
        time_from: None,
        time_to: None,
        duration: Some("2h".to_string()),
        status: TrainingStatus::Scheduled,
        available_slots: SlotCount::new(slots).expect("valid slots"),
        max_registrations: SlotCount::new(slots).expect("valid slots"),
        registration_method: RegistrationMethod::Internal,
        external_link: None,
        hero_image: None,
        is_featured: false,
        is_recommended: false,
        is_registration_open: true,
        display_order: None,
        attachments: vec![],
        location: Some("Room 4".to_string()),
        speakers: None,
        target_audience: None,
        created_at: at(1, 9),
        updated_at: at(1, 9),
    }
}

pub fn new_registration(training_id: TrainingId, name: &str, day: u32) -> NewRegistration {
    NewRegistration::self_registration(
        training_id,
        ParticipantName::new(name).expect("valid name"),
        ParticipantEmail::new(format!("{}@example.com", name.to_lowercase()))
            .expect("valid email"),
        None,
        at(day, 10),
    )
}
