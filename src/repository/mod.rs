use pushkind_common::db::{DbConnection, DbPool};
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::category::{Category, NewCategory};
use crate::domain::page::{PageContent, PageVersion};
use crate::domain::registration::{NewRegistration, Registration};
use crate::domain::resource::{NewResource, Resource};
use crate::domain::training::{NewTraining, Training};
use crate::domain::training_update::{NewTrainingUpdate, TrainingUpdate};
use crate::domain::types::{
    CategoryId, PageSlug, PageVersionId, RegistrationId, ResourceId, TrainingId,
};

pub mod category;
pub mod page;
pub mod registration;
pub mod resource;
pub mod training;
pub mod training_update;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List all categories ordered by name.
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    /// Overwrite name and colour of an existing category.
    fn update_category(&self, category: &Category) -> RepositoryResult<usize>;
    /// Delete a category. Trainings keep their dangling `category_id`.
    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize>;
}

/// Read-only operations for training entities.
pub trait TrainingReader {
    /// List trainings by date, then display order.
    fn list_trainings(&self) -> RepositoryResult<Vec<Training>>;
    fn get_training_by_id(&self, id: TrainingId) -> RepositoryResult<Option<Training>>;
}

/// Write operations for training entities.
pub trait TrainingWriter {
    fn create_training(&self, training: &NewTraining) -> RepositoryResult<Training>;
    /// Replace every column of an existing training.
    fn update_training(&self, id: TrainingId, training: &NewTraining) -> RepositoryResult<usize>;
    /// Delete a training. Its registrations are kept.
    fn delete_training(&self, id: TrainingId) -> RepositoryResult<usize>;
}

/// Read-only operations for registration entities.
pub trait RegistrationReader {
    /// List registrations, newest first.
    fn list_registrations(&self) -> RepositoryResult<Vec<Registration>>;
    fn get_registration_by_id(&self, id: RegistrationId)
    -> RepositoryResult<Option<Registration>>;
}

/// Write operations for registration entities.
pub trait RegistrationWriter {
    /// Insert a registration and take one slot from its training.
    ///
    /// The slot count never drops below zero.
    fn create_registration(&self, registration: &NewRegistration)
    -> RepositoryResult<Registration>;
    /// Persist status, attendance, notes and contact details.
    fn update_registration(&self, registration: &Registration) -> RepositoryResult<usize>;
    fn delete_registration(&self, id: RegistrationId) -> RepositoryResult<usize>;
}

pub trait ResourceReader {
    fn list_resources(&self) -> RepositoryResult<Vec<Resource>>;
    fn get_resource_by_id(&self, id: ResourceId) -> RepositoryResult<Option<Resource>>;
}

pub trait ResourceWriter {
    fn create_resource(&self, resource: &NewResource) -> RepositoryResult<Resource>;
    fn update_resource(&self, id: ResourceId, resource: &NewResource) -> RepositoryResult<usize>;
    fn delete_resource(&self, id: ResourceId) -> RepositoryResult<usize>;
}

/// Read access to the activity feed.
pub trait TrainingUpdateReader {
    /// Most recent entries first, at most `limit` of them.
    fn list_training_updates(&self, limit: usize) -> RepositoryResult<Vec<TrainingUpdate>>;
}

/// Append-only access to the activity feed.
pub trait TrainingUpdateWriter {
    fn create_training_update(&self, update: &NewTrainingUpdate)
    -> RepositoryResult<TrainingUpdate>;
}

/// Read-only operations for CMS pages and their history.
pub trait PageReader {
    fn get_page(&self, slug: &PageSlug) -> RepositoryResult<Option<PageContent>>;
    /// Versions of a page, newest first.
    fn list_page_versions(&self, slug: &PageSlug) -> RepositoryResult<Vec<PageVersion>>;
    fn get_page_version(&self, id: PageVersionId) -> RepositoryResult<Option<PageVersion>>;
}

pub trait PageWriter {
    /// Store new live content for a page.
    ///
    /// The previous live content, if any, is copied into a version first.
    fn save_page(&self, page: &PageContent) -> RepositoryResult<usize>;
}
