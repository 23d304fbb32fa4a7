//! Thin actix-web handlers over the service layer.

use actix_web::HttpResponse;
use actix_web_flash_messages::FlashMessage;
use chrono::{NaiveDateTime, Utc};

use crate::services::{ServiceError, ServiceResult};

pub mod api;
pub mod categories;
pub mod main;
pub mod pages;
pub mod registrations;
pub mod resources;
pub mod trainings;
pub mod updates;

/// Timestamp stamped on records created by a request.
pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Flash the outcome of a mutating service call.
///
/// Returns a response only when the handler must not redirect back to its
/// page.
pub(crate) fn flash_outcome(
    result: ServiceResult<bool>,
    success: &str,
    failure: &str,
    not_found: &str,
) -> Option<HttpResponse> {
    match result {
        Ok(true) => FlashMessage::success(success).send(),
        Ok(false) => FlashMessage::error(failure).send(),
        Err(ServiceError::Unauthorized) => {
            return Some(pushkind_common::routes::redirect("/na"));
        }
        Err(ServiceError::NotFound) => FlashMessage::error(not_found).send(),
        Err(ServiceError::Form(message)) => FlashMessage::error(message).send(),
        Err(ServiceError::Internal) => return Some(HttpResponse::InternalServerError().finish()),
        Err(err) => {
            log::error!("Unexpected service error: {err}");
            return Some(HttpResponse::InternalServerError().finish());
        }
    }
    None
}
