use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::domain::types::TrainingId;
use crate::forms::registrations::{SelfRegistrationForm, SelfRegistrationFormPayload};
use crate::repository::DieselRepository;
use crate::routes::{flash_outcome, now};
use crate::services::ServiceError;
use crate::services::is_admin;
use crate::services::main::{
    register_for_training as register_for_training_service, show_index as show_index_service,
    show_training as show_training_service,
};

#[get("/")]
pub async fn index(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_index_service(&user, repo.get_ref(), now().date()) {
        Ok(page) => {
            let mut context =
                base_context(&flash_messages, &user, "index", &server_config.auth_service_url);
            context.insert("featured", &page.featured);
            context.insert("recommended", &page.recommended);
            context.insert("upcoming", &page.upcoming);
            context.insert("categories", &page.categories);
            context.insert("is_admin", &is_admin(&user));
            render_template(&tera, "main/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render index page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/na")]
pub async fn not_assigned(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, &user, "index", &server_config.auth_service_url);
    render_template(&tera, "main/not_assigned.html", &context)
}

#[get("/trainings/{training_id}")]
pub async fn show_training(
    training_id: web::Path<i32>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Ok(training_id) = TrainingId::new(training_id.into_inner()) else {
        return HttpResponse::NotFound().finish();
    };

    match show_training_service(training_id, &user, repo.get_ref()) {
        Ok(training) => {
            let mut context =
                base_context(&flash_messages, &user, "index", &server_config.auth_service_url);
            context.insert("training", &training);
            render_template(&tera, "main/training.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to render training page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/trainings/{training_id}/register")]
pub async fn register_for_training(
    training_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<SelfRegistrationForm>,
) -> impl Responder {
    let Ok(training_id) = TrainingId::new(training_id.into_inner()) else {
        return HttpResponse::NotFound().finish();
    };
    let back = format!("/trainings/{training_id}");

    let payload: SelfRegistrationFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(format!("{e}")).send();
            return redirect(&back);
        }
    };

    let result = register_for_training_service(training_id, payload, &user, repo.get_ref(), now());
    flash_outcome(
        result,
        "You are registered.",
        "Failed to register.",
        "Training not found.",
    )
    .unwrap_or_else(|| redirect(&back))
}
