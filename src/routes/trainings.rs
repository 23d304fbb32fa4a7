use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::domain::types::{RegistrationMethod, TrainingId, TrainingStatus};
use crate::forms::trainings::{
    DeleteTrainingForm, DeleteTrainingFormPayload, TrainingForm, TrainingFormPayload,
};
use crate::repository::DieselRepository;
use crate::routes::{flash_outcome, now};
use crate::services::ServiceError;
use crate::services::trainings::{
    add_training as add_training_service, delete_training as delete_training_service,
    show_trainings as show_trainings_service, update_training as update_training_service,
};

const TRAININGS_PAGE: &str = "/admin/trainings";

#[get("/admin/trainings")]
pub async fn show_trainings(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_trainings_service(&user, repo.get_ref()) {
        Ok((trainings, categories)) => {
            let statuses: Vec<_> = TrainingStatus::ALL
                .iter()
                .map(|s| (s.as_str(), s.label()))
                .collect();
            let methods: Vec<_> = RegistrationMethod::ALL
                .iter()
                .map(|m| (m.as_str(), m.label()))
                .collect();

            let mut context = base_context(
                &flash_messages,
                &user,
                "trainings",
                &server_config.auth_service_url,
            );
            context.insert("trainings", &trainings);
            context.insert("categories", &categories);
            context.insert("statuses", &statuses);
            context.insert("methods", &methods);
            render_template(&tera, "trainings/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(err) => {
            log::error!("Failed to render trainings page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/trainings")]
pub async fn add_training(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<TrainingForm>,
) -> impl Responder {
    let payload: TrainingFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(format!("{e}")).send();
            return redirect(TRAININGS_PAGE);
        }
    };

    let result = add_training_service(payload, &user, repo.get_ref(), now());
    flash_outcome(
        result,
        "Training added.",
        "Failed to add training.",
        "Training not found.",
    )
    .unwrap_or_else(|| redirect(TRAININGS_PAGE))
}

#[post("/admin/trainings/{training_id}/update")]
pub async fn update_training(
    training_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<TrainingForm>,
) -> impl Responder {
    let training_id = match TrainingId::new(training_id.into_inner()) {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(TRAININGS_PAGE);
        }
    };

    let payload: TrainingFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(format!("{e}")).send();
            return redirect(TRAININGS_PAGE);
        }
    };

    let result = update_training_service(training_id, payload, &user, repo.get_ref(), now());
    flash_outcome(
        result,
        "Training updated.",
        "Failed to update training.",
        "Training not found.",
    )
    .unwrap_or_else(|| redirect(TRAININGS_PAGE))
}

#[post("/admin/trainings/{training_id}/delete")]
pub async fn delete_training(
    training_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<DeleteTrainingForm>,
) -> impl Responder {
    let mut payload: DeleteTrainingFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(format!("{e}")).send();
            return redirect(TRAININGS_PAGE);
        }
    };

    payload.training_id = match training_id.into_inner().try_into() {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(format!("{e}")).send();
            return redirect(TRAININGS_PAGE);
        }
    };

    let result = delete_training_service(payload, &user, repo.get_ref(), now());
    flash_outcome(
        result,
        "Training deleted. Its registrations were kept.",
        "Failed to delete training.",
        "Training not found.",
    )
    .unwrap_or_else(|| redirect(TRAININGS_PAGE))
}
