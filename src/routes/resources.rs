use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::domain::types::{ResourceId, ResourceKind};
use crate::forms::resources::{
    DeleteResourceForm, DeleteResourceFormPayload, ResourceForm, ResourceFormPayload,
};
use crate::repository::DieselRepository;
use crate::routes::flash_outcome;
use crate::services::is_admin;
use crate::services::resources::{
    add_resource as add_resource_service, delete_resource as delete_resource_service,
    show_resources as show_resources_service, update_resource as update_resource_service,
};

const RESOURCES_PAGE: &str = "/resources";

#[get("/resources")]
pub async fn show_resources(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_resources_service(&user, repo.get_ref()) {
        Ok(resources) => {
            let kinds: Vec<_> = ResourceKind::ALL
                .iter()
                .map(|k| (k.as_str(), k.label()))
                .collect();
            let mut context = base_context(
                &flash_messages,
                &user,
                "resources",
                &server_config.auth_service_url,
            );
            context.insert("resources", &resources);
            context.insert("kinds", &kinds);
            context.insert("is_admin", &is_admin(&user));
            render_template(&tera, "resources/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render resources page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/resources")]
pub async fn add_resource(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ResourceForm>,
) -> impl Responder {
    let payload: ResourceFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(format!("{e}")).send();
            return redirect(RESOURCES_PAGE);
        }
    };

    let result = add_resource_service(payload, &user, repo.get_ref());
    flash_outcome(
        result,
        "Resource added.",
        "Failed to add resource.",
        "Resource not found.",
    )
    .unwrap_or_else(|| redirect(RESOURCES_PAGE))
}

#[post("/admin/resources/{resource_id}/update")]
pub async fn update_resource(
    resource_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ResourceForm>,
) -> impl Responder {
    let resource_id = match ResourceId::new(resource_id.into_inner()) {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(RESOURCES_PAGE);
        }
    };

    let payload: ResourceFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(format!("{e}")).send();
            return redirect(RESOURCES_PAGE);
        }
    };

    let result = update_resource_service(resource_id, payload, &user, repo.get_ref());
    flash_outcome(
        result,
        "Resource updated.",
        "Failed to update resource.",
        "Resource not found.",
    )
    .unwrap_or_else(|| redirect(RESOURCES_PAGE))
}

#[post("/admin/resources/{resource_id}/delete")]
pub async fn delete_resource(
    resource_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<DeleteResourceForm>,
) -> impl Responder {
    let mut payload: DeleteResourceFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(format!("{e}")).send();
            return redirect(RESOURCES_PAGE);
        }
    };

    payload.resource_id = match resource_id.into_inner().try_into() {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(format!("{e}")).send();
            return redirect(RESOURCES_PAGE);
        }
    };

    let result = delete_resource_service(payload, &user, repo.get_ref());
    flash_outcome(
        result,
        "Resource deleted.",
        "Failed to delete resource.",
        "Resource not found.",
    )
    .unwrap_or_else(|| redirect(RESOURCES_PAGE))
}
