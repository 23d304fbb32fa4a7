use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::pages::{
    RestorePageVersionForm, RestorePageVersionFormPayload, SavePageForm, SavePageFormPayload,
};
use crate::repository::DieselRepository;
use crate::routes::{flash_outcome, now};
use crate::services::ServiceError;
use crate::services::pages::{
    list_page_versions as list_page_versions_service, restore_page_version as restore_service,
    save_page as save_page_service, show_page as show_page_service,
};

const EDITOR_PAGE: &str = "/admin/support";

#[get("/support")]
pub async fn show_support(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_page_service(&user, repo.get_ref()) {
        Ok(page) => {
            let mut context =
                base_context(&flash_messages, &user, "support", &server_config.auth_service_url);
            context.insert("page", &page);
            render_template(&tera, "pages/support.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render support page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/admin/support")]
pub async fn edit_support(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let versions = match list_page_versions_service(&user, repo.get_ref()) {
        Ok(versions) => versions,
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(err) => {
            log::error!("Failed to list support page versions: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    match show_page_service(&user, repo.get_ref()) {
        Ok(page) => {
            let content = serde_json::to_string_pretty(&page.content).unwrap_or_default();
            let mut context =
                base_context(&flash_messages, &user, "support", &server_config.auth_service_url);
            context.insert("page", &page);
            context.insert("content", &content);
            context.insert("versions", &versions);
            render_template(&tera, "pages/edit.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render support editor: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/support")]
pub async fn save_support(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<SavePageForm>,
) -> impl Responder {
    let payload: SavePageFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(format!("{e}")).send();
            return redirect(EDITOR_PAGE);
        }
    };

    let result = save_page_service(payload, &user, repo.get_ref(), now());
    flash_outcome(
        result,
        "Support page saved.",
        "Failed to save support page.",
        "Page not found.",
    )
    .unwrap_or_else(|| redirect(EDITOR_PAGE))
}

#[post("/admin/support/restore")]
pub async fn restore_support_version(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<RestorePageVersionForm>,
) -> impl Responder {
    let payload: RestorePageVersionFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(format!("{e}")).send();
            return redirect(EDITOR_PAGE);
        }
    };

    let result = restore_service(payload, &user, repo.get_ref(), now());
    flash_outcome(
        result,
        "Version restored.",
        "Failed to restore version.",
        "Version not found.",
    )
    .unwrap_or_else(|| redirect(EDITOR_PAGE))
}
