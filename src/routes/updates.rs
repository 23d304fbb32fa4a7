use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::updates::show_updates as show_updates_service;

#[get("/admin/updates")]
pub async fn show_updates(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_updates_service(&user, repo.get_ref()) {
        Ok(updates) => {
            let mut context =
                base_context(&flash_messages, &user, "updates", &server_config.auth_service_url);
            context.insert("updates", &updates);
            render_template(&tera, "updates/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(err) => {
            log::error!("Failed to render activity feed: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
