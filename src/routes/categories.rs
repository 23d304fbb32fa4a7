use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::categories::{
    AddCategoryForm, AddCategoryFormPayload, DeleteCategoryForm, DeleteCategoryFormPayload,
    UpdateCategoryForm, UpdateCategoryFormPayload,
};
use crate::repository::DieselRepository;
use crate::routes::flash_outcome;
use crate::services::ServiceError;
use crate::services::categories::{
    add_category as add_category_service, delete_category as delete_category_service,
    show_categories as show_categories_service, update_category as update_category_service,
};

#[get("/admin/categories")]
pub async fn show_categories(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_categories_service(&user, repo.get_ref()) {
        Ok(categories) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "categories",
                &server_config.auth_service_url,
            );
            context.insert("categories", &categories);
            render_template(&tera, "categories/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(err) => {
            log::error!("Failed to render categories page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/categories")]
pub async fn add_category(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddCategoryForm>,
) -> impl Responder {
    let payload: AddCategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/admin/categories");
        }
    };

    let result = add_category_service(payload, &user, repo.get_ref());
    flash_outcome(
        result,
        "Category added.",
        "Failed to add category.",
        "Category not found.",
    )
    .unwrap_or_else(|| redirect("/admin/categories"))
}

#[post("/admin/categories/{category_id}/update")]
pub async fn update_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<UpdateCategoryForm>,
) -> impl Responder {
    let mut payload: UpdateCategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/admin/categories");
        }
    };

    payload.category.id = match category_id.into_inner().try_into() {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(format!("{e}")).send();
            return redirect("/admin/categories");
        }
    };

    let result = update_category_service(payload, &user, repo.get_ref());
    flash_outcome(
        result,
        "Category updated.",
        "Failed to update category.",
        "Category not found.",
    )
    .unwrap_or_else(|| redirect("/admin/categories"))
}

#[post("/admin/categories/{category_id}/delete")]
pub async fn delete_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<DeleteCategoryForm>,
) -> impl Responder {
    let mut payload: DeleteCategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/admin/categories");
        }
    };

    payload.category_id = match category_id.into_inner().try_into() {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(format!("{e}")).send();
            return redirect("/admin/categories");
        }
    };

    let result = delete_category_service(payload, &user, repo.get_ref());
    flash_outcome(
        result,
        "Category deleted. Its trainings keep their category reference.",
        "Failed to delete category.",
        "Category not found.",
    )
    .unwrap_or_else(|| redirect("/admin/categories"))
}
