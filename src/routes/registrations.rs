use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::domain::types::{AttendanceStatus, EnrollmentStatus};
use crate::forms::registrations::{
    AddRegistrationForm, AddRegistrationFormPayload, BulkActionForm, ChangeAttendanceForm,
    ChangeAttendanceFormPayload, ChangeStatusForm, ChangeStatusFormPayload,
    DeleteRegistrationForm, DeleteRegistrationFormPayload, RegistrationListQuery,
    RegistrationView,
};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{flash_outcome, now};
use crate::services::ServiceError;
use crate::services::bulk::BulkRequest;
use crate::services::projection::SortField;
use crate::services::registrations::{
    add_registration as add_registration_service,
    bulk_update_registrations as bulk_update_registrations_service,
    change_attendance as change_attendance_service,
    change_registration_status as change_registration_status_service,
    delete_registration as delete_registration_service,
    export_registrations as export_registrations_service,
    show_registrations as show_registrations_service,
};

const REGISTRATIONS_PAGE: &str = "/admin/registrations";

#[get("/admin/registrations")]
pub async fn show_registrations(
    query: web::Query<RegistrationListQuery>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query = query.into_inner();
    let view: RegistrationView = match query.try_into() {
        Ok(view) => view,
        Err(e) => {
            FlashMessage::error(format!("{e}")).send();
            return redirect(REGISTRATIONS_PAGE);
        }
    };

    match show_registrations_service(&view, &user, repo.get_ref()) {
        Ok(page) => {
            let statuses: Vec<_> = EnrollmentStatus::ALL
                .iter()
                .map(|s| (s.as_str(), s.label()))
                .collect();
            let attendance: Vec<_> = AttendanceStatus::ALL
                .iter()
                .map(|a| (a.as_str(), a.label()))
                .collect();
            let sort_fields: Vec<_> = SortField::ALL.iter().map(|f| f.as_str()).collect();

            let mut context = base_context(
                &flash_messages,
                &user,
                "registrations",
                &server_config.auth_service_url,
            );
            context.insert("registrations", &page.registrations);
            context.insert("total", &page.total);
            context.insert("trainings", &page.trainings);
            context.insert("categories", &page.categories);
            context.insert("bulk_actions", &page.bulk_actions);
            context.insert("statuses", &statuses);
            context.insert("attendance_statuses", &attendance);
            context.insert("sort_fields", &sort_fields);
            context.insert("search", &view.filters.search);
            context.insert("selected_status", &view.filters.status.map(|s| s.as_str()));
            context.insert(
                "selected_attendance",
                &view.filters.attendance.map(|a| a.as_str()),
            );
            context.insert(
                "selected_training",
                &view.filters.training_id.map(|id| id.get()),
            );
            context.insert(
                "selected_category",
                &view.filters.category_id.map(|id| id.get()),
            );
            context.insert("sort", view.sort.as_str());
            context.insert("direction", view.direction.as_str());
            render_template(&tera, "registrations/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(err) => {
            log::error!("Failed to render registrations page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/admin/registrations/export")]
pub async fn export_registrations(
    query: web::Query<RegistrationListQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let query = query.into_inner();
    let format = match query.export_format() {
        Ok(format) => format,
        Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
    };
    let view: RegistrationView = match query.try_into() {
        Ok(view) => view,
        Err(e) => return HttpResponse::BadRequest().body(format!("{e}")),
    };

    match export_registrations_service(&view, format, &user, repo.get_ref(), now().date()) {
        Ok(file) => HttpResponse::Ok()
            .append_header(("Content-Type", file.content_type))
            .append_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", file.file_name),
            ))
            .body(file.bytes),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(ServiceError::Form(message)) => HttpResponse::BadRequest().body(message),
        Err(err) => {
            log::error!("Failed to export registrations: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/registrations")]
pub async fn add_registration(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddRegistrationForm>,
) -> impl Responder {
    let payload: AddRegistrationFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(format!("{e}")).send();
            return redirect(REGISTRATIONS_PAGE);
        }
    };

    let result = add_registration_service(payload, &user, repo.get_ref(), now());
    flash_outcome(
        result,
        "Registration added.",
        "Failed to add registration.",
        "Training not found.",
    )
    .unwrap_or_else(|| redirect(REGISTRATIONS_PAGE))
}

#[post("/admin/registrations/{registration_id}/status")]
pub async fn change_registration_status(
    registration_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<ChangeStatusForm>,
) -> impl Responder {
    let mut payload: ChangeStatusFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(format!("{e}")).send();
            return redirect(REGISTRATIONS_PAGE);
        }
    };

    payload.registration_id = match registration_id.into_inner().try_into() {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(format!("{e}")).send();
            return redirect(REGISTRATIONS_PAGE);
        }
    };

    let result = change_registration_status_service(
        payload,
        &user,
        repo.get_ref(),
        &server_config.lifecycle,
        now(),
    );
    flash_outcome(
        result,
        "Status updated.",
        "Failed to update status.",
        "Registration not found.",
    )
    .unwrap_or_else(|| redirect(REGISTRATIONS_PAGE))
}

#[post("/admin/registrations/{registration_id}/attendance")]
pub async fn change_attendance(
    registration_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<ChangeAttendanceForm>,
) -> impl Responder {
    let mut payload: ChangeAttendanceFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(format!("{e}")).send();
            return redirect(REGISTRATIONS_PAGE);
        }
    };

    payload.registration_id = match registration_id.into_inner().try_into() {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(format!("{e}")).send();
            return redirect(REGISTRATIONS_PAGE);
        }
    };

    let result =
        change_attendance_service(payload, &user, repo.get_ref(), &server_config.lifecycle);
    flash_outcome(
        result,
        "Attendance updated.",
        "Failed to update attendance.",
        "Registration not found.",
    )
    .unwrap_or_else(|| redirect(REGISTRATIONS_PAGE))
}

#[post("/admin/registrations/{registration_id}/delete")]
pub async fn delete_registration(
    registration_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<DeleteRegistrationForm>,
) -> impl Responder {
    let mut payload: DeleteRegistrationFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(format!("{e}")).send();
            return redirect(REGISTRATIONS_PAGE);
        }
    };

    payload.registration_id = match registration_id.into_inner().try_into() {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(format!("{e}")).send();
            return redirect(REGISTRATIONS_PAGE);
        }
    };

    let result = delete_registration_service(payload, &user, repo.get_ref());
    flash_outcome(
        result,
        "Registration deleted.",
        "Failed to delete registration.",
        "Registration not found.",
    )
    .unwrap_or_else(|| redirect(REGISTRATIONS_PAGE))
}

/// Apply one action to the table selection. Redirecting back drops the
/// selection.
#[post("/admin/registrations/bulk")]
pub async fn bulk_update_registrations(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<BulkActionForm>,
) -> impl Responder {
    let request: BulkRequest = match form.try_into() {
        Ok(request) => request,
        Err(e) => {
            FlashMessage::error(format!("{e}")).send();
            return redirect(REGISTRATIONS_PAGE);
        }
    };
    let action = request.action;

    match bulk_update_registrations_service(
        request,
        &user,
        repo.get_ref(),
        &server_config.lifecycle,
        now(),
    ) {
        Ok(outcome) if outcome.success_count == outcome.requested => FlashMessage::success(format!(
            "{}: {} registrations updated.",
            action.label(),
            outcome.success_count
        ))
        .send(),
        Ok(outcome) => FlashMessage::warning(format!(
            "{}: {} of {} registrations updated.",
            action.label(),
            outcome.success_count,
            outcome.requested
        ))
        .send(),
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(ServiceError::Form(message)) => FlashMessage::error(message).send(),
        Err(err) => {
            log::error!("Failed to apply bulk action: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    redirect(REGISTRATIONS_PAGE)
}
