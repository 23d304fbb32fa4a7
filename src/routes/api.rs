use actix_web::{HttpResponse, Responder, get, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::api::{
    ApiV1TrainingsQueryParams, api_v1_training_capacity as api_v1_training_capacity_service,
    api_v1_trainings as api_v1_trainings_service,
};

#[get("/v1/trainings")]
pub async fn api_v1_trainings(
    params: web::Query<ApiV1TrainingsQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match api_v1_trainings_service(params.into_inner(), &user, repo.get_ref()) {
        Ok(trainings) => HttpResponse::Ok().json(trainings),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to list trainings: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/trainings/{training_id}/capacity")]
pub async fn api_v1_training_capacity(
    training_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match api_v1_training_capacity_service(training_id.into_inner(), &user, repo.get_ref()) {
        Ok(capacity) => HttpResponse::Ok().json(capacity),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to get training capacity: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
