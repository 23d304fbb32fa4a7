use std::env;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use config::{Config, Environment, File};
use pushkind_common::db::establish_connection_pool;
use pushkind_common::models::config::CommonServerConfig;
use tera::Tera;

use pushkind_trainings::models::config::ServerConfig;
use pushkind_trainings::repository::DieselRepository;
use pushkind_trainings::routes::api::{api_v1_training_capacity, api_v1_trainings};
use pushkind_trainings::routes::categories::{
    add_category, delete_category, show_categories, update_category,
};
use pushkind_trainings::routes::main::{
    index, not_assigned, register_for_training, show_training,
};
use pushkind_trainings::routes::pages::{
    edit_support, restore_support_version, save_support, show_support,
};
use pushkind_trainings::routes::registrations::{
    add_registration, bulk_update_registrations, change_attendance, change_registration_status,
    delete_registration, export_registrations, show_registrations,
};
use pushkind_trainings::routes::resources::{
    add_resource, delete_resource, show_resources, update_resource,
};
use pushkind_trainings::routes::trainings::{
    add_training, delete_training, show_trainings, update_training,
};
use pushkind_trainings::routes::updates::show_updates;

fn load_config() -> Result<ServerConfig, config::ConfigError> {
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    Config::builder()
        .add_source(File::with_name("config/default"))
        .add_source(File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(Environment::with_prefix("APP"))
        .build()?
        .try_deserialize()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let server_config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let common_config = CommonServerConfig {
        auth_service_url: server_config.auth_service_url.clone(),
        secret: server_config.secret.clone(),
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let tera = match Tera::new(&server_config.templates_dir) {
        Ok(t) => t,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };

    let secret_key = Key::derive_from(server_config.secret.as_bytes());
    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Starting trainings service on {}:{}",
        bind_address.0,
        bind_address.1
    );

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false)
                    .cookie_domain(Some(format!(".{}", server_config.domain)))
                    .build(),
            )
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(
                web::scope("/api")
                    .service(api_v1_trainings)
                    .service(api_v1_training_capacity),
            )
            .service(index)
            .service(not_assigned)
            .service(show_training)
            .service(register_for_training)
            .service(show_resources)
            .service(show_support)
            .service(show_categories)
            .service(add_category)
            .service(update_category)
            .service(delete_category)
            .service(show_trainings)
            .service(add_training)
            .service(update_training)
            .service(delete_training)
            .service(export_registrations)
            .service(show_registrations)
            .service(add_registration)
            .service(bulk_update_registrations)
            .service(change_registration_status)
            .service(change_attendance)
            .service(delete_registration)
            .service(show_updates)
            .service(add_resource)
            .service(update_resource)
            .service(delete_resource)
            .service(edit_support)
            .service(save_support)
            .service(restore_support_version)
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(common_config.clone()))
            .app_data(web::Data::new(server_config.clone()))
            .app_data(web::Data::new(tera.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
