use std::time::Duration;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::FlashMessagesFramework;
use actix_web_flash_messages::storage::CookieMessageStore;
use tera::Tera;

use backoffice::api::RestBackend;
use backoffice::api::client::RestClient;
use backoffice::fetch::FetchState;
use backoffice::models::config::ServerConfig;
use backoffice::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let server_config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            return Err(std::io::Error::other(e));
        }
    };

    let tera = match Tera::new("templates/**/*.html") {
        Ok(tera) => tera,
        Err(e) => {
            log::error!("Failed to load templates: {e}");
            return Err(std::io::Error::other(e));
        }
    };

    let client = match RestClient::new(
        &server_config.api_base_url,
        Duration::from_secs(server_config.request_timeout_secs),
    ) {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to build API client: {e}");
            return Err(std::io::Error::other(e));
        }
    };
    let backend = RestBackend::new(client);

    // One fetch state for all workers, so cache invalidation from one
    // request is seen by every other.
    let fetch_state = web::Data::new(FetchState::new(&server_config));

    let secret_key = match &server_config.session_key {
        Some(key) if key.len() >= 64 => Key::from(key.as_bytes()),
        Some(key) => {
            log::warn!(
                "Session key is {} bytes, need at least 64. Generating a random key.",
                key.len()
            );
            Key::generate()
        }
        None => {
            log::warn!("No session key configured, sessions will not survive a restart.");
            Key::generate()
        }
    };

    let bind_address = (server_config.host.clone(), server_config.port);
    log::info!(
        "Starting server at http://{}:{}",
        server_config.host,
        server_config.port
    );

    HttpServer::new(move || {
        let session_middleware =
            SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                .cookie_secure(false)
                .cookie_http_only(true)
                .build();
        let message_store = CookieMessageStore::builder(secret_key.clone()).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();

        App::new()
            .wrap(IdentityMiddleware::default())
            .wrap(session_middleware)
            .wrap(message_framework)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(backend.clone()))
            .app_data(web::Data::new(server_config.clone()))
            .app_data(fetch_state.clone())
            .service(Files::new("/assets", "./assets"))
            .service(routes::main::index)
            .service(routes::main::analytics)
            .service(routes::main::settings)
            .service(routes::main::toasts)
            .service(routes::main::demo_toast)
            .service(routes::auth::show_login)
            .service(routes::auth::login)
            .service(routes::auth::show_register)
            .service(routes::auth::register)
            .service(routes::auth::logout)
            // The table fragments must be registered before the `{id}` routes.
            .service(routes::categories::categories_table)
            .service(routes::categories::show_categories)
            .service(routes::categories::show_category)
            .service(routes::categories::add_category)
            .service(routes::categories::update_category)
            .service(routes::categories::delete_category)
            .service(routes::categories::restore_category)
            .service(routes::categories::toggle_category_status)
            .service(routes::users::users_table)
            .service(routes::users::show_users)
            .service(routes::users::show_user)
            .service(routes::users::add_user)
            .service(routes::users::update_user)
            .service(routes::users::delete_user)
            .service(routes::users::restore_user)
            .service(routes::users::toggle_user_status)
            .service(routes::users::update_user_role)
            .default_service(web::to(routes::main::not_found))
    })
    .bind(bind_address)?
    .run()
    .await
}
