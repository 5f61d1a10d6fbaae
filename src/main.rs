mod api;
mod config;
mod database;
mod middleware;
mod models;
mod routes;
mod services;
mod state;
mod utils;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::database::{DocumentStore, MemoryStore, MongoDB};
use crate::state::AppState;
use crate::utils::UploadStore;

fn startup_error(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(startup_error)?;

    log::info!("🚀 Starting Back Office Service...");

    let store: Arc<dyn DocumentStore> = if config.database_url.starts_with("memory://") {
        log::warn!("⚠️  Using the in-memory store, data is lost on restart");
        Arc::new(MemoryStore::new())
    } else {
        // Initialize MongoDB connection
        let db = MongoDB::new(&config.database_url)
            .await
            .map_err(startup_error)?;
        log::info!("✅ MongoDB connected successfully");
        Arc::new(db)
    };

    let uploads = UploadStore::new(&config.upload_dir, config.max_upload_bytes);
    uploads.ensure_dirs().await?;
    log::info!("📁 Uploads stored under {}", uploads.root().display());

    let mailer = services::mail_service::build_mailer(&config.mail).map_err(startup_error)?;

    let state = web::Data::new(AppState {
        store,
        mailer,
        uploads,
        auth: config.auth.clone(),
        organization: config.mail.organization.clone(),
    });

    let host = config.host.clone();
    let port = config.port;
    let origins = config.cors_origins.clone();

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
            .expose_headers(vec![header::CONTENT_TYPE])
            .supports_credentials()
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(Logger::default())
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi))
            .configure(|cfg| routes::configure(cfg, state.clone()))
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
