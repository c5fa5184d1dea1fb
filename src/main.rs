mod api;
mod config;
mod middleware;
mod models;
mod seeds;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = config::AppConfig::from_env();

    log::info!("🚀 Starting User Directory...");
    log::info!("🪣 Bucket: {} ({})", config.s3_bucket, config.aws_region);

    // Backend is chosen once and never swapped
    let backend = services::select_backend(&config).await;
    let backend_data: web::Data<dyn services::UserBackend> = web::Data::from(backend);
    let config_data = web::Data::new(config.clone());

    log::info!("🌐 Server starting on {}:{} ({} mode)", config.host, config.port, config.mode_name());
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", config.host, config.port);

    let max_upload_bytes = config.max_upload_bytes;
    let allowed_origins = config.cors_allowed_origins.clone();

    HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(backend_data.clone())
            .app_data(config_data.clone())
            // Form submissions carry the profile image
            .app_data(web::PayloadConfig::new(max_upload_bytes))
            .app_data(web::FormConfig::default().limit(max_upload_bytes))
            .wrap(cors)
            .wrap(middleware::RequestMetrics)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi)
            )
            .configure(api::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
