pub mod health;
pub mod index;
pub mod metrics;
pub mod swagger;
pub mod users;

use crate::utils::error::AppError;
use actix_web::web;

/// Registers every route; shared by the server and the router tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Malformed JSON bodies answer with the same {"error": ..} shape as other failures
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            log::warn!("⚠️  Rejected JSON body: {}", err);
            AppError::InvalidRequest(err.to_string()).into()
        }))
        // Health check
        .route("/health", web::get().to(health::health_check))
        // Metrics
        .route("/metrics", web::get().to(metrics::get_metrics))
        // HTML user list
        .route("/", web::get().to(index::index))
        .service(
            web::resource("/users")
                .route(web::get().to(users::list_users))
                .route(web::post().to(users::create_user)),
        )
        .service(
            web::resource("/users/{id}")
                .route(web::get().to(users::get_user))
                .route(web::put().to(users::update_user))
                .route(web::patch().to(users::update_user))
                .route(web::delete().to(users::delete_user)),
        )
        // Legacy delete route used by older front ends
        .route("/users/{id}/delete", web::delete().to(users::delete_user));
}
