// src/api/routes.rs
use actix_web::web;
use super::handlers;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(handlers::health_check))
            .service(
                web::resource("/predict")
                    .app_data(web::JsonConfig::default().error_handler(handlers::json_error_handler))
                    .route(web::post().to(handlers::predict))
            )
    );
}
