use actix_web::{error::InternalError, web, HttpResponse};
use serde_json::json;

use crate::error::ApiError;
use crate::middleware::auth::AuthMiddleware;
use crate::middleware::role_auth::RequireRole;
use crate::models::user::UserRole;

pub mod admin;
pub mod auth;
pub mod catalogue;
pub mod client;
pub mod health;

/// Malformed bodies and query strings get the same `{"error": ..}` shape as
/// every other rejection.
fn extractor_error(message: String) -> actix_web::Error {
    let body = json!({ "error": message });
    InternalError::from_response(
        ApiError::validation(message),
        HttpResponse::BadRequest().json(body),
    )
    .into()
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default().error_handler(|err, _req| extractor_error(err.to_string())),
    )
    .app_data(
        web::QueryConfig::default().error_handler(|err, _req| extractor_error(err.to_string())),
    )
    .app_data(
        web::PathConfig::default().error_handler(|err, _req| extractor_error(err.to_string())),
    )
    .route("/health", web::get().to(health::health_check))
    .service(
        web::scope("/api")
            .service(
                web::scope("/auth")
                    .route("/signup", web::post().to(auth::signup))
                    .route("/signin", web::post().to(auth::signin))
                    .service(
                        web::scope("")
                            .wrap(AuthMiddleware)
                            .route("/session", web::get().to(auth::user_session)),
                    ),
            )
            .route("/vehicles", web::get().to(catalogue::list_vehicles))
            .route("/vehicles/{id}", web::get().to(catalogue::vehicle_details))
            .route("/vehicles/{id}/quote", web::post().to(catalogue::quote))
            .route("/reviews", web::get().to(catalogue::list_reviews))
            .service(
                web::scope("/client")
                    .wrap(RequireRole::new(UserRole::Client))
                    .wrap(AuthMiddleware)
                    .route("/dashboard", web::get().to(client::dashboard))
                    .route("/profile", web::get().to(client::get_profile))
                    .route("/profile", web::put().to(client::update_profile))
                    .route("/reservations", web::get().to(client::list_reservations))
                    .route("/reservations", web::post().to(client::create_reservation))
                    .route(
                        "/reservations/{id}",
                        web::get().to(client::reservation_details),
                    )
                    .route(
                        "/reservations/{id}/review",
                        web::post().to(client::add_review),
                    )
                    .route("/invoices", web::get().to(client::invoices)),
            )
            .configure(admin::config),
    );
}
