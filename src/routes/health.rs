use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    environment: String,
    version: &'static str,
    store: StoreStatus,
}

#[derive(Serialize)]
struct StoreStatus {
    status: &'static str,
    details: Option<String>,
}

pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store = match state.store.vehicles.count().await {
        Ok(vehicles) => StoreStatus {
            status: "ok",
            details: Some(format!("{} vehicles loaded", vehicles)),
        },
        Err(e) => {
            log::error!("Store health check failed: {}", e);
            StoreStatus {
                status: "error",
                details: Some(e.to_string()),
            }
        }
    };

    HttpResponse::Ok().json(HealthStatus {
        status: if store.status == "ok" { "ok" } else { "degraded" },
        environment: state.config.environment.clone(),
        version: env!("CARGO_PKG_VERSION"),
        store,
    })
}
