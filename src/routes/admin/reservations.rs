use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::error::ApiResult;
use crate::models::reservation::StatusUpdate;
use crate::services::reservation_service::{ReservationFilter, ReservationService};
use crate::state::AppState;

pub async fn list_reservations(
    state: web::Data<AppState>,
    filter: web::Query<ReservationFilter>,
) -> ApiResult<HttpResponse> {
    let listing =
        ReservationService::list(&state.store, &filter, Utc::now().date_naive()).await?;
    Ok(HttpResponse::Ok().json(listing))
}

pub async fn update_status(
    state: web::Data<AppState>,
    path: web::Path<u32>,
    input: web::Json<StatusUpdate>,
) -> ApiResult<HttpResponse> {
    let reservation =
        ReservationService::update_status(&state.store, path.into_inner(), input.status).await?;
    Ok(HttpResponse::Ok().json(reservation))
}
