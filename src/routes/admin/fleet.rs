use actix_web::{web, HttpResponse};

use crate::error::ApiResult;
use crate::models::vehicle::VehicleUpdate;
use crate::services::catalogue_service::{CatalogueFilter, CatalogueService};
use crate::state::AppState;

pub async fn list_vehicles(
    state: web::Data<AppState>,
    filter: web::Query<CatalogueFilter>,
) -> ApiResult<HttpResponse> {
    let cards = CatalogueService::list(&state.store, &filter).await?;
    Ok(HttpResponse::Ok().json(cards))
}

pub async fn get_vehicle(
    state: web::Data<AppState>,
    path: web::Path<u32>,
) -> ApiResult<HttpResponse> {
    let details = CatalogueService::details(&state.store, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(details))
}

pub async fn update_vehicle(
    state: web::Data<AppState>,
    path: web::Path<u32>,
    input: web::Json<VehicleUpdate>,
) -> ApiResult<HttpResponse> {
    let vehicle =
        CatalogueService::update_vehicle(&state.store, path.into_inner(), input.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(vehicle))
}

pub async fn delete_vehicle(
    state: web::Data<AppState>,
    path: web::Path<u32>,
) -> ApiResult<HttpResponse> {
    CatalogueService::delete_vehicle(&state.store, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
