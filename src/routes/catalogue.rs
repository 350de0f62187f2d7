use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::ApiResult;
use crate::models::reservation::RentalOptions;
use crate::services::catalogue_service::{CatalogueFilter, CatalogueService};
use crate::services::pricing_service::PricingService;
use crate::services::review_service::{ReviewFilter, ReviewService};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QuoteInput {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub options: RentalOptions,
}

pub async fn list_vehicles(
    state: web::Data<AppState>,
    filter: web::Query<CatalogueFilter>,
) -> ApiResult<HttpResponse> {
    let cards = CatalogueService::list(&state.store, &filter).await?;
    Ok(HttpResponse::Ok().json(cards))
}

pub async fn vehicle_details(
    state: web::Data<AppState>,
    path: web::Path<u32>,
) -> ApiResult<HttpResponse> {
    let details = CatalogueService::details(&state.store, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(details))
}

/// Live price for a prospective booking. Dates are not checked against today.
pub async fn quote(
    state: web::Data<AppState>,
    path: web::Path<u32>,
    input: web::Json<QuoteInput>,
) -> ApiResult<HttpResponse> {
    let vehicle = CatalogueService::vehicle(&state.store, path.into_inner()).await?;
    let quote = PricingService::quote(
        vehicle.daily_rate,
        input.start_date,
        input.end_date,
        &input.options,
    )?;
    Ok(HttpResponse::Ok().json(quote))
}

pub async fn list_reviews(
    state: web::Data<AppState>,
    filter: web::Query<ReviewFilter>,
) -> ApiResult<HttpResponse> {
    let listing = ReviewService::list(&state.store, &filter).await?;
    Ok(HttpResponse::Ok().json(listing))
}
