use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::error::ApiResult;
use crate::models::payment::PaymentStatusUpdate;
use crate::services::billing_service::{BillingService, PaymentFilter, PaymentInput};
use crate::state::AppState;

pub async fn list_payments(
    state: web::Data<AppState>,
    filter: web::Query<PaymentFilter>,
) -> ApiResult<HttpResponse> {
    let listing =
        BillingService::list_payments(&state.store, &filter, Utc::now().date_naive()).await?;
    Ok(HttpResponse::Ok().json(listing))
}

pub async fn create_payment(
    state: web::Data<AppState>,
    input: web::Json<PaymentInput>,
) -> ApiResult<HttpResponse> {
    let payment =
        BillingService::create_payment(&state.store, input.into_inner(), Utc::now().date_naive())
            .await?;
    Ok(HttpResponse::Created().json(payment))
}

pub async fn update_status(
    state: web::Data<AppState>,
    path: web::Path<u32>,
    input: web::Json<PaymentStatusUpdate>,
) -> ApiResult<HttpResponse> {
    let payment =
        BillingService::update_payment_status(&state.store, path.into_inner(), input.status)
            .await?;
    Ok(HttpResponse::Ok().json(payment))
}
