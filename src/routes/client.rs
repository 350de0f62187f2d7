use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::error::ApiResult;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::client::ClientProfileUpdate;
use crate::models::reservation::ReservationInput;
use crate::models::review::ReviewInput;
use crate::services::billing_service::{BillingService, InvoiceFilter};
use crate::services::client_service::ClientService;
use crate::services::reservation_service::{ClientReservationFilter, ReservationService};
use crate::services::review_service::ReviewService;
use crate::state::AppState;

pub async fn dashboard(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    let client_id = user.require_client()?;
    let dashboard = ClientService::dashboard(&state.store, client_id).await?;
    Ok(HttpResponse::Ok().json(dashboard))
}

pub async fn list_reservations(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    filter: web::Query<ClientReservationFilter>,
) -> ApiResult<HttpResponse> {
    let client_id = user.require_client()?;
    let reservations =
        ReservationService::list_for_client(&state.store, client_id, &filter).await?;
    Ok(HttpResponse::Ok().json(reservations))
}

pub async fn reservation_details(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<u32>,
) -> ApiResult<HttpResponse> {
    let client_id = user.require_client()?;
    let details =
        ReservationService::details_for_client(&state.store, client_id, path.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(details))
}

pub async fn create_reservation(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    input: web::Json<ReservationInput>,
) -> ApiResult<HttpResponse> {
    let client_id = user.require_client()?;
    let today = Utc::now().date_naive();
    let reservation =
        ReservationService::create(&state.store, client_id, input.into_inner(), today).await?;
    Ok(HttpResponse::Created().json(reservation))
}

pub async fn add_review(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<u32>,
    input: web::Json<ReviewInput>,
) -> ApiResult<HttpResponse> {
    let client_id = user.require_client()?;
    let today = Utc::now().date_naive();
    let review = ReviewService::add(
        &state.store,
        client_id,
        path.into_inner(),
        input.into_inner(),
        today,
    )
    .await?;
    Ok(HttpResponse::Created().json(review))
}

pub async fn invoices(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    filter: web::Query<InvoiceFilter>,
) -> ApiResult<HttpResponse> {
    let client_id = user.require_client()?;
    let invoices = BillingService::invoices_for_client(&state.store, client_id, &filter).await?;
    Ok(HttpResponse::Ok().json(invoices))
}

pub async fn get_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    let client_id = user.require_client()?;
    let client = ClientService::profile(&state.store, client_id).await?;
    Ok(HttpResponse::Ok().json(client))
}

pub async fn update_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    input: web::Json<ClientProfileUpdate>,
) -> ApiResult<HttpResponse> {
    let client_id = user.require_client()?;
    let client =
        ClientService::update_profile(&state.store, client_id, input.into_inner()).await?;
    Ok(HttpResponse::Ok().json(client))
}
