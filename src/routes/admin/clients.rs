use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::error::ApiResult;
use crate::services::client_service::{ClientFilter, ClientService, ClientView};
use crate::state::AppState;

pub async fn list_clients(
    state: web::Data<AppState>,
    filter: web::Query<ClientFilter>,
) -> ApiResult<HttpResponse> {
    let listing = ClientService::list(&state.store, &filter, Utc::now().date_naive()).await?;
    Ok(HttpResponse::Ok().json(listing))
}

pub async fn get_client(
    state: web::Data<AppState>,
    path: web::Path<u32>,
) -> ApiResult<HttpResponse> {
    let client = ClientService::profile(&state.store, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ClientView::from(client)))
}
