use actix_web::{web, HttpResponse};

use crate::error::ApiResult;
use crate::models::agency::AgencyUpdate;
use crate::models::employee::EmployeeUpdate;
use crate::services::staff_service::{AgencyFilter, EmployeeFilter, StaffService};
use crate::state::AppState;

pub async fn list_employees(
    state: web::Data<AppState>,
    filter: web::Query<EmployeeFilter>,
) -> ApiResult<HttpResponse> {
    let employees = StaffService::list_employees(&state.store, &filter).await?;
    Ok(HttpResponse::Ok().json(employees))
}

pub async fn get_employee(
    state: web::Data<AppState>,
    path: web::Path<u32>,
) -> ApiResult<HttpResponse> {
    let employee = StaffService::employee(&state.store, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(employee))
}

pub async fn update_employee(
    state: web::Data<AppState>,
    path: web::Path<u32>,
    input: web::Json<EmployeeUpdate>,
) -> ApiResult<HttpResponse> {
    let employee =
        StaffService::update_employee(&state.store, path.into_inner(), input.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(employee))
}

pub async fn delete_employee(
    state: web::Data<AppState>,
    path: web::Path<u32>,
) -> ApiResult<HttpResponse> {
    StaffService::delete_employee(&state.store, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn list_agencies(
    state: web::Data<AppState>,
    filter: web::Query<AgencyFilter>,
) -> ApiResult<HttpResponse> {
    let agencies = StaffService::list_agencies(&state.store, &filter).await?;
    Ok(HttpResponse::Ok().json(agencies))
}

pub async fn get_agency(
    state: web::Data<AppState>,
    path: web::Path<u32>,
) -> ApiResult<HttpResponse> {
    let agency = StaffService::agency(&state.store, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(agency))
}

pub async fn update_agency(
    state: web::Data<AppState>,
    path: web::Path<u32>,
    input: web::Json<AgencyUpdate>,
) -> ApiResult<HttpResponse> {
    let agency =
        StaffService::update_agency(&state.store, path.into_inner(), input.into_inner()).await?;
    Ok(HttpResponse::Ok().json(agency))
}

pub async fn delete_agency(
    state: web::Data<AppState>,
    path: web::Path<u32>,
) -> ApiResult<HttpResponse> {
    StaffService::delete_agency(&state.store, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
