use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::error::ApiResult;
use crate::services::report_service::{ReportQuery, ReportService};
use crate::state::AppState;

pub async fn dashboard(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let dashboard = ReportService::dashboard(&state.store).await?;
    Ok(HttpResponse::Ok().json(dashboard))
}

pub async fn report(
    state: web::Data<AppState>,
    query: web::Query<ReportQuery>,
) -> ApiResult<HttpResponse> {
    let report =
        ReportService::report(&state.store, query.period, Utc::now().date_naive()).await?;
    Ok(HttpResponse::Ok().json(report))
}
