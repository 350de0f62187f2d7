use actix_web::{web, HttpResponse};

use crate::error::ApiResult;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::user::{SigninInput, SignupInput};
use crate::services::account_service::AccountService;
use crate::state::AppState;

pub async fn signup(
    state: web::Data<AppState>,
    input: web::Json<SignupInput>,
) -> ApiResult<HttpResponse> {
    let token = AccountService::signup(&state.store, &state.config, input.into_inner()).await?;
    Ok(HttpResponse::Created().json(token))
}

pub async fn signin(
    state: web::Data<AppState>,
    input: web::Json<SigninInput>,
) -> ApiResult<HttpResponse> {
    let token = AccountService::signin(&state.store, &state.config, input.into_inner()).await?;
    Ok(HttpResponse::Ok().json(token))
}

pub async fn user_session(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    let session = AccountService::session(&state.store, user.user_id).await?;
    Ok(HttpResponse::Ok().json(session))
}
