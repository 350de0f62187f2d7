//! Session-backed creation wizards, one route set per form kind.

use actix_web::{web, HttpResponse};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::services::wizard::{Navigation, WizardError, WizardStatus};
use crate::services::wizard_forms::apply_patch;
use crate::services::wizard_sessions::{OwnedWizard, RegisteredForm, WizardView};
use crate::state::AppState;

#[derive(Serialize)]
struct NavigationResponse {
    navigation: Navigation,
    wizard: WizardView,
}

pub fn routes<F>(cfg: &mut web::ServiceConfig)
where
    F: RegisteredForm,
    F::Output: Serialize,
{
    cfg.route("", web::post().to(start::<F>))
        .route("/{id}", web::get().to(show::<F>))
        .route("/{id}", web::patch().to(update::<F>))
        .route("/{id}/next", web::post().to(next::<F>))
        .route("/{id}/previous", web::post().to(previous::<F>))
        .route("/{id}/back", web::post().to(back::<F>))
        .route("/{id}/cancel", web::post().to(cancel::<F>))
        .route("/{id}/submit", web::post().to(submit::<F>));
}

async fn locked<F: RegisteredForm>(state: &AppState, id: Uuid) -> ApiResult<OwnedWizard<F>> {
    F::sessions(&state.wizards).lock(id).await
}

pub async fn start<F: RegisteredForm>(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let view = F::sessions(&state.wizards).start().await?;
    Ok(HttpResponse::Created().json(view))
}

pub async fn show<F: RegisteredForm>(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let wizard = locked::<F>(&state, id).await?;
    Ok(HttpResponse::Ok().json(WizardView::of(id, &*wizard)))
}

/// Merges field values into the form of the current session.
pub async fn update<F: RegisteredForm>(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    patch: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let mut wizard = locked::<F>(&state, id).await?;
    apply_patch(wizard.handler_mut()?, patch.into_inner())?;
    Ok(HttpResponse::Ok().json(WizardView::of(id, &*wizard)))
}

async fn navigate<F: RegisteredForm>(
    state: &AppState,
    id: Uuid,
    action: fn(&mut OwnedWizard<F>) -> Result<Navigation, WizardError>,
) -> ApiResult<HttpResponse> {
    let mut wizard = locked::<F>(state, id).await?;
    let navigation = action(&mut wizard)?;
    let view = WizardView::of(id, &*wizard);
    drop(wizard);

    if view.status == WizardStatus::Cancelled {
        F::sessions(&state.wizards).remove(id).await;
    }
    Ok(HttpResponse::Ok().json(NavigationResponse {
        navigation,
        wizard: view,
    }))
}

pub async fn next<F: RegisteredForm>(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    navigate::<F>(&state, path.into_inner(), |w| w.next()).await
}

pub async fn previous<F: RegisteredForm>(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    navigate::<F>(&state, path.into_inner(), |w| w.previous()).await
}

pub async fn back<F: RegisteredForm>(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    navigate::<F>(&state, path.into_inner(), |w| w.back()).await
}

pub async fn cancel<F: RegisteredForm>(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    navigate::<F>(&state, path.into_inner(), |w| w.cancel()).await
}

/// Submits from the last step. The session is closed on success and kept
/// open on failure so the form can be corrected.
pub async fn submit<F>(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse>
where
    F: RegisteredForm,
    F::Output: Serialize,
{
    let id = path.into_inner();
    let mut wizard = locked::<F>(&state, id).await?;
    let created = wizard
        .submit(state.get_ref())
        .await
        .map_err(ApiError::from)?;
    let view = WizardView::of(id, &*wizard);
    drop(wizard);

    F::sessions(&state.wizards).remove(id).await;
    Ok(HttpResponse::Created().json(json!({
        "created": created,
        "wizard": view,
    })))
}
