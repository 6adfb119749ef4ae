use crate::{AppState, endpoint::PageForm, error::AppError, response::OutcomeResponse};
use analytics::{
    Dashboard, DashboardKind, OrganizationsResource, PagedResource, UsersResource, load_dashboard,
    rows::{OrganizationRow, UserRow},
};
use axum::{
    Form, Json,
    extract::{Path, State, rejection::FormRejection},
    http::Method,
};
use core_types::{PagedResult, QueryFailure, QueryOutcome};
use std::sync::Arc;

/// # GET /api/health
pub async fn health() -> &'static str {
    "OK"
}

/// # GET /api/dashboards/:name
/// Runs every widget query of the named dashboard concurrently. Widget failures are part of
/// the body; only an unknown name fails the request.
pub async fn get_dashboard(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Dashboard>, AppError> {
    let kind: DashboardKind = name.parse()?;
    let dashboard = load_dashboard(kind, &state.executor).await;
    Ok(Json(dashboard))
}

/// # ANY /resources/users
/// Expects a POST form with `page` and `limit`.
pub async fn users_page(
    State(state): State<Arc<AppState>>,
    method: Method,
    form: Result<Form<PageForm>, FormRejection>,
) -> OutcomeResponse<PagedResult<UserRow>> {
    let form = match read_form::<UsersResource>(&method, form) {
        Ok(form) => form,
        Err(failure) => return OutcomeResponse(QueryOutcome::Failure(failure)),
    };
    state.users.handle_submission(&method, &form).await.into()
}

/// # ANY /resources/orgs
pub async fn orgs_page(
    State(state): State<Arc<AppState>>,
    method: Method,
    form: Result<Form<PageForm>, FormRejection>,
) -> OutcomeResponse<PagedResult<OrganizationRow>> {
    let form = match read_form::<OrganizationsResource>(&method, form) {
        Ok(form) => form,
        Err(failure) => return OutcomeResponse(QueryOutcome::Failure(failure)),
    };
    state.orgs.handle_submission(&method, &form).await.into()
}

/// # Fallback
pub async fn not_found(method: Method, uri: axum::http::Uri) -> AppError {
    AppError::NotFound(format!("No route for {method} {uri}"))
}

/// Only a POST body is read. Any other method gets an empty form so the endpoint can answer
/// with its method failure.
fn read_form<R: PagedResource>(
    method: &Method,
    form: Result<Form<PageForm>, FormRejection>,
) -> Result<PageForm, QueryFailure> {
    if method != Method::POST {
        return Ok(PageForm::default());
    }
    match form {
        Ok(Form(form)) => Ok(form),
        Err(rejection) => {
            tracing::warn!(resource = R::NAME, error = %rejection, "Unreadable page form.");
            Err(QueryFailure::transport(rejection.body_text()))
        }
    }
}
