//! HTTP request handlers for the diária ledger API.
//!
//! This module contains the handler functions for all API endpoints.
//! Every handler resolves the acting user from the `x-username` and
//! `x-password-hash` headers before touching the engine.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::de::DeserializeOwned;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{CompanyDraft, DriverDraft, User};

use super::request::{ShiftQueryParams, ShiftRequest};
use super::response::{ApiError, ApiErrorResponse, ShiftListResponse};
use super::state::AppState;

/// Header carrying the acting username.
pub const USERNAME_HEADER: &str = "x-username";

/// Header carrying the acting user's password hash.
pub const PASSWORD_HASH_HEADER: &str = "x-password-hash";

type ApiResult = Result<Response, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/companies", get(list_companies).post(register_company))
        .route("/companies/all", get(list_all_companies))
        .route("/companies/:name", put(update_company))
        .route("/companies/:name/toggle", post(toggle_company))
        .route("/drivers", get(list_drivers).post(register_driver))
        .route("/drivers/all", get(list_all_drivers))
        .route("/drivers/:name", put(update_driver))
        .route("/drivers/:name/toggle", post(toggle_driver))
        .route("/shifts", get(list_shifts).post(register_shift))
        .route("/shifts/export", get(export_shifts))
        .with_state(state)
}

/// Resolves the acting user from the request headers.
fn current_user(
    state: &AppState,
    headers: &HeaderMap,
    correlation_id: Uuid,
) -> Result<User, ApiErrorResponse> {
    let header_text = |name: &str| headers.get(name).and_then(|value| value.to_str().ok());

    let user = match (header_text(USERNAME_HEADER), header_text(PASSWORD_HASH_HEADER)) {
        (Some(username), Some(hash)) => state.users().authenticate(username, hash),
        _ => None,
    };

    user.cloned().ok_or_else(|| {
        warn!(correlation_id = %correlation_id, "Unauthenticated request");
        ApiErrorResponse::unauthorized()
    })
}

/// Maps an engine error to a response, logging it against the request.
fn reject(correlation_id: Uuid, operation: &str, err: EngineError) -> ApiErrorResponse {
    warn!(
        correlation_id = %correlation_id,
        operation = %operation,
        error = %err,
        "Request rejected"
    );
    err.into()
}

/// Unwraps a JSON body, turning rejections into validation errors.
fn json_body<T: DeserializeOwned>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: Uuid,
) -> Result<T, ApiErrorResponse> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(ApiErrorResponse::bad_request(error))
}

/// Unwraps query parameters, turning rejections into validation errors.
fn query_params(
    params: Result<Query<ShiftQueryParams>, QueryRejection>,
    correlation_id: Uuid,
) -> Result<ShiftQueryParams, ApiErrorResponse> {
    params.map(|Query(p)| p).map_err(|rejection| {
        warn!(
            correlation_id = %correlation_id,
            error = %rejection.body_text(),
            "Query string error"
        );
        ApiErrorResponse::bad_request(ApiError::validation_error(rejection.body_text()))
    })
}

// =============================================================================
// Companies
// =============================================================================

/// Handler for GET /companies.
async fn list_companies(State(state): State<AppState>, headers: HeaderMap) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let user = current_user(&state, &headers, correlation_id)?;

    let companies = state
        .engine()
        .companies_for(&user)
        .map_err(|err| reject(correlation_id, "list_companies", err))?;
    Ok(Json(companies).into_response())
}

/// Handler for GET /companies/all.
async fn list_all_companies(State(state): State<AppState>, headers: HeaderMap) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let user = current_user(&state, &headers, correlation_id)?;

    let companies = state
        .engine()
        .all_companies(&user)
        .map_err(|err| reject(correlation_id, "list_all_companies", err))?;
    Ok(Json(companies).into_response())
}

/// Handler for POST /companies.
async fn register_company(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CompanyDraft>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let user = current_user(&state, &headers, correlation_id)?;
    let draft = json_body(payload, correlation_id)?;

    let company = state
        .engine()
        .register_company(&user, draft, state.audit())
        .map_err(|err| reject(correlation_id, "register_company", err))?;
    info!(
        correlation_id = %correlation_id,
        company = %company.name,
        username = %user.username,
        "Company registered"
    );
    Ok((StatusCode::CREATED, Json(company)).into_response())
}

/// Handler for PUT /companies/:name.
async fn update_company(
    State(state): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<CompanyDraft>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let user = current_user(&state, &headers, correlation_id)?;
    let draft = json_body(payload, correlation_id)?;

    let company = state
        .engine()
        .update_company(&user, &name, draft, state.audit())
        .map_err(|err| reject(correlation_id, "update_company", err))?;
    Ok(Json(company).into_response())
}

/// Handler for POST /companies/:name/toggle.
async fn toggle_company(
    State(state): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let user = current_user(&state, &headers, correlation_id)?;

    let company = state
        .engine()
        .toggle_company(&user, &name, state.audit())
        .map_err(|err| reject(correlation_id, "toggle_company", err))?;
    Ok(Json(company).into_response())
}

// =============================================================================
// Drivers
// =============================================================================

/// Handler for GET /drivers.
async fn list_drivers(State(state): State<AppState>, headers: HeaderMap) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    current_user(&state, &headers, correlation_id)?;

    let drivers = state
        .engine()
        .active_drivers()
        .map_err(|err| reject(correlation_id, "list_drivers", err))?;
    Ok(Json(drivers).into_response())
}

/// Handler for GET /drivers/all.
async fn list_all_drivers(State(state): State<AppState>, headers: HeaderMap) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let user = current_user(&state, &headers, correlation_id)?;

    let drivers = state
        .engine()
        .all_drivers(&user)
        .map_err(|err| reject(correlation_id, "list_all_drivers", err))?;
    Ok(Json(drivers).into_response())
}

/// Handler for POST /drivers.
async fn register_driver(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<DriverDraft>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let user = current_user(&state, &headers, correlation_id)?;
    let draft = json_body(payload, correlation_id)?;

    let driver = state
        .engine()
        .register_driver(&user, draft, state.audit())
        .map_err(|err| reject(correlation_id, "register_driver", err))?;
    info!(
        correlation_id = %correlation_id,
        driver = %driver.name,
        username = %user.username,
        "Driver registered"
    );
    Ok((StatusCode::CREATED, Json(driver)).into_response())
}

/// Handler for PUT /drivers/:name.
async fn update_driver(
    State(state): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<DriverDraft>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let user = current_user(&state, &headers, correlation_id)?;
    let draft = json_body(payload, correlation_id)?;

    let driver = state
        .engine()
        .update_driver(&user, &name, draft, state.audit())
        .map_err(|err| reject(correlation_id, "update_driver", err))?;
    Ok(Json(driver).into_response())
}

/// Handler for POST /drivers/:name/toggle.
async fn toggle_driver(
    State(state): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let user = current_user(&state, &headers, correlation_id)?;

    let driver = state
        .engine()
        .toggle_driver(&user, &name, state.audit())
        .map_err(|err| reject(correlation_id, "toggle_driver", err))?;
    Ok(Json(driver).into_response())
}

// =============================================================================
// Shifts
// =============================================================================

/// Handler for POST /shifts.
///
/// Resolves the shift's amounts and appends it to the ledger.
async fn register_shift(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ShiftRequest>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let user = current_user(&state, &headers, correlation_id)?;
    let request = json_body(payload, correlation_id)?;

    let candidate = request
        .into_candidate()
        .map_err(|err| reject(correlation_id, "register_shift", err))?;
    let record = state
        .engine()
        .register_shift(&user, candidate, state.audit())
        .map_err(|err| reject(correlation_id, "register_shift", err))?;

    info!(
        correlation_id = %correlation_id,
        company = %record.company_name,
        driver = %record.driver_name,
        registered_by = %record.registered_by,
        amount_charged = %record.amount_charged,
        "Shift registered"
    );
    Ok((StatusCode::CREATED, Json(record.listing())).into_response())
}

/// Handler for GET /shifts.
async fn list_shifts(
    State(state): State<AppState>,
    headers: HeaderMap,
    params: Result<Query<ShiftQueryParams>, QueryRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let user = current_user(&state, &headers, correlation_id)?;
    let query = query_params(params, correlation_id)?
        .into_query()
        .map_err(|err| reject(correlation_id, "list_shifts", err))?;

    let report = state
        .engine()
        .shifts_for(&user, &query)
        .map_err(|err| reject(correlation_id, "list_shifts", err))?;

    info!(
        correlation_id = %correlation_id,
        username = %user.username,
        shift_count = report.totals.shift_count,
        "Shifts listed"
    );
    Ok(Json(ShiftListResponse {
        shifts: report.records.iter().map(|r| r.listing()).collect(),
        totals: report.totals,
    })
    .into_response())
}

/// Handler for GET /shifts/export.
///
/// Responds with a CSV attachment, or 404 when nothing matches.
async fn export_shifts(
    State(state): State<AppState>,
    headers: HeaderMap,
    params: Result<Query<ShiftQueryParams>, QueryRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let user = current_user(&state, &headers, correlation_id)?;
    let query = query_params(params, correlation_id)?
        .into_query()
        .map_err(|err| reject(correlation_id, "export_shifts", err))?;

    let export = state
        .engine()
        .export_for(&user, &query, state.audit())
        .map_err(|err| reject(correlation_id, "export_shifts", err))?;

    info!(
        correlation_id = %correlation_id,
        username = %user.username,
        rows = export.rows,
        file_name = %export.file_name,
        "Shifts exported"
    );
    let disposition = format!("attachment; filename=\"{}\"", export.file_name);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, export.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.content,
    )
        .into_response())
}
