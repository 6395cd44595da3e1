//! Endpoints for each kind of health measurement.
//!
//! Every measurement exposes the same pair of operations under its own path:
//! `POST` logs an entry for the session user and `GET` pages through the
//! user's history.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Json, Query, State},
    http::StatusCode,
    Extension,
};
use serde_json::Value;
use tracing::instrument;

use health_log_domain::auth::UserInfo;
use health_log_domain::entities::{
    BloodGlucoseEntry, BloodPressureEntry, InsulinEntry, LogBloodGlucoseRequest,
    LogBloodPressureRequest, LogInsulinRequest, LogMealRequest, LogWaterRequest,
    LogWeightRequest, MealEntry, WaterEntry, WeightEntry,
};

use crate::api::error::{ApiError, ErrorBody};
use crate::api::handlers::entries::{
    create_entry, entry_history, BloodPressurePage, GlucosePage, HistoryQueryParams, InsulinPage,
    MealPage, PaginatedResponse, WaterPage, WeightPage,
};
use crate::api::state::AppState;

pub const GLUCOSE_PATH: &str = "/api/v1/glucose";

/// Log a blood glucose reading
#[utoipa::path(
    post,
    path = "/api/v1/glucose",
    request_body = LogBloodGlucoseRequest,
    responses(
        (status = 201, description = "Entry stored", body = BloodGlucoseEntry),
        (status = 400, description = "Malformed JSON, failed validation or rejected by the store", body = ErrorBody),
        (status = 401, description = "Missing or invalid session", body = ErrorBody),
        (status = 403, description = "Payload names a different user", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    security(
        ("bearer" = [])
    ),
    tag = "glucose"
)]
#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn log_glucose(
    State(state): State<AppState>,
    Extension(user): Extension<UserInfo>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<BloodGlucoseEntry>), ApiError> {
    create_entry::<LogBloodGlucoseRequest>(state.glucose.as_ref(), &user, body, GLUCOSE_PATH).await
}

/// Page through the caller's blood glucose reading history
#[utoipa::path(
    get,
    path = "/api/v1/glucose",
    params(
        HistoryQueryParams
    ),
    responses(
        (status = 200, description = "History retrieved", body = GlucosePage),
        (status = 400, description = "Invalid query", body = ErrorBody),
        (status = 401, description = "Missing or invalid session", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    security(
        ("bearer" = [])
    ),
    tag = "glucose"
)]
#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn glucose_history(
    State(state): State<AppState>,
    Extension(user): Extension<UserInfo>,
    params: Result<Query<HistoryQueryParams>, QueryRejection>,
) -> Result<Json<PaginatedResponse<BloodGlucoseEntry>>, ApiError> {
    entry_history::<LogBloodGlucoseRequest>(state.glucose.as_ref(), &user, params, GLUCOSE_PATH).await
}

pub const BLOOD_PRESSURE_PATH: &str = "/api/v1/blood-pressure";

/// Log a blood pressure reading
#[utoipa::path(
    post,
    path = "/api/v1/blood-pressure",
    request_body = LogBloodPressureRequest,
    responses(
        (status = 201, description = "Entry stored", body = BloodPressureEntry),
        (status = 400, description = "Malformed JSON, failed validation or rejected by the store", body = ErrorBody),
        (status = 401, description = "Missing or invalid session", body = ErrorBody),
        (status = 403, description = "Payload names a different user", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    security(
        ("bearer" = [])
    ),
    tag = "blood_pressure"
)]
#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn log_blood_pressure(
    State(state): State<AppState>,
    Extension(user): Extension<UserInfo>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<BloodPressureEntry>), ApiError> {
    create_entry::<LogBloodPressureRequest>(state.blood_pressure.as_ref(), &user, body, BLOOD_PRESSURE_PATH).await
}

/// Page through the caller's blood pressure reading history
#[utoipa::path(
    get,
    path = "/api/v1/blood-pressure",
    params(
        HistoryQueryParams
    ),
    responses(
        (status = 200, description = "History retrieved", body = BloodPressurePage),
        (status = 400, description = "Invalid query", body = ErrorBody),
        (status = 401, description = "Missing or invalid session", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    security(
        ("bearer" = [])
    ),
    tag = "blood_pressure"
)]
#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn blood_pressure_history(
    State(state): State<AppState>,
    Extension(user): Extension<UserInfo>,
    params: Result<Query<HistoryQueryParams>, QueryRejection>,
) -> Result<Json<PaginatedResponse<BloodPressureEntry>>, ApiError> {
    entry_history::<LogBloodPressureRequest>(state.blood_pressure.as_ref(), &user, params, BLOOD_PRESSURE_PATH).await
}

pub const MEAL_PATH: &str = "/api/v1/meals";

/// Log a meal
#[utoipa::path(
    post,
    path = "/api/v1/meals",
    request_body = LogMealRequest,
    responses(
        (status = 201, description = "Entry stored", body = MealEntry),
        (status = 400, description = "Malformed JSON, failed validation or rejected by the store", body = ErrorBody),
        (status = 401, description = "Missing or invalid session", body = ErrorBody),
        (status = 403, description = "Payload names a different user", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    security(
        ("bearer" = [])
    ),
    tag = "meals"
)]
#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn log_meal(
    State(state): State<AppState>,
    Extension(user): Extension<UserInfo>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<MealEntry>), ApiError> {
    create_entry::<LogMealRequest>(state.meals.as_ref(), &user, body, MEAL_PATH).await
}

/// Page through the caller's meal history
#[utoipa::path(
    get,
    path = "/api/v1/meals",
    params(
        HistoryQueryParams
    ),
    responses(
        (status = 200, description = "History retrieved", body = MealPage),
        (status = 400, description = "Invalid query", body = ErrorBody),
        (status = 401, description = "Missing or invalid session", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    security(
        ("bearer" = [])
    ),
    tag = "meals"
)]
#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn meal_history(
    State(state): State<AppState>,
    Extension(user): Extension<UserInfo>,
    params: Result<Query<HistoryQueryParams>, QueryRejection>,
) -> Result<Json<PaginatedResponse<MealEntry>>, ApiError> {
    entry_history::<LogMealRequest>(state.meals.as_ref(), &user, params, MEAL_PATH).await
}

pub const WATER_PATH: &str = "/api/v1/water";

/// Log a water intake entry
#[utoipa::path(
    post,
    path = "/api/v1/water",
    request_body = LogWaterRequest,
    responses(
        (status = 201, description = "Entry stored", body = WaterEntry),
        (status = 400, description = "Malformed JSON, failed validation or rejected by the store", body = ErrorBody),
        (status = 401, description = "Missing or invalid session", body = ErrorBody),
        (status = 403, description = "Payload names a different user", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    security(
        ("bearer" = [])
    ),
    tag = "water"
)]
#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn log_water(
    State(state): State<AppState>,
    Extension(user): Extension<UserInfo>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<WaterEntry>), ApiError> {
    create_entry::<LogWaterRequest>(state.water.as_ref(), &user, body, WATER_PATH).await
}

/// Page through the caller's water intake entry history
#[utoipa::path(
    get,
    path = "/api/v1/water",
    params(
        HistoryQueryParams
    ),
    responses(
        (status = 200, description = "History retrieved", body = WaterPage),
        (status = 400, description = "Invalid query", body = ErrorBody),
        (status = 401, description = "Missing or invalid session", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    security(
        ("bearer" = [])
    ),
    tag = "water"
)]
#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn water_history(
    State(state): State<AppState>,
    Extension(user): Extension<UserInfo>,
    params: Result<Query<HistoryQueryParams>, QueryRejection>,
) -> Result<Json<PaginatedResponse<WaterEntry>>, ApiError> {
    entry_history::<LogWaterRequest>(state.water.as_ref(), &user, params, WATER_PATH).await
}

pub const INSULIN_PATH: &str = "/api/v1/insulin";

/// Log a insulin dose
#[utoipa::path(
    post,
    path = "/api/v1/insulin",
    request_body = LogInsulinRequest,
    responses(
        (status = 201, description = "Entry stored", body = InsulinEntry),
        (status = 400, description = "Malformed JSON, failed validation or rejected by the store", body = ErrorBody),
        (status = 401, description = "Missing or invalid session", body = ErrorBody),
        (status = 403, description = "Payload names a different user", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    security(
        ("bearer" = [])
    ),
    tag = "insulin"
)]
#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn log_insulin(
    State(state): State<AppState>,
    Extension(user): Extension<UserInfo>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<InsulinEntry>), ApiError> {
    create_entry::<LogInsulinRequest>(state.insulin.as_ref(), &user, body, INSULIN_PATH).await
}

/// Page through the caller's insulin dose history
#[utoipa::path(
    get,
    path = "/api/v1/insulin",
    params(
        HistoryQueryParams
    ),
    responses(
        (status = 200, description = "History retrieved", body = InsulinPage),
        (status = 400, description = "Invalid query", body = ErrorBody),
        (status = 401, description = "Missing or invalid session", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    security(
        ("bearer" = [])
    ),
    tag = "insulin"
)]
#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn insulin_history(
    State(state): State<AppState>,
    Extension(user): Extension<UserInfo>,
    params: Result<Query<HistoryQueryParams>, QueryRejection>,
) -> Result<Json<PaginatedResponse<InsulinEntry>>, ApiError> {
    entry_history::<LogInsulinRequest>(state.insulin.as_ref(), &user, params, INSULIN_PATH).await
}

pub const WEIGHT_PATH: &str = "/api/v1/weight";

/// Log a weight measurement
#[utoipa::path(
    post,
    path = "/api/v1/weight",
    request_body = LogWeightRequest,
    responses(
        (status = 201, description = "Entry stored", body = WeightEntry),
        (status = 400, description = "Malformed JSON, failed validation or rejected by the store", body = ErrorBody),
        (status = 401, description = "Missing or invalid session", body = ErrorBody),
        (status = 403, description = "Payload names a different user", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    security(
        ("bearer" = [])
    ),
    tag = "weight"
)]
#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn log_weight(
    State(state): State<AppState>,
    Extension(user): Extension<UserInfo>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<WeightEntry>), ApiError> {
    create_entry::<LogWeightRequest>(state.weight.as_ref(), &user, body, WEIGHT_PATH).await
}

/// Page through the caller's weight measurement history
#[utoipa::path(
    get,
    path = "/api/v1/weight",
    params(
        HistoryQueryParams
    ),
    responses(
        (status = 200, description = "History retrieved", body = WeightPage),
        (status = 400, description = "Invalid query", body = ErrorBody),
        (status = 401, description = "Missing or invalid session", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody),
    ),
    security(
        ("bearer" = [])
    ),
    tag = "weight"
)]
#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn weight_history(
    State(state): State<AppState>,
    Extension(user): Extension<UserInfo>,
    params: Result<Query<HistoryQueryParams>, QueryRejection>,
) -> Result<Json<PaginatedResponse<WeightEntry>>, ApiError> {
    entry_history::<LogWeightRequest>(state.weight.as_ref(), &user, params, WEIGHT_PATH).await
}
