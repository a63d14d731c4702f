use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{Map, Value};

use crate::controllers::reminder_controller::ReminderController;
use crate::dto::common::MessageResponse;
use crate::dto::reminder_dto::{
    AutoGenerateResponse, CompleteReminderRequest, CreateReminderRequest, UpdateReminderRequest,
};
use crate::models::service_reminder::{OverdueReminderDetail, ReminderWithVehicle, ServiceReminder};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::JsonBody;
use crate::utils::validation::parse_id;

pub fn create_reminder_router() -> Router<AppState> {
    Router::new()
        .route("/add-reminder", post(add_reminder))
        .route("/get-reminders", get(get_reminders))
        .route("/get-reminders-by-vehicle/:vehicle_id", get(get_reminders_by_vehicle))
        .route("/get-reminder/:id", get(get_reminder))
        .route("/update-reminder/:id", put(update_reminder))
        .route("/delete-reminder/:id", delete(delete_reminder))
        .route("/complete-reminder/:id", put(complete_reminder))
        .route("/overdue", get(overdue))
        .route("/overdue-details", get(overdue_details))
        .route("/status/:status", get(by_status))
        .route("/generate-auto", post(generate_auto))
        .route("/service-type-counts", get(service_type_counts))
        .route("/status-counts", get(status_counts))
}

fn controller(state: &AppState) -> ReminderController {
    ReminderController::new(
        state.pool.clone(),
        state.predictor.clone(),
        state.notifier.clone(),
    )
}

async fn add_reminder(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateReminderRequest>,
) -> Result<(StatusCode, Json<ServiceReminder>), AppError> {
    let response = controller(&state).create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_reminders(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReminderWithVehicle>>, AppError> {
    let response = controller(&state).list().await?;
    Ok(Json(response))
}

async fn get_reminders_by_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<String>,
) -> Result<Json<Vec<ReminderWithVehicle>>, AppError> {
    let vehicle_id = parse_id(&vehicle_id, "vehicle")?;
    let response = controller(&state).list_by_vehicle(vehicle_id).await?;
    Ok(Json(response))
}

async fn get_reminder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReminderWithVehicle>, AppError> {
    let id = parse_id(&id, "reminder")?;
    let response = controller(&state).get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_reminder(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UpdateReminderRequest>,
) -> Result<Json<ReminderWithVehicle>, AppError> {
    let id = parse_id(&id, "reminder")?;
    let response = controller(&state).update(id, request).await?;
    Ok(Json(response))
}

async fn delete_reminder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&id, "reminder")?;
    let response = controller(&state).delete(id).await?;
    Ok(Json(response))
}

async fn complete_reminder(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<CompleteReminderRequest>,
) -> Result<Json<ServiceReminder>, AppError> {
    let id = parse_id(&id, "reminder")?;
    let response = controller(&state).complete(id, request).await?;
    Ok(Json(response))
}

async fn overdue(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReminderWithVehicle>>, AppError> {
    let response = controller(&state).overdue().await?;
    Ok(Json(response))
}

async fn overdue_details(
    State(state): State<AppState>,
) -> Result<Json<Vec<OverdueReminderDetail>>, AppError> {
    let response = controller(&state).overdue_details().await?;
    Ok(Json(response))
}

async fn by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> Result<Json<Vec<ReminderWithVehicle>>, AppError> {
    let response = controller(&state).by_status(&status).await?;
    Ok(Json(response))
}

async fn generate_auto(
    State(state): State<AppState>,
) -> Result<Json<AutoGenerateResponse>, AppError> {
    let response = controller(&state).generate_auto().await?;
    Ok(Json(response))
}

async fn service_type_counts(
    State(state): State<AppState>,
) -> Result<Json<Map<String, Value>>, AppError> {
    let response = controller(&state).service_type_counts().await?;
    Ok(Json(response))
}

async fn status_counts(
    State(state): State<AppState>,
) -> Result<Json<Map<String, Value>>, AppError> {
    let response = controller(&state).status_counts().await?;
    Ok(Json(response))
}
