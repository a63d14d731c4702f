use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::common::MessageResponse;
use crate::dto::vehicle_dto::{
    RemoveOwnerResponse, UpdateMileageRequest, UpdateVehicleOwnerRequest, VehicleRequest,
};
use crate::models::vehicle::Vehicle;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::JsonBody;
use crate::utils::validation::parse_id;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/add-vehicle", post(add_vehicle))
        .route("/delete-vehicle/:id", delete(delete_vehicle))
        .route("/get-vehicles", get(get_vehicles))
        .route("/get-vehicle/:id", get(get_vehicle))
        .route("/update-vehicle/:id", put(update_vehicle))
        .route("/status-counts", get(status_counts))
        .route("/type-counts", get(type_counts))
        .route("/update-vehicle-owner/:id", put(update_vehicle_owner))
        .route("/get-vehicles-by-owner/:owner_id", get(get_vehicles_by_owner))
        .route("/remove-owner/:owner_id", put(remove_owner))
        .route("/update-mileage/:id", put(update_mileage))
}

async fn add_vehicle(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<VehicleRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id, "vehicle")?;
    let controller = VehicleController::new(state.pool.clone());
    controller.delete(id).await?;
    Ok(Json(json!({ "status": "Vehicle deleted" })))
}

async fn get_vehicles(State(state): State<AppState>) -> Result<Json<Vec<Vehicle>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vehicle>, AppError> {
    let id = parse_id(&id, "vehicle")?;
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<VehicleRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&id, "vehicle")?;
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn status_counts(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.status_counts().await?;
    Ok(Json(response))
}

async fn type_counts(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.type_counts().await?;
    Ok(Json(response))
}

async fn update_vehicle_owner(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UpdateVehicleOwnerRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&id, "vehicle")?;
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.update_owner(id, request).await?;
    Ok(Json(response))
}

async fn get_vehicles_by_owner(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> Result<Json<Vec<Vehicle>>, AppError> {
    let owner_id = parse_id(&owner_id, "owner")?;
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.list_by_owner(owner_id).await?;
    Ok(Json(response))
}

async fn remove_owner(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> Result<Json<RemoveOwnerResponse>, AppError> {
    let owner_id = parse_id(&owner_id, "owner")?;
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.remove_owner(owner_id).await?;
    Ok(Json(response))
}

async fn update_mileage(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UpdateMileageRequest>,
) -> Result<Json<Vehicle>, AppError> {
    let id = parse_id(&id, "vehicle")?;
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.update_mileage(id, request).await?;
    Ok(Json(response))
}
