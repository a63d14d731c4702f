use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};

use crate::controllers::owner_controller::OwnerController;
use crate::dto::common::MessageResponse;
use crate::dto::owner_dto::{OwnerRequest, OwnerSearchQuery, OwnerVehicleCheck};
use crate::models::owner::Owner;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::JsonBody;
use crate::utils::validation::parse_id;

pub fn create_owner_router() -> Router<AppState> {
    Router::new()
        .route("/add-owner", post(add_owner))
        .route("/delete-owner/:id", delete(delete_owner))
        .route("/get-owners", get(get_owners))
        .route("/get-owner/:id", get(get_owner))
        .route("/get-owner-by-owner-id/:owner_id", get(get_owner_by_owner_id))
        .route("/update-owner/:id", put(update_owner))
        .route("/gender-counts", get(gender_counts))
        .route("/search", get(search_owners))
        .route("/check-vehicles/:id", get(check_vehicles))
}

async fn add_owner(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<OwnerRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let controller = OwnerController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn delete_owner(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id, "owner")?;
    let controller = OwnerController::new(state.pool.clone());
    controller.delete(id).await?;
    Ok(Json(json!({ "status": "Owner deleted" })))
}

async fn get_owners(State(state): State<AppState>) -> Result<Json<Vec<Owner>>, AppError> {
    let controller = OwnerController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn get_owner(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Owner>, AppError> {
    let id = parse_id(&id, "owner")?;
    let controller = OwnerController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn get_owner_by_owner_id(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> Result<Json<Owner>, AppError> {
    let controller = OwnerController::new(state.pool.clone());
    let response = controller.get_by_owner_id(&owner_id).await?;
    Ok(Json(response))
}

async fn update_owner(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<OwnerRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&id, "owner")?;
    let controller = OwnerController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn gender_counts(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    let controller = OwnerController::new(state.pool.clone());
    let response = controller.gender_counts().await?;
    Ok(Json(response))
}

async fn search_owners(
    State(state): State<AppState>,
    Query(params): Query<OwnerSearchQuery>,
) -> Result<Json<Vec<Owner>>, AppError> {
    let controller = OwnerController::new(state.pool.clone());
    let response = controller.search(params.query).await?;
    Ok(Json(response))
}

async fn check_vehicles(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OwnerVehicleCheck>, AppError> {
    let id = parse_id(&id, "owner")?;
    let controller = OwnerController::new(state.pool.clone());
    let response = controller.check_vehicles(id).await?;
    Ok(Json(response))
}
