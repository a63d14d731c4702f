use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use serde_json::Value;

use crate::controllers::inventory_controller::InventoryController;
use crate::dto::common::MessageResponse;
use crate::dto::inventory_dto::{AdjustStockRequest, InventoryRequest};
use crate::models::inventory::InventoryItem;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::JsonBody;
use crate::utils::validation::parse_id;

pub fn create_inventory_router() -> Router<AppState> {
    Router::new()
        .route("/add-item", post(add_item))
        .route("/get-items", get(get_items))
        .route("/get-item/:id", get(get_item))
        .route("/update-item/:id", put(update_item))
        .route("/delete-item/:id", delete(delete_item))
        .route("/adjust-stock/:id", patch(adjust_stock))
        .route("/low-stock", get(low_stock))
        .route("/category-counts", get(category_counts))
}

async fn add_item(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<InventoryRequest>,
) -> Result<(StatusCode, Json<InventoryItem>), AppError> {
    let controller = InventoryController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_items(State(state): State<AppState>) -> Result<Json<Vec<InventoryItem>>, AppError> {
    let controller = InventoryController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InventoryItem>, AppError> {
    let id = parse_id(&id, "item")?;
    let controller = InventoryController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<InventoryRequest>,
) -> Result<Json<InventoryItem>, AppError> {
    let id = parse_id(&id, "item")?;
    let controller = InventoryController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&id, "item")?;
    let controller = InventoryController::new(state.pool.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}

async fn adjust_stock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<AdjustStockRequest>,
) -> Result<Json<InventoryItem>, AppError> {
    let id = parse_id(&id, "item")?;
    let controller = InventoryController::new(state.pool.clone());
    let response = controller.adjust_stock(id, request).await?;
    Ok(Json(response))
}

async fn low_stock(State(state): State<AppState>) -> Result<Json<Vec<InventoryItem>>, AppError> {
    let controller = InventoryController::new(state.pool.clone());
    let response = controller.low_stock().await?;
    Ok(Json(response))
}

async fn category_counts(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    let controller = InventoryController::new(state.pool.clone());
    let response = controller.category_counts().await?;
    Ok(Json(response))
}
