//! HTTP routes
//!
//! One router per resource, nested under its prefix. Handlers only extract
//! the request parts and hand them to the matching controller.

pub mod admin_routes;
pub mod inventory_routes;
pub mod owner_routes;
pub mod reminder_routes;
pub mod vehicle_routes;

use axum::{extract::State, response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::cors::cors_layer;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/vehicle", vehicle_routes::create_vehicle_router())
        .nest("/owner", owner_routes::create_owner_router())
        .nest("/reminder", reminder_routes::create_reminder_router())
        .nest("/admin", admin_routes::create_admin_router(state.clone()))
        .nest("/inventory", inventory_routes::create_inventory_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config))
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
