use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::controllers::admin_controller::AdminController;
use crate::dto::auth_dto::{LoginRequest, LoginResponse, RegisterRequest};
use crate::middleware::auth::require_admin;
use crate::models::user::AdminUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::JsonBody;
use crate::utils::jwt::JwtClaims;

pub fn create_admin_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(get_current_admin))
        .route_layer(middleware::from_fn_with_state(state, require_admin));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected)
}

async fn register(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), AppError> {
    let controller = AdminController::new(state.pool.clone(), state.jwt.clone());
    let response = controller.register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let controller = AdminController::new(state.pool.clone(), state.jwt.clone());
    let response = controller.login(request).await?;
    Ok(Json(response))
}

async fn get_current_admin(
    State(state): State<AppState>,
    Extension(claims): Extension<JwtClaims>,
) -> Result<Json<AdminUser>, AppError> {
    let controller = AdminController::new(state.pool.clone(), state.jwt.clone());
    let response = controller.current(&claims).await?;
    Ok(Json(response))
}
