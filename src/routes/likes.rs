use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
};
use uuid::Uuid;

use crate::{
    dto::likes::LikeStatus,
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::like_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products/{id}/like", post(add_like))
        .route("/products/{id}/unlike", delete(remove_like))
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/like",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 201, description = "Liked", body = ApiResponse<LikeStatus>),
        (status = 400, description = "Already liked"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Likes"
)]
pub async fn add_like(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<ApiResponse<LikeStatus>>)> {
    let resp = like_service::add_like(&state.pool, &user, id).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}/unlike",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Like removed"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Like not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Likes"
)]
pub async fn remove_like(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    like_service::remove_like(&state.pool, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
