use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::catalog::FeatureList,
    error::AppResult,
    models::Feature,
    response::ApiResponse,
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/features", get(list_features))
        .route("/features/{id}", get(get_feature))
}

#[utoipa::path(
    get,
    path = "/api/features",
    responses(
        (status = 200, description = "List features", body = ApiResponse<FeatureList>),
    ),
    tag = "Catalog"
)]
pub async fn list_features(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<FeatureList>>> {
    let resp = catalog_service::list_features(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/features/{id}",
    params(
        ("id" = Uuid, Path, description = "Feature ID")
    ),
    responses(
        (status = 200, description = "Get feature", body = ApiResponse<Feature>),
        (status = 404, description = "Feature not found"),
    ),
    tag = "Catalog"
)]
pub async fn get_feature(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Feature>>> {
    let resp = catalog_service::get_feature(&state, id).await?;
    Ok(Json(resp))
}
