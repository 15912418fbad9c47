use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::catalog::BrandList,
    error::AppResult,
    models::Brand,
    response::ApiResponse,
    routes::params::BrandQuery,
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/brands", get(list_brands))
        .route("/brands/{id}", get(get_brand))
}

#[utoipa::path(
    get,
    path = "/api/brands",
    params(
        ("category_id" = Option<Uuid>, Query, description = "Filter brands by category"),
    ),
    responses(
        (status = 200, description = "List brands", body = ApiResponse<BrandList>),
    ),
    tag = "Catalog"
)]
pub async fn list_brands(
    State(state): State<AppState>,
    Query(query): Query<BrandQuery>,
) -> AppResult<Json<ApiResponse<BrandList>>> {
    let resp = catalog_service::list_brands(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/brands/{id}",
    params(
        ("id" = Uuid, Path, description = "Brand ID")
    ),
    responses(
        (status = 200, description = "Get brand", body = ApiResponse<Brand>),
        (status = 404, description = "Brand not found"),
    ),
    tag = "Catalog"
)]
pub async fn get_brand(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Brand>>> {
    let resp = catalog_service::get_brand(&state, id).await?;
    Ok(Json(resp))
}
