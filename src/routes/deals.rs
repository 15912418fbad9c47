use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::deals::{CreateDealRequest, DealList, DealView, UpdateDealRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::DealQuery,
    services::deal_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/deals", get(list_deals).post(create_deal))
        .route("/deals/{id}", axum::routing::put(update_deal))
}

#[utoipa::path(
    get,
    path = "/api/deals",
    params(
        ("min_discount" = Option<f64>, Query, description = "Inclusive lower bound on discount percent"),
        ("max_discount" = Option<f64>, Query, description = "Inclusive upper bound on discount percent"),
    ),
    responses(
        (status = 200, description = "Currently valid deals with product name and first image", body = ApiResponse<DealList>),
        (status = 400, description = "Non-numeric filter parameter"),
    ),
    tag = "Deals"
)]
pub async fn list_deals(
    State(state): State<AppState>,
    Query(query): Query<DealQuery>,
) -> AppResult<Json<ApiResponse<DealList>>> {
    let resp = deal_service::list_deals(&state.pool, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/deals",
    request_body = CreateDealRequest,
    responses(
        (status = 201, description = "Create deal", body = ApiResponse<DealView>),
        (status = 400, description = "Invalid discount or time box"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Deals"
)]
pub async fn create_deal(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateDealRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<DealView>>)> {
    let resp = deal_service::create_deal(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/deals/{id}",
    params(
        ("id" = Uuid, Path, description = "Deal ID")
    ),
    request_body = UpdateDealRequest,
    responses(
        (status = 200, description = "Updated deal", body = ApiResponse<DealView>),
        (status = 404, description = "Deal not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Deals"
)]
pub async fn update_deal(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDealRequest>,
) -> AppResult<Json<ApiResponse<DealView>>> {
    let resp = deal_service::update_deal(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
