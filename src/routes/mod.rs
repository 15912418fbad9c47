use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod brands;
pub mod categories;
pub mod comments;
pub mod deals;
pub mod doc;
pub mod features;
pub mod health;
pub mod likes;
pub mod params;
pub mod products;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(categories::router())
        .merge(brands::router())
        .merge(features::router())
        .merge(products::router())
        .merge(deals::router())
        .merge(comments::router())
        .merge(likes::router())
}
