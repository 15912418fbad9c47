use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct LikeStatus {
    pub like_count: i64,
    pub liked: bool,
}
