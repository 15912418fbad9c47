use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::auth::UserPublic;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddCommentRequest {
    pub text: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentView {
    pub created_at: DateTime<Utc>,
    pub id: Uuid,
    pub product_id: Uuid,
    pub text: String,
    pub user: UserPublic,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentList {
    pub count: i64,
    pub results: Vec<CommentView>,
}
