use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::comments::CommentView;
use crate::models::{Feature, ProductImage};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub category_id: Uuid,
    pub brand_id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub stock: i32,
    pub feature_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub brand_id: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub stock: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddProductImageRequest {
    pub image_path: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttributeValueView {
    pub name: String,
    pub value: String,
}

// Keys declared alphabetically; the expanded product body serializes in this
// order as part of the API contract.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDetail {
    pub attributes: Vec<AttributeValueView>,
    pub brand_id: Option<Uuid>,
    pub category_id: Uuid,
    pub category_name: String,
    pub comment_count: i64,
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
    pub description: String,
    pub features: Vec<Feature>,
    pub id: Uuid,
    pub images: Vec<ProductImage>,
    pub is_liked: bool,
    pub like_count: i64,
    pub name: String,
    pub price: i64,
    pub stock: i32,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<ProductDetail>)]
    pub items: Vec<ProductDetail>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ImageList {
    #[schema(value_type = Vec<ProductImage>)]
    pub items: Vec<ProductImage>,
}
