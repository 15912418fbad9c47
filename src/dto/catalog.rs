use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Brand, Category, CategoryAttribute, Feature};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryDetail {
    pub attributes: Vec<CategoryAttribute>,
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryList {
    #[schema(value_type = Vec<Category>)]
    pub items: Vec<Category>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct BrandList {
    #[schema(value_type = Vec<Brand>)]
    pub items: Vec<Brand>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct FeatureList {
    #[schema(value_type = Vec<Feature>)]
    pub items: Vec<Feature>,
}
