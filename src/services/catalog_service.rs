use chrono::Utc;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::catalog::{BrandList, CategoryDetail, CategoryList, CreateCategoryRequest, FeatureList},
    entity::{
        brands::{Column as BrandColumn, Entity as Brands, Model as BrandModel},
        categories::{Entity as Categories, Model as CategoryModel},
        category_attributes::{
            Column as AttributeColumn, Entity as CategoryAttributes, Model as AttributeModel,
        },
        features::{Entity as Features, Model as FeatureModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Brand, Category, CategoryAttribute, Feature},
    response::{ApiResponse, Meta},
    routes::params::BrandQuery,
    state::AppState,
};

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items = Categories::find()
        .all(&state.orm)
        .await?
        .into_iter()
        .map(category_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Categories",
        CategoryList { items },
        None,
    ))
}

pub async fn get_category(state: &AppState, id: Uuid) -> AppResult<ApiResponse<CategoryDetail>> {
    let category = Categories::find_by_id(id).one(&state.orm).await?;
    let category = match category {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    let attributes = CategoryAttributes::find()
        .filter(AttributeColumn::CategoryId.eq(id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(attribute_from_entity)
        .collect();

    let detail = CategoryDetail {
        attributes,
        id: category.id,
        name: category.name,
        slug: category.slug,
    };

    Ok(ApiResponse::success("Category", detail, None))
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;

    let category: Category = sqlx::query_as(
        "INSERT INTO categories (id, name, slug) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(payload.name)
    .bind(payload.slug)
    .fetch_one(&state.pool)
    .await
    .map_err(|e| AppError::on_unique_violation(e, "A category with this slug already exists"))?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "category_create",
        Some("categories"),
        Some(serde_json::json!({ "category_id": category.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Category created",
        category,
        Some(Meta::empty()),
    ))
}

pub async fn list_brands(
    state: &AppState,
    query: BrandQuery,
) -> AppResult<ApiResponse<BrandList>> {
    let mut condition = Condition::all();
    if let Some(category_id) = query.category_id {
        condition = condition.add(BrandColumn::CategoryId.eq(category_id));
    }

    let items = Brands::find()
        .filter(condition)
        .order_by_asc(BrandColumn::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(brand_from_entity)
        .collect();

    Ok(ApiResponse::success("Brands", BrandList { items }, None))
}

pub async fn get_brand(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Brand>> {
    let brand = Brands::find_by_id(id).one(&state.orm).await?;
    match brand {
        Some(b) => Ok(ApiResponse::success("Brand", brand_from_entity(b), None)),
        None => Err(AppError::NotFound),
    }
}

pub async fn list_features(state: &AppState) -> AppResult<ApiResponse<FeatureList>> {
    let items = Features::find()
        .all(&state.orm)
        .await?
        .into_iter()
        .map(feature_from_entity)
        .collect();

    Ok(ApiResponse::success("Features", FeatureList { items }, None))
}

pub async fn get_feature(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Feature>> {
    let feature = Features::find_by_id(id).one(&state.orm).await?;
    match feature {
        Some(f) => Ok(ApiResponse::success(
            "Feature",
            feature_from_entity(f),
            None,
        )),
        None => Err(AppError::NotFound),
    }
}

fn category_from_entity(model: CategoryModel) -> Category {
    Category {
        id: model.id,
        name: model.name,
        slug: model.slug,
    }
}

fn brand_from_entity(model: BrandModel) -> Brand {
    Brand {
        id: model.id,
        name: model.name,
        category_id: model.category_id,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn feature_from_entity(model: FeatureModel) -> Feature {
    Feature {
        id: model.id,
        name: model.name,
        value: model.value,
    }
}

fn attribute_from_entity(model: AttributeModel) -> CategoryAttribute {
    CategoryAttribute {
        id: model.id,
        category_id: model.category_id,
        name: model.name,
    }
}
