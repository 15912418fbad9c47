use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::products::{
        AddProductImageRequest, AttributeValueView, CreateProductRequest, ImageList, ProductDetail,
        ProductList, UpdateProductRequest,
    },
    entity::{
        brands::Entity as Brands,
        categories::Entity as Categories,
        features::{Column as FeatureColumn, Entity as Features},
        product_features,
        products::{
            ActiveModel as ProductActive, Column as ProductColumn, Entity as Products,
            Model as ProductModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Feature, Product, ProductImage},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::{comment_service, like_service},
    state::AppState,
};

pub async fn list_products(
    state: &AppState,
    pagination: Pagination,
    viewer: Option<Uuid>,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = pagination.normalize();

    let finder = Products::find().order_by_desc(ProductColumn::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;

    let models = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    // Page size is capped, so per-product expansion stays bounded.
    let mut items = Vec::with_capacity(models.len());
    for model in models {
        items.push(expand_product(&state.pool, product_from_entity(model), viewer).await?);
    }

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(meta),
    ))
}

pub async fn get_product(
    state: &AppState,
    id: Uuid,
    viewer: Option<Uuid>,
) -> AppResult<ApiResponse<ProductDetail>> {
    let model = Products::find_by_id(id).one(&state.orm).await?;
    let model = match model {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let detail = expand_product(&state.pool, product_from_entity(model), viewer).await?;
    Ok(ApiResponse::success("Product", detail, None))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<ProductDetail>> {
    ensure_admin(user)?;

    if payload.price < 0 {
        return Err(AppError::BadRequest("price must be non-negative".into()));
    }
    if payload.stock < 0 {
        return Err(AppError::BadRequest("stock must be non-negative".into()));
    }

    if Categories::find_by_id(payload.category_id)
        .one(&state.orm)
        .await?
        .is_none()
    {
        return Err(AppError::BadRequest("Category not found".into()));
    }

    if let Some(brand_id) = payload.brand_id {
        if Brands::find_by_id(brand_id).one(&state.orm).await?.is_none() {
            return Err(AppError::BadRequest("Brand not found".into()));
        }
    }

    let feature_ids = payload.feature_ids.unwrap_or_default();
    if !feature_ids.is_empty() {
        let known = Features::find()
            .filter(FeatureColumn::Id.is_in(feature_ids.clone()))
            .count(&state.orm)
            .await? as usize;
        if known != feature_ids.len() {
            return Err(AppError::BadRequest("Unknown feature id".into()));
        }
    }

    let active = ProductActive {
        id: Set(Uuid::new_v4()),
        category_id: Set(payload.category_id),
        brand_id: Set(payload.brand_id),
        name: Set(payload.name),
        description: Set(payload.description),
        price: Set(payload.price),
        stock: Set(payload.stock),
        created_at: NotSet,
        updated_at: NotSet,
    };
    let product = active.insert(&state.orm).await?;

    for feature_id in feature_ids {
        product_features::ActiveModel {
            product_id: Set(product.id),
            feature_id: Set(feature_id),
        }
        .insert(&state.orm)
        .await?;
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "product_create",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let detail = expand_product(&state.pool, product_from_entity(product), Some(user.user_id)).await?;
    Ok(ApiResponse::success(
        "Product created",
        detail,
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<ProductDetail>> {
    ensure_admin(user)?;

    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    if let Some(price) = payload.price {
        if price < 0 {
            return Err(AppError::BadRequest("price must be non-negative".into()));
        }
    }
    if let Some(stock) = payload.stock {
        if stock < 0 {
            return Err(AppError::BadRequest("stock must be non-negative".into()));
        }
    }

    if let Some(brand_id) = payload.brand_id {
        if Brands::find_by_id(brand_id).one(&state.orm).await?.is_none() {
            return Err(AppError::BadRequest("Brand not found".into()));
        }
    }

    let mut active: ProductActive = existing.into();
    if let Some(brand_id) = payload.brand_id {
        active.brand_id = Set(Some(brand_id));
    }
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(stock) = payload.stock {
        active.stock = Set(stock);
    }
    active.updated_at = Set(Utc::now().into());

    let product = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "product_update",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let detail = expand_product(&state.pool, product_from_entity(product), Some(user.user_id)).await?;
    Ok(ApiResponse::success("Updated", detail, Some(Meta::empty())))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Products::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "product_delete",
        Some("products"),
        Some(serde_json::json!({ "product_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn list_images(pool: &DbPool) -> AppResult<ApiResponse<ImageList>> {
    let items = sqlx::query_as::<_, ProductImage>(
        "SELECT * FROM product_images ORDER BY uploaded_at, id",
    )
    .fetch_all(pool)
    .await?;

    Ok(ApiResponse::success(
        "Product images",
        ImageList { items },
        None,
    ))
}

pub async fn add_product_image(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    payload: AddProductImageRequest,
) -> AppResult<ApiResponse<ProductImage>> {
    ensure_admin(user)?;

    if Products::find_by_id(product_id)
        .one(&state.orm)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound);
    }

    let image: ProductImage = sqlx::query_as(
        r#"
        INSERT INTO product_images (id, product_id, image_path)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(product_id)
    .bind(payload.image_path)
    .fetch_one(&state.pool)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "product_image_add",
        Some("product_images"),
        Some(serde_json::json!({ "product_id": product_id, "image_id": image.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Image added",
        image,
        Some(Meta::empty()),
    ))
}

/// Full read shape for one product: relations, counts, and the per-request
/// `is_liked` flag. Counts are always live aggregates, never stored counters.
pub async fn expand_product(
    pool: &DbPool,
    product: Product,
    viewer: Option<Uuid>,
) -> AppResult<ProductDetail> {
    let (category_name,): (String,) = sqlx::query_as("SELECT name FROM categories WHERE id = $1")
        .bind(product.category_id)
        .fetch_one(pool)
        .await?;

    let images = sqlx::query_as::<_, ProductImage>(
        "SELECT * FROM product_images WHERE product_id = $1 ORDER BY uploaded_at, id",
    )
    .bind(product.id)
    .fetch_all(pool)
    .await?;

    let features = sqlx::query_as::<_, Feature>(
        r#"
        SELECT f.*
        FROM features f
        JOIN product_features pf ON pf.feature_id = f.id
        WHERE pf.product_id = $1
        ORDER BY f.name
        "#,
    )
    .bind(product.id)
    .fetch_all(pool)
    .await?;

    let attributes: Vec<AttributeValueView> = sqlx::query_as::<_, (String, String)>(
        r#"
        SELECT ca.name, pav.value
        FROM product_attribute_values pav
        JOIN category_attributes ca ON ca.id = pav.attribute_id
        WHERE pav.product_id = $1
        ORDER BY ca.name
        "#,
    )
    .bind(product.id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|(name, value)| AttributeValueView { name, value })
    .collect();

    let comments = comment_service::fetch_comment_views(pool, product.id).await?;
    let like_count = like_service::like_count(pool, product.id).await?;

    let is_liked = match viewer {
        Some(user_id) => {
            let (exists,): (bool,) = sqlx::query_as(
                "SELECT EXISTS(SELECT 1 FROM likes WHERE user_id = $1 AND product_id = $2)",
            )
            .bind(user_id)
            .bind(product.id)
            .fetch_one(pool)
            .await?;
            exists
        }
        None => false,
    };

    Ok(ProductDetail {
        attributes,
        brand_id: product.brand_id,
        category_id: product.category_id,
        category_name,
        comment_count: comments.len() as i64,
        comments,
        created_at: product.created_at,
        description: product.description,
        features,
        id: product.id,
        images,
        is_liked,
        like_count,
        name: product.name,
        price: product.price,
        stock: product.stock,
        updated_at: product.updated_at,
    })
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        category_id: model.category_id,
        brand_id: model.brand_id,
        name: model.name,
        description: model.description,
        price: model.price,
        stock: model.stock,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
