use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{Claims, LoginRequest, RegisterRequest, TokenPair, UserPublic},
        catalog::{BrandList, CategoryDetail, CategoryList, CreateCategoryRequest, FeatureList},
        comments::{AddCommentRequest, CommentList, CommentView},
        deals::{CreateDealRequest, DealList, DealView, UpdateDealRequest},
        likes::LikeStatus,
        products::{
            AddProductImageRequest, AttributeValueView, CreateProductRequest, ImageList,
            ProductDetail, ProductList, UpdateProductRequest,
        },
    },
    models::{Brand, Category, CategoryAttribute, Comment, Deal, Feature, Like, Product, ProductImage},
    response::{ApiResponse, Meta},
    routes::{auth, brands, categories, comments, deals, features, health, likes, params, products},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::current_user,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        brands::list_brands,
        brands::get_brand,
        features::list_features,
        features::get_feature,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        products::add_image,
        products::list_images,
        deals::list_deals,
        deals::create_deal,
        deals::update_deal,
        comments::list_comments,
        comments::add_comment,
        comments::delete_comment,
        likes::add_like,
        likes::remove_like,
    ),
    components(
        schemas(
            Brand,
            Category,
            CategoryAttribute,
            Comment,
            Deal,
            Feature,
            Like,
            Product,
            ProductImage,
            Claims,
            LoginRequest,
            RegisterRequest,
            TokenPair,
            UserPublic,
            BrandList,
            CategoryDetail,
            CategoryList,
            CreateCategoryRequest,
            FeatureList,
            AddCommentRequest,
            CommentList,
            CommentView,
            CreateDealRequest,
            DealList,
            DealView,
            UpdateDealRequest,
            LikeStatus,
            AddProductImageRequest,
            AttributeValueView,
            CreateProductRequest,
            ImageList,
            ProductDetail,
            ProductList,
            UpdateProductRequest,
            params::Pagination,
            params::BrandQuery,
            params::DealQuery,
            Meta,
            ApiResponse<ProductDetail>,
            ApiResponse<ProductList>,
            ApiResponse<DealList>,
            ApiResponse<CommentList>,
            ApiResponse<TokenPair>,
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login and identity"),
        (name = "Catalog", description = "Categories, brands and features"),
        (name = "Products", description = "Product catalog with full expansion"),
        (name = "Deals", description = "Time-boxed discount deals"),
        (name = "Comments", description = "Per-product comments"),
        (name = "Likes", description = "Per-product likes"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
