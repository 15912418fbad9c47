pub mod auth_service;
pub mod catalog_service;
pub mod comment_service;
pub mod deal_service;
pub mod like_service;
pub mod product_service;
