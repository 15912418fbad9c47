use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(10).clamp(1, 100);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BrandQuery {
    pub category_id: Option<Uuid>,
}

/// Inclusive bounds on discount magnitude; a non-numeric value is rejected by
/// the query extractor with a client error, never silently ignored.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DealQuery {
    pub min_discount: Option<f64>,
    pub max_discount: Option<f64>,
}
