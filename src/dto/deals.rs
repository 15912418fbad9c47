use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDealRequest {
    pub product_id: Uuid,
    pub discount_percent: f64,
    /// Defaults to now.
    pub start_time: Option<DateTime<Utc>>,
    /// Mutually exclusive with `end_time`; omit both for an open-ended deal.
    pub duration_secs: Option<i64>,
    /// Converted to a duration at write time; the duration is the canonical form.
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateDealRequest {
    pub discount_percent: Option<f64>,
    pub start_time: Option<DateTime<Utc>>,
    pub duration_secs: Option<i64>,
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DealView {
    pub discount_percent: f64,
    pub end_time: Option<DateTime<Utc>>,
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_image: Option<String>,
    pub product_name: String,
    pub start_time: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct DealList {
    #[schema(value_type = Vec<DealView>)]
    pub items: Vec<DealView>,
}
