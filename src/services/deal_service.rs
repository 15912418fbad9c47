use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ActiveModelTrait, EntityTrait};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::deals::{CreateDealRequest, DealList, DealView, UpdateDealRequest},
    entity::{
        deals::{ActiveModel as DealActive, Entity as Deals},
        products::Entity as Products,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    response::{ApiResponse, Meta},
    routes::params::DealQuery,
    state::AppState,
};

#[derive(sqlx::FromRow)]
struct DealRow {
    id: Uuid,
    product_id: Uuid,
    discount_percent: f64,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    product_name: String,
    product_image: Option<String>,
}

impl From<DealRow> for DealView {
    fn from(row: DealRow) -> Self {
        DealView {
            discount_percent: row.discount_percent,
            end_time: row.end_time,
            id: row.id,
            product_id: row.product_id,
            product_image: row.product_image,
            product_name: row.product_name,
            start_time: row.start_time,
        }
    }
}

pub fn validate_discount(discount_percent: f64) -> AppResult<()> {
    if !discount_percent.is_finite() || !(0.0..=100.0).contains(&discount_percent) {
        return Err(AppError::BadRequest(
            "discount_percent must be between 0 and 100".into(),
        ));
    }
    Ok(())
}

/// Normalize a deal's time box into the canonical stored form: an optional
/// duration in seconds. An explicit `end_time` is converted; `None` for both
/// inputs means the deal is open-ended.
pub fn resolve_duration(
    start_time: DateTime<Utc>,
    duration_secs: Option<i64>,
    end_time: Option<DateTime<Utc>>,
) -> AppResult<Option<i64>> {
    match (duration_secs, end_time) {
        (Some(_), Some(_)) => Err(AppError::BadRequest(
            "Provide either duration_secs or end_time, not both".into(),
        )),
        (Some(secs), None) => {
            if secs <= 0 {
                return Err(AppError::BadRequest(
                    "duration_secs must be positive".into(),
                ));
            }
            Ok(Some(secs))
        }
        (None, Some(end)) => {
            if end <= start_time {
                return Err(AppError::BadRequest(
                    "end_time must be after start_time".into(),
                ));
            }
            Ok(Some((end - start_time).num_seconds()))
        }
        (None, None) => Ok(None),
    }
}

/// The one non-trivial read path: expire stale flags, then list what is live.
pub async fn list_deals(pool: &DbPool, query: DealQuery) -> AppResult<ApiResponse<DealList>> {
    // Lazy deactivation happens before filtering, on every call. The flag is
    // an optimization; the time-window predicate below stays authoritative.
    sqlx::query(
        r#"
        UPDATE deals
        SET is_active = FALSE
        WHERE is_active = TRUE
          AND duration_secs IS NOT NULL
          AND start_time + duration_secs * INTERVAL '1 second' < NOW()
        "#,
    )
    .execute(pool)
    .await?;

    let rows = sqlx::query_as::<_, DealRow>(
        r#"
        SELECT d.id, d.product_id, d.discount_percent, d.start_time,
               d.start_time + d.duration_secs * INTERVAL '1 second' AS end_time,
               p.name AS product_name,
               img.image_path AS product_image
        FROM deals d
        JOIN products p ON p.id = d.product_id
        LEFT JOIN LATERAL (
            SELECT image_path
            FROM product_images
            WHERE product_id = p.id
            ORDER BY uploaded_at, id
            LIMIT 1
        ) img ON TRUE
        WHERE d.is_active = TRUE
          AND (d.duration_secs IS NULL
               OR d.start_time + d.duration_secs * INTERVAL '1 second' > NOW())
          AND ($1::DOUBLE PRECISION IS NULL OR d.discount_percent >= $1)
          AND ($2::DOUBLE PRECISION IS NULL OR d.discount_percent <= $2)
        ORDER BY d.start_time DESC
        "#,
    )
    .bind(query.min_discount)
    .bind(query.max_discount)
    .fetch_all(pool)
    .await?;

    let items = rows.into_iter().map(DealView::from).collect();
    Ok(ApiResponse::success("Deals", DealList { items }, None))
}

pub async fn create_deal(
    state: &AppState,
    user: &AuthUser,
    payload: CreateDealRequest,
) -> AppResult<ApiResponse<DealView>> {
    ensure_admin(user)?;
    validate_discount(payload.discount_percent)?;

    if Products::find_by_id(payload.product_id)
        .one(&state.orm)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound);
    }

    let start_time = payload.start_time.unwrap_or_else(Utc::now);
    let duration_secs = resolve_duration(start_time, payload.duration_secs, payload.end_time)?;

    let deal = DealActive {
        id: Set(Uuid::new_v4()),
        product_id: Set(payload.product_id),
        discount_percent: Set(payload.discount_percent),
        start_time: Set(start_time.into()),
        duration_secs: Set(duration_secs),
        is_active: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "deal_create",
        Some("deals"),
        Some(serde_json::json!({ "deal_id": deal.id, "product_id": deal.product_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let view = fetch_deal_view(&state.pool, deal.id).await?;
    Ok(ApiResponse::success(
        "Deal created",
        view,
        Some(Meta::empty()),
    ))
}

pub async fn update_deal(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateDealRequest,
) -> AppResult<ApiResponse<DealView>> {
    ensure_admin(user)?;

    let existing = Deals::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(d) => d,
        None => return Err(AppError::NotFound),
    };

    let discount_percent = payload
        .discount_percent
        .unwrap_or(existing.discount_percent);
    validate_discount(discount_percent)?;

    let start_time = payload
        .start_time
        .unwrap_or_else(|| existing.start_time.with_timezone(&Utc));

    // Re-derive the time box only when the request touches it.
    let duration_secs = if payload.duration_secs.is_some() || payload.end_time.is_some() {
        resolve_duration(start_time, payload.duration_secs, payload.end_time)?
    } else {
        existing.duration_secs
    };

    let mut active: DealActive = existing.into();
    active.discount_percent = Set(discount_percent);
    active.start_time = Set(start_time.into());
    active.duration_secs = Set(duration_secs);

    let deal = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "deal_update",
        Some("deals"),
        Some(serde_json::json!({ "deal_id": deal.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let view = fetch_deal_view(&state.pool, deal.id).await?;
    Ok(ApiResponse::success("Deal updated", view, Some(Meta::empty())))
}

async fn fetch_deal_view(pool: &DbPool, id: Uuid) -> AppResult<DealView> {
    let row = sqlx::query_as::<_, DealRow>(
        r#"
        SELECT d.id, d.product_id, d.discount_percent, d.start_time,
               d.start_time + d.duration_secs * INTERVAL '1 second' AS end_time,
               p.name AS product_name,
               img.image_path AS product_image
        FROM deals d
        JOIN products p ON p.id = d.product_id
        LEFT JOIN LATERAL (
            SELECT image_path
            FROM product_images
            WHERE product_id = p.id
            ORDER BY uploaded_at, id
            LIMIT 1
        ) img ON TRUE
        WHERE d.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(r) => Ok(DealView::from(r)),
        None => Err(AppError::NotFound),
    }
}
