use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::likes::LikeStatus,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    services::comment_service::product_exists,
};

pub(crate) async fn like_count(pool: &DbPool, product_id: Uuid) -> AppResult<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM likes WHERE product_id = $1")
        .bind(product_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn add_like(
    pool: &DbPool,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<LikeStatus>> {
    if !product_exists(pool, product_id).await? {
        return Err(AppError::NotFound);
    }

    // The unique constraint arbitrates concurrent likes: of two racing inserts
    // exactly one returns a row, the other takes the conflict branch.
    let inserted: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO likes (id, user_id, product_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, product_id) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.user_id)
    .bind(product_id)
    .fetch_optional(pool)
    .await?;

    if inserted.is_none() {
        return Err(AppError::Conflict("Already liked".into()));
    }

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "like_add",
        Some("likes"),
        Some(serde_json::json!({ "product_id": product_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let like_count = like_count(pool, product_id).await?;
    Ok(ApiResponse::success(
        "Liked",
        LikeStatus {
            like_count,
            liked: true,
        },
        Some(Meta::empty()),
    ))
}

pub async fn remove_like(pool: &DbPool, user: &AuthUser, product_id: Uuid) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM likes WHERE user_id = $1 AND product_id = $2")
        .bind(user.user_id)
        .bind(product_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "like_remove",
        Some("likes"),
        Some(serde_json::json!({ "product_id": product_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(())
}
