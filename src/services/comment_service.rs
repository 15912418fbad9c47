use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::auth::UserPublic,
    dto::comments::{AddCommentRequest, CommentList, CommentView},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_owner},
    response::{ApiResponse, Meta},
};

#[derive(sqlx::FromRow)]
struct CommentUserRow {
    id: Uuid,
    product_id: Uuid,
    text: String,
    created_at: DateTime<Utc>,
    user_id: Uuid,
    email: String,
    username: String,
    first_name: String,
    last_name: String,
    role: String,
    user_created_at: DateTime<Utc>,
}

impl From<CommentUserRow> for CommentView {
    fn from(row: CommentUserRow) -> Self {
        CommentView {
            created_at: row.created_at,
            id: row.id,
            product_id: row.product_id,
            text: row.text,
            user: UserPublic {
                created_at: row.user_created_at,
                email: row.email,
                first_name: row.first_name,
                id: row.user_id,
                last_name: row.last_name,
                role: row.role,
                username: row.username,
            },
        }
    }
}

pub(crate) async fn product_exists(pool: &DbPool, product_id: Uuid) -> AppResult<bool> {
    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
            .bind(product_id)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

pub(crate) async fn fetch_comment_views(
    pool: &DbPool,
    product_id: Uuid,
) -> AppResult<Vec<CommentView>> {
    let rows = sqlx::query_as::<_, CommentUserRow>(
        r#"
        SELECT c.id, c.product_id, c.text, c.created_at,
               u.id AS user_id, u.email, u.username, u.first_name, u.last_name,
               u.role, u.created_at AS user_created_at
        FROM comments c
        JOIN users u ON u.id = c.user_id
        WHERE c.product_id = $1
        ORDER BY c.created_at DESC
        "#,
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(CommentView::from).collect())
}

pub async fn list_comments(
    pool: &DbPool,
    product_id: Uuid,
) -> AppResult<ApiResponse<CommentList>> {
    if !product_exists(pool, product_id).await? {
        return Err(AppError::NotFound);
    }

    let results = fetch_comment_views(pool, product_id).await?;
    let data = CommentList {
        count: results.len() as i64,
        results,
    };

    Ok(ApiResponse::success("Comments", data, None))
}

pub async fn add_comment(
    pool: &DbPool,
    user: &AuthUser,
    product_id: Uuid,
    payload: AddCommentRequest,
) -> AppResult<ApiResponse<CommentView>> {
    if payload.text.trim().is_empty() {
        return Err(AppError::BadRequest("Comment text cannot be empty".into()));
    }
    if !product_exists(pool, product_id).await? {
        return Err(AppError::NotFound);
    }

    let row = sqlx::query_as::<_, CommentUserRow>(
        r#"
        WITH inserted AS (
            INSERT INTO comments (id, user_id, product_id, text)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, product_id, text, created_at
        )
        SELECT i.id, i.product_id, i.text, i.created_at,
               u.id AS user_id, u.email, u.username, u.first_name, u.last_name,
               u.role, u.created_at AS user_created_at
        FROM inserted i
        JOIN users u ON u.id = i.user_id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.user_id)
    .bind(product_id)
    .bind(payload.text)
    .fetch_one(pool)
    .await?;

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "comment_add",
        Some("comments"),
        Some(serde_json::json!({ "product_id": product_id, "comment_id": row.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Comment added",
        CommentView::from(row),
        Some(Meta::empty()),
    ))
}

pub async fn delete_comment(
    pool: &DbPool,
    user: &AuthUser,
    comment_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let owner: Option<(Uuid,)> = sqlx::query_as("SELECT user_id FROM comments WHERE id = $1")
        .bind(comment_id)
        .fetch_optional(pool)
        .await?;

    let (owner_id,) = match owner {
        Some(row) => row,
        None => return Err(AppError::NotFound),
    };

    // Only the author may remove a comment.
    ensure_owner(user, owner_id)?;

    sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(pool)
        .await?;

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "comment_delete",
        Some("comments"),
        Some(serde_json::json!({ "comment_id": comment_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Comment deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
