use axum::extract::{Extension, Path, State};
use serde_json::{json, Value};

use crate::database::models::listing::{ListingRecord, ListingRow};
use crate::error::ApiError;
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::search::{normalize_rows, LISTING_SELECT};

/// POST /api/ads/:id/favorite
pub async fn add(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(ad_id): Path<i32>,
) -> ApiResult<Value> {
    let exists: Option<i32> = sqlx::query_scalar("SELECT id FROM ads WHERE id = $1")
        .bind(ad_id)
        .fetch_optional(&state.pool)
        .await?;
    if exists.is_none() {
        return Err(ApiError::not_found("Listing not found"));
    }

    sqlx::query("INSERT INTO favorites (user_id, ad_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
        .bind(user.id)
        .bind(ad_id)
        .execute(&state.pool)
        .await?;

    Ok(ApiResponse::success(json!({ "ad_id": ad_id, "favorited": true })))
}

/// DELETE /api/ads/:id/favorite
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(ad_id): Path<i32>,
) -> ApiResult<Value> {
    let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND ad_id = $2")
        .bind(user.id)
        .bind(ad_id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Favorite not found"));
    }
    Ok(ApiResponse::success(json!({ "ad_id": ad_id, "favorited": false })))
}

/// GET /api/favorites - the caller's favorite listings, newest first.
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<ListingRecord>> {
    let sql = format!(
        "{LISTING_SELECT} JOIN favorites f ON f.ad_id = a.id \
         WHERE f.user_id = $1 ORDER BY a.created_at DESC"
    );
    let rows = sqlx::query_as::<_, ListingRow>(&sql)
        .bind(user.id)
        .fetch_all(&state.pool)
        .await?;

    Ok(ApiResponse::success(normalize_rows(rows)))
}
