use axum::extract::{Extension, Json, Path, Query, State};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::config;
use crate::database::models::listing::{ListingRecord, ListingRow, ModerationStatus};
use crate::error::ApiError;
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::search::{self, normalize_row, normalize_rows, SearchCriteria, LISTING_SELECT};

/// GET /api/ads - the listing search.
pub async fn search(
    State(state): State<AppState>,
    Query(criteria): Query<SearchCriteria>,
) -> ApiResult<Vec<ListingRecord>> {
    if config::config().search.debug_logging {
        debug!(?criteria, "listing search");
    }

    // Any failure surfaces as one generic search-failed condition (500);
    // the From impl logs the underlying cause.
    let records = search::search_listings(&state.pool, &criteria).await?;
    Ok(ApiResponse::success(records))
}

/// GET /api/ads/:id - single normalized listing.
pub async fn get_one(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<ListingRecord> {
    let sql = format!("{LISTING_SELECT} WHERE a.id = $1");
    let row = sqlx::query_as::<_, ListingRow>(&sql)
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Listing not found"))?;

    Ok(ApiResponse::success(normalize_row(row)))
}

#[derive(Debug, Deserialize)]
pub struct CreateListingRequest {
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub category_id: i32,
    pub condition: String,
    pub location: Option<String>,
    pub photos: Option<Vec<String>>,
    pub attributes: Option<Map<String, Value>>,
}

/// POST /api/ads - create a listing owned by the caller. New listings start
/// in the pending moderation state.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateListingRequest>,
) -> ApiResult<ListingRecord> {
    let title = payload.title.trim();
    let description = payload.description.trim();
    let condition = payload.condition.trim();
    if title.is_empty() || description.is_empty() || condition.is_empty() {
        return Err(ApiError::bad_request(
            "title, description, price, category_id and condition are required",
        ));
    }
    if payload.price < Decimal::ZERO {
        return Err(ApiError::bad_request("price must not be negative"));
    }

    let category_exists: Option<i32> =
        sqlx::query_scalar("SELECT id FROM categories WHERE id = $1")
            .bind(payload.category_id)
            .fetch_optional(&state.pool)
            .await?;
    if category_exists.is_none() {
        return Err(ApiError::bad_request("Unknown category"));
    }

    let photos = serde_json::to_string(&payload.photos.unwrap_or_default())
        .unwrap_or_else(|_| "[]".to_string());
    let attributes = Value::Object(payload.attributes.unwrap_or_default());

    let id: i32 = sqlx::query_scalar(
        "INSERT INTO ads (user_id, category_id, title, description, price, condition, location, \
         status, archived, photos, attributes) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE, $9, $10) RETURNING id",
    )
    .bind(user.id)
    .bind(payload.category_id)
    .bind(title)
    .bind(description)
    .bind(payload.price)
    .bind(condition)
    .bind(&payload.location)
    .bind(ModerationStatus::Pending.as_str())
    .bind(&photos)
    .bind(&attributes)
    .fetch_one(&state.pool)
    .await?;

    // Re-read through the shared projection so the response matches every
    // other listing read path.
    let sql = format!("{LISTING_SELECT} WHERE a.id = $1");
    let row = sqlx::query_as::<_, ListingRow>(&sql)
        .bind(id)
        .fetch_one(&state.pool)
        .await?;

    Ok(ApiResponse::created(normalize_row(row)))
}

/// GET /api/my/ads - the caller's own listings, any moderation status.
pub async fn my_ads(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<ListingRecord>> {
    let sql = format!(
        "{LISTING_SELECT} WHERE a.user_id = $1 AND a.archived = FALSE ORDER BY a.created_at DESC"
    );
    let rows = sqlx::query_as::<_, ListingRow>(&sql)
        .bind(user.id)
        .fetch_all(&state.pool)
        .await?;

    Ok(ApiResponse::success(normalize_rows(rows)))
}

/// DELETE /api/ads/:id - archive the caller's listing (soft removal).
pub async fn archive(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<Value> {
    let result =
        sqlx::query("UPDATE ads SET archived = TRUE, updated_at = NOW() WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user.id)
            .execute(&state.pool)
            .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Listing not found"));
    }
    Ok(ApiResponse::success(json!({ "id": id, "archived": true })))
}
