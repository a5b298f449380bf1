use axum::extract::{Extension, Path, State};
use serde_json::{json, Value};

use crate::database::models::listing::{ListingRecord, ListingRow, ModerationStatus};
use crate::error::ApiError;
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::search::{normalize_rows, LISTING_SELECT};

fn require_admin(user: &AuthUser) -> Result<(), ApiError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(ApiError::forbidden("Admin role required"))
    }
}

/// GET /api/moderation/pending - listings waiting for review, oldest first.
pub async fn pending(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<ListingRecord>> {
    require_admin(&user)?;

    let sql = format!(
        "{LISTING_SELECT} WHERE a.status = 'pending' AND a.archived = FALSE \
         ORDER BY a.created_at ASC"
    );
    let rows = sqlx::query_as::<_, ListingRow>(&sql)
        .fetch_all(&state.pool)
        .await?;

    Ok(ApiResponse::success(normalize_rows(rows)))
}

/// POST /api/moderation/:id/approve
pub async fn approve(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<Value> {
    require_admin(&user)?;
    update_status(&state, id, ModerationStatus::Approved).await
}

/// POST /api/moderation/:id/reject
pub async fn reject(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<Value> {
    require_admin(&user)?;
    update_status(&state, id, ModerationStatus::Rejected).await
}

async fn update_status(state: &AppState, id: i32, status: ModerationStatus) -> ApiResult<Value> {
    let result = sqlx::query("UPDATE ads SET status = $1, updated_at = NOW() WHERE id = $2")
        .bind(status.as_str())
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Listing not found"));
    }
    Ok(ApiResponse::success(json!({ "id": id, "status": status.as_str() })))
}
