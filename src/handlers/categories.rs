use axum::extract::State;

use crate::database::models::category::{build_tree, Category, CategoryNode};
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/categories - full two-level category tree, name-ordered.
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<CategoryNode>> {
    let categories =
        sqlx::query_as::<_, Category>("SELECT id, name, parent_id FROM categories ORDER BY name")
            .fetch_all(&state.pool)
            .await?;

    Ok(ApiResponse::success(build_tree(categories)))
}
