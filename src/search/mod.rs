//! Listing search: criteria parsing, structured predicate assembly, query
//! execution, and row normalization.
//!
//! The operation is a pure read: one auxiliary subcategory lookup when a
//! category criterion is present, then one main query. All failures collapse
//! to [`SearchError`]; callers surface it as a single generic search failure.

pub mod conditions;
pub mod criteria;
pub mod error;
pub mod normalize;
pub mod query;

pub use conditions::{BindValue, ConditionSet};
pub use criteria::{ListingFilters, SearchCriteria};
pub use error::SearchError;
pub use normalize::{normalize_row, normalize_rows};
pub use query::{build_search_query, SearchQuery, LISTING_SELECT, PAGE_SIZE};

use sqlx::postgres::PgArguments;
use sqlx::{FromRow, PgPool};

use crate::database::models::listing::{ListingRecord, ListingRow};

/// Execute a listing search against the store and return normalized records,
/// newest first, capped at [`PAGE_SIZE`].
pub async fn search_listings(
    pool: &PgPool,
    criteria: &SearchCriteria,
) -> Result<Vec<ListingRecord>, SearchError> {
    let filters = ListingFilters::parse(criteria)?;

    // The subcategory set must be known before the IN-style predicate can be
    // rendered, hence the one prior lookup.
    let category_ids = match filters.category_id {
        Some(id) => Some(expand_category(pool, id).await?),
        None => None,
    };

    let query = build_search_query(&filters, category_ids);
    let rows = fetch_rows(pool, &query).await?;
    Ok(normalize_rows(rows))
}

/// Expand a category id to itself plus its direct children. The hierarchy is
/// two levels deep, so no recursion is needed.
async fn expand_category(pool: &PgPool, category_id: i32) -> Result<Vec<i32>, SearchError> {
    let children: Vec<i32> = sqlx::query_scalar("SELECT id FROM categories WHERE parent_id = $1")
        .bind(category_id)
        .fetch_all(pool)
        .await?;

    let mut ids = Vec::with_capacity(children.len() + 1);
    ids.push(category_id);
    ids.extend(children);
    Ok(ids)
}

async fn fetch_rows(pool: &PgPool, query: &SearchQuery) -> Result<Vec<ListingRow>, SearchError> {
    let mut q = sqlx::query_as::<_, ListingRow>(&query.sql);
    for param in &query.params {
        q = bind_value(q, param);
    }
    Ok(q.fetch_all(pool).await?)
}

fn bind_value<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    value: &'q BindValue,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match value {
        BindValue::Decimal(d) => q.bind(*d),
        BindValue::Text(s) => q.bind(s.as_str()),
        BindValue::IdList(ids) => q.bind(ids.as_slice()),
    }
}
