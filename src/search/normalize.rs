use serde_json::{Map, Value};
use tracing::warn;

use crate::database::models::listing::{ListingRecord, ListingRow};

/// Reshape a stored row into the external listing representation: the
/// serialized photo list becomes `photo_urls` and the attribute bag is always
/// present as a mapping. Malformed stored data degrades to empty defaults and
/// never fails the query.
pub fn normalize_row(row: ListingRow) -> ListingRecord {
    let photo_urls = parse_photo_list(row.id, row.photos.as_deref());
    let attributes = match row.attributes {
        Some(Value::Object(map)) => map,
        Some(_) => {
            warn!(listing_id = row.id, "stored attribute bag is not an object, substituting empty");
            Map::new()
        }
        None => Map::new(),
    };

    ListingRecord {
        id: row.id,
        title: row.title,
        description: row.description,
        price: row.price,
        condition: row.condition,
        status: row.status,
        created_at: row.created_at,
        photo_urls,
        user_id: row.user_id,
        category_id: row.category_id,
        location: row.location,
        category_name: row.category_name,
        attributes,
    }
}

pub fn normalize_rows(rows: Vec<ListingRow>) -> Vec<ListingRecord> {
    rows.into_iter().map(normalize_row).collect()
}

/// Parse the stored photo list (a serialized JSON array of URI strings).
/// Missing, empty, or malformed data yields an empty list.
fn parse_photo_list(listing_id: i32, raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Vec::new();
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(url) => Some(url),
                _ => None,
            })
            .collect(),
        Ok(_) | Err(_) => {
            warn!(listing_id, "malformed stored photo list, substituting empty");
            Vec::new()
        }
    }
}
