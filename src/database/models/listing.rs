use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::FromRow;

/// Moderation state gating listing visibility in search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ModerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationStatus::Pending => "pending",
            ModerationStatus::Approved => "approved",
            ModerationStatus::Rejected => "rejected",
        }
    }
}

/// One listing row as selected from the store, photo list still in its
/// serialized column form. Every listing read path selects this shape (see
/// [`crate::search::LISTING_SELECT`]).
#[derive(Debug, Clone, FromRow)]
pub struct ListingRow {
    pub id: i32,
    pub user_id: i32,
    pub category_id: Option<i32>,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub condition: String,
    pub location: Option<String>,
    pub status: String,
    pub photos: Option<String>,
    pub attributes: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub category_name: Option<String>,
}

/// External listing representation. The stored photo column is never exposed;
/// photos appear only as `photo_urls`.
#[derive(Debug, Clone, Serialize)]
pub struct ListingRecord {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub condition: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub photo_urls: Vec<String>,
    pub user_id: i32,
    pub category_id: Option<i32>,
    pub location: Option<String>,
    pub category_name: Option<String>,
    pub attributes: Map<String, Value>,
}
