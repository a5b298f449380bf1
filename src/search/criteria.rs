use rust_decimal::Decimal;
use serde::Deserialize;

use super::error::SearchError;

/// Raw search criteria exactly as received on the query string. Every field
/// is optional; absence means "no constraint". Parameter names outside this
/// set are dropped during deserialization and impose no constraint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchCriteria {
    pub category_id: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub location: Option<String>,
    pub deal_type: Option<String>,
    pub rooms: Option<String>,
    pub min_area: Option<String>,
    pub max_area: Option<String>,
    pub min_floor: Option<String>,
    pub max_floor: Option<String>,
    pub has_electricity: Option<String>,
    pub has_water: Option<String>,
    pub has_gas: Option<String>,
    pub min_guests: Option<String>,
    pub min_bedrooms: Option<String>,
    pub has_wifi: Option<String>,
    pub has_parking: Option<String>,
    pub has_photo: Option<String>,
}

/// One typed constraint against the listing attribute bag. The key is always
/// a name from the static criteria set above, never request text.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeFilter {
    TextEquals { key: &'static str, value: String },
    NumberEquals { key: &'static str, value: Decimal },
    NumberMin { key: &'static str, value: Decimal },
    NumberMax { key: &'static str, value: Decimal },
    Flag { key: &'static str, value: bool },
}

/// Search criteria after parsing each raw string into its target type.
#[derive(Debug, Clone, Default)]
pub struct ListingFilters {
    pub category_id: Option<i32>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub location: Option<String>,
    pub attributes: Vec<AttributeFilter>,
    pub has_photo: bool,
}

impl ListingFilters {
    /// Parse raw criteria. Numeric criteria that fail to parse abort the
    /// whole search; flag criteria accept only the literal strings
    /// "true"/"false" and otherwise impose no constraint.
    pub fn parse(criteria: &SearchCriteria) -> Result<Self, SearchError> {
        let mut filters = ListingFilters {
            category_id: parse_int("category_id", &criteria.category_id)?,
            min_price: parse_number("min_price", &criteria.min_price)?,
            max_price: parse_number("max_price", &criteria.max_price)?,
            location: non_empty(&criteria.location),
            attributes: Vec::new(),
            has_photo: parse_flag(&criteria.has_photo) == Some(true),
        };

        if let Some(value) = non_empty(&criteria.deal_type) {
            filters
                .attributes
                .push(AttributeFilter::TextEquals { key: "deal_type", value });
        }
        if let Some(value) = parse_number("rooms", &criteria.rooms)? {
            filters
                .attributes
                .push(AttributeFilter::NumberEquals { key: "rooms", value });
        }
        if let Some(value) = parse_number("min_area", &criteria.min_area)? {
            filters
                .attributes
                .push(AttributeFilter::NumberMin { key: "area", value });
        }
        if let Some(value) = parse_number("max_area", &criteria.max_area)? {
            filters
                .attributes
                .push(AttributeFilter::NumberMax { key: "area", value });
        }
        if let Some(value) = parse_number("min_floor", &criteria.min_floor)? {
            filters
                .attributes
                .push(AttributeFilter::NumberMin { key: "floor", value });
        }
        if let Some(value) = parse_number("max_floor", &criteria.max_floor)? {
            filters
                .attributes
                .push(AttributeFilter::NumberMax { key: "floor", value });
        }
        if let Some(value) = parse_number("min_guests", &criteria.min_guests)? {
            filters
                .attributes
                .push(AttributeFilter::NumberMin { key: "guests", value });
        }
        if let Some(value) = parse_number("min_bedrooms", &criteria.min_bedrooms)? {
            filters
                .attributes
                .push(AttributeFilter::NumberMin { key: "bedrooms", value });
        }
        for (criterion, key) in [
            (&criteria.has_electricity, "has_electricity"),
            (&criteria.has_water, "has_water"),
            (&criteria.has_gas, "has_gas"),
            (&criteria.has_wifi, "has_wifi"),
            (&criteria.has_parking, "has_parking"),
        ] {
            if let Some(value) = parse_flag(criterion) {
                filters.attributes.push(AttributeFilter::Flag { key, value });
            }
        }

        Ok(filters)
    }
}

fn non_empty(raw: &Option<String>) -> Option<String> {
    raw.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_int(name: &'static str, raw: &Option<String>) -> Result<Option<i32>, SearchError> {
    match non_empty(raw) {
        Some(s) => s
            .parse::<i32>()
            .map(Some)
            .map_err(|_| SearchError::criteria(name, s)),
        None => Ok(None),
    }
}

fn parse_number(name: &'static str, raw: &Option<String>) -> Result<Option<Decimal>, SearchError> {
    match non_empty(raw) {
        Some(s) => s
            .parse::<Decimal>()
            .map(Some)
            .map_err(|_| SearchError::criteria(name, s)),
        None => Ok(None),
    }
}

/// Flags are only meaningful as the literal strings "true" or "false";
/// anything else imposes no constraint.
fn parse_flag(raw: &Option<String>) -> Option<bool> {
    match raw.as_deref().map(str::trim) {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    }
}
