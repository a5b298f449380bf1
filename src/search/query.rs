use super::conditions::{BindValue, ConditionSet};
use super::criteria::{AttributeFilter, ListingFilters};

/// Fixed page size for search results.
pub const PAGE_SIZE: i64 = 50;

/// Shared projection for every listing read path, so the normalizer always
/// sees the same column set.
pub const LISTING_SELECT: &str = "SELECT a.id, a.user_id, a.category_id, a.title, a.description, \
     a.price, a.condition, a.location, a.status, a.photos, a.attributes, a.created_at, \
     c.name AS category_name \
     FROM ads a LEFT JOIN categories c ON a.category_id = c.id";

#[derive(Debug)]
pub struct SearchQuery {
    pub sql: String,
    pub params: Vec<BindValue>,
}

/// Render the main search query. `category_ids` is the already-expanded
/// category set (requested id plus its direct children) when a category
/// criterion was supplied.
pub fn build_search_query(filters: &ListingFilters, category_ids: Option<Vec<i32>>) -> SearchQuery {
    let mut conditions = ConditionSet::new();
    conditions.push_literal("a.status = 'approved'");
    conditions.push_literal("a.archived = FALSE");

    if let Some(ids) = category_ids {
        conditions.push("a.category_id = ANY($?)", BindValue::IdList(ids));
    }
    if let Some(min) = filters.min_price {
        conditions.push("a.price >= $?", BindValue::Decimal(min));
    }
    if let Some(max) = filters.max_price {
        conditions.push("a.price <= $?", BindValue::Decimal(max));
    }
    if let Some(location) = &filters.location {
        conditions.push(
            "a.location ILIKE $?",
            BindValue::Text(format!("%{}%", escape_like(location))),
        );
    }

    for attribute in &filters.attributes {
        match attribute {
            AttributeFilter::TextEquals { key, value } => {
                conditions.push(
                    &format!("a.attributes->>'{key}' = $?"),
                    BindValue::Text(value.clone()),
                );
            }
            AttributeFilter::NumberEquals { key, value } => {
                conditions.push(
                    &format!("(a.attributes->>'{key}')::numeric = $?"),
                    BindValue::Decimal(*value),
                );
            }
            AttributeFilter::NumberMin { key, value } => {
                conditions.push(
                    &format!("(a.attributes->>'{key}')::numeric >= $?"),
                    BindValue::Decimal(*value),
                );
            }
            AttributeFilter::NumberMax { key, value } => {
                conditions.push(
                    &format!("(a.attributes->>'{key}')::numeric <= $?"),
                    BindValue::Decimal(*value),
                );
            }
            // Flags only ever hold a parsed bool, so they render as inline
            // constants and bind nothing.
            AttributeFilter::Flag { key, value } => {
                let literal = if *value { "TRUE" } else { "FALSE" };
                conditions.push_literal(format!(
                    "COALESCE((a.attributes->>'{key}')::boolean, FALSE) = {literal}"
                ));
            }
        }
    }

    if filters.has_photo {
        // Raw-text presence check only. Stored photo text that is non-empty
        // but not a valid JSON array passes here yet normalizes to an empty
        // photo_urls list; the filter does not re-parse what the normalizer
        // will.
        conditions.push_literal("a.photos IS NOT NULL AND a.photos <> '' AND a.photos <> '[]'");
    }

    let (where_clause, params) = conditions.into_parts();
    let sql = format!(
        "{LISTING_SELECT} WHERE {where_clause} ORDER BY a.created_at DESC LIMIT {PAGE_SIZE}"
    );
    SearchQuery { sql, params }
}

/// Escape LIKE metacharacters in user-supplied substring text.
fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::criteria::SearchCriteria;

    fn parse(criteria: SearchCriteria) -> ListingFilters {
        ListingFilters::parse(&criteria).unwrap()
    }

    #[test]
    fn no_criteria_renders_base_predicate_only() {
        let query = build_search_query(&ListingFilters::default(), None);
        assert_eq!(
            query.sql,
            format!(
                "{LISTING_SELECT} WHERE a.status = 'approved' AND a.archived = FALSE \
                 ORDER BY a.created_at DESC LIMIT 50"
            )
        );
        assert!(query.params.is_empty());
    }

    #[test]
    fn category_set_binds_one_list_parameter() {
        let filters = parse(SearchCriteria {
            category_id: Some("5".into()),
            ..Default::default()
        });
        let query = build_search_query(&filters, Some(vec![5, 12, 13]));
        assert!(query.sql.contains("a.category_id = ANY($1)"));
        assert_eq!(query.params, vec![BindValue::IdList(vec![5, 12, 13])]);
    }

    #[test]
    fn scenario_category_price_range_and_photo() {
        let filters = parse(SearchCriteria {
            category_id: Some("5".into()),
            min_price: Some("100000".into()),
            max_price: Some("500000".into()),
            has_photo: Some("true".into()),
            ..Default::default()
        });
        let query = build_search_query(&filters, Some(vec![5, 12, 13]));

        assert!(query.sql.contains("a.status = 'approved'"));
        assert!(query.sql.contains("a.archived = FALSE"));
        assert!(query.sql.contains("a.category_id = ANY($1)"));
        assert!(query.sql.contains("a.price >= $2"));
        assert!(query.sql.contains("a.price <= $3"));
        assert!(query.sql.contains("a.photos IS NOT NULL"));
        assert!(query.sql.ends_with("ORDER BY a.created_at DESC LIMIT 50"));
        assert_eq!(
            query.params,
            vec![
                BindValue::IdList(vec![5, 12, 13]),
                BindValue::Decimal("100000".parse().unwrap()),
                BindValue::Decimal("500000".parse().unwrap()),
            ]
        );
    }

    #[test]
    fn attribute_filters_extract_from_the_bag() {
        let filters = parse(SearchCriteria {
            deal_type: Some("rent".into()),
            rooms: Some("2".into()),
            min_area: Some("40".into()),
            max_floor: Some("5".into()),
            has_wifi: Some("true".into()),
            has_gas: Some("false".into()),
            ..Default::default()
        });
        let query = build_search_query(&filters, None);

        assert!(query.sql.contains("a.attributes->>'deal_type' = $1"));
        assert!(query.sql.contains("(a.attributes->>'rooms')::numeric = $2"));
        assert!(query.sql.contains("(a.attributes->>'area')::numeric >= $3"));
        assert!(query.sql.contains("(a.attributes->>'floor')::numeric <= $4"));
        assert!(query
            .sql
            .contains("COALESCE((a.attributes->>'has_wifi')::boolean, FALSE) = TRUE"));
        assert!(query
            .sql
            .contains("COALESCE((a.attributes->>'has_gas')::boolean, FALSE) = FALSE"));
        assert_eq!(query.params.len(), 4);
    }

    #[test]
    fn location_is_a_case_insensitive_substring_match() {
        let filters = parse(SearchCriteria {
            location: Some("Old Town".into()),
            ..Default::default()
        });
        let query = build_search_query(&filters, None);
        assert!(query.sql.contains("a.location ILIKE $1"));
        assert_eq!(query.params, vec![BindValue::Text("%Old Town%".into())]);
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[test]
    fn parameter_positions_survive_interleaved_literal_flags() {
        let filters = parse(SearchCriteria {
            min_price: Some("10".into()),
            has_wifi: Some("true".into()),
            min_guests: Some("4".into()),
            ..Default::default()
        });
        let query = build_search_query(&filters, None);
        // min_price binds $1, the wifi flag binds nothing, guests binds $2.
        assert!(query.sql.contains("a.price >= $1"));
        assert!(query.sql.contains("(a.attributes->>'guests')::numeric >= $2"));
        assert_eq!(query.params.len(), 2);
    }
}
