//! Event query filter builder
//!
//! Translates the optional search/filter parameters of a listing request into
//! SQL conjuncts, with the caller's visibility rule layered on top. The
//! visibility condition is always appended as its own AND conjunct: a
//! free-text search produces a separate parenthesized OR group, so the two
//! are never flattened into one disjunction (which would leak other users'
//! draft and cancelled events to searchers).

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};

use crate::config::PaginationConfig;
use crate::models::Caller;

/// Optional filters for event listings. All present filters are conjunctive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFilters {
    /// Case-insensitive substring match on title, description or city
    pub search: Option<String>,
    pub category: Option<String>,
    /// Only honored for admin callers; everyone else gets the visibility rule
    pub status: Option<String>,
    /// Case-insensitive substring match on city alone
    pub city: Option<String>,
    pub organizer: Option<i64>,
    pub start_date_from: Option<DateTime<Utc>>,
    pub start_date_to: Option<DateTime<Utc>>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
}

/// Full listing request: filters plus pagination and sort
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    #[serde(flatten)]
    pub filters: EventFilters,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Comma-separated field list, `-` prefix for descending
    pub sort: Option<String>,
}

/// A single validated ORDER BY term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortField {
    pub column: &'static str,
    pub descending: bool,
}

/// Append the WHERE clause for `filters` as seen by `caller`.
///
/// The produced clause always starts with `WHERE TRUE` so every filter can be
/// appended uniformly as an AND conjunct.
pub fn apply_event_filters(
    qb: &mut QueryBuilder<'_, Postgres>,
    filters: &EventFilters,
    caller: &Caller,
) {
    qb.push(" WHERE TRUE");

    // Visibility comes first and stands alone. Admins see everything unless
    // they narrow by status; everyone else is restricted to published events
    // plus (when authenticated) their own.
    match caller {
        Caller::Authenticated { user_id, .. } if !caller.is_admin() => {
            qb.push(" AND (status = 'published' OR organizer_id = ");
            qb.push_bind(*user_id);
            qb.push(")");
        }
        Caller::Anonymous => {
            qb.push(" AND status = 'published'");
        }
        _ => {
            if let Some(status) = &filters.status {
                qb.push(" AND status = ");
                qb.push_bind(status.clone());
            }
        }
    }

    if let Some(search) = &filters.search {
        let pattern = format!("%{}%", search);
        qb.push(" AND (title ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR description ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR city ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }

    if let Some(category) = &filters.category {
        qb.push(" AND category = ");
        qb.push_bind(category.clone());
    }

    if let Some(city) = &filters.city {
        qb.push(" AND city ILIKE ");
        qb.push_bind(format!("%{}%", city));
    }

    if let Some(organizer) = filters.organizer {
        qb.push(" AND organizer_id = ");
        qb.push_bind(organizer);
    }

    if let Some(from) = filters.start_date_from {
        qb.push(" AND start_date >= ");
        qb.push_bind(from);
    }

    if let Some(to) = filters.start_date_to {
        qb.push(" AND start_date <= ");
        qb.push_bind(to);
    }

    if let Some(min) = filters.price_min {
        qb.push(" AND price >= ");
        qb.push_bind(min);
    }

    if let Some(max) = filters.price_max {
        qb.push(" AND price <= ");
        qb.push_bind(max);
    }
}

/// Map a requested sort field to a real column. ORDER BY cannot use bind
/// parameters, so unknown names are dropped rather than interpolated.
fn sort_column(name: &str) -> Option<&'static str> {
    match name {
        "created_at" | "createdAt" => Some("created_at"),
        "start_date" | "startDate" => Some("start_date"),
        "end_date" | "endDate" => Some("end_date"),
        "title" => Some("title"),
        "price" => Some("price"),
        "capacity" => Some("capacity"),
        "registration_count" | "registrationCount" => Some("registration_count"),
        _ => None,
    }
}

/// Parse a sort string like `-created_at,title` into validated sort terms.
/// Defaults to newest-created first when nothing usable remains.
pub fn parse_sort(sort: Option<&str>) -> Vec<SortField> {
    let mut fields = Vec::new();

    if let Some(sort) = sort {
        for raw in sort.split(',') {
            let raw = raw.trim();
            let (name, descending) = match raw.strip_prefix('-') {
                Some(rest) => (rest, true),
                None => (raw, false),
            };
            if let Some(column) = sort_column(name) {
                fields.push(SortField { column, descending });
            }
        }
    }

    if fields.is_empty() {
        fields.push(SortField {
            column: "created_at",
            descending: true,
        });
    }

    fields
}

/// Append an ORDER BY clause. Columns come from the whitelist in
/// [`parse_sort`], so plain pushes are safe here.
pub fn push_order_by(qb: &mut QueryBuilder<'_, Postgres>, sort: &[SortField]) {
    qb.push(" ORDER BY ");
    for (i, field) in sort.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        qb.push(field.column);
        qb.push(if field.descending { " DESC" } else { " ASC" });
    }
}

/// Normalize page/limit: page floors at 1, limit is clamped to
/// `1..=max_limit` and falls back to the configured default.
pub fn clamp_pagination(
    page: Option<i64>,
    limit: Option<i64>,
    config: &PaginationConfig,
) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit
        .unwrap_or(config.default_limit)
        .clamp(1, config.max_limit);
    (page, limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_for(filters: &EventFilters, caller: &Caller) -> String {
        let mut qb = QueryBuilder::new("SELECT * FROM events");
        apply_event_filters(&mut qb, filters, caller);
        qb.sql().to_string()
    }

    #[test]
    fn anonymous_sees_only_published() {
        let sql = sql_for(&EventFilters::default(), &Caller::Anonymous);
        assert!(sql.contains("AND status = 'published'"));
        assert!(!sql.contains("organizer_id"));
    }

    #[test]
    fn authenticated_sees_published_or_own() {
        let sql = sql_for(&EventFilters::default(), &Caller::user(42));
        assert!(sql.contains("(status = 'published' OR organizer_id = $1)"));
    }

    #[test]
    fn admin_without_status_sees_everything() {
        let sql = sql_for(&EventFilters::default(), &Caller::admin(1));
        assert!(!sql.contains("status"));
        assert!(!sql.contains("organizer_id"));
    }

    #[test]
    fn admin_status_filter_is_honored() {
        let filters = EventFilters {
            status: Some("draft".to_string()),
            ..Default::default()
        };
        let sql = sql_for(&filters, &Caller::admin(1));
        assert!(sql.contains("AND status = $1"));
    }

    #[test]
    fn non_admin_status_filter_is_ignored() {
        // A non-admin cannot widen visibility by asking for another status.
        let filters = EventFilters {
            status: Some("draft".to_string()),
            ..Default::default()
        };
        let sql = sql_for(&filters, &Caller::user(42));
        assert!(sql.contains("(status = 'published' OR organizer_id = $1)"));
        assert!(!sql.contains("status = $2"));
    }

    #[test]
    fn search_and_visibility_stay_separate_conjuncts() {
        let filters = EventFilters {
            search: Some("rust".to_string()),
            ..Default::default()
        };

        let sql = sql_for(&filters, &Caller::user(42));
        let visibility = sql
            .find("(status = 'published' OR organizer_id = $1)")
            .expect("visibility conjunct missing");
        let search = sql
            .find("AND (title ILIKE $2 OR description ILIKE $3 OR city ILIKE $4)")
            .expect("search conjunct missing");
        // Both groups present, joined by AND, each in its own parentheses.
        assert!(visibility < search);

        let sql = sql_for(&filters, &Caller::Anonymous);
        assert!(sql.contains("AND status = 'published'"));
        assert!(sql.contains("AND (title ILIKE $1 OR description ILIKE $2 OR city ILIKE $3)"));
    }

    #[test]
    fn conjunctive_filters_apply_for_all_callers() {
        let filters = EventFilters {
            category: Some("concert".to_string()),
            city: Some("par".to_string()),
            organizer: Some(7),
            price_min: Some(0.0),
            price_max: Some(25.0),
            start_date_from: Some(Utc::now()),
            ..Default::default()
        };
        let sql = sql_for(&filters, &Caller::admin(1));
        assert!(sql.contains("AND category = "));
        assert!(sql.contains("AND city ILIKE "));
        assert!(sql.contains("AND organizer_id = "));
        assert!(sql.contains("AND price >= "));
        assert!(sql.contains("AND price <= "));
        assert!(sql.contains("AND start_date >= "));
    }

    #[test]
    fn sort_parsing_with_descending_marker() {
        let sort = parse_sort(Some("-start_date,title"));
        assert_eq!(
            sort,
            vec![
                SortField {
                    column: "start_date",
                    descending: true
                },
                SortField {
                    column: "title",
                    descending: false
                },
            ]
        );
    }

    #[test]
    fn sort_accepts_camel_case_aliases() {
        let sort = parse_sort(Some("-createdAt"));
        assert_eq!(sort[0].column, "created_at");
        assert!(sort[0].descending);
    }

    #[test]
    fn sort_rejects_unknown_columns() {
        let sort = parse_sort(Some("password; DROP TABLE events"));
        // Unknown input falls back to the default sort.
        assert_eq!(
            sort,
            vec![SortField {
                column: "created_at",
                descending: true
            }]
        );
    }

    #[test]
    fn default_sort_is_newest_first() {
        let sort = parse_sort(None);
        assert_eq!(sort[0].column, "created_at");
        assert!(sort[0].descending);
    }

    #[test]
    fn order_by_rendering() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM events");
        push_order_by(&mut qb, &parse_sort(Some("-price,title")));
        assert!(qb.sql().ends_with(" ORDER BY price DESC, title ASC"));
    }

    #[test]
    fn pagination_clamping() {
        let config = PaginationConfig {
            default_limit: 10,
            max_limit: 100,
        };
        assert_eq!(clamp_pagination(None, None, &config), (1, 10));
        assert_eq!(clamp_pagination(Some(0), Some(0), &config), (1, 1));
        assert_eq!(clamp_pagination(Some(-5), Some(500), &config), (1, 100));
        assert_eq!(clamp_pagination(Some(3), Some(25), &config), (3, 25));
    }
}
