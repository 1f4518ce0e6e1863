//! Pagination view over list responses.
//!
//! List endpoints embed `meta.pagination` in their body:
//!
//! ```json
//! {"meta": {"pagination": {"page": 2, "per_page": 25, "previous_page": 1,
//!   "next_page": 3, "last_page": 5, "total_entries": 120}}}
//! ```
//!
//! [`PaginationView::from_meta`] is the one place that turns that object into
//! page position and navigation links; every list response goes through it.
//! Arithmetic is signed and saturating: odd input (page 0, negative totals)
//! follows the formula, and values near the `i64` limits clamp instead of
//! overflowing.

use serde::Serialize;
use serde_json::Value;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 25;

/// Relative navigation links, `?page=N`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    pub first: Option<String>,
    pub last: Option<String>,
    pub prev: Option<String>,
    pub next: Option<String>,
}

/// Derived, read-only summary of where a list response sits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationView {
    pub current_page: i64,
    pub per_page: i64,
    pub total: i64,
    pub last_page: i64,
    pub from: i64,
    pub to: i64,
    pub has_more_pages: bool,
    pub links: PageLinks,
    #[serde(skip)]
    next_page: Option<i64>,
}

impl PaginationView {
    /// Compute the view from a response body's `meta` object.
    ///
    /// A missing `pagination` key, or a missing `meta`, behaves like an empty
    /// object: page 1 of an empty list.
    pub fn from_meta(meta: &Value) -> Self {
        Self::from_pagination(meta.get("pagination").unwrap_or(&Value::Null))
    }

    /// Compute the view from the `meta.pagination` object itself.
    pub fn from_pagination(pagination: &Value) -> Self {
        let int = |key: &str| pagination.get(key).and_then(Value::as_i64);

        let page = int("page").unwrap_or(DEFAULT_PAGE);
        let per_page = int("per_page").unwrap_or(DEFAULT_PER_PAGE);
        let total = int("total_entries").unwrap_or(0);
        let last_page = int("last_page").unwrap_or(1);
        let previous_page = pagination.get("previous_page").filter(|v| !v.is_null());
        let next_page = pagination.get("next_page").filter(|v| !v.is_null());

        let from = page
            .saturating_sub(1)
            .saturating_mul(per_page)
            .saturating_add(1);
        let to = page.saturating_mul(per_page).min(total);

        let links = PageLinks {
            first: (page > 1).then(|| "?page=1".to_string()),
            last: (last_page > 1).then(|| format!("?page={last_page}")),
            prev: previous_page.filter(|v| truthy(v)).map(page_link),
            next: next_page.filter(|v| truthy(v)).map(page_link),
        };

        PaginationView {
            current_page: page,
            per_page,
            total,
            last_page,
            from,
            to,
            has_more_pages: next_page.is_some(),
            links,
            next_page: next_page.and_then(Value::as_i64),
        }
    }

    /// Page number to request next, if the API reported one.
    pub fn next_page(&self) -> Option<i64> {
        self.next_page.filter(|page| *page != 0)
    }
}

// The API sends page numbers as integers; `0`, `false` and `""` count as
// "no page".
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(a) => !a.is_empty(),
        Value::Object(_) => true,
    }
}

fn page_link(value: &Value) -> String {
    match value {
        Value::String(s) => format!("?page={s}"),
        other => format!("?page={other}"),
    }
}
