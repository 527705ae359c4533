//! Request options and query metadata
//!
//! Everything alongside the query body: pagination, field projection, and
//! the sort envelope. Metadata is computed independently of the clauses.

use serde::{Deserialize, Serialize};

use crate::query::sort::{parse_sort, SortKey};
use crate::Result;

/// Default number of documents per page
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Hard cap on documents per page
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pattern matching the internal fields hidden from results by default
const INTERNAL_FIELDS: &str = "_*";

/// Options accompanying a search request
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Zero-based page number
    pub page: u32,
    /// Requested page size, clamped to [1, `MAX_PAGE_SIZE`]
    pub per_page: u32,
    /// Explicit allow-list of fields to return
    pub fields: Option<Vec<String>>,
    /// Sort spec, e.g. `"state:desc, population:asc,name"`
    pub sort: Option<String>,
    /// Zip code anchoring a geo-distance search
    pub zip: Option<String>,
    /// Search radius, passed through to the engine verbatim (e.g. `"30mi"`)
    pub distance: Option<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            page: 0,
            per_page: DEFAULT_PAGE_SIZE,
            fields: None,
            sort: None,
            zip: None,
            distance: None,
        }
    }
}

/// The `_source` directive sent with the query
///
/// Serializes either as `{"exclude": ["_*"]}` (the default, hiding internal
/// fields) or as `false` when an explicit field allow-list takes over.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SourceFilter {
    Exclude { exclude: Vec<String> },
    Enabled(bool),
}

impl Default for SourceFilter {
    fn default() -> Self {
        SourceFilter::Exclude {
            exclude: vec![INTERNAL_FIELDS.to_string()],
        }
    }
}

/// Pagination window: `(from, size)`
///
/// The page size is clamped before the offset is computed, so an oversized
/// `per_page` cannot push `from` past the real window.
pub fn paging(options: &SearchOptions) -> (u64, u64) {
    let size = options.per_page.clamp(1, MAX_PAGE_SIZE) as u64;
    (options.page as u64 * size, size)
}

/// Field projection: the `_source` directive plus the optional allow-list
///
/// Exactly one of the two shapes holds: an explicit `fields` list disables
/// source filtering entirely, otherwise internal fields are excluded.
pub fn projection(options: &SearchOptions) -> (SourceFilter, Option<Vec<String>>) {
    match &options.fields {
        Some(fields) => (SourceFilter::Enabled(false), Some(fields.clone())),
        None => (SourceFilter::default(), None),
    }
}

/// The sort envelope, present only when the sort option is non-empty
pub fn sort_keys(options: &SearchOptions) -> Result<Option<Vec<SortKey>>> {
    match options.sort.as_deref() {
        None => Ok(None),
        Some(spec) => {
            let keys = parse_sort(spec)?;
            Ok(if keys.is_empty() { None } else { Some(keys) })
        }
    }
}
