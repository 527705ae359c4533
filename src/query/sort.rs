//! Sort specification parsing
//!
//! A sort spec is a comma-separated list of `field[:direction]` tokens:
//! `"state:desc, population:asc,name"`. Order is significant and duplicates
//! are preserved as given.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::DatalodeError;
use crate::Result;

/// Sort direction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// One sort key, serialized in engine form: `{"field": {"order": "asc"}}`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

impl Serialize for SortKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Order {
            order: SortDirection,
        }
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.field, &Order {
            order: self.direction,
        })?;
        map.end()
    }
}

/// Parse a sort spec into ordered sort keys
///
/// Whitespace around tokens and around the colon is trimmed; empty tokens
/// are skipped, so a blank spec yields no keys. A missing direction means
/// ascending; anything other than `asc`/`desc` (any case) is rejected.
pub fn parse_sort(spec: &str) -> Result<Vec<SortKey>> {
    spec.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(parse_token)
        .collect()
}

fn parse_token(token: &str) -> Result<SortKey> {
    let (field, direction) = match token.split_once(':') {
        Some((field, direction)) => (field.trim_end(), parse_direction(direction.trim())?),
        None => (token, SortDirection::Asc),
    };
    Ok(SortKey::new(field, direction))
}

fn parse_direction(raw: &str) -> Result<SortDirection> {
    match raw.to_ascii_lowercase().as_str() {
        "" | "asc" => Ok(SortDirection::Asc),
        "desc" => Ok(SortDirection::Desc),
        other => Err(DatalodeError::InvalidSort(other.to_string())),
    }
}
