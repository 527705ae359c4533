//! Range expression parsing
//!
//! A range expression is one or more comma-separated `A..B` segments where
//! either bound may be empty: `10..20`, `10..`, `..10`, `10..20,30..40`.
//! Segments are independent and combine as alternatives.

use serde::Serialize;

use crate::error::DatalodeError;
use crate::Result;

/// One segment of a range expression, open on either end
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RangeBound {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gte: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lte: Option<i64>,
}

/// Parse a full range expression into its ordered segments
///
/// A bound that is present but not an integer fails the parse; the field
/// name is only carried for error reporting.
pub fn parse_ranges(field: &str, expr: &str) -> Result<Vec<RangeBound>> {
    expr.split(',')
        .map(|segment| parse_segment(field, expr, segment.trim()))
        .collect()
}

fn parse_segment(field: &str, expr: &str, segment: &str) -> Result<RangeBound> {
    let invalid = || DatalodeError::InvalidRange {
        field: field.to_string(),
        expr: expr.to_string(),
    };

    let (lower, upper) = segment.split_once("..").ok_or_else(|| invalid())?;
    let bound = RangeBound {
        gte: parse_bound(lower).map_err(|_| invalid())?,
        lte: parse_bound(upper).map_err(|_| invalid())?,
    };
    if bound.gte.is_none() && bound.lte.is_none() {
        return Err(invalid());
    }
    Ok(bound)
}

fn parse_bound(raw: &str) -> std::result::Result<Option<i64>, std::num::ParseIntError> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse().map(Some)
}
