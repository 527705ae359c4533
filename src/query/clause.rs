//! Clause construction
//!
//! One clause is built per filter parameter, from its resolved field type,
//! operator and raw value. A clause knows where it belongs in the assembled
//! document: query position (relevance-scored match, wildcard) or filter
//! position (range, terms, geo), and whether it must match or must not.

use serde_json::{json, Value};

use crate::error::DatalodeError;
use crate::geo::GeoPoint;
use crate::query::field_expr::{FilterOp, FilterParam};
use crate::query::range::parse_ranges;
use crate::schema::FieldType;
use crate::Result;

/// Where a clause lands in the assembled query document
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClausePosition {
    /// Relevance-scored part (`match`, `wildcard`)
    Query,
    /// Structural constraint part (`range`, `terms`, `geo_distance`)
    Filter,
}

/// Must-match vs must-not-match semantics
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Polarity {
    Must,
    MustNot,
}

/// One translated fragment of the target query document
#[derive(Clone, Debug, PartialEq)]
pub struct Clause {
    pub body: Value,
    pub position: ClausePosition,
    pub polarity: Polarity,
}

impl Clause {
    fn query(body: Value) -> Self {
        Self {
            body,
            position: ClausePosition::Query,
            polarity: Polarity::Must,
        }
    }

    fn filter(body: Value) -> Self {
        Self {
            body,
            position: ClausePosition::Filter,
            polarity: Polarity::Must,
        }
    }

    fn negated(body: Value) -> Self {
        Self {
            body,
            position: ClausePosition::Query,
            polarity: Polarity::MustNot,
        }
    }
}

/// Build the clause for one filter parameter
///
/// Negation bypasses type-specific handling entirely: a `__ne`/`__not`
/// param compiles to the plain match shape on the field as named, whatever
/// its declared type.
pub fn build_clause(param: &FilterParam, field_type: FieldType) -> Result<Clause> {
    match param.op {
        FilterOp::Ne => Ok(Clause::negated(match_body(&param.field, &param.value))),
        FilterOp::Range => range_clause(param),
        FilterOp::Eq => match field_type {
            FieldType::Default => Ok(Clause::query(match_body(&param.field, &param.value))),
            FieldType::Name => Ok(Clause::query(wildcard_body(&param.field, &param.value))),
            FieldType::Integer => terms_clause(param),
        },
    }
}

/// Build the geo-distance filter clause
///
/// The distance is an opaque engine-understood string such as `"30mi"`; the
/// `location` key is the fixed name of the coordinates field.
pub fn geo_distance_clause(distance: &str, point: GeoPoint) -> Clause {
    Clause::filter(json!({
        "geo_distance": {
            "distance": distance,
            "location": { "lat": point.lat, "lon": point.lon },
        }
    }))
}

fn match_body(field: &str, value: &str) -> Value {
    json!({ "match": { (field): { "query": value } } })
}

/// Name-typed fields match case-insensitively by prefix: the value is
/// lower-cased, split on whitespace, and every token gets a trailing
/// wildcard, queried against the not-analyzed underscored shadow field.
fn wildcard_body(field: &str, value: &str) -> Value {
    let pattern = value
        .to_lowercase()
        .split_whitespace()
        .map(|token| format!("{token}*"))
        .collect::<Vec<_>>()
        .join(" ");
    json!({ "wildcard": { (FieldType::Name.query_field(field)): { "value": pattern } } })
}

fn terms_clause(param: &FilterParam) -> Result<Clause> {
    let ints = param
        .value
        .split(',')
        .map(|raw| raw.trim().parse::<i64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| DatalodeError::InvalidIntegerList {
            field: param.field.clone(),
            value: param.value.clone(),
        })?;
    Ok(Clause::filter(json!({ "terms": { (param.field.as_str()): ints } })))
}

/// Range segments always arrive wrapped as alternatives, even a single one
fn range_clause(param: &FilterParam) -> Result<Clause> {
    let ranges = parse_ranges(&param.field, &param.value)?
        .into_iter()
        .map(|bound| json!({ "range": { (param.field.as_str()): bound } }))
        .collect::<Vec<_>>();
    Ok(Clause::filter(json!({ "or": ranges })))
}
