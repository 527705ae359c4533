//! Field expression parsing
//!
//! Incoming parameter keys carry an optional operator suffix separated by a
//! double underscore: `age__range`, `state__ne`. The head is the field name,
//! which may itself be a dotted path into a nested document and is passed
//! through unmodified.

use indexmap::IndexMap;

/// Operator carried by a parameter key suffix
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FilterOp {
    /// Plain equality (no suffix)
    #[default]
    Eq,
    /// Negated equality (`__ne` or `__not`; both mean the same thing)
    Ne,
    /// Numeric range expression (`__range`)
    Range,
}

/// One parsed filter parameter: base field, operator, raw value
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterParam {
    pub field: String,
    pub op: FilterOp,
    pub value: String,
}

impl FilterParam {
    /// Parse a raw key/value pair
    ///
    /// Only `range`, `ne` and `not` are recognized suffixes; any other tail
    /// stays part of the field name. Validation of the value happens
    /// downstream, when the clause for this param is built.
    pub fn parse(key: &str, value: impl Into<String>) -> Self {
        let (field, op) = match key.rsplit_once("__") {
            Some((head, "range")) => (head, FilterOp::Range),
            Some((head, "ne")) | Some((head, "not")) => (head, FilterOp::Ne),
            _ => (key, FilterOp::Eq),
        };
        Self {
            field: field.to_string(),
            op,
            value: value.into(),
        }
    }
}

/// Normalize raw params into parsed filter params
///
/// Keys are canonicalized through a single insertion-ordered map, so the
/// first occurrence of a field+operator pair fixes its position and the last
/// occurrence supplies its value.
pub fn normalize<I, K, V>(params: I) -> Vec<FilterParam>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut parsed: IndexMap<(String, FilterOp), FilterParam> = IndexMap::new();
    for (key, value) in params {
        let param = FilterParam::parse(key.as_ref(), value);
        parsed.insert((param.field.clone(), param.op), param);
    }
    parsed.into_values().collect()
}
