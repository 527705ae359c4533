//! Field type definitions
//!
//! Determines the matching strategy the query compiler uses for a field.

use serde::{Deserialize, Serialize};

use crate::Result;

/// Declared type of a searchable field
///
/// The type selects how an equality parameter on the field is translated:
/// plain text match, case-insensitive prefix match, or exact integer-set
/// membership. Fields without a declaration behave as `Default`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Relevance-scored text match on the field as indexed
    #[default]
    Default,

    /// Case-insensitive prefix match against the not-analyzed shadow field
    ///
    /// Name fields are queried through a wildcard on an underscore-prefixed
    /// variant of the field, which holds the lower-cased original value.
    Name,

    /// Exact match against a set of integers
    Integer,
}

impl FieldType {
    /// The key a query on this type addresses
    ///
    /// `Name` fields are matched through their underscored shadow variant;
    /// every other type queries the field as named.
    pub fn query_field(&self, field: &str) -> String {
        match self {
            FieldType::Name => format!("_{field}"),
            _ => field.to_string(),
        }
    }
}

/// The seam through which per-field matching behavior is injected
///
/// The compiler holds no schema knowledge of its own: it asks this
/// collaborator once per field per compile. `Ok(None)` means the field has
/// no declaration and falls back to [`FieldType::Default`]; an `Err` aborts
/// the compile rather than substituting a silent default.
pub trait FieldTypeSource {
    fn field_type(&self, field: &str) -> Result<Option<FieldType>>;
}

/// A source with no declarations: every field is `Default`
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDeclaredTypes;

impl FieldTypeSource for NoDeclaredTypes {
    fn field_type(&self, _field: &str) -> Result<Option<FieldType>> {
        Ok(None)
    }
}
