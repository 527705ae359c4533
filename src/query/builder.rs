//! Query compilation entry point
//!
//! [`QueryBuilder::from_params`] is a pure function from raw params and
//! request options to a [`CompiledQuery`]. It holds no state of its own;
//! the schema and geocoding collaborators are read-only per call, so
//! concurrent compiles never interfere.

use serde::Serialize;
use serde_json::Value;

use crate::error::DatalodeError;
use crate::geo::Geocoder;
use crate::query::assembler::assemble;
use crate::query::clause::{build_clause, geo_distance_clause};
use crate::query::field_expr::normalize;
use crate::query::meta::{paging, projection, sort_keys, SearchOptions, SourceFilter};
use crate::query::sort::SortKey;
use crate::schema::FieldTypeSource;
use crate::Result;

/// The full output of the compiler: query document plus request metadata
///
/// Serializes to the engine's wire shape: `query` with sibling `from`,
/// `size` and `_source` keys, `fields` only when projecting explicitly,
/// `sort` only when requested.
#[derive(Clone, Debug, Serialize)]
pub struct CompiledQuery {
    pub query: Value,
    pub from: u64,
    pub size: u64,
    #[serde(rename = "_source")]
    pub source: SourceFilter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<SortKey>>,
}

/// Compiles flat filter params into the engine's nested query language
pub struct QueryBuilder;

impl QueryBuilder {
    /// Compile raw params and options into a query document with metadata
    ///
    /// Any parse failure aborts the whole compile; no partial query is
    /// returned. The geo filter is built only when both `zip` and
    /// `distance` options are present, and an unknown zip is a hard error
    /// rather than a silent fallback to a non-geo query.
    pub fn from_params<P, K, V, S, G>(
        params: P,
        options: &SearchOptions,
        schema: &S,
        geocoder: &G,
    ) -> Result<CompiledQuery>
    where
        P: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
        S: FieldTypeSource + ?Sized,
        G: Geocoder + ?Sized,
    {
        let mut clauses = Vec::new();
        for param in normalize(params) {
            let field_type = schema.field_type(&param.field)?.unwrap_or_default();
            clauses.push(build_clause(&param, field_type)?);
        }

        if let (Some(zip), Some(distance)) = (&options.zip, &options.distance) {
            let point = geocoder
                .coordinates_for_zip(zip)?
                .ok_or_else(|| DatalodeError::UnknownZip(zip.clone()))?;
            clauses.push(geo_distance_clause(distance, point));
        }

        let (from, size) = paging(options);
        let (source, fields) = projection(options);
        Ok(CompiledQuery {
            query: assemble(clauses),
            from,
            size,
            source,
            fields,
            sort: sort_keys(options)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{GeoPoint, StaticGeocoder};
    use crate::schema::{FieldType, NoDeclaredTypes};
    use serde_json::json;
    use std::collections::HashMap;

    struct FixtureSchema(HashMap<&'static str, FieldType>);

    impl FieldTypeSource for FixtureSchema {
        fn field_type(&self, field: &str) -> Result<Option<FieldType>> {
            Ok(self.0.get(field).copied())
        }
    }

    struct FailingSchema;

    impl FieldTypeSource for FailingSchema {
        fn field_type(&self, field: &str) -> Result<Option<FieldType>> {
            Err(DatalodeError::FieldLookup {
                field: field.to_string(),
                message: "backend unavailable".to_string(),
            })
        }
    }

    fn no_params() -> Vec<(&'static str, &'static str)> {
        Vec::new()
    }

    #[test]
    fn test_blank_compile() {
        let compiled = QueryBuilder::from_params(
            no_params(),
            &SearchOptions::default(),
            &NoDeclaredTypes,
            &StaticGeocoder::default(),
        )
        .unwrap();

        assert_eq!(compiled.query, json!({ "match_all": {} }));
        assert_eq!((compiled.from, compiled.size), (0, 20));
        assert!(compiled.fields.is_none());
        assert!(compiled.sort.is_none());
    }

    #[test]
    fn test_declared_type_changes_clause_shape() {
        let schema = FixtureSchema(HashMap::from([("age", FieldType::Integer)]));
        let compiled = QueryBuilder::from_params(
            vec![("age", "10,20,40")],
            &SearchOptions::default(),
            &schema,
            &StaticGeocoder::default(),
        )
        .unwrap();

        assert_eq!(
            compiled.query,
            json!({ "filtered": {
                "query": { "match_all": {} },
                "filter": { "terms": { "age": [10, 20, 40] } },
            } })
        );
    }

    #[test]
    fn test_schema_failure_aborts_compile() {
        let result = QueryBuilder::from_params(
            vec![("state", "CA")],
            &SearchOptions::default(),
            &FailingSchema,
            &StaticGeocoder::default(),
        );
        assert!(matches!(
            result.unwrap_err(),
            DatalodeError::FieldLookup { .. }
        ));
    }

    #[test]
    fn test_unknown_zip_aborts_compile() {
        let options = SearchOptions {
            zip: Some("00000".to_string()),
            distance: Some("30mi".to_string()),
            ..Default::default()
        };
        let result = QueryBuilder::from_params(
            no_params(),
            &options,
            &NoDeclaredTypes,
            &StaticGeocoder::default(),
        );
        assert!(matches!(result.unwrap_err(), DatalodeError::UnknownZip(_)));
    }

    #[test]
    fn test_zip_without_distance_is_ignored() {
        let options = SearchOptions {
            zip: Some("94132".to_string()),
            ..Default::default()
        };
        let compiled = QueryBuilder::from_params(
            no_params(),
            &options,
            &NoDeclaredTypes,
            &StaticGeocoder::default(),
        )
        .unwrap();
        assert_eq!(compiled.query, json!({ "match_all": {} }));
    }

    #[test]
    fn test_geo_search() {
        let geocoder =
            StaticGeocoder::default().with_zip("94132", GeoPoint::new(37.7211, -122.4754));
        let options = SearchOptions {
            zip: Some("94132".to_string()),
            distance: Some("30mi".to_string()),
            ..Default::default()
        };
        let compiled =
            QueryBuilder::from_params(no_params(), &options, &NoDeclaredTypes, &geocoder)
                .unwrap();

        assert_eq!(
            compiled.query,
            json!({ "filtered": {
                "query": { "match_all": {} },
                "filter": { "geo_distance": {
                    "distance": "30mi",
                    "location": { "lat": 37.7211, "lon": -122.4754 },
                } },
            } })
        );
    }

    #[test]
    fn test_wire_shape() {
        let options = SearchOptions {
            sort: Some("name".to_string()),
            ..Default::default()
        };
        let compiled = QueryBuilder::from_params(
            vec![("state", "CA")],
            &options,
            &NoDeclaredTypes,
            &StaticGeocoder::default(),
        )
        .unwrap();

        assert_eq!(
            serde_json::to_value(&compiled).unwrap(),
            json!({
                "query": { "match": { "state": { "query": "CA" } } },
                "from": 0,
                "size": 20,
                "_source": { "exclude": ["_*"] },
                "sort": [{ "name": { "order": "asc" } }],
            })
        );
    }
}
