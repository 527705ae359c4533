//! Query assembly
//!
//! Merges the built clauses into a single query document, choosing the
//! minimal structural form the engine accepts: a bare `match_all`, a lone
//! clause, a `filtered` wrapper, or a `bool` with must/must_not lists.

use serde_json::{json, Map, Value};

use crate::query::clause::{Clause, ClausePosition, Polarity};

/// Assemble all clauses into one query document
///
/// Cross-field filter clauses combine as one flat OR list, mirroring how a
/// multi-segment range combines. That the engine sees alternatives rather
/// than a conjunction across distinct fields is a preserved artifact of the
/// existing contract; see DESIGN.md before changing it.
pub fn assemble(clauses: Vec<Clause>) -> Value {
    let mut queries = Vec::new();
    let mut negated = Vec::new();
    let mut filters = Vec::new();
    for clause in clauses {
        match (clause.position, clause.polarity) {
            (ClausePosition::Query, Polarity::Must) => queries.push(clause.body),
            (ClausePosition::Query, Polarity::MustNot) => negated.push(clause.body),
            (ClausePosition::Filter, _) => filters.push(clause.body),
        }
    }

    let query_part = query_part(queries, negated);
    match combine_filters(filters) {
        Some(filter) => json!({ "filtered": { "query": query_part, "filter": filter } }),
        None => query_part,
    }
}

/// The relevance-scored part of the document
///
/// Negations force the bool form, with `must` omitted entirely when there
/// is nothing positive. Without negations the form stays as small as
/// possible: `match_all` for nothing, the clause itself for exactly one.
fn query_part(mut queries: Vec<Value>, negated: Vec<Value>) -> Value {
    if !negated.is_empty() {
        let mut body = Map::new();
        if !queries.is_empty() {
            body.insert("must".to_string(), Value::Array(queries));
        }
        body.insert("must_not".to_string(), Value::Array(negated));
        return json!({ "bool": body });
    }
    match queries.len() {
        0 => json!({ "match_all": {} }),
        1 => queries.remove(0),
        _ => json!({ "bool": { "must": queries } }),
    }
}

/// Combine filter clauses into the single filter the engine expects
///
/// One clause passes through untouched (a lone range filter keeps its `or`
/// wrapper). Several clauses merge into one flat `or` list, splicing any
/// already-wrapped alternatives instead of nesting them.
fn combine_filters(filters: Vec<Value>) -> Option<Value> {
    match filters.len() {
        0 => None,
        1 => filters.into_iter().next(),
        _ => {
            let mut alternatives = Vec::new();
            for filter in filters {
                match unwrap_or_list(filter) {
                    Ok(list) => alternatives.extend(list),
                    Err(other) => alternatives.push(other),
                }
            }
            Some(json!({ "or": alternatives }))
        }
    }
}

fn unwrap_or_list(filter: Value) -> std::result::Result<Vec<Value>, Value> {
    match filter {
        Value::Object(mut map) if map.len() == 1 => match map.remove("or") {
            Some(Value::Array(list)) => Ok(list),
            Some(other) => Ok(vec![json!({ "or": other })]),
            None => Err(Value::Object(map)),
        },
        other => Err(other),
    }
}
