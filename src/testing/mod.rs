//! Test support
//!
//! An in-memory [`SearchEngine`] that records every call it receives, so
//! import and facade tests can assert on what would have reached the real
//! engine.

use serde_json::Value;
use std::sync::Mutex;

use crate::engine::{Document, SearchEngine};
use crate::error::DatalodeError;
use crate::query::CompiledQuery;
use crate::Result;

#[derive(Debug, Default)]
struct EngineState {
    documents: Vec<(String, Document)>,
    refreshed: Vec<String>,
    deleted: Vec<String>,
    searches: Vec<(String, Value)>,
}

/// In-memory engine recording every call
#[derive(Debug, Default)]
pub struct RecordingEngine {
    state: Mutex<EngineState>,
    hits: Vec<Document>,
    reject: Option<(String, String)>,
}

impl RecordingEngine {
    /// Return these documents from every search
    pub fn with_hits(mut self, hits: Vec<Document>) -> Self {
        self.hits = hits;
        self
    }

    /// Fail indexing for documents where `field` equals `value`
    pub fn rejecting(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.reject = Some((field.into(), value.into()));
        self
    }

    /// All documents indexed so far, across indices
    pub fn documents(&self) -> Vec<(String, Document)> {
        self.state.lock().expect("engine state poisoned").documents.clone()
    }

    /// Documents indexed into one index, in arrival order
    pub fn documents_in(&self, index: &str) -> Vec<Document> {
        self.documents()
            .into_iter()
            .filter(|(i, _)| i == index)
            .map(|(_, doc)| doc)
            .collect()
    }

    /// Whether the index has been refreshed
    pub fn refreshed(&self, index: &str) -> bool {
        self.state
            .lock()
            .expect("engine state poisoned")
            .refreshed
            .iter()
            .any(|i| i == index)
    }

    /// Indices deleted so far
    pub fn deleted(&self) -> Vec<String> {
        self.state.lock().expect("engine state poisoned").deleted.clone()
    }

    /// Search requests received so far, as `(index, wire document)` pairs
    pub fn searches(&self) -> Vec<(String, Value)> {
        self.state.lock().expect("engine state poisoned").searches.clone()
    }
}

impl SearchEngine for RecordingEngine {
    fn index_document(&self, index: &str, document: &Document) -> Result<()> {
        if let Some((field, value)) = &self.reject {
            if document.get(field).and_then(Value::as_str) == Some(value) {
                return Err(DatalodeError::Engine(format!(
                    "document rejected: {field}={value}"
                )));
            }
        }
        self.state
            .lock()
            .expect("engine state poisoned")
            .documents
            .push((index.to_string(), document.clone()));
        Ok(())
    }

    fn refresh(&self, index: &str) -> Result<()> {
        self.state
            .lock()
            .expect("engine state poisoned")
            .refreshed
            .push(index.to_string());
        Ok(())
    }

    fn delete_index(&self, index: &str) -> Result<()> {
        let mut state = self.state.lock().expect("engine state poisoned");
        state.documents.retain(|(i, _)| i != index);
        state.deleted.push(index.to_string());
        Ok(())
    }

    fn delete_all(&self) -> Result<()> {
        let mut state = self.state.lock().expect("engine state poisoned");
        state.documents.clear();
        state.deleted.push("_all".to_string());
        Ok(())
    }

    fn search(&self, index: &str, request: &CompiledQuery) -> Result<Vec<Document>> {
        let wire = serde_json::to_value(request)
            .map_err(|e| DatalodeError::Engine(e.to_string()))?;
        self.state
            .lock()
            .expect("engine state poisoned")
            .searches
            .push((index.to_string(), wire));
        Ok(self.hits.clone())
    }
}
