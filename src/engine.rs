//! Search engine execution boundary
//!
//! The compiler never talks to the engine; everything that does goes
//! through the [`SearchEngine`] trait. [`Datalode`] bundles an engine
//! client with a [`Config`] and a geocoder into the data-loading and
//! search facade.

use serde_json::{Map, Value};
use std::io::Read;
use std::path::Path;
use tracing::warn;

use crate::config::Config;
use crate::error::DatalodeError;
use crate::geo::Geocoder;
use crate::import::{self, DirectoryImport, ImportOptions, ImportSummary};
use crate::query::{CompiledQuery, QueryBuilder, SearchOptions};
use crate::Result;

/// One indexed document, as stored and as returned from a search
pub type Document = Map<String, Value>;

/// Client interface to the external search engine
///
/// Searches take the full compiled request: the caller is expected to send
/// `from`/`size`/`_source`/`fields`/`sort` as request-level parameters
/// alongside the query body, and to hand back the ranked hit sources only.
pub trait SearchEngine {
    /// Index one document into the named index
    fn index_document(&self, index: &str, document: &Document) -> Result<()>;

    /// Make recently indexed documents visible to search
    fn refresh(&self, index: &str) -> Result<()>;

    /// Delete the named index
    fn delete_index(&self, index: &str) -> Result<()>;

    /// Delete every index owned by this data set
    fn delete_all(&self) -> Result<()>;

    /// Execute a compiled query, returning ranked document sources
    fn search(&self, index: &str, request: &CompiledQuery) -> Result<Vec<Document>>;
}

/// Which index a request addresses: by API endpoint or by index name
///
/// The endpoint is the more specific identifier; when both are supplied it
/// wins, with a warning rather than a hard failure.
#[derive(Clone, Debug, Default)]
pub struct IndexSelector {
    pub api: Option<String>,
    pub index: Option<String>,
}

impl IndexSelector {
    /// Address the data set's default index
    pub fn default_index() -> Self {
        Self::default()
    }

    /// Address the index serving an API endpoint
    pub fn api(name: impl Into<String>) -> Self {
        Self {
            api: Some(name.into()),
            index: None,
        }
    }

    /// Address an index by name
    pub fn index(name: impl Into<String>) -> Self {
        Self {
            api: None,
            index: Some(name.into()),
        }
    }

    /// Resolve to the environment-scoped index name
    pub fn resolve(&self, config: &Config) -> Result<String> {
        if self.api.is_some() && self.index.is_some() {
            warn!("both api and index supplied, api takes precedence");
        }
        if let Some(api) = &self.api {
            let index = config
                .index_for_api(api)
                .ok_or_else(|| DatalodeError::UnknownApi(api.clone()))?;
            return Ok(config.scope(index));
        }
        match &self.index {
            Some(index) => Ok(config.scope(index)),
            None => Ok(config.scoped_index()),
        }
    }
}

/// Data-loading and search facade over one engine and one data set
pub struct Datalode<E, G> {
    engine: E,
    config: Config,
    geocoder: G,
}

impl<E: SearchEngine, G: Geocoder> Datalode<E, G> {
    pub fn new(engine: E, config: Config, geocoder: G) -> Self {
        Self {
            engine,
            config,
            geocoder,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Compile params and options and run the search, returning the ranked
    /// document sources
    pub fn search<P, K, V>(
        &self,
        selector: &IndexSelector,
        params: P,
        options: &SearchOptions,
    ) -> Result<Vec<Document>>
    where
        P: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let index = selector.resolve(&self.config)?;
        let request = self.compile(params, options)?;
        self.engine.search(&index, &request)
    }

    /// Compile params and options without touching the engine
    pub fn compile<P, K, V>(&self, params: P, options: &SearchOptions) -> Result<CompiledQuery>
    where
        P: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        QueryBuilder::from_params(params, options, &self.config, &self.geocoder)
    }

    /// Import one delimited file into this data set's index
    pub fn import_csv<R: Read>(&self, input: R, options: &ImportOptions) -> Result<ImportSummary> {
        import::import_csv(&self.engine, &self.config.scoped_index(), input, options)
    }

    /// Import every CSV file under a data directory
    pub fn import_all(&self, data_dir: impl AsRef<Path>) -> Result<DirectoryImport> {
        import::import_all(&self.engine, &self.config, data_dir.as_ref())
    }

    /// Delete one index of this data set
    pub fn delete_index(&self, index: &str) -> Result<()> {
        self.engine.delete_index(&self.config.scope(index))
    }

    /// Delete every index of this data set
    pub fn delete_all(&self) -> Result<()> {
        self.engine.delete_all()
    }
}
