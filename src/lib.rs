pub mod config;
pub mod engine;
pub mod error;
pub mod geo;
pub mod import;
pub mod query;
pub mod schema;
pub mod testing;

pub use config::{Config, FileConfig};
pub use engine::{Datalode, Document, IndexSelector, SearchEngine};
pub use error::{DatalodeError, Result};
pub use geo::{GeoPoint, Geocoder, StaticGeocoder};
pub use import::{import_all, import_csv, ImportOptions, ImportSummary};
pub use query::{CompiledQuery, QueryBuilder, SearchOptions};
pub use schema::{FieldType, FieldTypeSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
