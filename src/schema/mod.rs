//! Field schema declarations
//!
//! The compiler itself holds no schema knowledge; this module defines the
//! field types and the lookup seam it consumes.

pub mod field_type;

pub use field_type::{FieldType, FieldTypeSource, NoDeclaredTypes};
