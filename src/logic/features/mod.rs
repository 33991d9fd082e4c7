//! Features Module - Input shaping for the risk model
//!
//! - `layout.rs`: column naming, schema hash, feature catalog
//! - `encoder.rs`: one-hot expansion + reindex to the model schema

pub mod layout;
pub mod encoder;

pub use encoder::{encode, EncodedVector, EncodingError};
pub use layout::{feature_catalog, schema_hash, NUMERIC_COLUMNS};
