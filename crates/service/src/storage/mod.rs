//! Storage primitives for the store facades
//!
//! - `collection`: ordered in-memory sequence of entities behind one lock per entity type
//! - `json_file_store`: optional JSON-array snapshot file wrapped around a collection

pub mod collection;
pub mod json_file_store;

pub use collection::{Collection, DuplicatePolicy, EntityStream};
pub use json_file_store::JsonFileStore;
