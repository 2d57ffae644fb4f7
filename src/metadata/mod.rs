//! Entity metadata model: derived field/relation mappings and the
//! process-wide cache.

pub mod registry;
pub mod types;

pub use registry::MetadataRegistry;
pub use types::{EntityMetadata, FieldMetadata};
