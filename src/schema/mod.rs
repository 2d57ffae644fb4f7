//! Schema introspection and conformance validation

pub mod introspector;
pub mod types;
pub mod validator;

pub use introspector::SchemaIntrospector;
pub use types::{SchemaFieldType, SchemaType, SchemaTypeMap};
pub use validator::SchemaValidator;
