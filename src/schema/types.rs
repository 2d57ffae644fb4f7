//! Introspected schema shape
//!
//! The minimal view of a remote schema the validator needs: type kinds and,
//! per field, the unwrapped scalar/object kind and name.

use std::collections::HashMap;

/// GraphQL type name -> introspected type.
pub type SchemaTypeMap = HashMap<String, SchemaType>;

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaType {
    /// Introspection kind: OBJECT, SCALAR, ENUM, ...
    pub kind: String,
    /// Field name -> unwrapped field type.
    pub fields: HashMap<String, SchemaFieldType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaFieldType {
    /// Kind after unwrapping NON_NULL/LIST: SCALAR, OBJECT, ENUM, ...
    pub kind: String,
    /// Named type, absent for anonymous wrappers.
    pub name: Option<String>,
}
