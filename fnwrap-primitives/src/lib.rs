//! Core shared types for describing native functions to function-calling models.

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod schema;

/// Error type and result alias shared across the workspace.
pub use error::{Error, Result};
/// Schema type tags and the native-type table that feeds them.
pub use schema::{JsonSchemaType, NativeType, SchemaType};
