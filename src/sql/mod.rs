//! SQL synthesis
//!
//! Identifier-safe SQL generation for the data-copy steps a rename needs,
//! plus the schema validation that must pass before any copy is emitted.

pub mod builder;
pub mod quote;
pub mod validators;

pub use builder::SqlBuilder;
pub use quote::{quote_identifier, quote_identifiers};
pub use validators::SchemaValidator;
