//! docschema - Annotation-driven document schema compiler
//!
//! Entities declare their fields, options and behavior once; the compiler
//! resolves field types, validates constraints, merges inheritance chains
//! and hands a single assembled schema to the persistence engine.

pub mod config;
pub mod model;
pub mod schema;

pub use config::{CompilerConfig, MergeOrder};
pub use model::{Document, Model, ModelError, ModelFactory, ModelResult};
pub use schema::{EntityRegistry, FieldOptions, SchemaError, SchemaOptions, SchemaResult};
