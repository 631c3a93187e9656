//! Annotation-driven schema compiler
//!
//! Entities are declared through an `EntityBuilder`; each field annotation
//! is resolved and compiled into the `EntityRegistry` as soon as the entity
//! is registered. Schemas are assembled across the inheritance chain when a
//! model is first requested.
//!
//! # Design Principles
//!
//! - Fail fast: every developer-input error surfaces at registration
//! - No partial descriptors: a failing field is never stored
//! - Last write wins for a field compiled twice
//! - Deterministic assembly: field tables are ordered maps

mod assembler;
mod behavior;
mod builder;
mod compiler;
mod descriptor;
mod errors;
mod options;
mod registry;
mod resolver;
mod schema_options;
mod types;

pub use assembler::{AssembledSchema, SchemaAssembler};
pub use behavior::{
    EntityBehavior, Getter, Method, Setter, StaticMethod, Virtual, RESERVED_METHOD_NAMES,
    RESERVED_STATIC_NAMES,
};
pub use builder::EntityBuilder;
pub use compiler::FieldCompiler;
pub use descriptor::{table_definition, EmbeddedSchema, EntityFieldTable, FieldDescriptor};
pub use errors::{SchemaError, SchemaResult};
pub use options::{Bound, DefaultValue, FieldOptions, FieldValidator, Required};
pub use registry::{EntityDeclaration, EntityRegistry};
pub use resolver::{StaticReflector, TypeReflector, TypeResolver};
pub use schema_options::{
    ConversionOptions, ReadPreference, SchemaOptions, ShardKey, TimestampFields, Timestamps,
    WriteAck, WriteConcern,
};
pub use types::{PrimitiveType, Reflect, ResolvedFieldKind, TypeHandle};
