//! Persistence-engine seam
//!
//! The engine receives the assembled schema and returns an opaque handle.
//! The factory never looks inside the handle; it only caches it on the model.

use serde_json::Value;
use std::any::Any;
use std::sync::Arc;

use super::errors::ModelResult;
use crate::schema::AssembledSchema;

/// Opaque, queryable handle produced by an engine
pub type EngineHandle = Arc<dyn Any + Send + Sync>;

/// Compiles an assembled schema into an engine-specific model
pub trait SchemaEngine: Send + Sync {
    fn compile(&self, entity: &str, schema: &AssembledSchema) -> ModelResult<EngineHandle>;
}

/// Engine that renders the schema as a JSON definition document.
///
/// The handle is a `serde_json::Value`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefinitionEngine;

impl SchemaEngine for DefinitionEngine {
    fn compile(&self, _entity: &str, schema: &AssembledSchema) -> ModelResult<EngineHandle> {
        let definition: Value = schema.to_definition();
        Ok(Arc::new(definition))
    }
}

impl<E: SchemaEngine + ?Sized> SchemaEngine for Arc<E> {
    fn compile(&self, entity: &str, schema: &AssembledSchema) -> ModelResult<EngineHandle> {
        (**self).compile(entity, schema)
    }
}
