//! Materialized model handle

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

use super::engine::EngineHandle;
use super::errors::{ModelError, ModelResult};
use crate::schema::AssembledSchema;

/// The persistence-ready artifact for one entity.
///
/// Built at most once per entity and shared as `Arc<Model>`.
pub struct Model {
    id: Uuid,
    name: String,
    collection: String,
    built_at: DateTime<Utc>,
    schema: AssembledSchema,
    handle: EngineHandle,
}

impl Model {
    pub(crate) fn new(
        name: impl Into<String>,
        schema: AssembledSchema,
        handle: EngineHandle,
    ) -> Self {
        let name = name.into();
        let collection = schema
            .options
            .collection
            .clone()
            .unwrap_or_else(|| default_collection(&name));
        Self {
            id: Uuid::new_v4(),
            name,
            collection,
            built_at: Utc::now(),
            schema,
            handle,
        }
    }

    /// Instance id, distinct for every materialization
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    pub fn schema(&self) -> &AssembledSchema {
        &self.schema
    }

    /// Engine handle, if it is a `T`
    pub fn handle<T: 'static>(&self) -> Option<&T> {
        self.handle.downcast_ref::<T>()
    }

    /// Reads a virtual from a document
    pub fn get_virtual(&self, name: &str, document: &Value) -> ModelResult<Value> {
        let get = self
            .virtual_hooks(name)?
            .get
            .as_ref()
            .ok_or_else(|| ModelError::VirtualNotReadable {
                entity: self.name.clone(),
                name: name.to_string(),
            })?;
        Ok(get(document))
    }

    /// Assigns a virtual on a document
    pub fn set_virtual(&self, name: &str, document: &mut Value, value: Value) -> ModelResult<()> {
        let set = self
            .virtual_hooks(name)?
            .set
            .as_ref()
            .ok_or_else(|| ModelError::VirtualNotWritable {
                entity: self.name.clone(),
                name: name.to_string(),
            })?;
        set(document, value);
        Ok(())
    }

    /// Invokes an instance method on a document
    pub fn call_method(&self, name: &str, document: &Value, args: &[Value]) -> ModelResult<Value> {
        let method = self
            .schema
            .behavior
            .methods
            .get(name)
            .ok_or_else(|| ModelError::UnknownMethod {
                entity: self.name.clone(),
                name: name.to_string(),
            })?;
        Ok(method(document, args))
    }

    /// Invokes an entity-level method
    pub fn call_static(&self, name: &str, args: &[Value]) -> ModelResult<Value> {
        let method = self
            .schema
            .behavior
            .statics
            .get(name)
            .ok_or_else(|| ModelError::UnknownStatic {
                entity: self.name.clone(),
                name: name.to_string(),
            })?;
        Ok(method(self, args))
    }

    fn virtual_hooks(&self, name: &str) -> ModelResult<&crate::schema::Virtual> {
        self.schema
            .behavior
            .virtuals
            .get(name)
            .ok_or_else(|| ModelError::UnknownVirtual {
                entity: self.name.clone(),
                name: name.to_string(),
            })
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("collection", &self.collection)
            .field("built_at", &self.built_at)
            .finish_non_exhaustive()
    }
}

/// Lowercased entity name with a plural `s`
fn default_collection(name: &str) -> String {
    let lower = name.to_lowercase();
    if lower.ends_with('s') {
        lower
    } else {
        format!("{}s", lower)
    }
}
