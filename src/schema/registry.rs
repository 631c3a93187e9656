//! Entity registry
//!
//! Process-wide storage keyed by entity name:
//! - field tables, filled as field annotations compile
//! - schema options, from the class-level annotation
//! - declarations (parent link and behavior)
//! - materialized models, created lazily and at most once per entity
//!
//! No validation lives here beyond existence checks. Callers construct one
//! registry per process, or one per test for isolation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use super::behavior::EntityBehavior;
use super::builder::EntityBuilder;
use super::descriptor::{EntityFieldTable, FieldDescriptor};
use super::errors::{SchemaError, SchemaResult};
use super::schema_options::SchemaOptions;
use crate::config::CompilerConfig;
use crate::model::Model;

/// Parent link and behavior of one declared entity
#[derive(Debug, Clone, Default)]
pub struct EntityDeclaration {
    pub name: String,
    pub parent: Option<String>,
    pub behavior: EntityBehavior,
}

impl EntityDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Folds a later declaration of the same entity into this one
    pub fn merge(&mut self, later: EntityDeclaration) {
        if later.parent.is_some() {
            self.parent = later.parent;
        }
        self.behavior.extend(later.behavior);
    }
}

/// Registry of entity fields, options, declarations and models
#[derive(Debug, Default)]
pub struct EntityRegistry {
    config: CompilerConfig,

    /// Field tables by entity name
    fields: RwLock<HashMap<String, EntityFieldTable>>,

    /// Schema options by entity name
    schema_options: RwLock<HashMap<String, SchemaOptions>>,

    /// Declarations by entity name
    declarations: RwLock<HashMap<String, EntityDeclaration>>,

    /// Materialized models by entity name
    models: RwLock<HashMap<String, Arc<Model>>>,
}

fn read<T>(lock: &RwLock<T>) -> SchemaResult<RwLockReadGuard<'_, T>> {
    lock.read().map_err(|_| SchemaError::lock_poisoned())
}

fn write<T>(lock: &RwLock<T>) -> SchemaResult<RwLockWriteGuard<'_, T>> {
    lock.write().map_err(|_| SchemaError::lock_poisoned())
}

impl EntityRegistry {
    /// Create a registry with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the given configuration
    pub fn with_config(config: CompilerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Start declaring an entity
    pub fn entity(&self, name: impl Into<String>) -> EntityBuilder<'_> {
        EntityBuilder::new(self, name)
    }

    /// Whether the entity has a field table
    pub fn has_fields(&self, entity: &str) -> SchemaResult<bool> {
        Ok(read(&self.fields)?.contains_key(entity))
    }

    /// Copy of the entity's current field table
    pub fn field_table(&self, entity: &str) -> SchemaResult<EntityFieldTable> {
        read(&self.fields)?
            .get(entity)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownEntity(entity.to_string()))
    }

    /// Creates an empty field table if none exists yet
    pub fn ensure_field_table(&self, entity: &str) -> SchemaResult<()> {
        write(&self.fields)?.entry(entity.to_string()).or_default();
        Ok(())
    }

    /// Stores a descriptor; an existing descriptor for the same field is replaced
    pub fn insert_field(
        &self,
        entity: &str,
        field: &str,
        descriptor: FieldDescriptor,
    ) -> SchemaResult<()> {
        self.warn_if_materialized(entity);
        let mut fields = write(&self.fields)?;
        let replaced = fields
            .entry(entity.to_string())
            .or_default()
            .insert(field.to_string(), descriptor)
            .is_some();
        if replaced {
            debug!(entity, field, "replaced field descriptor");
        }
        Ok(())
    }

    pub fn schema_options(&self, entity: &str) -> SchemaResult<Option<SchemaOptions>> {
        Ok(read(&self.schema_options)?.get(entity).cloned())
    }

    /// Records the entity-wide options; a later call replaces earlier ones
    pub fn set_schema_options(&self, entity: &str, options: SchemaOptions) -> SchemaResult<()> {
        self.warn_if_materialized(entity);
        write(&self.schema_options)?.insert(entity.to_string(), options);
        Ok(())
    }

    pub fn declaration(&self, entity: &str) -> SchemaResult<EntityDeclaration> {
        read(&self.declarations)?
            .get(entity)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownEntity(entity.to_string()))
    }

    pub fn is_declared(&self, entity: &str) -> SchemaResult<bool> {
        Ok(read(&self.declarations)?.contains_key(entity))
    }

    /// Records the parent link and behavior of an entity and creates its
    /// field table.
    ///
    /// Declaring a name again merges into the earlier declaration: a new
    /// parent replaces the old one, behavior is added by name.
    pub fn declare(&self, declaration: EntityDeclaration) -> SchemaResult<()> {
        self.warn_if_materialized(&declaration.name);
        debug!(
            entity = %declaration.name,
            parent = ?declaration.parent,
            "declared entity"
        );
        self.ensure_field_table(&declaration.name)?;

        let mut declarations = write(&self.declarations)?;
        match declarations.get_mut(&declaration.name) {
            Some(existing) => existing.merge(declaration),
            None => {
                declarations.insert(declaration.name.clone(), declaration);
            }
        }
        Ok(())
    }

    /// Names of all declared entities, sorted
    pub fn entity_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .declarations
            .read()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Cached model for the entity, if one was materialized
    pub fn model(&self, entity: &str) -> Option<Arc<Model>> {
        self.models.read().ok()?.get(entity).cloned()
    }

    /// Returns the cached model or builds and caches one.
    ///
    /// The write lock is held across `build`, so concurrent first requests
    /// for the same entity materialize exactly one model.
    pub fn get_or_insert_model_with<E, F>(&self, entity: &str, build: F) -> Result<Arc<Model>, E>
    where
        E: From<SchemaError>,
        F: FnOnce() -> Result<Model, E>,
    {
        if let Some(model) = self.model(entity) {
            return Ok(model);
        }

        let mut models = write(&self.models)?;
        if let Some(model) = models.get(entity) {
            return Ok(model.clone());
        }

        let model = Arc::new(build()?);
        models.insert(entity.to_string(), model.clone());
        Ok(model)
    }

    fn warn_if_materialized(&self, entity: &str) {
        let materialized = self
            .models
            .read()
            .map(|m| m.contains_key(entity))
            .unwrap_or(false);
        if materialized {
            warn!(entity, "entity changed after its model was materialized; cached model is kept");
        }
    }
}
