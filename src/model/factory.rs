//! Model factory
//!
//! Materializes the persistence-ready model for an entity on first request
//! and returns the cached instance afterwards. The registry's model lock is
//! held across assembly and engine compilation, so concurrent first
//! requests build exactly one model.

use std::sync::Arc;

use tracing::info;

use super::engine::{DefinitionEngine, SchemaEngine};
use super::errors::ModelResult;
use super::model::Model;
use crate::schema::{EntityRegistry, Reflect, SchemaAssembler};

/// Builds and caches models from registry contents
pub struct ModelFactory<'a, E = DefinitionEngine> {
    registry: &'a EntityRegistry,
    engine: E,
}

impl<'a> ModelFactory<'a, DefinitionEngine> {
    /// Factory using the JSON definition engine
    pub fn new(registry: &'a EntityRegistry) -> Self {
        Self::with_engine(registry, DefinitionEngine)
    }
}

impl<'a, E: SchemaEngine> ModelFactory<'a, E> {
    pub fn with_engine(registry: &'a EntityRegistry, engine: E) -> Self {
        Self { registry, engine }
    }

    pub fn registry(&self) -> &EntityRegistry {
        self.registry
    }

    /// Returns the cached model, building it on first request.
    pub fn get_model(&self, entity: &str) -> ModelResult<Arc<Model>> {
        self.registry.get_or_insert_model_with(entity, || self.build(entity))
    }

    /// Builds the model unless one is cached; returns the cached model
    /// either way. Shares the build lock with `get_model`.
    pub fn set_model(&self, entity: &str) -> ModelResult<Arc<Model>> {
        self.registry.get_or_insert_model_with(entity, || self.build(entity))
    }

    fn build(&self, entity: &str) -> ModelResult<Model> {
        let schema = SchemaAssembler::new(self.registry).assemble(entity)?;
        let handle = self.engine.compile(entity, &schema)?;
        let model = Model::new(entity, schema, handle);
        info!(
            entity,
            collection = %model.collection(),
            model_id = %model.id(),
            fields = model.schema().fields.len(),
            "materialized model"
        );
        Ok(model)
    }
}

/// An entity type that can obtain its own model
pub trait Document: Reflect {
    /// Entity name the type is registered under
    fn entity_name() -> String {
        Self::type_handle().name().to_string()
    }

    fn model<E: SchemaEngine>(factory: &ModelFactory<'_, E>) -> ModelResult<Arc<Model>> {
        factory.get_model(&Self::entity_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldOptions, TypeHandle};
    use serde_json::Value;

    struct Author;

    impl Reflect for Author {
        fn type_handle() -> TypeHandle {
            TypeHandle::named("Author")
        }
    }

    impl Document for Author {}

    fn registry() -> EntityRegistry {
        let registry = EntityRegistry::new();
        registry
            .entity("Author")
            .field::<String>("name", FieldOptions::new())
            .register()
            .unwrap();
        registry
    }

    #[test]
    fn test_get_model_is_memoized() {
        let registry = registry();
        let factory = ModelFactory::new(&registry);

        let first = factory.get_model("Author").unwrap();
        let second = factory.get_model("Author").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.id(), second.id());
    }

    #[test]
    fn test_set_model_keeps_cached_instance() {
        let registry = registry();
        let factory = ModelFactory::new(&registry);

        let built = factory.set_model("Author").unwrap();
        let again = factory.set_model("Author").unwrap();
        let fetched = factory.get_model("Author").unwrap();
        assert!(Arc::ptr_eq(&built, &again));
        assert!(Arc::ptr_eq(&built, &fetched));
    }

    #[test]
    fn test_document_model() {
        let registry = registry();
        let factory = ModelFactory::new(&registry);

        let model = Author::model(&factory).unwrap();
        assert_eq!(model.name(), "Author");
        assert_eq!(model.collection(), "authors");
        let definition = model.handle::<Value>().unwrap();
        assert_eq!(definition["fields"]["name"]["type"], "String");
    }

    #[test]
    fn test_undeclared_entity() {
        let registry = EntityRegistry::new();
        let factory = ModelFactory::new(&registry);
        let err = factory.get_model("Ghost").unwrap_err();
        assert_eq!(err.code(), "SCHEMA_UNKNOWN_ENTITY");
        assert!(registry.model("Ghost").is_none());
    }
}
