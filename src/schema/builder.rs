//! Entity declaration builder
//!
//! The annotation surface: the class-level annotation becomes `options`,
//! each property annotation becomes a `field*` call, and computed
//! properties, methods and statics are registered explicitly.
//!
//! ```ignore
//! registry
//!     .entity("Author")
//!     .options(SchemaOptions::with_collection("authors"))
//!     .field::<String>("name", FieldOptions::new().required(true))
//!     .field::<Vec<String>>("tags", FieldOptions::new().of_type::<String>())
//!     .getter("display", |doc| doc["name"].clone())
//!     .register()?;
//! ```

use serde_json::Value;
use std::sync::Arc;

use tracing::warn;

use super::behavior::{EntityBehavior, RESERVED_METHOD_NAMES, RESERVED_STATIC_NAMES};
use super::compiler::FieldCompiler;
use super::errors::SchemaResult;
use super::options::FieldOptions;
use super::registry::{EntityDeclaration, EntityRegistry};
use super::resolver::TypeReflector;
use super::schema_options::SchemaOptions;
use super::types::{Reflect, TypeHandle};
use crate::model::Model;

/// A field annotation waiting for `register`
struct PendingField {
    name: String,
    declared: Option<TypeHandle>,
    options: FieldOptions,
}

/// Collects one entity's annotations and registers them together
#[must_use = "an entity is only registered once `register` is called"]
pub struct EntityBuilder<'r> {
    registry: &'r EntityRegistry,
    name: String,
    parent: Option<String>,
    options: Option<SchemaOptions>,
    fields: Vec<PendingField>,
    behavior: EntityBehavior,
}

impl<'r> EntityBuilder<'r> {
    pub(crate) fn new(registry: &'r EntityRegistry, name: impl Into<String>) -> Self {
        Self {
            registry,
            name: name.into(),
            parent: None,
            options: None,
            fields: Vec::new(),
            behavior: EntityBehavior::default(),
        }
    }

    /// Declares the parent entity
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Declares the parent entity by its Rust type
    pub fn extends_type<T: Reflect + ?Sized>(self) -> Self {
        self.extends(T::type_handle().name())
    }

    /// Entity-wide schema options
    pub fn options(mut self, options: SchemaOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Field whose declared type is the Rust type `T`
    pub fn field<T: Reflect + ?Sized>(
        self,
        name: impl Into<String>,
        options: FieldOptions,
    ) -> Self {
        self.field_as(name, Some(T::type_handle()), options)
    }

    /// Field with no reflected type; needs a `type` or `ref` override
    pub fn field_untyped(self, name: impl Into<String>, options: FieldOptions) -> Self {
        self.field_as(name, None, options)
    }

    /// Field with an explicitly supplied declared type
    pub fn field_as(
        mut self,
        name: impl Into<String>,
        declared: Option<TypeHandle>,
        options: FieldOptions,
    ) -> Self {
        self.fields.push(PendingField {
            name: name.into(),
            declared,
            options,
        });
        self
    }

    /// Field whose declared type is looked up through a host reflector
    pub fn field_reflected(
        self,
        reflector: &dyn TypeReflector,
        name: impl Into<String>,
        options: FieldOptions,
    ) -> Self {
        let name = name.into();
        let declared = reflector.reflect(&self.name, &name);
        self.field_as(name, declared, options)
    }

    /// Read hook of a virtual
    pub fn getter<F>(mut self, name: impl Into<String>, get: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.behavior.virtuals.entry(name.into()).or_default().get = Some(Arc::new(get));
        self
    }

    /// Write hook of a virtual
    pub fn setter<F>(mut self, name: impl Into<String>, set: F) -> Self
    where
        F: Fn(&mut Value, Value) + Send + Sync + 'static,
    {
        self.behavior.virtuals.entry(name.into()).or_default().set = Some(Arc::new(set));
        self
    }

    /// Instance-level behavior
    pub fn method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Value + Send + Sync + 'static,
    {
        let name = name.into();
        if RESERVED_METHOD_NAMES.contains(&name.as_str()) {
            warn!(entity = %self.name, method = %name, "skipping reserved method name");
            return self;
        }
        self.behavior.methods.insert(name, Arc::new(method));
        self
    }

    /// Entity-level behavior
    pub fn static_method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&Model, &[Value]) -> Value + Send + Sync + 'static,
    {
        let name = name.into();
        if RESERVED_STATIC_NAMES.contains(&name.as_str()) {
            warn!(entity = %self.name, method = %name, "skipping reserved static name");
            return self;
        }
        self.behavior.statics.insert(name, Arc::new(method));
        self
    }

    /// Registers the entity: declaration, options, then fields in order.
    ///
    /// Fails on the first field that does not compile; fields compiled
    /// before it stay registered. Registering a name again adds to it:
    /// the parent is kept unless a new one is given, behavior and fields
    /// are merged by name, and options are replaced only when given.
    pub fn register(self) -> SchemaResult<()> {
        let registry = self.registry;

        registry.declare(EntityDeclaration {
            name: self.name.clone(),
            parent: self.parent,
            behavior: self.behavior,
        })?;

        if let Some(options) = self.options {
            registry.set_schema_options(&self.name, options)?;
        }

        let compiler = FieldCompiler::new(registry);
        for field in self.fields {
            compiler.compile(&self.name, &field.name, field.declared.as_ref(), field.options)?;
        }

        Ok(())
    }
}
