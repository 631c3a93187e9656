//! Field compilation
//!
//! Turns one field annotation into a descriptor and merges it into the
//! owning entity's field table. A field that fails to compile leaves the
//! table untouched.

use tracing::debug;

use super::descriptor::{EmbeddedSchema, FieldDescriptor};
use super::errors::{SchemaError, SchemaResult};
use super::options::FieldOptions;
use super::registry::EntityRegistry;
use super::resolver::{TypeReflector, TypeResolver};
use super::types::{ResolvedFieldKind, TypeHandle};

/// Compiles field annotations into the registry
pub struct FieldCompiler<'a> {
    registry: &'a EntityRegistry,
}

impl<'a> FieldCompiler<'a> {
    pub fn new(registry: &'a EntityRegistry) -> Self {
        Self { registry }
    }

    /// Compiles `entity.field` and stores the descriptor, replacing any
    /// earlier descriptor of the same name.
    ///
    /// # Errors
    ///
    /// Type resolution errors, plus `StringValidators` / `NumberValidators`
    /// when constraints do not fit the resolved kind.
    pub fn compile(
        &self,
        entity: &str,
        field: &str,
        declared: Option<&TypeHandle>,
        options: FieldOptions,
    ) -> SchemaResult<FieldDescriptor> {
        let kind = TypeResolver::new(self.registry).resolve(
            entity,
            field,
            declared,
            options.type_override.as_ref(),
            options.reference.as_ref(),
        )?;

        let primitive = kind.primitive();

        if options.has_string_validators() && !primitive.is_some_and(|p| p.is_textual()) {
            return Err(SchemaError::StringValidators {
                entity: entity.to_string(),
                field: field.to_string(),
            });
        }

        if options.has_number_validators()
            && !primitive.is_some_and(|p| p.is_numeric_or_temporal())
        {
            return Err(SchemaError::NumberValidators {
                entity: entity.to_string(),
                field: field.to_string(),
            });
        }

        let array = kind.is_array();
        let descriptor = match kind.element() {
            ResolvedFieldKind::ReferenceTo(target) => FieldDescriptor::Reference {
                target: target.clone(),
                array,
            },
            ResolvedFieldKind::EmbeddedEntity(target) => FieldDescriptor::Embedded {
                schema: EmbeddedSchema {
                    entity: target.clone(),
                    fields: self.registry.field_table(target)?,
                    keep_id: options.keep_id == Some(true),
                },
                array,
            },
            ResolvedFieldKind::Primitive(ty) => FieldDescriptor::Primitive {
                ty: *ty,
                array,
                options: options.without_overrides(),
            },
            ResolvedFieldKind::ArrayOf(_) => {
                return Err(SchemaError::Internal(format!(
                    "nested array kind for {}.{}",
                    entity, field
                )))
            }
        };

        self.registry.insert_field(entity, field, descriptor.clone())?;
        debug!(entity, field, kind = %kind, "compiled field");
        Ok(descriptor)
    }

    /// Compiles a field whose declared type comes from a host reflector
    pub fn compile_reflected(
        &self,
        reflector: &dyn TypeReflector,
        entity: &str,
        field: &str,
        options: FieldOptions,
    ) -> SchemaResult<FieldDescriptor> {
        let declared = reflector.reflect(entity, field);
        self.compile(entity, field, declared.as_ref(), options)
    }
}
