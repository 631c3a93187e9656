//! Type resolution for annotated fields
//!
//! Resolution rules:
//! - Effective type is the explicit `type` override, else the `ref`
//!   override, else the reflected type
//! - No reflected type and no override is an unknown type
//! - A reflected collection needs an explicit element type
//! - A registered entity name resolves to a reference when `ref` was given,
//!   to an embedded entity otherwise
//! - Anything else must be a supported primitive

use std::collections::HashMap;

use super::errors::{SchemaError, SchemaResult};
use super::registry::EntityRegistry;
use super::types::{PrimitiveType, ResolvedFieldKind, TypeHandle};

/// Host-supplied reflection: the declared type of a field, if known.
pub trait TypeReflector {
    fn reflect(&self, entity: &str, field: &str) -> Option<TypeHandle>;
}

impl<F> TypeReflector for F
where
    F: Fn(&str, &str) -> Option<TypeHandle>,
{
    fn reflect(&self, entity: &str, field: &str) -> Option<TypeHandle> {
        self(entity, field)
    }
}

/// Reflector backed by a fixed table of declared types
#[derive(Debug, Clone, Default)]
pub struct StaticReflector {
    types: HashMap<(String, String), TypeHandle>,
}

impl StaticReflector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, entity: &str, field: &str, handle: impl Into<TypeHandle>) -> Self {
        self.types
            .insert((entity.to_string(), field.to_string()), handle.into());
        self
    }
}

impl TypeReflector for StaticReflector {
    fn reflect(&self, entity: &str, field: &str) -> Option<TypeHandle> {
        self.types
            .get(&(entity.to_string(), field.to_string()))
            .cloned()
    }
}

/// Resolves declared and explicit types against the registry
pub struct TypeResolver<'a> {
    registry: &'a EntityRegistry,
}

impl<'a> TypeResolver<'a> {
    pub fn new(registry: &'a EntityRegistry) -> Self {
        Self { registry }
    }

    /// Resolves the semantic kind of `entity.field`.
    ///
    /// # Errors
    ///
    /// - `UnknownType` when neither reflection nor an override gives a type
    /// - `ArrayMissingType` when a collection has no explicit element type
    /// - `UnsupportedType` when the type is neither a primitive nor a registered entity
    pub fn resolve(
        &self,
        entity: &str,
        field: &str,
        declared: Option<&TypeHandle>,
        explicit_type: Option<&TypeHandle>,
        explicit_ref: Option<&TypeHandle>,
    ) -> SchemaResult<ResolvedFieldKind> {
        let explicit = explicit_type.or(explicit_ref);

        let is_array = declared.is_some_and(TypeHandle::is_array);
        if is_array && explicit.is_none() {
            return Err(SchemaError::ArrayMissingType {
                entity: entity.to_string(),
                field: field.to_string(),
            });
        }

        let effective = explicit.or(declared).ok_or_else(|| SchemaError::UnknownType {
            entity: entity.to_string(),
            field: field.to_string(),
        })?;

        let name = effective.name();
        let kind = if self.registry.has_fields(name)? {
            if explicit_ref.is_some() {
                ResolvedFieldKind::ReferenceTo(name.to_string())
            } else {
                ResolvedFieldKind::EmbeddedEntity(name.to_string())
            }
        } else if let Some(primitive) = PrimitiveType::from_name(name) {
            ResolvedFieldKind::Primitive(primitive)
        } else {
            return Err(SchemaError::UnsupportedType {
                entity: entity.to_string(),
                field: field.to_string(),
                type_name: name.to_string(),
            });
        };

        Ok(if is_array { kind.into_array() } else { kind })
    }
}
