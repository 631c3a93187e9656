//! Compiled field descriptors
//!
//! A descriptor is the storage-ready form of one annotated field. Its
//! definition rendering follows the document-store convention:
//! - primitive: `{ "type": "String", ...options }` or `{ "type": ["String"] }`
//! - reference: `{ "type": "ObjectId", "ref": "Author" }`, wrapped in `[...]` for arrays
//! - embedded: `{ "fields": {...}, "options": { "_id": false } }`, wrapped in `[...]` for arrays

use serde_json::{json, Value};
use std::collections::BTreeMap;

use super::options::FieldOptions;
use super::types::{PrimitiveType, ResolvedFieldKind};

/// Field name to descriptor, for one entity
pub type EntityFieldTable = BTreeMap<String, FieldDescriptor>;

/// Nested schema built from another entity's field table
#[derive(Debug, Clone)]
pub struct EmbeddedSchema {
    /// Entity the table was copied from
    pub entity: String,
    /// Snapshot of the entity's fields at compile time
    pub fields: EntityFieldTable,
    /// Whether sub-documents get their own `_id`
    pub keep_id: bool,
}

impl EmbeddedSchema {
    pub fn to_definition(&self) -> Value {
        json!({
            "fields": table_definition(&self.fields),
            "options": { "_id": self.keep_id },
        })
    }
}

/// Compiled representation of a single field
#[derive(Debug, Clone)]
pub enum FieldDescriptor {
    Primitive {
        ty: PrimitiveType,
        array: bool,
        options: FieldOptions,
    },
    Reference {
        target: String,
        array: bool,
    },
    Embedded {
        schema: EmbeddedSchema,
        array: bool,
    },
}

impl FieldDescriptor {
    /// Resolved kind this descriptor was compiled from
    pub fn kind(&self) -> ResolvedFieldKind {
        let (kind, array) = match self {
            FieldDescriptor::Primitive { ty, array, .. } => {
                (ResolvedFieldKind::Primitive(*ty), *array)
            }
            FieldDescriptor::Reference { target, array } => {
                (ResolvedFieldKind::ReferenceTo(target.clone()), *array)
            }
            FieldDescriptor::Embedded { schema, array } => {
                (ResolvedFieldKind::EmbeddedEntity(schema.entity.clone()), *array)
            }
        };
        if array {
            kind.into_array()
        } else {
            kind
        }
    }

    pub fn is_array(&self) -> bool {
        match self {
            FieldDescriptor::Primitive { array, .. }
            | FieldDescriptor::Reference { array, .. }
            | FieldDescriptor::Embedded { array, .. } => *array,
        }
    }

    /// Surviving annotation options; only primitives keep them
    pub fn options(&self) -> Option<&FieldOptions> {
        match self {
            FieldDescriptor::Primitive { options, .. } => Some(options),
            _ => None,
        }
    }

    /// Target entity of a reference field
    pub fn reference_target(&self) -> Option<&str> {
        match self {
            FieldDescriptor::Reference { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn to_definition(&self) -> Value {
        match self {
            FieldDescriptor::Primitive { ty, array, options } => {
                let mut out = serde_json::Map::new();
                let type_name = Value::String(ty.name().into());
                out.insert(
                    "type".into(),
                    if *array { Value::Array(vec![type_name]) } else { type_name },
                );
                options.write_definition(&mut out);
                Value::Object(out)
            }
            FieldDescriptor::Reference { target, array } => {
                let reference = json!({
                    "type": PrimitiveType::ObjectId.name(),
                    "ref": target,
                });
                wrap(reference, *array)
            }
            FieldDescriptor::Embedded { schema, array } => wrap(schema.to_definition(), *array),
        }
    }
}

fn wrap(value: Value, array: bool) -> Value {
    if array {
        Value::Array(vec![value])
    } else {
        value
    }
}

/// Renders a whole field table as a definition object
pub fn table_definition(table: &EntityFieldTable) -> Value {
    let fields = table
        .iter()
        .map(|(name, descriptor)| (name.clone(), descriptor.to_definition()))
        .collect();
    Value::Object(fields)
}
