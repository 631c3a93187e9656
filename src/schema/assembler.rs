//! Schema assembly across an inheritance chain
//!
//! The chain starts at the requested entity and follows `extends` links to
//! the root. Assembly rules:
//! - Fields: the head's table first, then each ancestor's table merged on
//!   top walking toward the root. With `MergeOrder::AncestorWins` an
//!   ancestor's field replaces a same-named descendant field; with
//!   `MergeOrder::DescendantWins` the first definition seen is kept.
//! - Options: from the most-derived entity in the chain that has any.
//! - Behavior: from the head only, unless `inherit_behavior` is set.

use serde_json::{json, Value};
use std::collections::HashSet;

use super::behavior::EntityBehavior;
use super::descriptor::{table_definition, EntityFieldTable};
use super::errors::{SchemaError, SchemaResult};
use super::registry::EntityRegistry;
use super::schema_options::SchemaOptions;
use crate::config::MergeOrder;

/// Final merged schema for one entity
#[derive(Debug, Clone)]
pub struct AssembledSchema {
    /// Entity the schema was assembled for
    pub entity: String,
    /// Ancestors, nearest first
    pub ancestors: Vec<String>,
    pub fields: EntityFieldTable,
    pub options: SchemaOptions,
    pub behavior: EntityBehavior,
}

impl AssembledSchema {
    /// Renders fields, options and behavior names as a JSON definition
    pub fn to_definition(&self) -> Value {
        let options = serde_json::to_value(&self.options).unwrap_or(Value::Null);
        json!({
            "name": self.entity,
            "fields": table_definition(&self.fields),
            "options": options,
            "virtuals": self.behavior.virtuals.keys().collect::<Vec<_>>(),
            "methods": self.behavior.methods.keys().collect::<Vec<_>>(),
            "statics": self.behavior.statics.keys().collect::<Vec<_>>(),
        })
    }
}

/// Assembles schemas from registry contents
pub struct SchemaAssembler<'a> {
    registry: &'a EntityRegistry,
}

impl<'a> SchemaAssembler<'a> {
    pub fn new(registry: &'a EntityRegistry) -> Self {
        Self { registry }
    }

    /// Resolves the inheritance chain of `entity`, head first.
    ///
    /// # Errors
    ///
    /// `UnknownEntity` for an undeclared entity or parent,
    /// `InheritanceCycle` when a parent link loops back.
    pub fn chain(&self, entity: &str) -> SchemaResult<Vec<String>> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(entity.to_string());

        while let Some(name) = current {
            if !seen.insert(name.clone()) {
                return Err(SchemaError::InheritanceCycle(name));
            }
            let declaration = self.registry.declaration(&name)?;
            current = declaration.parent;
            chain.push(name);
        }

        Ok(chain)
    }

    /// Assembles the schema for `entity`
    pub fn assemble(&self, entity: &str) -> SchemaResult<AssembledSchema> {
        let chain = self.chain(entity)?;
        let config = self.registry.config();

        let mut fields = EntityFieldTable::new();
        for name in &chain {
            let table = self.registry.field_table(name)?;
            for (field, descriptor) in table {
                match config.merge_order {
                    MergeOrder::AncestorWins => {
                        fields.insert(field, descriptor);
                    }
                    MergeOrder::DescendantWins => {
                        fields.entry(field).or_insert(descriptor);
                    }
                }
            }
        }

        let mut options = None;
        for name in &chain {
            options = self.registry.schema_options(name)?;
            if options.is_some() {
                break;
            }
        }

        let mut behavior = self.registry.declaration(entity)?.behavior;
        if config.inherit_behavior {
            for ancestor in chain.iter().skip(1) {
                behavior.inherit_from(&self.registry.declaration(ancestor)?.behavior);
            }
        }

        Ok(AssembledSchema {
            entity: entity.to_string(),
            ancestors: chain.into_iter().skip(1).collect(),
            fields,
            options: options.unwrap_or_default(),
            behavior,
        })
    }
}
