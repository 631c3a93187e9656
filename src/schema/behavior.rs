//! Entity behavior: virtuals, instance methods and statics
//!
//! Behavior is registered explicitly when an entity is declared. Documents
//! are JSON values; statics receive the materialized model.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::model::Model;

/// Computes a virtual from a document
pub type Getter = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Applies a virtual assignment to a document
pub type Setter = Arc<dyn Fn(&mut Value, Value) + Send + Sync>;

/// Instance-level behavior
pub type Method = Arc<dyn Fn(&Value, &[Value]) -> Value + Send + Sync>;

/// Entity-level behavior
pub type StaticMethod = Arc<dyn Fn(&Model, &[Value]) -> Value + Send + Sync>;

/// Method names never attached as instance behavior
pub const RESERVED_METHOD_NAMES: &[&str] = &["constructor"];

/// Names never attached as entity-level behavior
pub const RESERVED_STATIC_NAMES: &[&str] = &["length", "prototype", "name"];

/// A computed, non-persisted property
#[derive(Clone, Default)]
pub struct Virtual {
    pub get: Option<Getter>,
    pub set: Option<Setter>,
}

impl Virtual {
    pub fn is_readable(&self) -> bool {
        self.get.is_some()
    }

    pub fn is_writable(&self) -> bool {
        self.set.is_some()
    }
}

impl fmt::Debug for Virtual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Virtual")
            .field("get", &self.is_readable())
            .field("set", &self.is_writable())
            .finish()
    }
}

/// Behavior declared by one entity
#[derive(Clone, Default)]
pub struct EntityBehavior {
    pub virtuals: BTreeMap<String, Virtual>,
    pub methods: BTreeMap<String, Method>,
    pub statics: BTreeMap<String, StaticMethod>,
}

impl EntityBehavior {
    pub fn is_empty(&self) -> bool {
        self.virtuals.is_empty() && self.methods.is_empty() && self.statics.is_empty()
    }

    /// Adds all of `later`; a later hook or method replaces one of the same name
    pub fn extend(&mut self, later: EntityBehavior) {
        for (name, hooks) in later.virtuals {
            let own = self.virtuals.entry(name).or_default();
            if hooks.get.is_some() {
                own.get = hooks.get;
            }
            if hooks.set.is_some() {
                own.set = hooks.set;
            }
        }
        self.methods.extend(later.methods);
        self.statics.extend(later.statics);
    }

    /// Adds every behavior from `other` whose name is not taken yet
    pub fn inherit_from(&mut self, other: &EntityBehavior) {
        for (name, ancestor) in &other.virtuals {
            let own = self.virtuals.entry(name.clone()).or_default();
            if own.get.is_none() {
                own.get = ancestor.get.clone();
            }
            if own.set.is_none() {
                own.set = ancestor.set.clone();
            }
        }
        for (name, method) in &other.methods {
            self.methods.entry(name.clone()).or_insert_with(|| method.clone());
        }
        for (name, method) in &other.statics {
            self.statics.entry(name.clone()).or_insert_with(|| method.clone());
        }
    }
}

impl fmt::Debug for EntityBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityBehavior")
            .field("virtuals", &self.virtuals)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("statics", &self.statics.keys().collect::<Vec<_>>())
            .finish()
    }
}
