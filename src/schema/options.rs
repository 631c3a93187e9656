//! Per-field annotation options
//!
//! The constraint set a developer attaches to one field. Options that only
//! make sense for one family of types are grouped so the compiler can check
//! them against the resolved kind:
//! - string transforms: lowercase, uppercase, trim, match, enum, minlength, maxlength
//! - bounds: min, max (numbers and dates)

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;

use super::types::{Reflect, TypeHandle};

/// Predicate over a candidate field value
pub type ValidatorFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Computes whether a field is required for a given document
pub type RequiredFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Produces a default value for a given document
pub type DefaultFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Placeholder rendered in definitions where a function is attached
const FUNCTION_MARKER: &str = "[Function]";

/// Whether a field must be present
#[derive(Clone)]
pub enum Required {
    Always(bool),
    When(RequiredFn),
}

impl Required {
    fn to_definition(&self) -> Value {
        match self {
            Required::Always(flag) => Value::Bool(*flag),
            Required::When(_) => Value::String(FUNCTION_MARKER.into()),
        }
    }
}

/// Default value for a field, literal or computed
#[derive(Clone)]
pub enum DefaultValue {
    Literal(Value),
    Computed(DefaultFn),
}

impl DefaultValue {
    /// Produces the default for the given document
    pub fn produce(&self, document: &Value) -> Value {
        match self {
            DefaultValue::Literal(value) => value.clone(),
            DefaultValue::Computed(f) => f(document),
        }
    }

    fn to_definition(&self) -> Value {
        match self {
            DefaultValue::Literal(value) => value.clone(),
            DefaultValue::Computed(_) => Value::String(FUNCTION_MARKER.into()),
        }
    }
}

/// A field validator: function, pattern, or function with a message
#[derive(Clone)]
pub enum FieldValidator {
    Function(ValidatorFn),
    Pattern(Regex),
    WithMessage { validator: ValidatorFn, message: String },
}

impl FieldValidator {
    /// Checks a value. Patterns reject non-string values.
    pub fn check(&self, value: &Value) -> bool {
        match self {
            FieldValidator::Function(f) => f(value),
            FieldValidator::Pattern(re) => value.as_str().is_some_and(|s| re.is_match(s)),
            FieldValidator::WithMessage { validator, .. } => validator(value),
        }
    }

    /// Message attached to this validator
    pub fn message(&self) -> Option<&str> {
        match self {
            FieldValidator::WithMessage { message, .. } => Some(message),
            _ => None,
        }
    }

    fn to_definition(&self) -> Value {
        match self {
            FieldValidator::Function(_) => json!({ "validator": FUNCTION_MARKER }),
            FieldValidator::Pattern(re) => json!({ "validator": format!("/{}/", re.as_str()) }),
            FieldValidator::WithMessage { message, .. } => {
                json!({ "validator": FUNCTION_MARKER, "message": message })
            }
        }
    }
}

/// Lower or upper bound for numbers and dates
#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
    Number(f64),
    Date(DateTime<Utc>),
}

impl Bound {
    fn to_definition(&self) -> Value {
        match self {
            Bound::Number(n) => json!(n),
            Bound::Date(d) => Value::String(d.to_rfc3339()),
        }
    }
}

impl From<f64> for Bound {
    fn from(n: f64) -> Self {
        Bound::Number(n)
    }
}

impl From<i32> for Bound {
    fn from(n: i32) -> Self {
        Bound::Number(f64::from(n))
    }
}

impl From<DateTime<Utc>> for Bound {
    fn from(d: DateTime<Utc>) -> Self {
        Bound::Date(d)
    }
}

/// Options attached to one field annotation.
#[derive(Clone, Default)]
pub struct FieldOptions {
    pub required: Option<Required>,
    pub default: Option<DefaultValue>,
    pub validate: Vec<FieldValidator>,
    pub select: Option<bool>,
    pub alias: Option<String>,
    pub index: Option<bool>,
    pub unique: Option<bool>,
    pub sparse: Option<bool>,
    pub lowercase: Option<bool>,
    pub uppercase: Option<bool>,
    pub trim: Option<bool>,
    pub pattern: Option<Regex>,
    pub enum_values: Option<Vec<Value>>,
    pub minlength: Option<usize>,
    pub maxlength: Option<usize>,
    pub min: Option<Bound>,
    pub max: Option<Bound>,
    /// Explicit type override
    pub type_override: Option<TypeHandle>,
    /// Explicit reference override
    pub reference: Option<TypeHandle>,
    /// Keep `_id` on an embedded sub-document
    pub keep_id: Option<bool>,
}

impl FieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(Required::Always(required));
        self
    }

    pub fn required_when<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.required = Some(Required::When(Arc::new(f)));
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Literal(value.into()));
        self
    }

    pub fn default_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::Computed(Arc::new(f)));
        self
    }

    pub fn validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.validate.push(FieldValidator::Function(Arc::new(f)));
        self
    }

    pub fn validate_pattern(mut self, re: Regex) -> Self {
        self.validate.push(FieldValidator::Pattern(re));
        self
    }

    pub fn validate_with_message<F>(mut self, f: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.validate.push(FieldValidator::WithMessage {
            validator: Arc::new(f),
            message: message.into(),
        });
        self
    }

    pub fn select(mut self, select: bool) -> Self {
        self.select = Some(select);
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn index(mut self) -> Self {
        self.index = Some(true);
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = Some(true);
        self
    }

    pub fn sparse(mut self) -> Self {
        self.sparse = Some(true);
        self
    }

    pub fn lowercase(mut self) -> Self {
        self.lowercase = Some(true);
        self
    }

    pub fn uppercase(mut self) -> Self {
        self.uppercase = Some(true);
        self
    }

    pub fn trim(mut self) -> Self {
        self.trim = Some(true);
        self
    }

    pub fn matches(mut self, re: Regex) -> Self {
        self.pattern = Some(re);
        self
    }

    pub fn one_of<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn minlength(mut self, n: usize) -> Self {
        self.minlength = Some(n);
        self
    }

    pub fn maxlength(mut self, n: usize) -> Self {
        self.maxlength = Some(n);
        self
    }

    pub fn min(mut self, bound: impl Into<Bound>) -> Self {
        self.min = Some(bound.into());
        self
    }

    pub fn max(mut self, bound: impl Into<Bound>) -> Self {
        self.max = Some(bound.into());
        self
    }

    /// Overrides the declared type with a Rust type
    pub fn of_type<T: Reflect + ?Sized>(self) -> Self {
        self.type_named(T::type_handle())
    }

    pub fn type_named(mut self, handle: impl Into<TypeHandle>) -> Self {
        self.type_override = Some(handle.into());
        self
    }

    /// Marks the field as a reference to another entity
    pub fn reference<T: Reflect + ?Sized>(self) -> Self {
        self.reference_named(T::type_handle())
    }

    pub fn reference_named(mut self, handle: impl Into<TypeHandle>) -> Self {
        self.reference = Some(handle.into());
        self
    }

    pub fn keep_id(mut self, keep: bool) -> Self {
        self.keep_id = Some(keep);
        self
    }

    /// Whether any string-only constraint is set
    pub fn has_string_validators(&self) -> bool {
        self.lowercase.unwrap_or(false)
            || self.uppercase.unwrap_or(false)
            || self.trim.unwrap_or(false)
            || self.pattern.is_some()
            || self.enum_values.is_some()
            || self.minlength.is_some()
            || self.maxlength.is_some()
    }

    /// Whether any number/date-only constraint is set
    pub fn has_number_validators(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// Returns a copy without the type, reference and `_id` keys
    pub(crate) fn without_overrides(mut self) -> Self {
        self.type_override = None;
        self.reference = None;
        self.keep_id = None;
        self
    }

    /// Renders the surviving options as definition keys
    pub(crate) fn write_definition(&self, out: &mut serde_json::Map<String, Value>) {
        if let Some(required) = &self.required {
            out.insert("required".into(), required.to_definition());
        }
        if let Some(default) = &self.default {
            out.insert("default".into(), default.to_definition());
        }
        if !self.validate.is_empty() {
            let validators = self.validate.iter().map(FieldValidator::to_definition).collect();
            out.insert("validate".into(), Value::Array(validators));
        }
        let flags = [
            ("select", self.select),
            ("index", self.index),
            ("unique", self.unique),
            ("sparse", self.sparse),
            ("lowercase", self.lowercase),
            ("uppercase", self.uppercase),
            ("trim", self.trim),
        ];
        for (key, flag) in flags {
            if let Some(flag) = flag {
                out.insert(key.into(), Value::Bool(flag));
            }
        }
        if let Some(alias) = &self.alias {
            out.insert("alias".into(), Value::String(alias.clone()));
        }
        if let Some(re) = &self.pattern {
            out.insert("match".into(), Value::String(format!("/{}/", re.as_str())));
        }
        if let Some(values) = &self.enum_values {
            out.insert("enum".into(), Value::Array(values.clone()));
        }
        if let Some(n) = self.minlength {
            out.insert("minlength".into(), json!(n));
        }
        if let Some(n) = self.maxlength {
            out.insert("maxlength".into(), json!(n));
        }
        if let Some(bound) = &self.min {
            out.insert("min".into(), bound.to_definition());
        }
        if let Some(bound) = &self.max {
            out.insert("max".into(), bound.to_definition());
        }
    }
}

impl fmt::Debug for FieldOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut definition = serde_json::Map::new();
        self.write_definition(&mut definition);
        f.debug_struct("FieldOptions")
            .field("definition", &Value::Object(definition))
            .field("type_override", &self.type_override)
            .field("reference", &self.reference)
            .field("keep_id", &self.keep_id)
            .finish()
    }
}
