//! Model materialization
//!
//! A model is the final artifact compiled from an assembled schema by a
//! `SchemaEngine`. At most one model exists per entity for the lifetime of
//! the registry; `ModelFactory::get_model` is the entry point.

mod engine;
mod errors;
mod factory;
#[allow(clippy::module_inception)]
mod model;

pub use engine::{DefinitionEngine, EngineHandle, SchemaEngine};
pub use errors::{ModelError, ModelResult};
pub use factory::{Document, ModelFactory};
pub use model::Model;
