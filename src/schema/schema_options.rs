//! Entity-wide schema options
//!
//! Passed through to the persistence engine untouched. The compiler only
//! decides which entity in an inheritance chain supplies them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Read preference, accepting the short aliases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReadPreference {
    #[serde(alias = "p")]
    Primary,
    #[serde(alias = "pp")]
    PrimaryPreferred,
    #[serde(alias = "s")]
    Secondary,
    #[serde(alias = "sp")]
    SecondaryPreferred,
    #[serde(alias = "n")]
    Nearest,
}

/// Write acknowledgement level: a tag such as "majority" or a node count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WriteAck {
    Nodes(u32),
    Tag(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteConcern {
    pub w: WriteAck,
    pub j: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wtimeout: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardKey {
    pub tag: i64,
    pub name: i64,
}

/// Options for document-to-object conversion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub getters: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtuals: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimize: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depopulate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_key: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamps {
    Enabled(bool),
    Fields(TimestampFields),
}

/// Entity-wide configuration attached by the class-level annotation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_index: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_create: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer_commands: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capped: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<bool>,
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    pub keep_id: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimize: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read: Option<ReadPreference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_concern: Option<WriteConcern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shard_key: Option<ShardKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict_query: Option<bool>,
    #[serde(default, rename = "toJSON", skip_serializing_if = "Option::is_none")]
    pub to_json: Option<ConversionOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_object: Option<ConversionOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_before_save: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collation: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamps: Option<Timestamps>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_nested_strict: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select_populated_paths: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_subdoc_validation_error: Option<bool>,
}

impl SchemaOptions {
    /// Options with an explicit collection name
    pub fn with_collection(collection: impl Into<String>) -> Self {
        Self {
            collection: Some(collection.into()),
            ..Self::default()
        }
    }

    pub fn timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = Some(Timestamps::Enabled(enabled));
        self
    }

    pub fn read(mut self, preference: ReadPreference) -> Self {
        self.read = Some(preference);
        self
    }
}
