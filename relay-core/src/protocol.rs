//! Resource protocol documents
//!
//! The CI engine writes a [`ResourceRequest`] to the resource's stdin and
//! reads a response document from its stdout. Relay never tracks versions,
//! so every version it reports is an empty object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// A resource version. Always empty for Relay.
pub type Version = Map<String, Value>;

/// Request document read from stdin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceRequest {
    /// Resource configuration from the pipeline
    #[serde(default)]
    pub source: Map<String, Value>,
    /// Step parameters (`put` / `get` params)
    #[serde(default)]
    pub params: Map<String, Value>,
    /// Version being fetched, for `in`
    #[serde(default)]
    pub version: Option<Version>,
}

impl ResourceRequest {
    /// Parse a request from the raw stdin payload
    pub fn parse(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Source overlaid with params; params win on key collisions
    pub fn merged_params(&self) -> Map<String, Value> {
        let mut merged = self.source.clone();
        for (key, value) in &self.params {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Whether `source.debug` asks for console debug logging
    ///
    /// Any truthy value counts: `true`, a non-zero number, or a non-empty
    /// string, list or object.
    pub fn debug_enabled(&self) -> bool {
        match self.source.get("debug") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(flag)) => *flag,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(items)) => !items.is_empty(),
            Some(Value::Object(fields)) => !fields.is_empty(),
        }
    }
}

/// Response to `check`: the list of new versions
pub type CheckResponse = Vec<Version>;

/// A name/value pair shown in the CI engine's UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataField {
    pub name: String,
    pub value: String,
}

/// Response to `in`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InResponse {
    pub version: Version,
    pub metadata: Vec<MetadataField>,
}

/// Response to `out`
///
/// Always carries a `version` key. Extra top-level fields can be merged in
/// when the resource runs in test mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OutResponse(Map<String, Value>);

impl OutResponse {
    pub fn new(version: Version) -> Self {
        let mut fields = Map::new();
        fields.insert("version".to_string(), Value::Object(version));
        Self(fields)
    }

    /// Merge top-level fields; later keys overwrite existing ones, `version` included
    pub fn merge(&mut self, fields: Map<String, Value>) {
        self.0.extend(fields);
    }

    pub fn version(&self) -> Option<&Value> {
        self.0.get("version")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl Default for OutResponse {
    fn default() -> Self {
        Self::new(Version::new())
    }
}
