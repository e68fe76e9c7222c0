//! `package.json` patching.
//!
//! The manifest is merged, never regenerated: unknown fields and their
//! order survive the round trip.

use serde_json::{Map, Value};

use crate::domain::error::DomainError;

/// File name of the manifest, relative to the workspace root.
pub const MANIFEST_FILE: &str = "package.json";

/// Value written to the `type` field.
pub const MODULE_TYPE: &str = "module";

/// Command bound to `scripts.start`.
pub const START_SCRIPT: &str = "node src/server.js";

/// Command bound to `scripts.dev`.
pub const DEV_SCRIPT: &str = "nodemon src/server.js";

/// A parsed `package.json` object.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageManifest {
    fields: Map<String, Value>,
}

impl PackageManifest {
    /// Parse manifest source. The top level must be a JSON object.
    pub fn parse(source: &str) -> Result<Self, DomainError> {
        let value: Value =
            serde_json::from_str(source).map_err(|e| DomainError::ManifestParse {
                reason: e.to_string(),
            })?;

        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(DomainError::InvalidManifest(format!(
                "expected a JSON object at the top level, found {}",
                kind_of(&other)
            ))),
        }
    }

    /// Mark the package as an ES module and set the `start`/`dev` scripts.
    ///
    /// A missing or `null` `scripts` entry becomes an empty object first.
    /// Any other non-object value is rejected rather than silently dropped.
    pub fn apply_express_defaults(&mut self) -> Result<(), DomainError> {
        self.fields
            .insert("type".into(), Value::String(MODULE_TYPE.into()));

        let scripts = self
            .fields
            .entry("scripts")
            .or_insert_with(|| Value::Object(Map::new()));
        if scripts.is_null() {
            *scripts = Value::Object(Map::new());
        }

        match scripts {
            Value::Object(scripts) => {
                scripts.insert("start".into(), Value::String(START_SCRIPT.into()));
                scripts.insert("dev".into(), Value::String(DEV_SCRIPT.into()));
                Ok(())
            }
            other => Err(DomainError::InvalidManifest(format!(
                "\"scripts\" must be an object, found {}",
                kind_of(other)
            ))),
        }
    }

    /// Serialise with two-space indentation.
    pub fn to_pretty_string(&self) -> Result<String, DomainError> {
        serde_json::to_string_pretty(&self.fields).map_err(|e| DomainError::ManifestSerialize {
            reason: e.to_string(),
        })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn script(&self, name: &str) -> Option<&str> {
        self.fields.get("scripts")?.get(name)?.as_str()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
