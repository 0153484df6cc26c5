// Dweve IFCX - Editor tooling for IFCX documents
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! Server configuration.
//!
//! Settings arrive as JSON, either as `initializationOptions` or through
//! `workspace/didChangeConfiguration`. Both may wrap the values in an
//! `ifcx` section:
//!
//! ```json
//! {
//!   "ifcx": {
//!     "autoFoldArray": { "minElements": 10 },
//!     "tooltipStyle": "detailed",
//!     "debounceMs": 100,
//!     "maxDocuments": 1000,
//!     "maxDocumentSize": 524288000
//!   }
//! }
//! ```
//!
//! Missing fields take their defaults. Settings that fail to deserialize are
//! logged and replaced by the defaults as a whole.

use crate::constants::{
    DEBOUNCE_MS, DEFAULT_MAX_CACHE_SIZE, DEFAULT_MAX_DOCUMENT_SIZE, SETTINGS_SECTION,
};
use ifcx_core::folding::DEFAULT_MIN_ARRAY_ELEMENTS;
use ifcx_core::TooltipStyle;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Errors reading client settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings must be a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error("invalid ifcx settings: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Folding settings for attribute arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoFoldArray {
    /// Arrays with fewer top-level elements get no folding range.
    pub min_elements: usize,
}

impl Default for AutoFoldArray {
    fn default() -> Self {
        Self {
            min_elements: DEFAULT_MIN_ARRAY_ELEMENTS,
        }
    }
}

/// Runtime settings of the language server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    pub auto_fold_array: AutoFoldArray,
    pub tooltip_style: TooltipStyle,
    pub debounce_ms: u64,
    pub max_documents: usize,
    pub max_document_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            auto_fold_array: AutoFoldArray::default(),
            tooltip_style: TooltipStyle::default(),
            debounce_ms: DEBOUNCE_MS,
            max_documents: DEFAULT_MAX_CACHE_SIZE,
            max_document_size: DEFAULT_MAX_DOCUMENT_SIZE,
        }
    }
}

impl ServerConfig {
    /// Read settings, unwrapping the `ifcx` section when present.
    ///
    /// `null` yields the defaults.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let section = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map.get(SETTINGS_SECTION).unwrap_or(value),
            other => return Err(ConfigError::NotAnObject(json_type_name(other))),
        };
        match section {
            Value::Null => Ok(Self::default()),
            Value::Object(_) => Ok(Self::deserialize(section)?),
            other => Err(ConfigError::NotAnObject(json_type_name(other))),
        }
    }

    /// Like [`from_value`](Self::from_value), falling back to the defaults.
    pub fn from_value_or_default(value: Option<&Value>) -> Self {
        let Some(value) = value else {
            return Self::default();
        };
        Self::from_value(value).unwrap_or_else(|e| {
            warn!(error = %e, "ignoring client settings, using defaults");
            Self::default()
        })
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.auto_fold_array.min_elements, 10);
        assert_eq!(config.tooltip_style, TooltipStyle::Detailed);
        assert_eq!(config.debounce(), Duration::from_millis(100));
        assert_eq!(config.max_documents, DEFAULT_MAX_CACHE_SIZE);
    }

    #[test]
    fn test_section_and_partial_settings() {
        let value = json!({
            "ifcx": {
                "autoFoldArray": {"minElements": 3},
                "tooltipStyle": "summary"
            }
        });
        let config = ServerConfig::from_value(&value).unwrap();
        assert_eq!(config.auto_fold_array.min_elements, 3);
        assert_eq!(config.tooltip_style, TooltipStyle::Summary);
        assert_eq!(config.debounce_ms, DEBOUNCE_MS);
    }

    #[test]
    fn test_unwrapped_settings() {
        let config = ServerConfig::from_value(&json!({"debounceMs": 250})).unwrap();
        assert_eq!(config.debounce_ms, 250);
    }

    #[test]
    fn test_null_is_default() {
        assert_eq!(ServerConfig::from_value(&Value::Null).unwrap(), ServerConfig::default());
        assert_eq!(
            ServerConfig::from_value(&json!({"ifcx": null})).unwrap(),
            ServerConfig::default()
        );
    }

    #[test]
    fn test_malformed_settings() {
        assert!(matches!(
            ServerConfig::from_value(&json!([1, 2])),
            Err(ConfigError::NotAnObject("array"))
        ));
        assert!(matches!(
            ServerConfig::from_value(&json!({"ifcx": {"tooltipStyle": "fancy"}})),
            Err(ConfigError::Invalid(_))
        ));

        let fallback =
            ServerConfig::from_value_or_default(Some(&json!({"ifcx": {"debounceMs": "soon"}})));
        assert_eq!(fallback, ServerConfig::default());
    }
}
