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

//! Schema tooltip cache.
//!
//! A [`SchemaTooltipProvider`] holds the schema table of one document.
//! Callers own it, one per document, and reload it when the text changes;
//! a load replaces the table wholesale.

use crate::document::{Document, SchemaTable};
use crate::error::IfcxResult;
use crate::format::{format_tooltip, TooltipStyle, NAMESPACE_SEPARATOR};
use crate::limits::Limits;
use crate::schema::TypeDescription;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct SchemaTooltipProvider {
    schemas: SchemaTable,
    style: TooltipStyle,
    limits: Limits,
}

impl SchemaTooltipProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: TooltipStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Replace the table with the schemas of `text`.
    ///
    /// On failure the previous table is kept and the error returned.
    pub fn load(&mut self, text: &str) -> IfcxResult<()> {
        match crate::document::parse_with_limits(text, &self.limits) {
            Ok(document) => {
                self.schemas = document.schemas;
                debug!(schemas = self.schemas.len(), "loaded schema table");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to load schemas, keeping previous table");
                Err(e)
            }
        }
    }

    /// Replace the table with the schemas of an already parsed document.
    pub fn load_document(&mut self, document: &Document) {
        self.schemas = document.schemas.clone();
    }

    /// Markdown tooltip for schema `name`, exact match only.
    pub fn tooltip(&self, name: &str) -> Option<String> {
        let schema = self.schemas.get(name)?;
        Some(format_tooltip(name, &schema.value, self.style))
    }

    pub fn schema(&self, name: &str) -> Option<&TypeDescription> {
        self.schemas.get(name).map(|schema| &schema.value)
    }

    pub fn schema_names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn has_schema(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn schemas(&self) -> &SchemaTable {
        &self.schemas
    }

    /// Canonical name for `name`: the name itself if defined, otherwise the
    /// single schema whose last `::` segment equals the last segment of `name`.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        if let Some((key, _)) = self.schemas.get_key_value(name) {
            return Some(key);
        }
        let short = last_segment(name);
        let mut matches = self
            .schemas
            .keys()
            .filter(|key| last_segment(key) == short);
        match (matches.next(), matches.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }

    pub fn style(&self) -> TooltipStyle {
        self.style
    }

    pub fn set_style(&mut self, style: TooltipStyle) {
        self.style = style;
    }
}

fn last_segment(name: &str) -> &str {
    name.rsplit(NAMESPACE_SEPARATOR).next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
  "header": {"version": "1", "author": "a", "timestamp": "t"},
  "schemas": {
    "bsi::ifc::v5a::schema::IsExternal": {"value": {"dataType": "Boolean"}},
    "bsi::name": {"value": {"dataType": "String"}},
    "usd::name": {"value": {"dataType": "String"}}
  },
  "data": []
}"#;

    fn loaded() -> SchemaTooltipProvider {
        let mut provider = SchemaTooltipProvider::new();
        provider.load(DOC).unwrap();
        provider
    }

    #[test]
    fn test_load_and_query() {
        let provider = loaded();
        assert!(provider.has_schema("bsi::name"));
        assert!(!provider.has_schema("name"));
        assert_eq!(provider.schema_names().count(), 3);
        let tooltip = provider.tooltip("bsi::name").unwrap();
        assert!(tooltip.starts_with("**Schema:** `bsi::name`"));
        assert!(provider.tooltip("missing").is_none());
    }

    #[test]
    fn test_failed_load_keeps_previous_table() {
        let mut provider = loaded();
        assert!(provider.load("{ invalid").is_err());
        assert!(provider.has_schema("bsi::name"));
    }

    #[test]
    fn test_load_replaces() {
        let mut provider = loaded();
        provider
            .load(r#"{"header": {"version": "1", "author": "a", "timestamp": "t"}, "schemas": {}, "data": []}"#)
            .unwrap();
        assert_eq!(provider.schema_names().count(), 0);
    }

    #[test]
    fn test_resolve_short_names() {
        let provider = loaded();
        assert_eq!(provider.resolve("bsi::name"), Some("bsi::name"));
        assert_eq!(
            provider.resolve("IsExternal"),
            Some("bsi::ifc::v5a::schema::IsExternal")
        );
        assert_eq!(
            provider.resolve("other::IsExternal"),
            Some("bsi::ifc::v5a::schema::IsExternal")
        );
        // Ambiguous.
        assert_eq!(provider.resolve("name"), None);
        assert_eq!(provider.resolve("Nothing"), None);
    }

    #[test]
    fn test_style_switch() {
        let mut provider = loaded();
        provider.set_style(TooltipStyle::Summary);
        assert_eq!(provider.style(), TooltipStyle::Summary);
        assert!(provider
            .tooltip("bsi::name")
            .unwrap()
            .contains("**Type Definition:**\n```\nstring\n```"));
    }

    #[test]
    fn test_independent_providers() {
        let a = loaded();
        let b = SchemaTooltipProvider::with_style(TooltipStyle::Summary);
        assert!(a.has_schema("bsi::name"));
        assert!(!b.has_schema("bsi::name"));
    }
}
