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

//! IFCX document model and parser.
//!
//! The text must be valid JSON with a `header` (carrying non-empty
//! `version`, `author` and `timestamp`), a `schemas` table and a `data`
//! sequence; otherwise parsing fails with a syntax or structural
//! [`IfcxError`]. Below that level the projection is lenient: a node field
//! of the wrong shape reads as absent, and a schema whose description
//! cannot be read is kept as [`DataType::Unrecognized`].

use crate::error::{IfcxError, IfcxResult};
use crate::json::{line_col, parse_spanned, Span, SpannedValue};
use crate::limits::Limits;
use crate::schema::{DataType, TypeDescription};
use crate::validate::Validator;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

/// Named schemas in declaration order.
pub type SchemaTable = IndexMap<String, Schema>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub version: String,
    pub author: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub value: TypeDescription,
}

impl Schema {
    /// Read one schema entry, degrading to an unrecognized type when the
    /// description is malformed.
    fn from_json(name: &str, value: &JsonValue) -> Self {
        match serde_json::from_value(value.clone()) {
            Ok(schema) => schema,
            Err(e) => {
                warn!(schema = name, error = %e, "unreadable schema description");
                let tag = value
                    .pointer("/value/dataType")
                    .and_then(JsonValue::as_str)
                    .unwrap_or_default();
                Schema {
                    value: TypeDescription::new(DataType::Unrecognized(tag.to_string())),
                }
            }
        }
    }
}

/// The `inherits` field of a node.
///
/// Documents use both a keyed mapping and a bare list of identifiers; the
/// two forms are equivalent. Non-string entries are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Inherits {
    Map(IndexMap<String, JsonValue>),
    List(Vec<JsonValue>),
}

impl Inherits {
    /// Read either form; any other shape is treated as absent.
    fn from_json(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::Object(map) => Some(Inherits::Map(
                map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            )),
            JsonValue::Array(list) => Some(Inherits::List(list.clone())),
            _ => None,
        }
    }

    /// Inherited identifiers in source order.
    pub fn targets(&self) -> Vec<&str> {
        match self {
            Inherits::Map(map) => map.values().filter_map(JsonValue::as_str).collect(),
            Inherits::List(list) => list.iter().filter_map(JsonValue::as_str).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Inherits::Map(map) => map.is_empty(),
            Inherits::List(list) => list.is_empty(),
        }
    }
}

/// An entity in the `data` sequence.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<IndexMap<String, JsonValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherits: Option<Inherits>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<IndexMap<String, JsonValue>>,
}

impl Node {
    /// Read one `data` entry. Fields of the wrong shape read as absent and a
    /// non-object entry yields a node without an identifier.
    pub fn from_json(value: &JsonValue) -> Self {
        let object_field = |field: &str| -> Option<IndexMap<String, JsonValue>> {
            value
                .get(field)
                .and_then(JsonValue::as_object)
                .map(|map| map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        };
        Node {
            identifier: value
                .get("identifier")
                .and_then(JsonValue::as_str)
                .unwrap_or_default()
                .to_string(),
            children: object_field("children"),
            inherits: value.get("inherits").and_then(Inherits::from_json),
            attributes: object_field("attributes"),
        }
    }

    /// Inherited identifiers, empty when the field is absent.
    pub fn inherit_targets(&self) -> Vec<&str> {
        self.inherits.as_ref().map(Inherits::targets).unwrap_or_default()
    }

    /// `(display name, child identifier)` pairs whose identifier is a string.
    pub fn child_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.children
            .iter()
            .flat_map(|children| children.iter())
            .filter_map(|(name, id)| id.as_str().map(|id| (name.as_str(), id)))
    }
}

/// A parsed IFCX document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub header: Header,
    pub schemas: SchemaTable,
    pub data: Vec<Node>,
}

impl Document {
    /// First node with the given identifier.
    pub fn find_node(&self, identifier: &str) -> Option<&Node> {
        self.data.iter().find(|node| node.identifier == identifier)
    }

    /// Nodes referenced by `parent_id`'s `children` mapping, in mapping order.
    /// Unknown identifiers are skipped.
    pub fn child_nodes(&self, parent_id: &str) -> Vec<&Node> {
        let Some(parent) = self.find_node(parent_id) else {
            return Vec::new();
        };
        parent
            .child_entries()
            .filter_map(|(_, id)| self.find_node(id))
            .collect()
    }

    /// Nodes whose `inherits` names `base_id`.
    pub fn inheriting_nodes(&self, base_id: &str) -> Vec<&Node> {
        self.data
            .iter()
            .filter(|node| node.inherit_targets().contains(&base_id))
            .collect()
    }

    pub fn schema(&self, name: &str) -> Option<&TypeDescription> {
        self.schemas.get(name).map(|schema| &schema.value)
    }

    /// Check a node's attributes against the schema table.
    ///
    /// Attributes naming unknown schemas are ignored. A node without an
    /// identifier is invalid.
    pub fn validate_node(&self, node: &Node) -> bool {
        if node.identifier.is_empty() {
            return false;
        }
        let validator = Validator::new(&self.schemas);
        node.attributes.iter().flat_map(|a| a.iter()).all(|(name, value)| {
            validator.validate_attribute(name, value).unwrap_or(true)
        })
    }
}

/// A document together with the spanned tree it was projected from.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub document: Document,
    pub tree: SpannedValue,
}

impl ParsedDocument {
    /// Content span of the key declaring schema `name`.
    pub fn schema_definition_span(&self, name: &str) -> Option<Span> {
        let (key, _) = self.tree.get("schemas")?.get_entry(name)?;
        Some(key.content_span())
    }

    /// Nodes of `data` paired with their spanned values.
    pub fn data_entries(&self) -> impl Iterator<Item = (&Node, &SpannedValue)> + Clone {
        let spanned = self
            .tree
            .get("data")
            .and_then(SpannedValue::as_array)
            .unwrap_or_default();
        self.document.data.iter().zip(spanned)
    }
}

/// Parse IFCX text with default limits.
///
/// # Examples
///
/// ```
/// let text = r#"{
///   "header": {"version": "ifcx_alpha", "author": "me", "timestamp": "2025-01-01T00:00:00Z"},
///   "schemas": {},
///   "data": [{"identifier": "A"}]
/// }"#;
/// let doc = ifcx_core::parse(text).unwrap();
/// assert!(doc.find_node("A").is_some());
/// ```
pub fn parse(text: &str) -> IfcxResult<Document> {
    parse_with_limits(text, &Limits::default())
}

pub fn parse_with_limits(text: &str, limits: &Limits) -> IfcxResult<Document> {
    parse_with_spans(text, limits).map(|parsed| parsed.document)
}

/// Parse IFCX text and keep the spanned tree for navigation.
pub fn parse_with_spans(text: &str, limits: &Limits) -> IfcxResult<ParsedDocument> {
    let tree = parse_spanned(text, limits)?;
    check_structure(text, &tree)?;

    let document = project(text, &tree)?;

    debug!(
        schemas = document.schemas.len(),
        nodes = document.data.len(),
        "parsed IFCX document"
    );
    Ok(ParsedDocument { document, tree })
}

fn check_structure(text: &str, tree: &SpannedValue) -> IfcxResult<()> {
    let line_of = |value: &SpannedValue| line_col(text, value.span.start).0;

    if tree.as_object().is_none() {
        return Err(IfcxError::structure(
            "IFCX document must be a JSON object",
            line_of(tree),
        ));
    }

    let header = present(tree.get("header"))
        .ok_or_else(|| IfcxError::structure("IFCX file is missing header", line_of(tree)))?;
    for field in ["version", "author", "timestamp"] {
        let non_empty = header
            .get(field)
            .and_then(SpannedValue::as_str)
            .is_some_and(|s| !s.is_empty());
        if !non_empty {
            return Err(IfcxError::structure(
                format!("IFCX header is missing {}", field),
                line_of(header),
            ));
        }
    }

    for field in ["schemas", "data"] {
        let Some(value) = present(tree.get(field)) else {
            return Err(IfcxError::structure(
                format!("IFCX file is missing {}", field),
                line_of(tree),
            ));
        };
        let well_formed = match field {
            "schemas" => value.as_object().is_some(),
            _ => value.as_array().is_some(),
        };
        if !well_formed {
            return Err(IfcxError::structure(
                format!("IFCX {} has the wrong type", field),
                line_of(value),
            ));
        }
    }
    Ok(())
}

/// Build the typed document from a structurally checked tree.
fn project(text: &str, tree: &SpannedValue) -> IfcxResult<Document> {
    let header_tree = tree
        .get("header")
        .ok_or_else(|| IfcxError::structure("IFCX file is missing header", 1))?;
    let header: Header = serde_json::from_value(header_tree.to_json()).map_err(|e| {
        IfcxError::structure(
            format!("invalid IFCX header: {}", e),
            line_col(text, header_tree.span.start).0,
        )
    })?;

    let schemas: SchemaTable = tree
        .get("schemas")
        .and_then(SpannedValue::as_object)
        .map(|entries| {
            entries
                .iter()
                .map(|(key, value)| {
                    (key.name.clone(), Schema::from_json(&key.name, &value.to_json()))
                })
                .collect()
        })
        .unwrap_or_default();

    let data: Vec<Node> = tree
        .get("data")
        .and_then(SpannedValue::as_array)
        .map(|entries| entries.iter().map(|entry| Node::from_json(&entry.to_json())).collect())
        .unwrap_or_default();

    Ok(Document { header, schemas, data })
}

fn present(value: Option<&SpannedValue>) -> Option<&SpannedValue> {
    value.filter(|v| !v.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IfcxErrorKind;

    const MINIMAL: &str = r#"{
  "header": {"version": "1", "author": "a", "timestamp": "t"},
  "schemas": {"bsi::name": {"value": {"dataType": "String"}}},
  "data": [
    {"identifier": "A", "children": {"Wall1": "B", "Bad": 3}, "attributes": {"bsi::name": "x"}},
    {"identifier": "B", "inherits": {"type": "C"}},
    {"identifier": "C"},
    {"identifier": "D", "inherits": ["C", 7]}
  ]
}"#;

    #[test]
    fn test_parse_minimal() {
        let doc = parse(MINIMAL).unwrap();
        assert_eq!(doc.header.version, "1");
        assert_eq!(doc.schemas.len(), 1);
        assert_eq!(doc.data.len(), 4);
    }

    #[test]
    fn test_syntax_error() {
        let err = parse("{ invalid").unwrap_err();
        assert_eq!(err.kind, IfcxErrorKind::Syntax);
    }

    #[test]
    fn test_missing_fields_are_named() {
        let err = parse(r#"{"header": {"version": "1", "author": "a", "timestamp": "t"}, "data": []}"#)
            .unwrap_err();
        assert_eq!(err.kind, IfcxErrorKind::Structure);
        assert!(err.message.contains("schemas"));

        let err = parse(r#"{"schemas": {}, "data": []}"#).unwrap_err();
        assert!(err.message.contains("header"));

        let err = parse(r#"{"header": {"version": "1", "author": "a", "timestamp": "t"}, "schemas": {}}"#)
            .unwrap_err();
        assert!(err.message.contains("data"));
    }

    #[test]
    fn test_empty_header_field() {
        let err = parse(r#"{"header": {"version": "1", "author": "", "timestamp": "t"}, "schemas": {}, "data": []}"#)
            .unwrap_err();
        assert!(err.is_structural());
        assert!(err.message.contains("author"));
    }

    #[test]
    fn test_root_must_be_object() {
        let err = parse("[1, 2]").unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn test_wrong_field_type_is_structural() {
        let err = parse(r#"{"header": {"version": "1", "author": "a", "timestamp": "t"}, "schemas": {}, "data": {}}"#)
            .unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn test_wrong_field_type_reports_its_line() {
        let err = parse("{\n\"header\": {\"version\": \"1\", \"author\": \"a\", \"timestamp\": \"t\"},\n\"schemas\": {},\n\"data\": 3\n}")
            .unwrap_err();
        assert!(err.is_structural());
        assert_eq!(err.line, 4);
    }

    #[test]
    fn test_malformed_schema_degrades() {
        let doc = parse(
            r#"{"header": {"version": "1", "author": "a", "timestamp": "t"},
  "schemas": {
    "ok": {"value": {"dataType": "Boolean"}},
    "enum": {"value": {"dataType": "Enum", "enumRestrictions": {"options": [1, 2]}}},
    "bare": {"note": "no value"}
  },
  "data": []}"#,
        )
        .unwrap();
        let names: Vec<&str> = doc.schemas.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["ok", "enum", "bare"]);
        assert_eq!(doc.schema("ok").unwrap().data_type, DataType::Boolean);
        assert_eq!(
            doc.schema("enum").unwrap().data_type,
            DataType::Unrecognized("Enum".into())
        );
        assert_eq!(doc.schema("bare").unwrap().data_type, DataType::Unrecognized(String::new()));
    }

    #[test]
    fn test_malformed_nodes_keep_their_slot() {
        let parsed = parse_with_spans(
            r#"{"header": {"version": "1", "author": "a", "timestamp": "t"}, "schemas": {},
  "data": [null, {"identifier": 7, "attributes": []}, {"identifier": "X", "inherits": "Y"}]}"#,
            &Limits::default(),
        )
        .unwrap();
        let doc = &parsed.document;
        assert_eq!(doc.data.len(), 3);
        assert_eq!(doc.data[0], Node::default());
        assert!(doc.data[1].identifier.is_empty());
        assert!(doc.data[1].attributes.is_none());
        assert_eq!(doc.data[2].identifier, "X");
        assert!(doc.data[2].inherits.is_none());
        assert_eq!(parsed.data_entries().count(), 3);
    }

    #[test]
    fn test_lookups() {
        let doc = parse(MINIMAL).unwrap();
        assert!(doc.find_node("C").is_some());
        assert!(doc.find_node("Z").is_none());

        let children: Vec<&str> = doc.child_nodes("A").iter().map(|n| n.identifier.as_str()).collect();
        assert_eq!(children, vec!["B"]);
        assert!(doc.child_nodes("missing").is_empty());

        let heirs: Vec<&str> = doc.inheriting_nodes("C").iter().map(|n| n.identifier.as_str()).collect();
        assert_eq!(heirs, vec!["B", "D"]);
    }

    #[test]
    fn test_validate_node() {
        let mut doc = parse(MINIMAL).unwrap();
        assert!(doc.validate_node(&doc.data[0].clone()));

        let mut bad = doc.data[0].clone();
        bad.attributes
            .as_mut()
            .unwrap()
            .insert("bsi::name".into(), serde_json::json!(42));
        assert!(!doc.validate_node(&bad));

        doc.data[2].identifier.clear();
        assert!(!doc.validate_node(&doc.data[2].clone()));
    }

    #[test]
    fn test_schema_definition_span() {
        let parsed = parse_with_spans(MINIMAL, &Limits::default()).unwrap();
        let span = parsed.schema_definition_span("bsi::name").unwrap();
        assert_eq!(&MINIMAL[span.start..span.end], "bsi::name");
        assert!(parsed.schema_definition_span("other").is_none());
    }

    #[test]
    fn test_data_entries_align() {
        let parsed = parse_with_spans(MINIMAL, &Limits::default()).unwrap();
        for (node, spanned) in parsed.data_entries() {
            let id = spanned.get("identifier").and_then(SpannedValue::as_str).unwrap();
            assert_eq!(node.identifier, id);
        }
        assert_eq!(parsed.data_entries().count(), 4);
    }

    #[test]
    fn test_round_trip() {
        let doc = parse(MINIMAL).unwrap();
        let text = serde_json::to_string_pretty(&doc).unwrap();
        assert_eq!(parse(&text).unwrap(), doc);
    }
}
