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

//! Identifier graph extraction.
//!
//! Nodes reference each other by identifier through `children` (which also
//! names the child) and `inherits`. The graph collects, per identifier, its
//! resolved name, parent, children and inherited identifiers, plus the
//! exact location of its `identifier` value for navigation.
//!
//! Extraction runs two passes over `data` in order. The first registers
//! every node with a non-empty identifier and its inherits; the second links
//! children to parents. A node is only named when some other node lists it
//! under `children`.

use crate::document::{Document, Node, ParsedDocument};
use crate::error::IfcxResult;
use crate::json::{Span, SpannedValue};
use crate::limits::Limits;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

/// Per-identifier view of the document graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub identifier: String,
    /// Key under which the parent lists this node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inherits: Vec<String>,
    pub children: Vec<String>,
    /// Child identifier to display name.
    pub children_names: IndexMap<String, String>,
    /// Byte offset of the first `identifier` value for this node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    /// Content span of that `identifier` value.
    #[serde(skip)]
    pub span: Option<Span>,
}

impl GraphNode {
    fn new(identifier: &str, span: Option<Span>) -> Self {
        Self {
            identifier: identifier.to_string(),
            name: None,
            parent: None,
            inherits: Vec::new(),
            children: Vec::new(),
            children_names: IndexMap::new(),
            position: span.map(|s| s.start),
            span,
        }
    }
}

/// All graph nodes keyed by identifier, in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierGraph {
    nodes: IndexMap<String, GraphNode>,
}

impl IdentifierGraph {
    /// Parse `text` and extract its graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use ifcx_core::IdentifierGraph;
    ///
    /// let text = r#"{
    ///   "header": {"version": "1", "author": "a", "timestamp": "t"},
    ///   "schemas": {},
    ///   "data": [{"identifier": "A", "children": {"Wall1": "B"}}, {"identifier": "B"}]
    /// }"#;
    /// let graph = IdentifierGraph::extract(text).unwrap();
    /// let b = graph.get("B").unwrap();
    /// assert_eq!(b.name.as_deref(), Some("Wall1"));
    /// assert_eq!(b.parent.as_deref(), Some("A"));
    /// ```
    pub fn extract(text: &str) -> IfcxResult<Self> {
        Self::extract_with_limits(text, &Limits::default())
    }

    pub fn extract_with_limits(text: &str, limits: &Limits) -> IfcxResult<Self> {
        let parsed = crate::document::parse_with_spans(text, limits)?;
        Ok(Self::from_parsed(&parsed))
    }

    /// Build from a parsed document, recording identifier locations.
    pub fn from_parsed(parsed: &ParsedDocument) -> Self {
        Self::build(parsed.data_entries().map(|(node, spanned)| {
            let span = spanned
                .get("identifier")
                .filter(|v| v.as_str().is_some())
                .map(SpannedValue::content_span);
            (node, span)
        }))
    }

    /// Build from a document without location information.
    pub fn from_document(document: &Document) -> Self {
        Self::build(document.data.iter().map(|node| (node, None)))
    }

    fn build<'a, I>(entries: I) -> Self
    where
        I: Iterator<Item = (&'a Node, Option<Span>)> + Clone,
    {
        let mut nodes: IndexMap<String, GraphNode> = IndexMap::new();

        for (node, span) in entries.clone() {
            if node.identifier.is_empty() {
                continue;
            }
            let info = nodes
                .entry(node.identifier.clone())
                .or_insert_with(|| GraphNode::new(&node.identifier, span));

            if node.inherits.as_ref().is_some_and(|i| !i.is_empty()) {
                info.inherits = node.inherit_targets().into_iter().map(String::from).collect();
            }
        }

        for (node, _) in entries {
            if node.identifier.is_empty() {
                continue;
            }
            for (child_name, child_id) in node.child_entries() {
                if let Some(info) = nodes.get_mut(&node.identifier) {
                    info.children.push(child_id.to_string());
                    info.children_names
                        .insert(child_id.to_string(), child_name.to_string());
                }
                if let Some(child) = nodes.get_mut(child_id) {
                    child.name = Some(child_name.to_string());
                    child.parent = Some(node.identifier.clone());
                }
            }
        }

        debug!(nodes = nodes.len(), "extracted identifier graph");
        Self { nodes }
    }

    pub fn get(&self, identifier: &str) -> Option<&GraphNode> {
        self.nodes.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.nodes.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Resolved display name of `identifier`, if any.
    pub fn name_of(&self, identifier: &str) -> Option<&str> {
        self.get(identifier)?.name.as_deref()
    }

    /// Content span of the first `identifier` value for `identifier`.
    pub fn definition_span(&self, identifier: &str) -> Option<Span> {
        self.get(identifier)?.span
    }
}

impl<'a> IntoIterator for &'a IdentifierGraph {
    type Item = &'a GraphNode;
    type IntoIter = indexmap::map::Values<'a, String, GraphNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.values()
    }
}
