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

//! Markdown descriptions and JSON reports of the identifier graph.

use crate::error::{IfcxError, IfcxResult};
use crate::graph::{GraphNode, IdentifierGraph};
use serde::Serialize;
use std::fmt::Write;

/// Heading used for nodes no parent names.
pub const UNNAMED_NODE: &str = "Unnamed Node";

/// Render a markdown description of `identifier`.
///
/// Unknown identifiers produce a short notice instead of failing.
pub fn describe_node(identifier: &str, graph: &IdentifierGraph) -> String {
    let Some(node) = graph.get(identifier) else {
        return format!("**Unknown Identifier**: {}", identifier);
    };

    let mut out = String::new();
    let _ = write!(
        out,
        "### {}\n\n**Identifier**: `{}`\n\n",
        node.name.as_deref().filter(|name| !name.is_empty()).unwrap_or(UNNAMED_NODE),
        node.identifier
    );

    if !node.inherits.is_empty() {
        out.push_str("**Inherits from**:\n");
        for target in &node.inherits {
            let _ = writeln!(out, "- `{}`{}", target, name_suffix(graph, target));
        }
        out.push('\n');
    }

    if let Some(parent) = &node.parent {
        let _ = write!(out, "**Parent**: `{}`{}\n\n", parent, name_suffix(graph, parent));
    }

    if !node.children.is_empty() {
        let _ = writeln!(out, "**Children** ({}):", node.children.len());
        for child in &node.children {
            let name = node
                .children_names
                .get(child)
                .map(String::as_str)
                .filter(|name| !name.is_empty())
                .unwrap_or("Unnamed");
            let _ = writeln!(out, "- `{}` ({})", child, name);
        }
    }

    out
}

fn name_suffix(graph: &IdentifierGraph, identifier: &str) -> String {
    graph
        .name_of(identifier)
        .filter(|name| !name.is_empty())
        .map(|name| format!(" ({})", name))
        .unwrap_or_default()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary {
    total_nodes: usize,
}

#[derive(Serialize)]
struct Report<'a> {
    summary: Summary,
    nodes: Vec<&'a GraphNode>,
}

/// Render the graph as a pretty-printed JSON report.
///
/// The report has the shape `{"summary": {"totalNodes": N}, "nodes": [...]}`
/// with nodes in graph order.
pub fn generate_report(graph: &IdentifierGraph) -> IfcxResult<String> {
    let report = Report {
        summary: Summary {
            total_nodes: graph.len(),
        },
        nodes: graph.iter().collect(),
    };
    serde_json::to_string_pretty(&report)
        .map_err(|e| IfcxError::serialization(format!("failed to render report: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(data: &str) -> IdentifierGraph {
        let text = format!(
            r#"{{"header": {{"version": "1", "author": "a", "timestamp": "t"}}, "schemas": {{}}, "data": {}}}"#,
            data
        );
        IdentifierGraph::extract(&text).unwrap()
    }

    #[test]
    fn test_unknown_identifier() {
        assert_eq!(
            describe_node("nope", &IdentifierGraph::default()),
            "**Unknown Identifier**: nope"
        );
    }

    #[test]
    fn test_describe_child() {
        let g = graph(r#"[{"identifier": "A", "children": {"Wall1": "B"}}, {"identifier": "B"}]"#);
        assert_eq!(
            describe_node("B", &g),
            "### Wall1\n\n**Identifier**: `B`\n\n**Parent**: `A`\n\n"
        );
    }

    #[test]
    fn test_describe_parent_with_children() {
        let g = graph(
            r#"[{"identifier": "A", "children": {"Wall1": "B", "Ghost": "G"}}, {"identifier": "B"}]"#,
        );
        assert_eq!(
            describe_node("A", &g),
            "### Unnamed Node\n\n**Identifier**: `A`\n\n**Children** (2):\n- `B` (Wall1)\n- `G` (Ghost)\n"
        );
    }

    #[test]
    fn test_empty_child_names_read_as_unnamed() {
        let g = graph(r#"[{"identifier": "A", "children": {"": "B"}}, {"identifier": "B"}]"#);
        assert_eq!(
            describe_node("A", &g),
            "### Unnamed Node\n\n**Identifier**: `A`\n\n**Children** (1):\n- `B` (Unnamed)\n"
        );
        assert!(describe_node("B", &g).starts_with("### Unnamed Node\n\n"));
    }

    #[test]
    fn test_describe_inherits_with_names() {
        let g = graph(
            r#"[
  {"identifier": "R", "children": {"Type": "T", "Wall": "W"}},
  {"identifier": "T"},
  {"identifier": "W", "inherits": {"type": "T", "other": "X"}}
]"#,
        );
        let out = describe_node("W", &g);
        assert!(out.starts_with("### Wall\n\n"));
        assert!(out.contains("**Inherits from**:\n- `T` (Type)\n- `X`\n\n"));
        assert!(out.contains("**Parent**: `R`\n\n"));
    }

    #[test]
    fn test_report_shape() {
        let g = graph(r#"[{"identifier": "A", "children": {"Wall1": "B"}}, {"identifier": "B"}]"#);
        let report: serde_json::Value = serde_json::from_str(&generate_report(&g).unwrap()).unwrap();
        assert_eq!(report["summary"]["totalNodes"], 2);
        let nodes = report["nodes"].as_array().unwrap();
        assert_eq!(nodes[0]["identifier"], "A");
        assert_eq!(nodes[0]["childrenNames"]["B"], "Wall1");
        assert_eq!(nodes[1]["name"], "Wall1");
    }

    #[test]
    fn test_empty_report() {
        let report = generate_report(&IdentifierGraph::default()).unwrap();
        assert_eq!(report, "{\n  \"summary\": {\n    \"totalNodes\": 0\n  },\n  \"nodes\": []\n}");
    }
}
