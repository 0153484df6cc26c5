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


//! Hover information for IFCX files.
//!
//! # Supported Elements
//!
//! - **Identifiers**: any string equal to a node identifier shows the node's
//!   name, parent, inherited nodes and children
//! - **Schemas**: schema keys and attribute keys show the schema tooltip
//!
//! Hovering an attribute key of a data node also reports whether the
//! attribute value matches its schema (✓ or ⚠).

use crate::analysis::AnalyzedDocument;
use crate::utils::{position_to_offset, span_to_range};
use ifcx_core::{describe_node, Decoration, DecorationKind, Validator};
use tower_lsp::lsp_types::*;

/// Get hover information for a position.
///
/// Returns `None` when the position is not on a decorated token. Schema
/// tooltips use the style the analysis was built with.
pub fn get_hover(analysis: &AnalyzedDocument, position: Position) -> Option<Hover> {
    let offset = position_to_offset(&analysis.rope, position)?;
    let decoration = analysis.decorations.find_at(offset)?;

    let value = match decoration.kind {
        DecorationKind::Identifier => describe_node(&decoration.target, &analysis.graph),
        DecorationKind::SchemaDefinition | DecorationKind::SchemaUsage => {
            schema_hover(analysis, decoration)?
        }
    };

    Some(Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value,
        }),
        range: Some(span_to_range(&analysis.rope, decoration.span)),
    })
}

fn schema_hover(analysis: &AnalyzedDocument, decoration: &Decoration) -> Option<String> {
    let tooltip = analysis.provider.tooltip(&decoration.target)?;

    match attribute_validity(analysis, decoration) {
        Some(true) => Some(create_hover_content(&tooltip, "✓ Value matches the schema")),
        Some(false) => Some(create_hover_content(
            &tooltip,
            "⚠ Value does not match the schema",
        )),
        None => Some(tooltip),
    }
}

/// Validity of the attribute whose key is under the cursor, if it is one.
fn attribute_validity(analysis: &AnalyzedDocument, decoration: &Decoration) -> Option<bool> {
    if decoration.kind != DecorationKind::SchemaUsage {
        return None;
    }
    let parsed = analysis.parsed.as_ref()?;
    let validator = Validator::new(&parsed.document.schemas);

    parsed.data_entries().find_map(|(_, tree)| {
        let attributes = tree.get("attributes")?.as_object()?;
        let (key, value) = attributes
            .iter()
            .find(|(key, _)| key.content_span() == decoration.span)?;
        validator.validate_attribute(&key.name, &value.to_json())
    })
}

fn create_hover_content(body: &str, footer: &str) -> String {
    format!("{}\n\n---\n\n{}", body, footer)
}
