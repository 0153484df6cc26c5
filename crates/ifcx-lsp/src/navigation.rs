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


//! Go-to-definition and find-references.
//!
//! Identifiers resolve to the `identifier` value of their node. Schema
//! names resolve to their key in `schemas`: first in the same document,
//! then by short name (the last `::` segment), then in other open
//! documents, which the backend supplies.

use crate::analysis::AnalyzedDocument;
use crate::utils::{position_to_offset, span_to_range};
use ifcx_core::json::StringRole;
use ifcx_core::{Decoration, DecorationKind, Span};
use tower_lsp::lsp_types::{Position, Range};

/// What the token under the cursor refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Identifier(String),
    /// A schema name; the key may name a schema of another document.
    Schema(String),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Identifier(name) | Symbol::Schema(name) => name,
        }
    }
}

/// The symbol at `position`, if any.
///
/// Object keys that name no local schema still count as schema symbols so
/// that they can resolve against other documents.
pub fn symbol_at(analysis: &AnalyzedDocument, position: Position) -> Option<Symbol> {
    let offset = position_to_offset(&analysis.rope, position)?;
    if let Some(decoration) = analysis.decorations.find_at(offset) {
        return Some(symbol_of(decoration));
    }
    key_at(analysis, offset).map(Symbol::Schema)
}

fn symbol_of(decoration: &Decoration) -> Symbol {
    match decoration.kind {
        DecorationKind::Identifier => Symbol::Identifier(decoration.target.clone()),
        DecorationKind::SchemaDefinition | DecorationKind::SchemaUsage => {
            Symbol::Schema(decoration.target.clone())
        }
    }
}

/// Attribute-like object key covering `offset`.
fn key_at(analysis: &AnalyzedDocument, offset: usize) -> Option<String> {
    let data = analysis.parsed.as_ref()?.tree.get("data")?;
    let mut found = None;
    data.walk_strings(&mut |token| {
        if found.is_none() && token.role == StringRole::Key && token.span.contains(offset) {
            found = Some(token.value.to_string());
        }
    });
    found
}

/// Definition of `symbol` within this document.
pub fn local_definition(analysis: &AnalyzedDocument, symbol: &Symbol) -> Option<Range> {
    let span = definition_span(analysis, symbol)?;
    Some(span_to_range(&analysis.rope, span))
}

fn definition_span(analysis: &AnalyzedDocument, symbol: &Symbol) -> Option<Span> {
    match symbol {
        Symbol::Identifier(id) => analysis.graph.definition_span(id),
        Symbol::Schema(name) => {
            let parsed = analysis.parsed.as_ref()?;
            parsed.schema_definition_span(name).or_else(|| {
                let resolved = analysis.provider.resolve(name)?;
                parsed.schema_definition_span(resolved)
            })
        }
    }
}

/// Every occurrence of `symbol` in this document, in document order.
pub fn find_references(
    analysis: &AnalyzedDocument,
    symbol: &Symbol,
    include_declaration: bool,
) -> Vec<Range> {
    let schema = matches!(symbol, Symbol::Schema(_));
    analysis
        .decorations
        .occurrences(symbol.name())
        .filter(|d| (d.kind != DecorationKind::Identifier) == schema)
        .filter(|d| include_declaration || !d.is_definition)
        .map(|d| span_to_range(&analysis.rope, d.span))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::offset_to_position;

    const DOC: &str = r#"{
  "header": {"version": "1", "author": "a", "timestamp": "t"},
  "schemas": {
    "bsi::ifc::prop::Name": {"value": {"dataType": "String"}}
  },
  "data": [
    {"identifier": "A", "children": {"W": "B"}},
    {"identifier": "B", "inherits": ["A"], "attributes": {"bsi::ifc::prop::Name": "x", "other::Thing": 1}}
  ]
}"#;

    fn position_of(analysis: &AnalyzedDocument, needle: &str, occurrence: usize) -> Position {
        let offset = DOC.match_indices(needle).nth(occurrence).unwrap().0 + 1;
        offset_to_position(&analysis.rope, offset)
    }

    fn text_at(range: Range) -> String {
        let rope = ropey::Rope::from_str(DOC);
        let start = position_to_offset(&rope, range.start).unwrap();
        let end = position_to_offset(&rope, range.end).unwrap();
        DOC[start..end].to_string()
    }

    #[test]
    fn test_identifier_definition() {
        let analysis = AnalyzedDocument::analyze(DOC);
        // The reference inside `inherits`
        let symbol = symbol_at(&analysis, position_of(&analysis, "\"A\"", 1)).unwrap();
        assert_eq!(symbol, Symbol::Identifier("A".to_string()));

        let range = local_definition(&analysis, &symbol).unwrap();
        assert_eq!(range.start.line, 6);
        assert_eq!(text_at(range), "A");
    }

    #[test]
    fn test_schema_definition() {
        let analysis = AnalyzedDocument::analyze(DOC);
        let symbol = symbol_at(&analysis, position_of(&analysis, "bsi::ifc", 1)).unwrap();
        assert_eq!(symbol, Symbol::Schema("bsi::ifc::prop::Name".to_string()));

        let range = local_definition(&analysis, &symbol).unwrap();
        assert_eq!(range.start.line, 3);
    }

    #[test]
    fn test_short_schema_name() {
        let analysis = AnalyzedDocument::analyze(DOC);
        let range = local_definition(&analysis, &Symbol::Schema("Name".to_string())).unwrap();
        assert_eq!(text_at(range), "bsi::ifc::prop::Name");
    }

    #[test]
    fn test_unknown_key_is_schema_symbol() {
        let analysis = AnalyzedDocument::analyze(DOC);
        let symbol = symbol_at(&analysis, position_of(&analysis, "other::Thing", 0)).unwrap();
        assert_eq!(symbol, Symbol::Schema("other::Thing".to_string()));
        assert!(local_definition(&analysis, &symbol).is_none());
    }

    #[test]
    fn test_references() {
        let analysis = AnalyzedDocument::analyze(DOC);
        let a = Symbol::Identifier("A".to_string());
        assert_eq!(find_references(&analysis, &a, true).len(), 2);
        assert_eq!(find_references(&analysis, &a, false).len(), 1);

        let name = Symbol::Schema("bsi::ifc::prop::Name".to_string());
        let refs = find_references(&analysis, &name, false);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].start.line, 7);
    }
}
