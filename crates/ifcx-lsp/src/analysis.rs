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


//! Document analysis for IFCX files.
//!
//! One analysis runs per document version and bundles everything the LSP
//! queries need:
//! - the spanned parse and typed document
//! - the identifier graph
//! - the schema tooltip provider for the document's schema table
//! - the sorted decoration list
//! - parse errors and attributes failing their schema
//!
//! A failed parse never propagates. The error is kept for diagnostics and
//! the remaining fields are empty for that version.

use crate::constants::{
    DIAGNOSTIC_LINE_END_CHAR, DIAGNOSTIC_SOURCE, LINE_NUMBER_OFFSET, POSITION_ZERO,
};
use crate::utils::span_to_range;
use ifcx_core::{
    decorate, parse_with_spans, Decorations, IdentifierGraph, IfcxError, Limits, ParsedDocument,
    SchemaTooltipProvider, Span, TooltipStyle, Validator,
};
use ropey::Rope;
use tower_lsp::lsp_types::*;
use tracing::{debug, warn};

/// An attribute whose value does not match its schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidAttribute {
    /// Identifier of the owning node.
    pub identifier: String,
    /// Attribute key, which names the schema.
    pub attribute: String,
    /// Content span of the attribute key.
    pub span: Span,
}

/// Analyzed document with parsed content and diagnostics.
///
/// Spans in every field refer to the text held in `rope`, which is the
/// exact text that was analyzed. Queries map positions through it so a
/// stale analysis never mixes offsets with newer text.
#[derive(Debug, Clone)]
pub struct AnalyzedDocument {
    /// Text this analysis was computed from.
    pub rope: Rope,
    /// The parsed document (if successful).
    pub parsed: Option<ParsedDocument>,
    pub graph: IdentifierGraph,
    pub provider: SchemaTooltipProvider,
    pub decorations: Decorations,
    /// Parse errors.
    pub errors: Vec<IfcxError>,
    pub invalid_attributes: Vec<InvalidAttribute>,
}

impl AnalyzedDocument {
    /// Analyze an IFCX document.
    ///
    /// This operation is O(n) in the document size; the result is cached by
    /// the document manager and shared across queries.
    pub fn analyze(content: &str) -> Self {
        Self::analyze_with_style(content, TooltipStyle::default())
    }

    /// Analyze with schema tooltips rendered in `style`.
    pub fn analyze_with_style(content: &str, style: TooltipStyle) -> Self {
        let rope = Rope::from_str(content);

        let parsed = match parse_with_spans(content, &Limits::default()) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "IFCX analysis failed, serving empty results");
                return Self {
                    rope,
                    parsed: None,
                    graph: IdentifierGraph::default(),
                    provider: SchemaTooltipProvider::with_style(style),
                    decorations: Decorations::default(),
                    errors: vec![e],
                    invalid_attributes: Vec::new(),
                };
            }
        };

        let graph = IdentifierGraph::from_parsed(&parsed);
        let mut provider = SchemaTooltipProvider::with_style(style);
        provider.load_document(&parsed.document);
        let decorations = decorate(&parsed, &graph);
        let invalid_attributes = find_invalid_attributes(&parsed);

        debug!(
            nodes = graph.len(),
            schemas = parsed.document.schemas.len(),
            decorations = decorations.len(),
            invalid = invalid_attributes.len(),
            "analyzed IFCX document"
        );

        Self {
            rope,
            parsed: Some(parsed),
            graph,
            provider,
            decorations,
            errors: Vec::new(),
            invalid_attributes,
        }
    }

    /// Analyzed text as a string.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Convert parse errors and schema mismatches to LSP diagnostics.
    pub fn to_lsp_diagnostics(&self) -> Vec<Diagnostic> {
        let mut result = Vec::new();

        for error in &self.errors {
            let line = error.line.saturating_sub(LINE_NUMBER_OFFSET) as u32;
            result.push(Diagnostic {
                range: Range {
                    start: Position {
                        line,
                        character: POSITION_ZERO,
                    },
                    end: Position {
                        line,
                        character: DIAGNOSTIC_LINE_END_CHAR,
                    },
                },
                severity: Some(DiagnosticSeverity::ERROR),
                code: Some(NumberOrString::String(format!("{:?}", error.kind))),
                source: Some(DIAGNOSTIC_SOURCE.to_string()),
                message: error.message.clone(),
                ..Default::default()
            });
        }

        for invalid in &self.invalid_attributes {
            result.push(Diagnostic {
                range: span_to_range(&self.rope, invalid.span),
                severity: Some(DiagnosticSeverity::WARNING),
                code: Some(NumberOrString::String("InvalidAttribute".to_string())),
                source: Some(DIAGNOSTIC_SOURCE.to_string()),
                message: format!(
                    "value of `{}` on `{}` does not match its schema",
                    invalid.attribute, invalid.identifier
                ),
                ..Default::default()
            });
        }

        result
    }
}

fn find_invalid_attributes(parsed: &ParsedDocument) -> Vec<InvalidAttribute> {
    let validator = Validator::new(&parsed.document.schemas);
    let mut result = Vec::new();

    for (node, tree) in parsed.data_entries() {
        let Some(attributes) = tree.get("attributes").and_then(|a| a.as_object()) else {
            continue;
        };
        for (key, value) in attributes {
            if validator.validate_attribute(&key.name, &value.to_json()) == Some(false) {
                result.push(InvalidAttribute {
                    identifier: node.identifier.clone(),
                    attribute: key.name.clone(),
                    span: key.content_span(),
                });
            }
        }
    }
    result
}
