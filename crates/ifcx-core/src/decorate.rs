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

//! Decorations: the located schema and identifier tokens of a document.
//!
//! A decoration marks one string token with what it refers to. The list is
//! sorted by position so editors can look up the token under the cursor
//! with a binary search.

use crate::document::ParsedDocument;
use crate::graph::IdentifierGraph;
use crate::json::{Span, StringRole};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DecorationKind {
    /// A key directly under `schemas`.
    SchemaDefinition,
    /// Any other key naming a schema, typically an attribute.
    SchemaUsage,
    /// A string equal to a node identifier.
    Identifier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decoration {
    /// Content span of the token, quotes excluded.
    pub span: Span,
    pub kind: DecorationKind,
    /// Schema name or identifier the token refers to.
    pub target: String,
    /// True at the defining occurrence.
    pub is_definition: bool,
}

/// Decorations sorted by span start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decorations {
    items: Vec<Decoration>,
}

impl Decorations {
    pub fn iter(&self) -> std::slice::Iter<'_, Decoration> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The decoration covering `offset`; a span's end offset counts as inside.
    pub fn find_at(&self, offset: usize) -> Option<&Decoration> {
        let idx = self.items.partition_point(|d| d.span.start <= offset);
        let candidate = self.items.get(idx.checked_sub(1)?)?;
        candidate.span.contains(offset).then_some(candidate)
    }

    /// Every decoration referring to `target`, in document order.
    pub fn occurrences<'a>(&'a self, target: &'a str) -> impl Iterator<Item = &'a Decoration> {
        self.items.iter().filter(move |d| d.target == target)
    }
}

impl<'a> IntoIterator for &'a Decorations {
    type Item = &'a Decoration;
    type IntoIter = std::slice::Iter<'a, Decoration>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Locate schema and identifier tokens in a parsed document.
pub fn decorate(parsed: &ParsedDocument, graph: &IdentifierGraph) -> Decorations {
    let mut items = Vec::new();
    let mut definitions = HashSet::new();

    if let Some(schemas) = parsed.tree.get("schemas").and_then(|s| s.as_object()) {
        for (key, _) in schemas {
            let span = key.content_span();
            definitions.insert(span);
            items.push(Decoration {
                span,
                kind: DecorationKind::SchemaDefinition,
                target: key.name.clone(),
                is_definition: true,
            });
        }
    }

    let schemas = &parsed.document.schemas;
    parsed.tree.walk_strings(&mut |token| {
        if token.role == StringRole::Key
            && schemas.contains_key(token.value)
            && !definitions.contains(&token.span)
        {
            items.push(Decoration {
                span: token.span,
                kind: DecorationKind::SchemaUsage,
                target: token.value.to_string(),
                is_definition: false,
            });
        } else if graph.contains(token.value) {
            items.push(Decoration {
                span: token.span,
                kind: DecorationKind::Identifier,
                target: token.value.to_string(),
                is_definition: graph.definition_span(token.value) == Some(token.span),
            });
        }
    });

    items.sort_by_key(|d| d.span.start);
    Decorations { items }
}
