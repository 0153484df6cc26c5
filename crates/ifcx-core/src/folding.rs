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

//! Folding regions computed from raw text.
//!
//! Regions come from the scanner, not the parser, so they stay available
//! while the document is temporarily invalid.

use crate::json::Span;
use crate::scanner::{count_array_elements, find_matching_close, skip_string, Delimiter};
use memchr::memchr;
use serde::Serialize;

/// Default minimum element count for an array to fold.
pub const DEFAULT_MIN_ARRAY_ELEMENTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FoldingKind {
    /// The top-level `schemas` object.
    Schemas,
    /// A keyed array with this many top-level elements.
    Array { elements: usize },
}

/// A foldable region from an opening delimiter to its closer, both included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FoldingRegion {
    pub span: Span,
    pub kind: FoldingKind,
}

/// The `"schemas": { ... }` block of the root object.
pub fn schemas_region(text: &str) -> Option<FoldingRegion> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'"' => {
                let after = skip_string(bytes, pos + 1)?;
                if depth == 1 && &text[pos + 1..after - 1] == "schemas" {
                    if let Some(open) = keyed_opener(bytes, after, Delimiter::Brace) {
                        let close = find_matching_close(text, open + 1, Delimiter::Brace)?;
                        return Some(FoldingRegion {
                            span: Span::new(open, close + 1),
                            kind: FoldingKind::Schemas,
                        });
                    }
                }
                pos = after;
                continue;
            }
            b'{' | b'[' => depth += 1,
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
        pos += 1;
    }
    None
}

/// Every `"key": [ ... ]` array with at least `min_elements` top-level
/// elements, nested ones included, in order of their opening bracket.
pub fn large_array_regions(text: &str, min_elements: usize) -> Vec<FoldingRegion> {
    let bytes = text.as_bytes();
    let mut regions = Vec::new();
    let mut pos = 0;

    while let Some(rel) = memchr(b'"', &bytes[pos..]) {
        let quote = pos + rel;
        let Some(after) = skip_string(bytes, quote + 1) else {
            break;
        };
        pos = after;

        let Some(open) = keyed_opener(bytes, after, Delimiter::Bracket) else {
            continue;
        };
        let Some(close) = find_matching_close(text, open + 1, Delimiter::Bracket) else {
            continue;
        };
        let elements = count_array_elements(&text[open + 1..close]);
        if elements >= min_elements {
            regions.push(FoldingRegion {
                span: Span::new(open, close + 1),
                kind: FoldingKind::Array { elements },
            });
        }
    }

    regions
}

/// After a key string ending at `pos`, the offset of `: <opener>` if present.
fn keyed_opener(bytes: &[u8], pos: usize, delimiter: Delimiter) -> Option<usize> {
    let colon = skip_whitespace(bytes, pos);
    if bytes.get(colon) != Some(&b':') {
        return None;
    }
    let open = skip_whitespace(bytes, colon + 1);
    (bytes.get(open) == Some(&delimiter.open())).then_some(open)
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while let Some(b' ' | b'\t' | b'\n' | b'\r') = bytes.get(pos) {
        pos += 1;
    }
    pos
}
