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


//! Property-based tests for ifcx-lsp invariants.
//!
//! # Property Categories
//!
//! 1. **Crash Resistance**: no panics on any input or position
//! 2. **Position Safety**: offset and position conversion agree
//! 3. **Token Ordering**: semantic tokens are sorted and non-overlapping

use ifcx_lsp::analysis::AnalyzedDocument;
use ifcx_lsp::folding::get_folding_ranges;
use ifcx_lsp::hover::get_hover;
use ifcx_lsp::navigation::symbol_at;
use ifcx_lsp::semantic_tokens::compute_semantic_tokens;
use ifcx_lsp::utils::{offset_to_position, position_to_offset};
use proptest::prelude::*;
use ropey::Rope;
use tower_lsp::lsp_types::*;

const HELLO_WALL: &str = include_str!("../../ifcx-core/tests/fixtures/hello-wall.ifcx");

// ============================================================================
// Property: Analysis Never Panics
// ============================================================================

proptest! {
    #[test]
    fn prop_analysis_never_panics(content in ".*") {
        let analysis = AnalyzedDocument::analyze(&content);
        let _ = analysis.to_lsp_diagnostics();
        let _ = get_folding_ranges(&content, 1);
    }

    #[test]
    fn prop_truncated_document_never_panics(cut in 0usize..HELLO_WALL.trim_end().len()) {
        let content = &HELLO_WALL[..cut];
        let analysis = AnalyzedDocument::analyze(content);
        prop_assert!(analysis.parsed.is_none());
        let _ = get_folding_ranges(content, 3);
    }
}

// ============================================================================
// Property: Position Safety
// ============================================================================

proptest! {
    #[test]
    fn prop_queries_accept_any_position(line in 0u32..300, character in 0u32..200) {
        let analysis = AnalyzedDocument::analyze(HELLO_WALL);
        let position = Position::new(line, character);
        let _ = get_hover(&analysis, position);
        let _ = symbol_at(&analysis, position);
    }

    #[test]
    fn prop_offset_position_agree(text in "[a-z\u{e9}\u{1F600}\n]{0,40}", raw in 0usize..200) {
        let rope = Rope::from_str(&text);
        let mut offset = raw.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        let position = offset_to_position(&rope, offset);
        prop_assert_eq!(position_to_offset(&rope, position), Some(offset));
    }
}

// ============================================================================
// Property: Token Ordering
// ============================================================================

#[test]
fn test_tokens_sorted_and_disjoint() {
    let analysis = AnalyzedDocument::analyze(HELLO_WALL);
    let mut line = 0u32;
    let mut start = 0u32;
    let mut previous: Option<(u32, u32)> = None;

    for token in compute_semantic_tokens(&analysis) {
        if token.delta_line == 0 {
            start += token.delta_start;
        } else {
            line += token.delta_line;
            start = token.delta_start;
        }
        if let Some((previous_line, previous_end)) = previous {
            assert!(line > previous_line || start >= previous_end);
        }
        previous = Some((line, start + token.length));
    }
    assert!(previous.is_some());
}
