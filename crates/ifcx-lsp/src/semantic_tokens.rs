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


//! Semantic tokens for schema names and identifiers.

use crate::analysis::AnalyzedDocument;
use crate::utils::offset_to_position;
use ifcx_core::DecorationKind;
use tower_lsp::lsp_types::*;

/// Semantic token types we support
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum TokenType {
    /// Schema names, at definition and use sites
    Type = 0,
    /// Node identifiers
    Variable = 1,
}

impl TokenType {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenType::Type => "type",
            TokenType::Variable => "variable",
        }
    }
}

/// Semantic token modifiers we support
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum TokenModifier {
    /// The defining occurrence
    Definition = 0,
}

impl TokenModifier {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenModifier::Definition => "definition",
        }
    }

    fn bit(self) -> u32 {
        1 << self as u32
    }
}

/// Build the semantic token legend for LSP
pub fn semantic_token_legend() -> SemanticTokensLegend {
    SemanticTokensLegend {
        token_types: vec![
            SemanticTokenType::new(TokenType::Type.as_str()),
            SemanticTokenType::new(TokenType::Variable.as_str()),
        ],
        token_modifiers: vec![SemanticTokenModifier::new(
            TokenModifier::Definition.as_str(),
        )],
    }
}

#[derive(Debug)]
struct RawToken {
    line: u32,
    start_char: u32,
    length: u32,
    token_type: TokenType,
    modifiers: u32,
}

/// Delta-encoded tokens for every decoration of the analysis.
pub fn compute_semantic_tokens(analysis: &AnalyzedDocument) -> Vec<SemanticToken> {
    let mut raw_tokens = Vec::with_capacity(analysis.decorations.len());

    for decoration in &analysis.decorations {
        let start = offset_to_position(&analysis.rope, decoration.span.start);
        let end = offset_to_position(&analysis.rope, decoration.span.end);
        // JSON strings never span lines, but skip anything odd rather than emit garbage.
        if end.line != start.line || end.character <= start.character {
            continue;
        }
        let token_type = match decoration.kind {
            DecorationKind::SchemaDefinition | DecorationKind::SchemaUsage => TokenType::Type,
            DecorationKind::Identifier => TokenType::Variable,
        };
        let modifiers = if decoration.is_definition {
            TokenModifier::Definition.bit()
        } else {
            0
        };
        raw_tokens.push(RawToken {
            line: start.line,
            start_char: start.character,
            length: end.character - start.character,
            token_type,
            modifiers,
        });
    }

    encode_tokens(&raw_tokens)
}

fn encode_tokens(raw_tokens: &[RawToken]) -> Vec<SemanticToken> {
    let mut result = Vec::with_capacity(raw_tokens.len());
    let mut prev_line = 0u32;
    let mut prev_start = 0u32;

    for token in raw_tokens {
        let delta_line = token.line - prev_line;
        let delta_start = if delta_line == 0 {
            token.start_char - prev_start
        } else {
            token.start_char
        };

        result.push(SemanticToken {
            delta_line,
            delta_start,
            length: token.length,
            token_type: token.token_type as u32,
            token_modifiers_bitset: token.modifiers,
        });

        prev_line = token.line;
        prev_start = token.start_char;
    }

    result
}
