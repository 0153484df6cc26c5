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


//! Conversions between byte offsets and LSP positions.
//!
//! The core crate speaks byte offsets into the document text. LSP positions
//! are a line plus a UTF-16 code unit column. All conversions go through a
//! [`Rope`] of the analyzed text and clamp out-of-range input instead of
//! panicking.

use ifcx_core::Span;
use ropey::Rope;
use tower_lsp::lsp_types::{Position, Range};

/// Position of byte `offset`, clamped to the end of the text.
///
/// An offset inside a multi-byte character maps to that character.
pub fn offset_to_position(rope: &Rope, offset: usize) -> Position {
    let offset = offset.min(rope.len_bytes());
    let char_idx = rope.byte_to_char(offset);
    let line = rope.char_to_line(char_idx);
    let line_start = rope.line_to_char(line);
    let character = rope.char_to_utf16_cu(char_idx) - rope.char_to_utf16_cu(line_start);
    Position::new(line as u32, character as u32)
}

/// Byte offset of `position`.
///
/// Returns `None` for a line past the end of the text. A column past the
/// end of its line is clamped to the line end.
pub fn position_to_offset(rope: &Rope, position: Position) -> Option<usize> {
    let line = position.line as usize;
    if line >= rope.len_lines() {
        return None;
    }
    let line_start = rope.line_to_char(line);
    let line_len = line_len_utf16(rope, line);
    let column = (position.character as usize).min(line_len);
    let char_idx = rope.utf16_cu_to_char(rope.char_to_utf16_cu(line_start) + column);
    Some(rope.char_to_byte(char_idx))
}

/// UTF-16 length of `line` without its line break.
fn line_len_utf16(rope: &Rope, line: usize) -> usize {
    let slice = rope.line(line);
    let mut len = slice.len_utf16_cu();
    let chars = slice.len_chars();
    if chars > 0 && slice.char(chars - 1) == '\n' {
        len -= 1;
        if chars > 1 && slice.char(chars - 2) == '\r' {
            len -= 1;
        }
    }
    len
}

pub fn span_to_range(rope: &Rope, span: Span) -> Range {
    Range::new(
        offset_to_position(rope, span.start),
        offset_to_position(rope, span.end),
    )
}
