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

//! Brace and bracket matching over raw document text.
//!
//! These helpers work on the text itself rather than on a parsed tree, so
//! they keep working while a document is temporarily invalid mid-edit
//! (folding, for instance, must not flicker away on every keystroke).
//!
//! Delimiters inside JSON string literals are skipped, including escaped
//! quotes, so attribute values such as `"a } b"` never desynchronize the
//! nesting count.
//!
//! # Examples
//!
//! ```
//! use ifcx_core::scanner::{find_matching_close, Delimiter};
//!
//! let text = r#"{"a": {"b": "}"}}"#;
//! assert_eq!(find_matching_close(text, 1, Delimiter::Brace), Some(text.len() - 1));
//! ```

use memchr::{memchr2, memchr3};

/// A delimiter family understood by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    /// `{` ... `}`
    Brace,
    /// `[` ... `]`
    Bracket,
}

impl Delimiter {
    /// The opening byte of this family.
    pub const fn open(self) -> u8 {
        match self {
            Delimiter::Brace => b'{',
            Delimiter::Bracket => b'[',
        }
    }

    /// The closing byte of this family.
    pub const fn close(self) -> u8 {
        match self {
            Delimiter::Brace => b'}',
            Delimiter::Bracket => b']',
        }
    }

    /// The family opened by `byte`, if any.
    pub const fn for_opener(byte: u8) -> Option<Self> {
        match byte {
            b'{' => Some(Delimiter::Brace),
            b'[' => Some(Delimiter::Bracket),
            _ => None,
        }
    }
}

/// Find the closing delimiter matching an opener the caller already consumed.
///
/// `start` is the byte offset just inside the opener. The scan begins at
/// depth 1, increments on each opener of the same family and decrements on
/// each closer; the offset of the closer that brings the depth to zero is
/// returned. Returns `None` when the text ends first (an unmatched opener)
/// or when `start` lies past the end of the text.
///
/// `start` must not lie inside a string literal.
pub fn find_matching_close(text: &str, start: usize, delimiter: Delimiter) -> Option<usize> {
    let bytes = text.as_bytes();
    if start > bytes.len() {
        return None;
    }

    let (open, close) = (delimiter.open(), delimiter.close());
    let mut depth = 1usize;
    let mut pos = start;

    while let Some(rel) = memchr3(open, close, b'"', &bytes[pos..]) {
        let i = pos + rel;
        let byte = bytes[i];
        if byte == b'"' {
            pos = skip_string(bytes, i + 1)?;
            continue;
        }
        if byte == open {
            depth += 1;
        } else {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
        pos = i + 1;
    }

    None
}

/// Skip a string literal whose opening quote was just consumed.
///
/// Returns the offset after the closing quote, or `None` if unterminated.
pub(crate) fn skip_string(bytes: &[u8], mut pos: usize) -> Option<usize> {
    while let Some(rel) = memchr2(b'"', b'\\', &bytes[pos..]) {
        let i = pos + rel;
        if bytes[i] == b'\\' {
            pos = i + 2;
            if pos > bytes.len() {
                return None;
            }
            continue;
        }
        return Some(i + 1);
    }
    None
}

/// Count the top-level elements of an array body (the text between `[` and `]`).
///
/// Counts commas that are outside string literals and outside nested
/// arrays/objects, plus one. Blank content counts as zero elements.
pub fn count_array_elements(content: &str) -> usize {
    if content.trim().is_empty() {
        return 0;
    }

    let mut commas = 0usize;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for byte in content.bytes() {
        if escape_next {
            escape_next = false;
            continue;
        }
        if in_string {
            match byte {
                b'\\' => escape_next = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'[' | b'{' => depth += 1,
            b']' | b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => commas += 1,
            _ => {}
        }
    }

    commas + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_brace() {
        let text = "{ \"a\": 1 }";
        assert_eq!(find_matching_close(text, 1, Delimiter::Brace), Some(9));
    }

    #[test]
    fn test_nested_depth_ten() {
        let open = "[".repeat(10);
        let close = "]".repeat(10);
        let text = format!("{}1{}", open, close);
        // Start just inside the outermost bracket.
        assert_eq!(
            find_matching_close(&text, 1, Delimiter::Bracket),
            Some(text.len() - 1)
        );
        // Start inside the innermost bracket.
        assert_eq!(find_matching_close(&text, 10, Delimiter::Bracket), Some(11));
    }

    #[test]
    fn test_other_family_is_ignored() {
        let text = "[ {\"a\": [1, 2]} ]";
        assert_eq!(
            find_matching_close(text, 1, Delimiter::Bracket),
            Some(text.len() - 1)
        );
    }

    #[test]
    fn test_unmatched_opener() {
        assert_eq!(find_matching_close("{ {\"a\": 1}", 1, Delimiter::Brace), None);
        assert_eq!(find_matching_close("", 0, Delimiter::Brace), None);
    }

    #[test]
    fn test_start_past_end() {
        assert_eq!(find_matching_close("}", 5, Delimiter::Brace), None);
    }

    #[test]
    fn test_delimiters_inside_strings() {
        let text = r#"{"name": "a } b { c", "x": "]"}"#;
        assert_eq!(
            find_matching_close(text, 1, Delimiter::Brace),
            Some(text.len() - 1)
        );
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        let text = r#"{"name": "say \"}\" twice"}"#;
        assert_eq!(
            find_matching_close(text, 1, Delimiter::Brace),
            Some(text.len() - 1)
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(find_matching_close("{\"abc}", 1, Delimiter::Brace), None);
        assert_eq!(find_matching_close("{\"abc\\", 1, Delimiter::Brace), None);
    }

    #[test]
    fn test_for_opener() {
        assert_eq!(Delimiter::for_opener(b'{'), Some(Delimiter::Brace));
        assert_eq!(Delimiter::for_opener(b'['), Some(Delimiter::Bracket));
        assert_eq!(Delimiter::for_opener(b'"'), None);
    }

    #[test]
    fn test_count_empty() {
        assert_eq!(count_array_elements(""), 0);
        assert_eq!(count_array_elements("  \n\t "), 0);
    }

    #[test]
    fn test_count_flat() {
        assert_eq!(count_array_elements("1"), 1);
        assert_eq!(count_array_elements("1, 2, 3"), 3);
    }

    #[test]
    fn test_count_nested_and_strings() {
        assert_eq!(count_array_elements("[1, 2], [3, 4], {\"a\": 1, \"b\": 2}"), 3);
        assert_eq!(count_array_elements(r#""a,b", "c\",d""#), 2);
    }
}
