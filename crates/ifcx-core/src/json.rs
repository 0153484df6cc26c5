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

//! Location-aware JSON parsing.
//!
//! `serde_json` discards source positions, but navigation and decorations
//! need the exact byte range of every key and string in the document. This
//! module parses JSON into a [`SpannedValue`] tree that keeps a [`Span`]
//! for each value and object key, then projects it to `serde_json::Value`
//! for typed deserialization.
//!
//! The grammar is strict RFC 8259: no comments, no trailing commas, no
//! unescaped control characters in strings.
//!
//! # Examples
//!
//! ```
//! use ifcx_core::json::parse_spanned;
//! use ifcx_core::Limits;
//!
//! let text = r#"{"identifier": "A"}"#;
//! let tree = parse_spanned(text, &Limits::default()).unwrap();
//! let id = tree.get("identifier").unwrap();
//! assert_eq!(id.as_str(), Some("A"));
//! assert_eq!(&text[id.content_span().start..id.content_span().end], "A");
//! ```

use crate::error::{IfcxError, IfcxResult};
use crate::limits::Limits;
use memchr::{memchr2, memchr_iter};
use serde::Serialize;
use serde_json::{Map, Number, Value as JsonValue};

/// A half-open byte range `[start, end)` in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    /// Start offset (inclusive).
    pub start: usize,
    /// End offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length of the span in bytes.
    #[inline]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// True for zero-width spans.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True if `offset` falls inside the span or sits right after its last byte.
    ///
    /// The end is inclusive so that a cursor placed directly behind a token
    /// still addresses it, matching how editors report hover positions.
    #[inline]
    pub const fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }
}

/// An object key with the span of its quoted token.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedKey {
    /// The decoded key.
    pub name: String,
    /// Span of the key token, quotes included.
    pub span: Span,
}

impl SpannedKey {
    /// Span of the key text without the surrounding quotes.
    pub fn content_span(&self) -> Span {
        Span::new(self.span.start + 1, self.span.end - 1)
    }
}

/// The payload of a [`SpannedValue`].
#[derive(Debug, Clone, PartialEq)]
pub enum SpannedKind {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<SpannedValue>),
    /// Members in source order; duplicate keys are kept.
    Object(Vec<(SpannedKey, SpannedValue)>),
}

/// A JSON value together with its location in the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedValue {
    pub kind: SpannedKind,
    /// Span of the whole value (quotes and brackets included).
    pub span: Span,
}

/// Whether a string token is an object key or a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringRole {
    Key,
    Value,
}

/// A string token visited by [`SpannedValue::walk_strings`].
#[derive(Debug, Clone, Copy)]
pub struct StringToken<'a> {
    /// The decoded string.
    pub value: &'a str,
    /// Span of the string content, quotes excluded.
    pub span: Span,
    pub role: StringRole,
}

impl SpannedValue {
    /// Look up an object member. With duplicate keys the last one wins,
    /// as in the typed projection.
    pub fn get(&self, key: &str) -> Option<&SpannedValue> {
        match &self.kind {
            SpannedKind::Object(members) => members
                .iter()
                .rev()
                .find(|(k, _)| k.name == key)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Look up an object member together with its key.
    pub fn get_entry(&self, key: &str) -> Option<(&SpannedKey, &SpannedValue)> {
        match &self.kind {
            SpannedKind::Object(members) => members
                .iter()
                .rev()
                .find(|(k, _)| k.name == key)
                .map(|(k, v)| (k, v)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            SpannedKind::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[SpannedValue]> {
        match &self.kind {
            SpannedKind::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&[(SpannedKey, SpannedValue)]> {
        match &self.kind {
            SpannedKind::Object(members) => Some(members),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.kind, SpannedKind::Null)
    }

    /// Span without the surrounding quotes for strings; the full span otherwise.
    pub fn content_span(&self) -> Span {
        match self.kind {
            SpannedKind::String(_) => Span::new(self.span.start + 1, self.span.end - 1),
            _ => self.span,
        }
    }

    /// Project to a `serde_json::Value`, preserving member order.
    pub fn to_json(&self) -> JsonValue {
        match &self.kind {
            SpannedKind::Null => JsonValue::Null,
            SpannedKind::Bool(b) => JsonValue::Bool(*b),
            SpannedKind::Number(n) => JsonValue::Number(n.clone()),
            SpannedKind::String(s) => JsonValue::String(s.clone()),
            SpannedKind::Array(items) => {
                JsonValue::Array(items.iter().map(SpannedValue::to_json).collect())
            }
            SpannedKind::Object(members) => {
                let mut map = Map::with_capacity(members.len());
                for (key, value) in members {
                    map.insert(key.name.clone(), value.to_json());
                }
                JsonValue::Object(map)
            }
        }
    }

    /// Visit every string token (keys and values) in document order.
    pub fn walk_strings<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(StringToken<'a>),
    {
        match &self.kind {
            SpannedKind::String(s) => visit(StringToken {
                value: s,
                span: self.content_span(),
                role: StringRole::Value,
            }),
            SpannedKind::Array(items) => {
                for item in items {
                    item.walk_strings(visit);
                }
            }
            SpannedKind::Object(members) => {
                for (key, value) in members {
                    visit(StringToken {
                        value: &key.name,
                        span: key.content_span(),
                        role: StringRole::Key,
                    });
                    value.walk_strings(visit);
                }
            }
            _ => {}
        }
    }
}

/// Convert a byte offset to a 1-based (line, column) pair.
///
/// Columns count characters, not bytes. Offsets past the end clamp to the
/// end of the text; offsets inside a multi-byte character round down.
pub fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    let prefix = &text.as_bytes()[..offset];
    let line = memchr_iter(b'\n', prefix).count() + 1;
    let line_start = prefix
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |i| i + 1);
    let column = text[line_start..offset].chars().count() + 1;
    (line, column)
}

/// Parse JSON text into a spanned tree.
///
/// # Errors
///
/// - `Syntax` for malformed JSON, with the line and column of the failure
/// - `Security` when the text exceeds `max_document_size` or nests deeper
///   than `max_nesting_depth`
pub fn parse_spanned(text: &str, limits: &Limits) -> IfcxResult<SpannedValue> {
    if text.len() > limits.max_document_size {
        return Err(IfcxError::security(
            format!(
                "document size {} bytes exceeds limit of {} bytes",
                text.len(),
                limits.max_document_size
            ),
            0,
        ));
    }

    let mut parser = Parser {
        text,
        bytes: text.as_bytes(),
        pos: 0,
        depth: 0,
        max_depth: limits.max_nesting_depth,
    };
    parser.skip_whitespace();
    let value = parser.parse_value()?;
    parser.skip_whitespace();
    if parser.pos < parser.bytes.len() {
        return Err(parser.error("unexpected trailing characters after JSON value"));
    }
    Ok(value)
}

struct Parser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, message: impl Into<String>) -> IfcxError {
        self.error_at(self.pos, message)
    }

    fn error_at(&self, offset: usize, message: impl Into<String>) -> IfcxError {
        let (line, column) = line_col(self.text, offset);
        IfcxError::syntax(message, line).with_column(column)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    fn expect(&mut self, byte: u8) -> IfcxResult<()> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}'", byte as char)))
        }
    }

    fn unexpected(&self, expected: &str) -> IfcxError {
        match self.text[self.pos..].chars().next() {
            Some(c) => self.error(format!("expected {}, found '{}'", expected, c)),
            None => self.error(format!("expected {}, found end of input", expected)),
        }
    }

    fn parse_value(&mut self) -> IfcxResult<SpannedValue> {
        let start = self.pos;
        let kind = match self.peek() {
            Some(b'{') => self.parse_object()?,
            Some(b'[') => self.parse_array()?,
            Some(b'"') => SpannedKind::String(self.parse_string()?),
            Some(b't') => self.parse_literal("true", SpannedKind::Bool(true))?,
            Some(b'f') => self.parse_literal("false", SpannedKind::Bool(false))?,
            Some(b'n') => self.parse_literal("null", SpannedKind::Null)?,
            Some(b'-' | b'0'..=b'9') => SpannedKind::Number(self.parse_number()?),
            _ => return Err(self.unexpected("a JSON value")),
        };
        Ok(SpannedValue {
            kind,
            span: Span::new(start, self.pos),
        })
    }

    fn enter(&mut self) -> IfcxResult<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            let (line, column) = line_col(self.text, self.pos);
            return Err(IfcxError::security(
                format!("nesting depth exceeds limit of {}", self.max_depth),
                line,
            )
            .with_column(column));
        }
        Ok(())
    }

    fn parse_object(&mut self) -> IfcxResult<SpannedKind> {
        self.enter()?;
        self.pos += 1; // '{'
        let mut members = Vec::new();

        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            self.depth -= 1;
            return Ok(SpannedKind::Object(members));
        }

        loop {
            self.skip_whitespace();
            if self.peek() != Some(b'"') {
                return Err(self.unexpected("an object key"));
            }
            let key_start = self.pos;
            let name = self.parse_string()?;
            let key = SpannedKey {
                name,
                span: Span::new(key_start, self.pos),
            };

            self.skip_whitespace();
            self.expect(b':')?;
            self.skip_whitespace();
            let value = self.parse_value()?;
            members.push((key, value));

            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'}') => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(self.unexpected("',' or '}'")),
            }
        }

        self.depth -= 1;
        Ok(SpannedKind::Object(members))
    }

    fn parse_array(&mut self) -> IfcxResult<SpannedKind> {
        self.enter()?;
        self.pos += 1; // '['
        let mut items = Vec::new();

        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.pos += 1;
            self.depth -= 1;
            return Ok(SpannedKind::Array(items));
        }

        loop {
            self.skip_whitespace();
            items.push(self.parse_value()?);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b']') => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(self.unexpected("',' or ']'")),
            }
        }

        self.depth -= 1;
        Ok(SpannedKind::Array(items))
    }

    fn parse_literal(&mut self, word: &str, kind: SpannedKind) -> IfcxResult<SpannedKind> {
        if self.bytes[self.pos..].starts_with(word.as_bytes()) {
            self.pos += word.len();
            Ok(kind)
        } else {
            Err(self.unexpected(&format!("'{}'", word)))
        }
    }

    fn parse_number(&mut self) -> IfcxResult<Number> {
        let start = self.pos;
        let mut is_float = false;

        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        match self.peek() {
            Some(b'0') => self.pos += 1,
            Some(b'1'..=b'9') => self.skip_digits(),
            _ => return Err(self.unexpected("a digit")),
        }
        if self.peek() == Some(b'.') {
            is_float = true;
            self.pos += 1;
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(self.unexpected("a digit after the decimal point"));
            }
            self.skip_digits();
        }
        if let Some(b'e' | b'E') = self.peek() {
            is_float = true;
            self.pos += 1;
            if let Some(b'+' | b'-') = self.peek() {
                self.pos += 1;
            }
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(self.unexpected("a digit in the exponent"));
            }
            self.skip_digits();
        }

        let literal = &self.text[start..self.pos];
        if !is_float {
            if let Ok(n) = literal.parse::<i64>() {
                return Ok(Number::from(n));
            }
            if let Ok(n) = literal.parse::<u64>() {
                return Ok(Number::from(n));
            }
        }
        literal
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .ok_or_else(|| self.error_at(start, format!("number out of range: {}", literal)))
    }

    fn skip_digits(&mut self) {
        while let Some(b'0'..=b'9') = self.peek() {
            self.pos += 1;
        }
    }

    /// Parse a string literal starting at the opening quote.
    fn parse_string(&mut self) -> IfcxResult<String> {
        let open = self.pos;
        self.pos += 1;
        let mut out = String::new();
        let mut chunk_start = self.pos;

        loop {
            let Some(rel) = memchr2(b'"', b'\\', &self.bytes[self.pos..]) else {
                return Err(self.error_at(open, "unterminated string"));
            };
            let stop = self.pos + rel;
            if let Some(bad) = self.bytes[chunk_start..stop].iter().position(|&b| b < 0x20) {
                return Err(self.error_at(
                    chunk_start + bad,
                    "control character must be escaped inside a string",
                ));
            }
            out.push_str(&self.text[chunk_start..stop]);
            self.pos = stop + 1;

            if self.bytes[stop] == b'"' {
                return Ok(out);
            }
            self.parse_escape(&mut out)?;
            chunk_start = self.pos;
        }
    }

    fn parse_escape(&mut self, out: &mut String) -> IfcxResult<()> {
        let escape_start = self.pos - 1;
        let Some(code) = self.peek() else {
            return Err(self.error_at(escape_start, "unterminated escape sequence"));
        };
        self.pos += 1;
        match code {
            b'"' => out.push('"'),
            b'\\' => out.push('\\'),
            b'/' => out.push('/'),
            b'b' => out.push('\u{0008}'),
            b'f' => out.push('\u{000C}'),
            b'n' => out.push('\n'),
            b'r' => out.push('\r'),
            b't' => out.push('\t'),
            b'u' => {
                let high = self.parse_hex4()?;
                let ch = if (0xD800..0xDC00).contains(&high) {
                    if !self.bytes[self.pos..].starts_with(b"\\u") {
                        return Err(self.error_at(escape_start, "unpaired surrogate in \\u escape"));
                    }
                    self.pos += 2;
                    let low = self.parse_hex4()?;
                    if !(0xDC00..0xE000).contains(&low) {
                        return Err(self.error_at(escape_start, "invalid low surrogate in \\u escape"));
                    }
                    char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00))
                } else {
                    char::from_u32(high)
                };
                match ch {
                    Some(c) => out.push(c),
                    None => return Err(self.error_at(escape_start, "invalid \\u escape")),
                }
            }
            _ => return Err(self.error_at(escape_start, "invalid escape sequence")),
        }
        Ok(())
    }

    fn parse_hex4(&mut self) -> IfcxResult<u32> {
        let digits = self
            .text
            .get(self.pos..self.pos + 4)
            .ok_or_else(|| self.error("incomplete \\u escape"))?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(self.error("invalid hex digits in \\u escape"));
        }
        let value =
            u32::from_str_radix(digits, 16).map_err(|_| self.error("invalid hex digits in \\u escape"))?;
        self.pos += 4;
        Ok(value)
    }
}
