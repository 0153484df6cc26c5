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

//! Error types for IFCX parsing.

use std::fmt;
use thiserror::Error;

/// The kind of error that occurred while reading an IFCX document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IfcxErrorKind {
    /// The text is not valid JSON.
    Syntax,
    /// Valid JSON, but a required top-level or header field is missing or mistyped.
    Structure,
    /// A configured limit was exceeded (document size, nesting depth).
    Security,
    /// A derived artifact (report, tooltip payload) could not be serialized.
    Serialization,
}

impl fmt::Display for IfcxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "SyntaxError"),
            Self::Structure => write!(f, "StructuralError"),
            Self::Security => write!(f, "SecurityError"),
            Self::Serialization => write!(f, "SerializationError"),
        }
    }
}

/// An error that occurred while reading an IFCX document.
///
/// Parsing is all-or-nothing: when one of these is returned no document
/// is produced.
#[derive(Debug, Clone, Error)]
#[error("{kind} at line {line}: {message}")]
pub struct IfcxError {
    /// The kind of error.
    pub kind: IfcxErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Line number (1-based, 0 when unknown).
    pub line: usize,
    /// Column number (1-based, optional).
    pub column: Option<usize>,
}

impl IfcxError {
    /// Create a new error.
    pub fn new(kind: IfcxErrorKind, message: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
            column: None,
        }
    }

    /// Add column information.
    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    pub fn syntax(message: impl Into<String>, line: usize) -> Self {
        Self::new(IfcxErrorKind::Syntax, message, line)
    }

    pub fn structure(message: impl Into<String>, line: usize) -> Self {
        Self::new(IfcxErrorKind::Structure, message, line)
    }

    pub fn security(message: impl Into<String>, line: usize) -> Self {
        Self::new(IfcxErrorKind::Security, message, line)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(IfcxErrorKind::Serialization, message, 0)
    }

    /// True for failures caused by malformed JSON text.
    pub fn is_syntax(&self) -> bool {
        self.kind == IfcxErrorKind::Syntax
    }

    /// True for failures caused by a well-formed document with the wrong shape.
    pub fn is_structural(&self) -> bool {
        self.kind == IfcxErrorKind::Structure
    }
}

impl From<serde_json::Error> for IfcxError {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;
        match err.classify() {
            Category::Syntax | Category::Eof => {
                IfcxError::syntax(err.to_string(), err.line()).with_column(err.column())
            }
            Category::Data => IfcxError::structure(err.to_string(), err.line()),
            Category::Io => IfcxError::serialization(err.to_string()),
        }
    }
}

/// Result type for IFCX operations.
pub type IfcxResult<T> = Result<T, IfcxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_display() {
        assert_eq!(format!("{}", IfcxErrorKind::Syntax), "SyntaxError");
        assert_eq!(format!("{}", IfcxErrorKind::Structure), "StructuralError");
        assert_eq!(format!("{}", IfcxErrorKind::Security), "SecurityError");
        assert_eq!(
            format!("{}", IfcxErrorKind::Serialization),
            "SerializationError"
        );
    }

    #[test]
    fn test_error_display() {
        let err = IfcxError::new(IfcxErrorKind::Syntax, "unexpected token", 42);
        let msg = format!("{}", err);
        assert!(msg.contains("SyntaxError"));
        assert!(msg.contains("line 42"));
        assert!(msg.contains("unexpected token"));
    }

    #[test]
    fn test_error_with_column() {
        let err = IfcxError::syntax("error", 5).with_column(10);
        assert_eq!(err.column, Some(10));
        assert!(err.is_syntax());
        assert!(!err.is_structural());
    }

    #[test]
    fn test_structural_error() {
        let err = IfcxError::structure("IFCX file is missing schemas", 1);
        assert!(err.is_structural());
        assert!(err.to_string().contains("schemas"));
    }

    #[test]
    fn test_serialization_error_has_no_line() {
        let err = IfcxError::serialization("report failed");
        assert_eq!(err.kind, IfcxErrorKind::Serialization);
        assert_eq!(err.line, 0);
    }

    #[test]
    fn test_from_serde_json_data_error() {
        let err: IfcxError = serde_json::from_str::<Vec<String>>("[1]")
            .unwrap_err()
            .into();
        assert_eq!(err.kind, IfcxErrorKind::Structure);
    }

    #[test]
    fn test_from_serde_json_syntax_error() {
        let err: IfcxError = serde_json::from_str::<serde_json::Value>("{ invalid")
            .unwrap_err()
            .into();
        assert_eq!(err.kind, IfcxErrorKind::Syntax);
        assert!(err.column.is_some());
    }

    #[test]
    fn test_error_is_std_error() {
        fn accepts_error<E: std::error::Error>(_: E) {}
        accepts_error(IfcxError::syntax("test", 1));
    }
}
