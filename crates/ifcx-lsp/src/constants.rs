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


//! LSP constants and magic number definitions.
//!
//! This module centralizes the tuning values of the language server with a
//! short rationale for each.
//!
//! # Organization
//!
//! - **Performance Tuning**: debounce delay
//! - **Memory Limits**: document and cache size constraints
//! - **LSP Protocol**: position conversion and diagnostic ranges
//! - **Commands**: names of the `workspace/executeCommand` commands

// ============================================================================
// Performance Tuning
// ============================================================================

/// Debounce delay for document analysis (in milliseconds).
///
/// **Rationale**: IFCX files are machine-written JSON that users edit in
/// small bursts. 100ms batches a burst of keystrokes into a single
/// re-analysis while keeping decorations visually in step with typing.
///
/// **Trade-offs**:
/// - Lower values re-parse large model files on nearly every keystroke
/// - Higher values leave stale hover text and highlights after an edit
///
/// Overridden at runtime by the `debounceMs` setting.
pub const DEBOUNCE_MS: u64 = 100;

// ============================================================================
// Memory Limits
// ============================================================================

/// Default maximum document size in bytes (500 MB).
///
/// **Rationale**: Building models exported as IFCX routinely reach hundreds
/// of megabytes of mesh data. 500 MB accepts those while refusing input that
/// would exhaust memory once the spanned tree is built on top of the rope.
///
/// **Trade-offs**:
/// - Larger limits allow bigger models but risk OOM
/// - Smaller limits protect memory but reject real exports
pub const DEFAULT_MAX_DOCUMENT_SIZE: usize = 500 * BYTES_PER_MEGABYTE;

/// Default maximum number of simultaneously open documents (1000).
///
/// **Rationale**: With LRU eviction this bounds memory while leaving ample
/// headroom over normal editor usage.
pub const DEFAULT_MAX_CACHE_SIZE: usize = 1000;

/// Bytes per megabyte (1024 * 1024).
pub const BYTES_PER_MEGABYTE: usize = 1024 * 1024;

// ============================================================================
// LSP Protocol Constants
// ============================================================================

/// Maximum character position for diagnostic ranges.
///
/// **Rationale**: Structural errors carry a line but no column. The range is
/// extended to the end of any reasonable line; editors clamp it to the
/// actual line length.
pub const DIAGNOSTIC_LINE_END_CHAR: u32 = 1000;

/// Line numbering offset for LSP positions.
///
/// LSP lines are 0-based, core errors report 1-based lines.
///
/// **Usage**: `lsp_line = ifcx_line - LINE_NUMBER_OFFSET`
pub const LINE_NUMBER_OFFSET: usize = 1;

/// Zero-based position start index.
pub const POSITION_ZERO: u32 = 0;

/// Source name attached to published diagnostics.
pub const DIAGNOSTIC_SOURCE: &str = "ifcx";

// ============================================================================
// Commands
// ============================================================================

/// Returns the JSON identifier report of a document.
///
/// **Arguments**: `[uri]`
pub const COMMAND_IDENTIFIER_REPORT: &str = "ifcx.identifierReport";

/// Returns the markdown description of one identifier.
///
/// **Arguments**: `[uri, identifier]`
pub const COMMAND_DESCRIBE_IDENTIFIER: &str = "ifcx.describeIdentifier";

/// Key of the server section in client settings.
pub const SETTINGS_SECTION: &str = "ifcx";
