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


//! IFCX Language Server Protocol (LSP) Implementation
//!
//! This crate provides editor integration for IFCX building-data documents
//! through the Language Server Protocol.
//!
//! # Features
//!
//! - **Diagnostics**: parse and structure errors, plus attribute values that
//!   do not match their schema
//! - **Hover**: schema tooltips on schema and attribute keys; node name,
//!   parent, inherited nodes and children on identifiers
//! - **Go to Definition**: identifiers jump to their node, schema names to
//!   their declaration, in this or another open document
//! - **Find References**: every occurrence of an identifier or schema
//! - **Folding**: the `schemas` block and large attribute arrays
//! - **Semantic Highlighting**: schema names and identifiers
//! - **Commands**: `ifcx.identifierReport` and `ifcx.describeIdentifier`
//!
//! # Performance
//!
//! 1. **Debouncing** (100ms, configurable): bursts of edits trigger one
//!    analysis.
//! 2. **Dirty Tracking**: unchanged content is never re-analyzed.
//! 3. **Caching**: queries read the cached analysis without parsing.
//!
//! # Usage
//!
//! ```bash
//! # Run the language server (stdio transport)
//! ifcx-lsp
//!
//! # With debug logging
//! RUST_LOG=debug ifcx-lsp
//! ```
//!
//! ## Programmatic Usage
//!
//! ```no_run
//! use ifcx_lsp::IfcxLanguageServer;
//! use tower_lsp::{LspService, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let stdin = tokio::io::stdin();
//!     let stdout = tokio::io::stdout();
//!
//!     let (service, socket) = LspService::new(IfcxLanguageServer::new);
//!
//!     Server::new(stdin, stdout, socket).serve(service).await;
//! }
//! ```
//!
//! # Architecture
//!
//! - `backend`: protocol handlers and analysis scheduling
//! - [`analysis`]: one analysis per document version, built on `ifcx_core`
//! - [`document_manager`]: document cache with LRU eviction
//! - [`hover`], [`navigation`], [`folding`], [`semantic_tokens`],
//!   [`commands`]: request handlers over an analysis
//! - [`config`]: client settings
//! - [`utils`]: byte offset and LSP position conversion

pub mod analysis;
mod backend;
pub mod commands;
pub mod config;
pub mod constants;
pub mod document_manager;
pub mod folding;
pub mod hover;
pub mod navigation;
pub mod semantic_tokens;
pub mod utils;


pub use backend::IfcxLanguageServer;
pub use config::ServerConfig;
pub use document_manager::{CacheStatistics, DocumentManager};

/// LSP server version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
