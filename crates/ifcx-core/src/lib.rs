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

//! Core document model and analysis for IFCX files.
//!
//! IFCX is a JSON interchange format for building data: a `header`, a table
//! of typed attribute `schemas`, and a flat `data` sequence of nodes that
//! reference each other by identifier through `children` and `inherits`.
//!
//! This crate is pure and synchronous. Every analysis is a function of the
//! document text:
//!
//! - [`parse`] / [`parse_with_spans`] build the typed [`Document`], the
//!   latter keeping a location-aware tree (see [`json`])
//! - [`Validator`] checks attribute values against their schema
//! - [`format`] renders schema tooltips; [`SchemaTooltipProvider`] caches
//!   them per document
//! - [`IdentifierGraph`] links nodes, and [`describe_node`] /
//!   [`generate_report`] render it
//! - [`decorate`] locates schema and identifier tokens; [`folding`] and
//!   [`scanner`] work on raw text and survive invalid input
//!
//! # Example
//!
//! ```
//! use ifcx_core::{describe_node, IdentifierGraph};
//!
//! let text = r#"{
//!   "header": {"version": "ifcx_alpha", "author": "me", "timestamp": "2025-01-01"},
//!   "schemas": {},
//!   "data": [
//!     {"identifier": "A", "children": {"Wall1": "B"}},
//!     {"identifier": "B"}
//!   ]
//! }"#;
//! let graph = IdentifierGraph::extract(text).unwrap();
//! let markdown = describe_node("B", &graph);
//! assert!(markdown.contains("Wall1"));
//! assert!(markdown.contains("**Parent**: `A`"));
//! ```

mod decorate;
mod describe;
mod document;
mod error;
pub mod folding;
pub mod format;
mod graph;
pub mod json;
mod limits;
pub mod scanner;
pub mod schema;
mod tooltip_provider;
mod validate;

pub use decorate::{decorate, Decoration, DecorationKind, Decorations};
pub use describe::{describe_node, generate_report, UNNAMED_NODE};
pub use document::{
    parse, parse_with_limits, parse_with_spans, Document, Header, Inherits, Node, ParsedDocument,
    Schema, SchemaTable,
};
pub use error::{IfcxError, IfcxErrorKind, IfcxResult};
pub use format::{format_schema_tooltip, TooltipStyle};
pub use graph::{GraphNode, IdentifierGraph};
pub use json::Span;
pub use limits::Limits;
pub use schema::{DataType, TypeDescription};
pub use tooltip_provider::SchemaTooltipProvider;
pub use validate::{validate_value, Validator};
