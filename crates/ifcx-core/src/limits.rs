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

//! Security limits for IFCX parsing.

/// Configurable limits for parser security.
///
/// These limits bound the resources consumed while parsing untrusted
/// editor buffers. The spanned parser is recursive, so the nesting limit
/// also protects the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum document size in bytes (default: 512MB).
    pub max_document_size: usize,
    /// Maximum array/object nesting depth (default: 512).
    pub max_nesting_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_document_size: 512 * 1024 * 1024, // 512MB
            max_nesting_depth: 512,
        }
    }
}

impl Limits {
    /// Create limits with no restrictions (for testing).
    pub fn unlimited() -> Self {
        Self {
            max_document_size: usize::MAX,
            max_nesting_depth: usize::MAX,
        }
    }
}
