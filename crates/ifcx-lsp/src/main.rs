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


//! IFCX Language Server binary.
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
//! # Editor Integration
//!
//! ## Neovim (nvim-lspconfig)
//!
//! ```lua
//! require('lspconfig.configs').ifcx = {
//!   default_config = {
//!     cmd = { 'ifcx-lsp' },
//!     filetypes = { 'ifcx' },
//!     root_dir = function() return vim.fn.getcwd() end,
//!     init_options = { ifcx = { autoFoldArray = { minElements = 10 } } },
//!   },
//! }
//! require('lspconfig').ifcx.setup {}
//! ```

use ifcx_lsp::IfcxLanguageServer;
use tower_lsp::{LspService, Server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("ifcx_lsp=info".parse().expect("valid log directive"))
                .add_directive("ifcx_core=warn".parse().expect("valid log directive"))
                .add_directive("tower_lsp=info".parse().expect("valid log directive")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting IFCX Language Server v{}", ifcx_lsp::VERSION);

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(IfcxLanguageServer::new);

    Server::new(stdin, stdout, socket).serve(service).await;
}
