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


//! LSP backend implementation.
//!
//! # Analysis scheduling
//!
//! - `didOpen` and `didSave` analyze immediately
//! - `didChange` marks the document dirty and re-analyzes after the
//!   debounce window, batching bursts of keystrokes
//! - queries (hover, definition, tokens) read the cached analysis and
//!   never parse
//!
//! Folding is the exception: it scans the current text so it stays
//! available while the document does not parse.

use crate::analysis::AnalyzedDocument;
use crate::commands::{execute_command, COMMANDS};
use crate::config::ServerConfig;
use crate::constants::BYTES_PER_MEGABYTE;
use crate::document_manager::{CacheStatistics, DocumentManager};
use crate::folding::get_folding_ranges;
use crate::hover::get_hover;
use crate::navigation::{find_references, local_definition, symbol_at, Symbol};
use crate::semantic_tokens::{compute_semantic_tokens, semantic_token_legend};
use dashmap::DashMap;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::{debug, error, info, warn};

/// IFCX Language Server backend.
///
/// Protocol handling lives here; document storage and caching are
/// delegated to the [`DocumentManager`].
pub struct IfcxLanguageServer {
    client: Client,
    document_manager: Arc<DocumentManager>,
    /// Debounce channels: URI -> sender for triggering analysis.
    debounce_channels: DashMap<Url, mpsc::UnboundedSender<()>>,
    config: Arc<RwLock<ServerConfig>>,
}

impl IfcxLanguageServer {
    /// Create a new language server with default configuration.
    pub fn new(client: Client) -> Self {
        Self::with_config(client, ServerConfig::default())
    }

    /// Create a new language server with custom configuration.
    ///
    /// Settings sent by the client at initialization replace `config`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ifcx_lsp::{IfcxLanguageServer, ServerConfig};
    /// use tower_lsp::{LspService, Server};
    ///
    /// # async fn run() {
    /// let config = ServerConfig {
    ///     max_documents: 2000,
    ///     ..ServerConfig::default()
    /// };
    /// let (service, socket) =
    ///     LspService::new(|client| IfcxLanguageServer::with_config(client, config.clone()));
    /// Server::new(tokio::io::stdin(), tokio::io::stdout(), socket)
    ///     .serve(service)
    ///     .await;
    /// # }
    /// ```
    pub fn with_config(client: Client, config: ServerConfig) -> Self {
        Self {
            client,
            document_manager: Arc::new(DocumentManager::new(
                config.max_documents,
                config.max_document_size,
            )),
            debounce_channels: DashMap::new(),
            config: Arc::new(RwLock::new(config)),
        }
    }

    pub fn cache_statistics(&self) -> CacheStatistics {
        self.document_manager.statistics()
    }

    /// Current settings.
    pub fn config(&self) -> ServerConfig {
        self.config.read().clone()
    }

    /// Replace the settings, resizing the document cache.
    ///
    /// Returns `true` if the tooltip style changed, in which case every open
    /// document is dirty until re-analyzed.
    pub fn apply_config(&self, config: ServerConfig) -> bool {
        self.document_manager.set_max_cache_size(config.max_documents);
        self.document_manager
            .set_max_document_size(config.max_document_size);
        let restyled = self.document_manager.set_tooltip_style(config.tooltip_style);
        info!(
            tooltip_style = ?config.tooltip_style,
            fold_min_elements = config.auto_fold_array.min_elements,
            debounce_ms = config.debounce_ms,
            "configuration applied"
        );
        *self.config.write() = config;
        restyled
    }

    /// Analyze a document if dirty and publish its diagnostics.
    async fn analyze_if_dirty(&self, uri: &Url) {
        if !self.document_manager.is_dirty(uri) {
            debug!("Document {} is clean, skipping analysis", uri);
            return;
        }
        analyze_and_publish(&self.client, &self.document_manager, uri).await;
    }

    /// Start debounced analysis for a document.
    fn schedule_analysis(&self, uri: Url) {
        let tx = if let Some(entry) = self.debounce_channels.get(&uri) {
            entry.clone()
        } else {
            let (tx, mut rx) = mpsc::unbounded_channel();
            let uri_clone = uri.clone();
            let client = self.client.clone();
            let document_manager = Arc::clone(&self.document_manager);
            let config = Arc::clone(&self.config);

            tokio::spawn(async move {
                while rx.recv().await.is_some() {
                    let delay = config.read().debounce();
                    sleep(delay).await;

                    // Drain signals that arrived during the debounce window
                    while rx.try_recv().is_ok() {}

                    if !document_manager.is_dirty(&uri_clone) {
                        continue;
                    }
                    debug!("Debounced analysis for: {}", uri_clone);
                    analyze_and_publish(&client, &document_manager, &uri_clone).await;
                }
            });

            self.debounce_channels.insert(uri.clone(), tx.clone());
            tx
        };

        let _ = tx.send(());
    }

    /// Definition of a schema name in another open document.
    fn foreign_schema_definition(&self, uri: &Url, symbol: &Symbol) -> Option<Location> {
        let mut found = None;
        self.document_manager.for_each(|other_uri, state| {
            if found.is_some() || other_uri == uri {
                return;
            }
            let analysis = Arc::clone(&state.lock().analysis);
            if let Some(range) = local_definition(&analysis, symbol) {
                found = Some(Location {
                    uri: other_uri.clone(),
                    range,
                });
            }
        });
        found
    }
}

async fn analyze_and_publish(client: &Client, document_manager: &DocumentManager, uri: &Url) {
    let Some(state_arc) = document_manager.get_state(uri) else {
        warn!(
            "Cannot analyze non-existent document: {} (may have been closed/evicted)",
            uri
        );
        return;
    };
    let content = state_arc.lock().rope.to_string();

    debug!("Starting analysis for {} ({} bytes)", uri, content.len());
    let analysis = Arc::new(AnalyzedDocument::analyze_with_style(
        &content,
        document_manager.tooltip_style(),
    ));
    document_manager.update_analysis(uri, Arc::clone(&analysis));

    let diagnostics = analysis.to_lsp_diagnostics();
    debug!("Publishing {} diagnostics for {}", diagnostics.len(), uri);
    client
        .publish_diagnostics(uri.clone(), diagnostics, None)
        .await;
}

#[tower_lsp::async_trait]
impl LanguageServer for IfcxLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("IFCX Language Server initializing");

        if params.initialization_options.is_some() {
            self.apply_config(ServerConfig::from_value_or_default(
                params.initialization_options.as_ref(),
            ));
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::FULL),
                        will_save: None,
                        will_save_wait_until: None,
                        save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                            include_text: Some(true),
                        })),
                    },
                )),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                definition_provider: Some(OneOf::Left(true)),
                references_provider: Some(OneOf::Left(true)),
                folding_range_provider: Some(FoldingRangeProviderCapability::Simple(true)),
                semantic_tokens_provider: Some(
                    SemanticTokensServerCapabilities::SemanticTokensOptions(
                        SemanticTokensOptions {
                            work_done_progress_options: Default::default(),
                            legend: semantic_token_legend(),
                            range: Some(false),
                            full: Some(SemanticTokensFullOptions::Bool(true)),
                        },
                    ),
                ),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
                    work_done_progress_options: Default::default(),
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "ifcx-lsp".to_string(),
                version: Some(crate::VERSION.to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        info!("IFCX Language Server initialized");
    }

    async fn shutdown(&self) -> Result<()> {
        info!("IFCX Language Server shutting down");
        Ok(())
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        debug!("Configuration change received");
        let restyled =
            self.apply_config(ServerConfig::from_value_or_default(Some(&params.settings)));
        if restyled {
            for uri in self.document_manager.all_uris() {
                self.analyze_if_dirty(&uri).await;
            }
        }
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = &params.text_document.uri;
        let content_len = params.text_document.text.len();
        info!("Document opened: {} ({} bytes)", uri, content_len);

        let max_size = self.document_manager.max_document_size();
        if content_len > max_size {
            error!(
                "Document size limit exceeded on open: {} has {} bytes > {} bytes maximum",
                uri, content_len, max_size
            );
            self.client
                .show_message(
                    MessageType::ERROR,
                    format!(
                        "Document too large: {} bytes exceeds maximum of {} bytes ({} MB)",
                        content_len,
                        max_size,
                        max_size / BYTES_PER_MEGABYTE
                    ),
                )
                .await;
            return;
        }

        // A new document is analyzed on insert; publish its diagnostics now.
        if self
            .document_manager
            .insert_or_update(uri, &params.text_document.text)
        {
            if self.document_manager.is_dirty(uri) {
                self.analyze_if_dirty(uri).await;
            } else if let Some(analysis) = self.document_manager.analysis(uri) {
                self.client
                    .publish_diagnostics(uri.clone(), analysis.to_lsp_diagnostics(), None)
                    .await;
            }
        }
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = &params.text_document.uri;

        let Some(change) = params.content_changes.into_iter().last() else {
            warn!("Document change event for {} had no content changes", uri);
            return;
        };

        if self.document_manager.insert_or_update(uri, &change.text) {
            debug!("Document {} updated, scheduling debounced analysis", uri);
            self.schedule_analysis(uri.clone());
        } else {
            warn!(
                "Failed to update document {} (size limit exceeded: {} bytes)",
                uri,
                change.text.len()
            );
        }
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        debug!("Document saved: {}", params.text_document.uri);
        if let Some(text) = params.text {
            self.document_manager
                .insert_or_update(&params.text_document.uri, &text);
        }
        self.analyze_if_dirty(&params.text_document.uri).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        debug!("Document closed: {}", params.text_document.uri);
        self.document_manager.remove(&params.text_document.uri);
        self.debounce_channels.remove(&params.text_document.uri);
        self.client
            .publish_diagnostics(params.text_document.uri, vec![], None)
            .await;
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let Some(analysis) = self.document_manager.analysis(uri) else {
            return Ok(None);
        };
        Ok(get_hover(&analysis, position))
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let Some(analysis) = self.document_manager.analysis(uri) else {
            return Ok(None);
        };
        let Some(symbol) = symbol_at(&analysis, position) else {
            return Ok(None);
        };

        if let Some(range) = local_definition(&analysis, &symbol) {
            return Ok(Some(GotoDefinitionResponse::Scalar(Location {
                uri: uri.clone(),
                range,
            })));
        }
        if matches!(symbol, Symbol::Schema(_)) {
            if let Some(location) = self.foreign_schema_definition(uri, &symbol) {
                debug!("Resolved {} in {}", symbol.name(), location.uri);
                return Ok(Some(GotoDefinitionResponse::Scalar(location)));
            }
        }

        debug!("No definition found for {}", symbol.name());
        Ok(None)
    }

    async fn references(&self, params: ReferenceParams) -> Result<Option<Vec<Location>>> {
        let uri = &params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;

        let Some(analysis) = self.document_manager.analysis(uri) else {
            return Ok(None);
        };
        let Some(symbol) = symbol_at(&analysis, position) else {
            return Ok(None);
        };

        let locations = find_references(&analysis, &symbol, params.context.include_declaration)
            .into_iter()
            .map(|range| Location {
                uri: uri.clone(),
                range,
            })
            .collect();
        Ok(Some(locations))
    }

    async fn folding_range(&self, params: FoldingRangeParams) -> Result<Option<Vec<FoldingRange>>> {
        let Some((content, _)) = self.document_manager.get(&params.text_document.uri) else {
            return Ok(None);
        };
        let min_elements = self.config.read().auto_fold_array.min_elements;
        Ok(Some(get_folding_ranges(&content, min_elements)))
    }

    async fn semantic_tokens_full(
        &self,
        params: SemanticTokensParams,
    ) -> Result<Option<SemanticTokensResult>> {
        let Some(analysis) = self.document_manager.analysis(&params.text_document.uri) else {
            return Ok(None);
        };
        Ok(Some(SemanticTokensResult::Tokens(SemanticTokens {
            result_id: None,
            data: compute_semantic_tokens(&analysis),
        })))
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        debug!("Executing command {}", params.command);
        match execute_command(&self.document_manager, &params.command, &params.arguments) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(command = %params.command, error = %e, "command failed");
                Err(e.into())
            }
        }
    }
}
