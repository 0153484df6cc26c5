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


//! Document management with caching and LRU eviction.
//!
//! The [`DocumentManager`] owns the text and latest analysis of every open
//! IFCX document. Content changes are detected by hash; a changed document
//! is marked dirty until the debounced analysis replaces its result.
//!
//! # Design
//!
//! - **LRU Eviction**: the least recently accessed document is dropped when
//!   the open-document limit is reached
//! - **Dirty Tracking**: unchanged content never triggers a re-analysis
//! - **Size Limits**: documents above the byte limit are rejected
//! - **Statistics**: hit, miss and eviction counters for monitoring

use crate::analysis::AnalyzedDocument;
use dashmap::DashMap;
use ifcx_core::TooltipStyle;
use parking_lot::{Mutex, RwLock};
use ropey::Rope;
use std::sync::Arc;
use std::time::Instant;
use tower_lsp::lsp_types::Url;
use tracing::{debug, error, warn};

/// Document state with caching and dirty tracking.
pub struct DocumentState {
    /// Current text.
    pub rope: Rope,
    /// Latest analysis. May lag behind `rope` while `dirty` is set.
    pub analysis: Arc<AnalyzedDocument>,
    /// Content hash for change detection.
    pub content_hash: u64,
    /// True if content changed since the last analysis.
    pub dirty: bool,
    /// Last access timestamp for LRU eviction.
    pub last_access: Instant,
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Default)]
pub struct CacheStatistics {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub current_size: usize,
    pub max_size: usize,
}

/// Document manager with LRU caching and dirty tracking.
///
/// # Thread Safety
///
/// Documents live in a `DashMap`, each behind its own `parking_lot::Mutex`,
/// so the manager can be shared between the protocol handlers and the
/// debounce tasks.
///
/// # Example
///
/// ```
/// use ifcx_lsp::document_manager::DocumentManager;
/// use tower_lsp::lsp_types::Url;
///
/// let manager = DocumentManager::new(1000, 500 * 1024 * 1024);
/// let uri = Url::parse("file:///model.ifcx").unwrap();
/// assert!(manager.insert_or_update(&uri, "{}"));
/// let (_text, analysis) = manager.get(&uri).unwrap();
/// assert_eq!(analysis.errors.len(), 1);
/// ```
pub struct DocumentManager {
    documents: DashMap<Url, Arc<Mutex<DocumentState>>>,
    cache_stats: Arc<Mutex<CacheStatistics>>,
    max_cache_size: Arc<RwLock<usize>>,
    max_document_size: Arc<RwLock<usize>>,
    tooltip_style: Arc<RwLock<TooltipStyle>>,
}

impl DocumentManager {
    /// Create a document manager holding at most `max_cache_size` documents
    /// of at most `max_document_size` bytes each.
    pub fn new(max_cache_size: usize, max_document_size: usize) -> Self {
        Self {
            documents: DashMap::new(),
            cache_stats: Arc::new(Mutex::new(CacheStatistics {
                max_size: max_cache_size,
                ..Default::default()
            })),
            max_cache_size: Arc::new(RwLock::new(max_cache_size)),
            max_document_size: Arc::new(RwLock::new(max_document_size)),
            tooltip_style: Arc::new(RwLock::new(TooltipStyle::default())),
        }
    }

    /// Snapshot of the cache counters.
    pub fn statistics(&self) -> CacheStatistics {
        let mut stats = self.cache_stats.lock();
        stats.current_size = self.documents.len();
        stats.clone()
    }

    pub fn set_max_cache_size(&self, new_max: usize) {
        *self.max_cache_size.write() = new_max;
        self.cache_stats.lock().max_size = new_max;
        debug!("Cache max size updated to: {}", new_max);
    }

    pub fn max_cache_size(&self) -> usize {
        *self.max_cache_size.read()
    }

    pub fn set_max_document_size(&self, new_max: usize) {
        *self.max_document_size.write() = new_max;
        debug!("Max document size updated to: {} bytes", new_max);
    }

    pub fn max_document_size(&self) -> usize {
        *self.max_document_size.read()
    }

    /// Change the schema tooltip style. Every open document is marked dirty
    /// so its next analysis picks the style up.
    ///
    /// Returns `true` if the style changed.
    pub fn set_tooltip_style(&self, style: TooltipStyle) -> bool {
        {
            let mut current = self.tooltip_style.write();
            if *current == style {
                return false;
            }
            *current = style;
        }
        for entry in self.documents.iter() {
            entry.value().lock().dirty = true;
        }
        debug!("Tooltip style updated to: {:?}", style);
        true
    }

    pub fn tooltip_style(&self) -> TooltipStyle {
        *self.tooltip_style.read()
    }

    fn hash_content(content: &str) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let mut hasher = DefaultHasher::new();
        content.hash(&mut hasher);
        hasher.finish()
    }

    /// Insert or update a document.
    ///
    /// A new document is analyzed immediately and stored clean. An existing
    /// document whose content changed is marked dirty; the caller schedules
    /// its re-analysis.
    ///
    /// Returns `false` if the content exceeds the document size limit.
    pub fn insert_or_update(&self, uri: &Url, content: &str) -> bool {
        let max_size = self.max_document_size();
        if content.len() > max_size {
            warn!(
                "Document size limit exceeded for {}: {} bytes > {} bytes maximum (rejected)",
                uri,
                content.len(),
                max_size
            );
            return false;
        }

        let content_hash = Self::hash_content(content);

        if let Some(state_ref) = self.documents.get(uri) {
            self.cache_stats.lock().hits += 1;

            let mut state = state_ref.lock();
            if state.content_hash != content_hash {
                debug!(
                    "Document content changed for {}: {} -> {} bytes",
                    uri,
                    state.rope.len_bytes(),
                    content.len()
                );
                state.rope = Rope::from_str(content);
                state.content_hash = content_hash;
                state.dirty = true;
            }
            state.last_access = Instant::now();
            return true;
        }

        self.cache_stats.lock().misses += 1;

        let max_cache = self.max_cache_size();
        if self.documents.len() >= max_cache {
            warn!(
                "Cache limit reached ({}/{}), evicting before inserting {}",
                self.documents.len(),
                max_cache,
                uri
            );
            self.evict_lru_document();
        }

        debug!("Starting initial analysis for new document: {}", uri);
        let analysis = Arc::new(AnalyzedDocument::analyze_with_style(
            content,
            self.tooltip_style(),
        ));
        let state = DocumentState {
            rope: analysis.rope.clone(),
            analysis,
            content_hash,
            dirty: false,
            last_access: Instant::now(),
        };
        self.documents
            .insert(uri.clone(), Arc::new(Mutex::new(state)));
        debug!("Document cached: {} (hash: {:#x})", uri, content_hash);

        true
    }

    /// Current text and latest analysis of a document.
    ///
    /// Updates the access time for LRU ordering.
    pub fn get(&self, uri: &Url) -> Option<(String, Arc<AnalyzedDocument>)> {
        self.documents.get(uri).map(|entry| {
            let mut state = entry.lock();
            state.last_access = Instant::now();
            (state.rope.to_string(), Arc::clone(&state.analysis))
        })
    }

    /// Latest analysis of a document without copying its text.
    pub fn analysis(&self, uri: &Url) -> Option<Arc<AnalyzedDocument>> {
        self.documents.get(uri).map(|entry| {
            let mut state = entry.lock();
            state.last_access = Instant::now();
            Arc::clone(&state.analysis)
        })
    }

    pub fn get_state(&self, uri: &Url) -> Option<Arc<Mutex<DocumentState>>> {
        self.documents.get(uri).map(|entry| entry.clone())
    }

    /// Whether the document exists and needs re-analysis.
    pub fn is_dirty(&self, uri: &Url) -> bool {
        self.documents
            .get(uri)
            .map(|entry| entry.lock().dirty)
            .unwrap_or(false)
    }

    pub fn mark_clean(&self, uri: &Url) {
        if let Some(state_ref) = self.documents.get(uri) {
            state_ref.lock().dirty = false;
        }
    }

    /// Store a fresh analysis and mark the document clean.
    ///
    /// The analysis is dropped if its text no longer matches the document,
    /// which happens when an edit lands while analysis runs.
    pub fn update_analysis(&self, uri: &Url, analysis: Arc<AnalyzedDocument>) {
        let Some(state_ref) = self.documents.get(uri) else {
            warn!(
                "Attempted to update analysis for non-existent document: {} (may have been closed/evicted)",
                uri
            );
            return;
        };

        let mut state = state_ref.lock();
        if state.rope != analysis.rope {
            debug!("Discarding stale analysis for {}", uri);
            return;
        }
        debug!(
            "Updating analysis for {}: {} nodes, {} errors",
            uri,
            analysis.graph.len(),
            analysis.errors.len()
        );
        state.analysis = analysis;
        state.dirty = false;
    }

    /// Remove a document, returning whether it existed.
    pub fn remove(&self, uri: &Url) -> bool {
        self.documents.remove(uri).is_some()
    }

    pub fn all_uris(&self) -> Vec<Url> {
        self.documents.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Visit every document.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&Url, &Arc<Mutex<DocumentState>>),
    {
        for entry in self.documents.iter() {
            f(entry.key(), entry.value());
        }
    }

    fn evict_lru_document(&self) {
        let mut lru: Option<(Url, Instant, usize)> = None;

        for entry in self.documents.iter() {
            let state = entry.value().lock();
            if lru.as_ref().map_or(true, |(_, time, _)| state.last_access < *time) {
                lru = Some((entry.key().clone(), state.last_access, state.rope.len_bytes()));
            }
        }

        let Some((uri, last_access, size)) = lru else {
            error!("LRU eviction requested but no document was found");
            return;
        };

        warn!(
            "Evicting LRU document {} ({} bytes, idle for {:?})",
            uri,
            size,
            last_access.elapsed()
        );
        self.documents.remove(&uri);

        let mut stats = self.cache_stats.lock();
        stats.evictions += 1;
        debug!(
            "Cache statistics after eviction: {} hits, {} misses, {} evictions, {}/{} size",
            stats.hits,
            stats.misses,
            stats.evictions,
            self.documents.len(),
            stats.max_size
        );
    }

    /// Drop every document and reset the counters.
    pub fn clear(&self) {
        self.documents.clear();
        let mut stats = self.cache_stats.lock();
        stats.hits = 0;
        stats.misses = 0;
        stats.evictions = 0;
    }
}
