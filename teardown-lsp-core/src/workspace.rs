use crate::analyzer::DocumentAnalyzer;
use crate::config::{EngineSettings, ModuleRoot, SourceLanguage};
use crate::diagnostics::DiagnosticsStore;
use crate::document::Document;
use crate::error::{EngineError, EngineResult};
use crate::quick_fix::QuickFixProvider;
use crate::scanner::{ModuleScanner, ScanSummary};
use crate::symbol::SymbolIndex;
use lsp_types::*;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The include diagnostics engine: symbol index, open documents and their
/// diagnostics, owned together and passed explicitly to whoever drives it.
pub struct IncludeEngine {
    root_uri: Option<Url>,
    language: SourceLanguage,
    settings: EngineSettings,
    bundled_modules: Option<PathBuf>,
    scanner: ModuleScanner,
    analyzer: DocumentAnalyzer,
    quick_fixes: QuickFixProvider,
    /// Replaced wholesale on rebuild, never mutated in place
    index: Arc<SymbolIndex>,
    indexed_roots: Vec<ModuleRoot>,
    documents: HashMap<Url, Document>,
    diagnostics: DiagnosticsStore,
}

/// What changed when new settings were applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsChange {
    pub roots_changed: bool,
    pub enabled_changed: bool,
}

impl IncludeEngine {
    pub fn new(language: SourceLanguage) -> Self {
        Self {
            root_uri: None,
            scanner: ModuleScanner::new(language.clone()),
            analyzer: DocumentAnalyzer,
            quick_fixes: QuickFixProvider::new(language.clone()),
            language,
            settings: EngineSettings::default(),
            bundled_modules: None,
            index: Arc::new(SymbolIndex::new()),
            indexed_roots: Vec::new(),
            documents: HashMap::new(),
            diagnostics: DiagnosticsStore::new(),
        }
    }

    pub fn with_bundled_modules(mut self, path: impl Into<PathBuf>) -> Self {
        self.bundled_modules = Some(path.into());
        self
    }

    pub fn set_root(&mut self, root_uri: Url) {
        info!("Setting workspace root: {}", root_uri);
        self.root_uri = Some(root_uri);
    }

    pub fn handles_language(&self, language_id: &str) -> bool {
        self.language.language_id == language_id
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.enable_intellisense
    }

    /// Store new settings and report what a caller has to redo
    pub fn apply_settings(&mut self, settings: EngineSettings) -> SettingsChange {
        let enabled_changed = settings.enable_intellisense != self.settings.enable_intellisense;
        self.settings = settings;
        let change = SettingsChange {
            roots_changed: self.needs_rebuild(),
            enabled_changed,
        };
        info!(
            "Settings applied: enabled={}, roots_changed={}",
            self.is_enabled(),
            change.roots_changed
        );
        change
    }

    /// Module roots resolved from the current settings, in scan order
    pub fn module_roots(&self) -> Vec<ModuleRoot> {
        self.settings.module_roots(self.bundled_modules.as_deref())
    }

    /// Whether the resolved roots differ from those the index was built from
    pub fn needs_rebuild(&self) -> bool {
        self.module_roots() != self.indexed_roots
    }

    pub fn scanner(&self) -> &ModuleScanner {
        &self.scanner
    }

    /// Shared snapshot of the current index
    pub fn index(&self) -> Arc<SymbolIndex> {
        Arc::clone(&self.index)
    }

    /// Swap in a fully built index.
    ///
    /// `roots` must be the roots the index was scanned from. An index built
    /// from roots that no longer match the current settings is dropped, so a
    /// slow scan finishing late cannot replace a newer one. Returns whether
    /// the index was installed.
    pub fn install_index(&mut self, roots: Vec<ModuleRoot>, index: SymbolIndex) -> bool {
        if roots != self.module_roots() {
            warn!(
                "Discarding symbol index scanned from outdated roots ({} functions)",
                index.len()
            );
            return false;
        }

        info!("Installing symbol index with {} functions", index.len());
        self.index = Arc::new(index);
        self.indexed_roots = roots;
        true
    }

    /// Scan the current roots into a fresh index and swap it in
    pub fn rebuild_index(&mut self) -> ScanSummary {
        let roots = self.module_roots();
        let (index, summary) = self.scanner.scan_with_summary(&roots);
        self.install_index(roots, index);
        summary
    }

    pub fn open_document(&mut self, text_document: TextDocumentItem) -> EngineResult<Vec<Diagnostic>> {
        let uri = text_document.uri.clone();
        if !self.handles_language(&text_document.language_id) {
            return Err(EngineError::UnsupportedLanguage {
                uri,
                language_id: text_document.language_id,
            });
        }

        info!("Opening document: {}", uri);
        self.documents.insert(uri.clone(), Document::new(text_document));
        Ok(self.analyze(&uri))
    }

    pub fn update_document(&mut self, params: DidChangeTextDocumentParams) -> EngineResult<Vec<Diagnostic>> {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        let document = self
            .documents
            .get_mut(&uri)
            .ok_or_else(|| EngineError::DocumentNotOpen(uri.clone()))?;

        if version < document.version() {
            return Err(EngineError::StaleVersion {
                received: version,
                current: document.version(),
                uri,
            });
        }

        document.apply_changes(&params.content_changes, version);
        debug!("Updated document: {} (version {})", uri, version);

        Ok(self.analyze(&uri))
    }

    /// Drop the document and its diagnostics entry. Returns whether it was open.
    pub fn close_document(&mut self, uri: &Url) -> bool {
        info!("Closing document: {}", uri);
        self.diagnostics.remove(uri);
        self.documents.remove(uri).is_some()
    }

    /// Recompute and store diagnostics for one open document
    pub fn analyze(&mut self, uri: &Url) -> Vec<Diagnostic> {
        let diagnostics = match self.documents.get(uri) {
            Some(document) if self.is_enabled() => {
                self.analyzer
                    .check_missing_includes(uri, document.text(), &self.index)
            }
            Some(_) => Vec::new(),
            None => return Vec::new(),
        };

        self.diagnostics.replace(uri.clone(), diagnostics.clone());
        diagnostics
    }

    /// Re-analyze every open document, e.g. after an index swap
    pub fn analyze_all(&mut self) -> Vec<(Url, Vec<Diagnostic>)> {
        let uris: Vec<Url> = self.documents.keys().cloned().collect();
        uris.into_iter()
            .map(|uri| {
                let diagnostics = self.analyze(&uri);
                (uri, diagnostics)
            })
            .collect()
    }

    pub fn diagnostics(&self, uri: &Url) -> Option<&[Diagnostic]> {
        self.diagnostics.get(uri)
    }

    /// Quick fixes for the given diagnostics of an open document
    pub fn code_actions(&self, uri: &Url, diagnostics: &[Diagnostic]) -> Vec<CodeAction> {
        match self.documents.get(uri) {
            Some(document) if self.is_enabled() => {
                self.quick_fixes.get_actions(uri, document.text(), diagnostics)
            }
            _ => Vec::new(),
        }
    }

    pub fn get_document(&self, uri: &Url) -> Option<&Document> {
        self.documents.get(uri)
    }

    /// Check if document is open
    pub fn is_document_open(&self, uri: &Url) -> bool {
        self.documents.contains_key(uri)
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            document_count: self.documents.len(),
            diagnostic_entries: self.diagnostics.len(),
            indexed_functions: self.index.len(),
            module_roots: self.indexed_roots.len(),
            enabled: self.is_enabled(),
            root_uri: self.root_uri.clone(),
        }
    }
}

impl Default for IncludeEngine {
    fn default() -> Self {
        Self::new(SourceLanguage::default())
    }
}

#[derive(Debug, Clone)]
pub struct EngineStats {
    pub document_count: usize,
    pub diagnostic_entries: usize,
    pub indexed_functions: usize,
    pub module_roots: usize,
    pub enabled: bool,
    pub root_uri: Option<Url>,
}
