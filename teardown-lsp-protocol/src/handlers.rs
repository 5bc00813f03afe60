use lsp_types::*;
use std::sync::Arc;
use teardown_lsp_core::{EngineSettings, IncludeEngine, ScanSummary};
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tracing::{debug, info, warn};

/// Diagnostics to publish, one entry per open document
pub type PublishBatch = Vec<(Url, Vec<Diagnostic>)>;

/// Request and configuration handlers over a shared engine
pub struct Handlers {
    engine: Arc<RwLock<IncludeEngine>>,
}

impl Handlers {
    pub fn new(engine: Arc<RwLock<IncludeEngine>>) -> Self {
        Self { engine }
    }

    /// textDocument/codeAction: quick fixes for missing-include diagnostics
    pub async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        let uri = &params.text_document.uri;
        let context = &params.context;

        if let Some(only) = &context.only {
            if !only.iter().any(covers_quick_fix) {
                debug!("Code action request for {} excludes quick fixes", uri);
                return Ok(None);
            }
        }

        let engine = self.engine.read().await;
        let actions: Vec<CodeActionOrCommand> = engine
            .code_actions(uri, &context.diagnostics)
            .into_iter()
            .map(CodeActionOrCommand::CodeAction)
            .collect();

        info!("Generated {} code actions for {}", actions.len(), uri);

        if actions.is_empty() {
            Ok(None)
        } else {
            Ok(Some(actions))
        }
    }

    /// Current diagnostics of an open document
    pub async fn diagnostics(&self, uri: &Url) -> Option<Vec<Diagnostic>> {
        let engine = self.engine.read().await;
        engine.diagnostics(uri).map(<[Diagnostic]>::to_vec)
    }

    /// Scan module roots into a new index, swap it in and re-analyze every
    /// open document.
    ///
    /// The scan runs without holding the engine lock, so analyses keep
    /// reading the previous index until the swap.
    pub async fn rebuild_index(&self) -> (ScanSummary, PublishBatch) {
        let (roots, scanner) = {
            let engine = self.engine.read().await;
            (engine.module_roots(), engine.scanner().clone())
        };

        info!("Rebuilding symbol index from {} module roots", roots.len());
        let (index, summary) = scanner.scan_with_summary(&roots);

        let mut engine = self.engine.write().await;
        if !engine.install_index(roots, index) {
            // settings changed mid-scan; the rebuild for the newer roots publishes
            debug!("Dropped index scanned from outdated module roots");
            return (summary, Vec::new());
        }
        let batch = engine.analyze_all();
        (summary, batch)
    }

    /// Apply a settings payload. Rebuilds the index when the module roots
    /// changed and re-analyzes when the enable switch flipped.
    pub async fn apply_settings(&self, value: &serde_json::Value) -> PublishBatch {
        let settings = match EngineSettings::from_json(value) {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                debug!("Ignoring empty settings payload");
                return Vec::new();
            }
            Err(e) => {
                warn!("Ignoring malformed settings: {}", e);
                return Vec::new();
            }
        };

        let change = self.engine.write().await.apply_settings(settings);

        if change.roots_changed {
            let (_, batch) = self.rebuild_index().await;
            batch
        } else if change.enabled_changed {
            self.engine.write().await.analyze_all()
        } else {
            Vec::new()
        }
    }
}

/// Whether a requested kind includes quick fixes. Kinds are dot separated
/// hierarchies, so `quickfix` covers `quickfix.*` but `quick` covers nothing.
fn covers_quick_fix(kind: &CodeActionKind) -> bool {
    let quick_fix_kind = CodeActionKind::QUICKFIX;
    let quick_fix = quick_fix_kind.as_str();
    let kind = kind.as_str();
    quick_fix == kind
        || quick_fix
            .strip_prefix(kind)
            .is_some_and(|rest| rest.starts_with('.'))
}
