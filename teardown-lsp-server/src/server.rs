use lsp_types::*;
use std::path::PathBuf;
use std::sync::Arc;
use teardown_lsp_core::{EngineSettings, IncludeEngine, SourceLanguage};
use teardown_lsp_protocol::handlers::{Handlers, PublishBatch};
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::{Client, LanguageServer};
use tracing::{debug, error, info, warn};

/// Process-level options fixed at startup
#[derive(Debug, Clone, Default)]
pub struct ServerOptions {
    /// Directory of bundled API definition modules
    pub bundled_modules: Option<PathBuf>,
    pub language: SourceLanguage,
}

impl ServerOptions {
    pub fn build_engine(self) -> IncludeEngine {
        let engine = IncludeEngine::new(self.language);
        match self.bundled_modules {
            Some(path) => {
                info!("Using bundled modules from {:?}", path);
                engine.with_bundled_modules(path)
            }
            None => {
                warn!("No bundled modules directory configured");
                engine
            }
        }
    }
}

pub struct TeardownLanguageServer {
    client: Client,
    engine: Arc<RwLock<IncludeEngine>>,
}

impl TeardownLanguageServer {
    pub fn new(client: Client) -> Self {
        Self::with_options(client, ServerOptions::default())
    }

    pub fn with_options(client: Client, options: ServerOptions) -> Self {
        info!("Initializing language server");
        Self {
            client,
            engine: Arc::new(RwLock::new(options.build_engine())),
        }
    }

    /// Shared engine, for inspection in tests
    pub fn engine(&self) -> Arc<RwLock<IncludeEngine>> {
        Arc::clone(&self.engine)
    }

    fn handlers(&self) -> Handlers {
        Handlers::new(self.engine.clone())
    }

    async fn publish(&self, batch: PublishBatch) {
        for (uri, diagnostics) in batch {
            self.client.publish_diagnostics(uri, diagnostics, None).await;
        }
    }

    async fn report_error(&self, message: String) {
        error!("{}", message);
        self.client.log_message(MessageType::ERROR, message).await;
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for TeardownLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("Initialize request received");

        let mut engine = self.engine.write().await;

        if let Some(root_uri) = params.root_uri {
            engine.set_root(root_uri);
        }

        if let Some(options) = &params.initialization_options {
            match EngineSettings::from_json(options) {
                Ok(Some(settings)) => {
                    engine.apply_settings(settings);
                }
                Ok(None) => debug!("No settings in initializationOptions"),
                Err(e) => warn!("Ignoring malformed initializationOptions: {}", e),
            }
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::INCREMENTAL,
                )),
                code_action_provider: Some(CodeActionProviderCapability::Options(
                    CodeActionOptions {
                        code_action_kinds: Some(vec![CodeActionKind::QUICKFIX]),
                        resolve_provider: Some(false),
                        ..Default::default()
                    },
                )),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "teardown-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        info!("Server initialized");

        let (summary, batch) = self.handlers().rebuild_index().await;
        self.publish(batch).await;

        self.client
            .log_message(
                MessageType::INFO,
                format!(
                    "Indexed {} module files from {} roots",
                    summary.files_scanned, summary.roots_scanned
                ),
            )
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Shutdown request received");
        Ok(())
    }

    // Document synchronization
    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri.clone();
        let mut engine = self.engine.write().await;

        if !engine.handles_language(&params.text_document.language_id) {
            debug!(
                "Ignoring {} document: {}",
                params.text_document.language_id, uri
            );
            return;
        }

        match engine.open_document(params.text_document) {
            Ok(diagnostics) => {
                let stats = engine.stats();
                drop(engine);
                info!(
                    "Document opened: {} ({} diagnostics, {} documents open)",
                    uri,
                    diagnostics.len(),
                    stats.document_count
                );
                self.client.publish_diagnostics(uri, diagnostics, None).await;
            }
            Err(e) => {
                drop(engine);
                self.report_error(format!("Failed to open document: {}", e)).await;
            }
        }
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri.clone();
        let version = params.text_document.version;
        let mut engine = self.engine.write().await;

        if !engine.is_document_open(&uri) {
            debug!("Ignoring change to untracked document: {}", uri);
            return;
        }

        let result = engine.update_document(params);
        drop(engine);

        match result {
            Ok(diagnostics) => {
                debug!(
                    "Document changed: {} (version {}, {} diagnostics)",
                    uri,
                    version,
                    diagnostics.len()
                );
                self.client.publish_diagnostics(uri, diagnostics, None).await;
            }
            Err(e) => {
                self.report_error(format!("Failed to apply document changes: {}", e))
                    .await;
            }
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        let was_open = self.engine.write().await.close_document(&uri);

        if was_open {
            info!("Document closed: {}", uri);
            // Clear diagnostics on the client side
            self.client.publish_diagnostics(uri, Vec::new(), None).await;
        }
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        info!("Configuration changed");
        let batch = self.handlers().apply_settings(&params.settings).await;
        self.publish(batch).await;
    }

    // Language features
    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        self.handlers().code_action(params).await
    }
}
