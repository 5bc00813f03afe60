use lsp_types::Url;

/// Errors raised by document lifecycle operations on the engine
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Document is not open: {0}")]
    DocumentNotOpen(Url),

    #[error("Stale change for {uri}: version {received} is older than {current}")]
    StaleVersion {
        uri: Url,
        received: i32,
        current: i32,
    },

    #[error("Unsupported language '{language_id}' for {uri}")]
    UnsupportedLanguage { uri: Url, language_id: String },
}

pub type EngineResult<T> = Result<T, EngineError>;
