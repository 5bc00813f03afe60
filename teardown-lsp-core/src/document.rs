use lsp_textdocument::FullTextDocument;
use lsp_types::*;

/// An open source document tracked by the engine
pub struct Document {
    text_document: FullTextDocument,
    uri: Url,
}

impl Document {
    pub fn new(text_document_item: TextDocumentItem) -> Self {
        let uri = text_document_item.uri.clone();
        let text_document = FullTextDocument::new(
            text_document_item.language_id,
            text_document_item.version,
            text_document_item.text,
        );

        Self { text_document, uri }
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn version(&self) -> i32 {
        self.text_document.version()
    }

    pub fn text(&self) -> &str {
        self.text_document.get_content(None)
    }

    /// Get the language ID of the document
    pub fn language_id(&self) -> &str {
        self.text_document.language_id()
    }

    /// Apply full or incremental content changes in order
    pub fn apply_changes(&mut self, changes: &[TextDocumentContentChangeEvent], version: i32) {
        self.text_document.update(changes, version);
    }

    /// Get the size in bytes of the document
    pub fn size(&self) -> usize {
        self.text().len()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("uri", &self.uri)
            .field("version", &self.version())
            .field("size", &self.size())
            .finish()
    }
}
