use lsp_types::{Diagnostic, Url};
use std::collections::HashMap;
use tracing::debug;

/// Diagnostics of every open document, keyed by document URI.
///
/// An analysis pass replaces a document's entry wholesale; closing a
/// document removes the entry so the store only tracks open documents.
#[derive(Debug, Default)]
pub struct DiagnosticsStore {
    entries: HashMap<Url, Vec<Diagnostic>>,
}

impl DiagnosticsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the diagnostics of `uri`, returning the previous set
    pub fn replace(&mut self, uri: Url, diagnostics: Vec<Diagnostic>) -> Option<Vec<Diagnostic>> {
        debug!("Storing {} diagnostics for {}", diagnostics.len(), uri);
        self.entries.insert(uri, diagnostics)
    }

    pub fn remove(&mut self, uri: &Url) -> Option<Vec<Diagnostic>> {
        self.entries.remove(uri)
    }

    pub fn get(&self, uri: &Url) -> Option<&[Diagnostic]> {
        self.entries.get(uri).map(Vec::as_slice)
    }

    pub fn contains(&self, uri: &Url) -> bool {
        self.entries.contains_key(uri)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsp_types::{DiagnosticSeverity, Position, Range};

    fn warning(line: u32) -> Diagnostic {
        Diagnostic::new(
            Range::new(Position::new(line, 0), Position::new(line, 4)),
            Some(DiagnosticSeverity::WARNING),
            None,
            Some("teardown-lsp".to_string()),
            "test".to_string(),
            None,
            None,
        )
    }

    #[test]
    fn test_replace_does_not_merge() {
        let mut store = DiagnosticsStore::new();
        let uri = Url::parse("file:///mod/main.lua").unwrap();

        store.replace(uri.clone(), vec![warning(0), warning(1)]);
        let previous = store.replace(uri.clone(), vec![warning(5)]);

        assert_eq!(previous.map(|d| d.len()), Some(2));
        let current = store.get(&uri).unwrap();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].range.start.line, 5);
    }

    #[test]
    fn test_remove_deletes_entry() {
        let mut store = DiagnosticsStore::new();
        let uri = Url::parse("file:///mod/main.lua").unwrap();

        store.replace(uri.clone(), vec![]);
        assert!(store.contains(&uri));

        store.remove(&uri);
        assert!(!store.contains(&uri));
        assert!(store.is_empty());
    }

    #[test]
    fn test_one_entry_per_document() {
        let mut store = DiagnosticsStore::new();
        store.replace(Url::parse("file:///a.lua").unwrap(), vec![warning(0)]);
        store.replace(Url::parse("file:///b.lua").unwrap(), vec![warning(0), warning(1)]);
        store.replace(Url::parse("file:///a.lua").unwrap(), vec![]);
        assert_eq!(store.len(), 2);
    }
}
