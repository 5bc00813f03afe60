use crate::analyzer::MissingIncludeData;
use crate::config::SourceLanguage;
use crate::header::include_insert_position;
use lsp_types::{CodeAction, CodeActionKind, Diagnostic, Range, TextEdit, Url, WorkspaceEdit};
use std::collections::HashMap;
use tracing::debug;

/// Builds `#include` insertions for missing-include diagnostics
#[derive(Debug, Clone, Default)]
pub struct QuickFixProvider {
    language: SourceLanguage,
}

impl QuickFixProvider {
    pub fn new(language: SourceLanguage) -> Self {
        Self { language }
    }

    /// One quick fix per missing-include diagnostic in scope. Two diagnostics
    /// for the same include yield two identical insertions.
    pub fn get_actions(&self, uri: &Url, text: &str, diagnostics: &[Diagnostic]) -> Vec<CodeAction> {
        let actions: Vec<CodeAction> = diagnostics
            .iter()
            .filter_map(|diagnostic| {
                let data = MissingIncludeData::from_diagnostic(diagnostic)?;
                Some(self.missing_include_action(uri, text, diagnostic, &data))
            })
            .collect();

        debug!(
            "{} quick fixes for {} diagnostics in {}",
            actions.len(),
            diagnostics.len(),
            uri
        );
        actions
    }

    fn missing_include_action(
        &self,
        uri: &Url,
        text: &str,
        diagnostic: &Diagnostic,
        data: &MissingIncludeData,
    ) -> CodeAction {
        CodeAction {
            title: format!("Add #include \"{}\"", data.required_include),
            kind: Some(CodeActionKind::QUICKFIX),
            diagnostics: Some(vec![diagnostic.clone()]),
            edit: Some(self.include_edit(uri, text, &data.required_include)),
            command: None,
            is_preferred: Some(true),
            disabled: None,
            data: None,
        }
    }

    /// The single insertion that declares `include_path`
    pub fn include_text_edit(&self, text: &str, include_path: &str) -> TextEdit {
        let position = include_insert_position(text, &self.language);
        TextEdit {
            range: Range::new(position, position),
            new_text: format!("#include \"{}\"\n", include_path),
        }
    }

    pub fn include_edit(&self, uri: &Url, text: &str, include_path: &str) -> WorkspaceEdit {
        let mut changes = HashMap::new();
        changes.insert(uri.clone(), vec![self.include_text_edit(text, include_path)]);

        WorkspaceEdit {
            changes: Some(changes),
            document_changes: None,
            change_annotations: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{DocumentAnalyzer, MISSING_INCLUDE_CODE};
    use crate::symbol::SymbolIndex;
    use lsp_types::{DiagnosticSeverity, NumberOrString, Position};

    fn uri() -> Url {
        Url::parse("file:///mod/main.lua").unwrap()
    }

    fn index() -> SymbolIndex {
        let mut index = SymbolIndex::new();
        index.set("Ignite", "weapons/fire.lua");
        index.set("Spawn", "spawn.lua");
        index
    }

    /// Apply a zero-width insertion at a line start
    fn apply(text: &str, edit: &TextEdit) -> String {
        let line = edit.range.start.line as usize;
        let mut lines: Vec<&str> = text.split_inclusive('\n').collect();
        let insert_at = line.min(lines.len());
        lines.insert(insert_at, &edit.new_text);
        lines.concat()
    }

    fn only_edit(action: &CodeAction) -> &TextEdit {
        let changes = action.edit.as_ref().unwrap().changes.as_ref().unwrap();
        &changes[&uri()][0]
    }

    #[test]
    fn test_fix_inserts_at_top() {
        let analyzer = DocumentAnalyzer::default();
        let provider = QuickFixProvider::default();
        let text = "Ignite()\n";

        let diagnostics = analyzer.check_missing_includes(&uri(), text, &index());
        let actions = provider.get_actions(&uri(), text, &diagnostics);

        assert_eq!(actions.len(), 1);
        let action = &actions[0];
        assert_eq!(action.title, "Add #include \"weapons/fire.lua\"");
        assert_eq!(action.kind, Some(CodeActionKind::QUICKFIX));
        assert_eq!(action.is_preferred, Some(true));
        assert_eq!(action.diagnostics.as_ref().unwrap()[0], diagnostics[0]);

        let edit = only_edit(action);
        assert_eq!(edit.range.start, Position::new(0, 0));
        assert_eq!(edit.range.end, Position::new(0, 0));
        assert_eq!(edit.new_text, "#include \"weapons/fire.lua\"\n");
    }

    #[test]
    fn test_fix_after_header_block() {
        let provider = QuickFixProvider::default();
        let text = "#version 2\n#include \"a.lua\"\n#include \"b.lua\"\nSpawn()\nIgnite()\n";
        let analyzer = DocumentAnalyzer::default();

        let diagnostics = analyzer.check_missing_includes(&uri(), text, &index());
        let actions = provider.get_actions(&uri(), text, &diagnostics);

        assert_eq!(actions.len(), 2);
        for action in &actions {
            assert_eq!(only_edit(action).range.start, Position::new(3, 0));
        }
    }

    #[test]
    fn test_round_trip_clears_diagnostic() {
        let analyzer = DocumentAnalyzer::default();
        let provider = QuickFixProvider::default();
        let text = "#version 2\n-- main script\nfunction tick()\n  Ignite()\nend\n";

        let diagnostics = analyzer.check_missing_includes(&uri(), text, &index());
        assert_eq!(diagnostics.len(), 1);
        let actions = provider.get_actions(&uri(), text, &diagnostics);

        let fixed = apply(text, only_edit(&actions[0]));
        assert_eq!(
            fixed,
            "#version 2\n#include \"weapons/fire.lua\"\n-- main script\nfunction tick()\n  Ignite()\nend\n"
        );
        assert!(analyzer.check_missing_includes(&uri(), &fixed, &index()).is_empty());
    }

    #[test]
    fn test_duplicate_diagnostics_duplicate_fixes() {
        let analyzer = DocumentAnalyzer::default();
        let provider = QuickFixProvider::default();
        let text = "Ignite()\nIgnite()\n";

        let diagnostics = analyzer.check_missing_includes(&uri(), text, &index());
        let actions = provider.get_actions(&uri(), text, &diagnostics);

        assert_eq!(actions.len(), 2);
        assert_eq!(only_edit(&actions[0]), only_edit(&actions[1]));
    }

    #[test]
    fn test_foreign_diagnostics_ignored() {
        let provider = QuickFixProvider::default();
        let range = Range::new(Position::new(0, 0), Position::new(0, 6));

        let foreign = Diagnostic::new(
            range,
            Some(DiagnosticSeverity::ERROR),
            Some(NumberOrString::String("undefined-global".to_string())),
            Some("lua-ls".to_string()),
            "undefined global".to_string(),
            None,
            None,
        );
        let missing_data = Diagnostic::new(
            range,
            Some(DiagnosticSeverity::WARNING),
            Some(NumberOrString::String(MISSING_INCLUDE_CODE.to_string())),
            None,
            "no data".to_string(),
            None,
            None,
        );

        assert!(provider
            .get_actions(&uri(), "Ignite()\n", &[foreign, missing_data])
            .is_empty());
    }
}
