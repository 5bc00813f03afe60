use lsp_types::*;
use proptest::prelude::*;
use teardown_lsp_core::header::header_end_line;
use teardown_lsp_core::{DocumentAnalyzer, QuickFixProvider, SourceLanguage, SymbolIndex};

fn uri() -> Url {
    Url::parse("file:///mod/main.lua").unwrap()
}

fn include_path() -> impl Strategy<Value = String> {
    "[a-z]{1,8}(/[a-z]{1,8}){0,2}\\.lua"
}

fn function_name() -> impl Strategy<Value = String> {
    "[A-Z][A-Za-z0-9_]{0,10}"
}

proptest! {
    /// The insertion point sits right after the header block, whatever follows
    #[test]
    fn insertion_point_follows_header(
        has_version in any::<bool>(),
        includes in prop::collection::vec(include_path(), 0..5),
        body in prop::collection::vec(function_name(), 1..5),
    ) {
        let mut text = String::new();
        if has_version {
            text.push_str("#version 2\n");
        }
        for include in &includes {
            text.push_str(&format!("#include \"{}\"\n", include));
        }
        for name in &body {
            text.push_str(&format!("{}()\n", name));
        }

        let expected = includes.len() as u32 + u32::from(has_version);
        prop_assert_eq!(header_end_line(&text, &SourceLanguage::default()), expected);
    }

    /// Re-running analysis on unchanged text gives the same diagnostics
    #[test]
    fn analysis_is_idempotent(
        names in prop::collection::vec(function_name(), 1..8),
        indexed in prop::collection::vec((function_name(), include_path()), 0..8),
    ) {
        let mut index = SymbolIndex::new();
        for (name, path) in &indexed {
            index.set(name.clone(), path.clone());
        }
        let text: String = names.iter().map(|name| format!("{}(x)\n", name)).collect();
        let analyzer = DocumentAnalyzer::default();

        let first = analyzer.check_missing_includes(&uri(), &text, &index);
        let second = analyzer.check_missing_includes(&uri(), &text, &index);
        prop_assert_eq!(first, second);
    }

    /// Applying a quick fix removes every diagnostic for that include
    #[test]
    fn quick_fix_resolves_its_include(
        name in function_name(),
        path in include_path(),
        preamble in prop::collection::vec(include_path(), 0..3),
    ) {
        let mut index = SymbolIndex::new();
        index.set(name.clone(), path.clone());

        let mut text: String = preamble
            .iter()
            .filter(|p| **p != path)
            .map(|p| format!("#include \"{}\"\n", p))
            .collect();
        text.push_str(&format!("{}()\n", name));

        let analyzer = DocumentAnalyzer::default();
        let diagnostics = analyzer.check_missing_includes(&uri(), &text, &index);
        prop_assert_eq!(diagnostics.len(), 1);

        let edit = QuickFixProvider::default().include_text_edit(&text, &path);
        let mut lines: Vec<&str> = text.split_inclusive('\n').collect();
        lines.insert(edit.range.start.line as usize, &edit.new_text);
        let fixed = lines.concat();

        prop_assert!(analyzer.check_missing_includes(&uri(), &fixed, &index).is_empty());
    }
}
