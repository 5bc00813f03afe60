use crate::config::{ModuleRoot, SourceLanguage};
use crate::symbol::{FunctionSymbol, SymbolIndex};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// `function Name(` at the start of a line
static FUNCTION_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^function\s+([A-Za-z0-9_]+)\s*\(").expect("function declaration pattern")
});

/// `Name = function(` at the start of a line
static FUNCTION_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^([A-Za-z0-9_]+)\s*=\s*function\s*\(").expect("function assignment pattern")
});

/// Counters describing one scan pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub roots_scanned: usize,
    pub roots_missing: usize,
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub symbols_found: usize,
}

/// Walks module roots and extracts function definitions into a fresh index
#[derive(Debug, Clone, Default)]
pub struct ModuleScanner {
    language: SourceLanguage,
}

impl ModuleScanner {
    pub fn new(language: SourceLanguage) -> Self {
        Self { language }
    }

    /// Scan roots in order and build a new index. Later definitions of the
    /// same name overwrite earlier ones.
    pub fn scan(&self, roots: &[ModuleRoot]) -> SymbolIndex {
        self.scan_with_summary(roots).0
    }

    pub fn scan_with_summary(&self, roots: &[ModuleRoot]) -> (SymbolIndex, ScanSummary) {
        let mut index = SymbolIndex::new();
        let mut summary = ScanSummary::default();

        for root in roots {
            self.scan_root(root, &mut index, &mut summary);
        }

        info!(
            "Scanned {} module roots ({} missing): {} files, {} skipped, {} symbols indexed as {} names",
            summary.roots_scanned,
            summary.roots_missing,
            summary.files_scanned,
            summary.files_skipped,
            summary.symbols_found,
            index.len()
        );

        (index, summary)
    }

    fn scan_root(&self, root: &ModuleRoot, index: &mut SymbolIndex, summary: &mut ScanSummary) {
        if !root.path.exists() {
            debug!("Skipping missing module root {:?}", root.path);
            summary.roots_missing += 1;
            return;
        }
        summary.roots_scanned += 1;

        if root.path.is_file() {
            let is_module = root
                .path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| self.language.is_module_file(name));
            if is_module {
                self.scan_file(&root.path, &root.base, index, summary);
            }
            return;
        }

        let max_depth = if root.recursive { usize::MAX } else { 1 };
        let walker = WalkDir::new(&root.path)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {:?}: {}", root.path, e);
                    summary.files_skipped += 1;
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            let is_module = entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.language.is_module_file(name));
            if is_module {
                self.scan_file(entry.path(), &root.base, index, summary);
            }
        }
    }

    fn scan_file(&self, path: &Path, base: &Path, index: &mut SymbolIndex, summary: &mut ScanSummary) {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read module file {:?}: {}", path, e);
                summary.files_skipped += 1;
                return;
            }
        };
        summary.files_scanned += 1;

        let include_path = self.include_path_for(path, base);
        let names = extract_function_names(&content);
        debug!("{} defines {} functions", include_path, names.len());

        summary.symbols_found += names.len();
        for name in names {
            index.insert(FunctionSymbol::new(name, include_path.clone()));
        }
    }

    /// Include path of `path` as written in an `#include` directive
    pub fn include_path_for(&self, path: &Path, base: &Path) -> String {
        let relative = pathdiff::diff_paths(path, base)
            .or_else(|| path.file_name().map(Into::into))
            .unwrap_or_else(|| path.to_path_buf());
        self.language.to_include_path(&relative.to_string_lossy())
    }
}

/// Function names defined at the start of a line, declarations first and
/// assignments second.
pub fn extract_function_names(content: &str) -> Vec<String> {
    let declarations = FUNCTION_DECLARATION.captures_iter(content);
    let assignments = FUNCTION_ASSIGNMENT.captures_iter(content);

    declarations
        .chain(assignments)
        .filter_map(|captures| captures.get(1))
        .map(|name| name.as_str().to_string())
        .collect()
}
