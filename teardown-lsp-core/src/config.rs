//! Engine configuration: language constants, editor settings and the
//! resolution of settings into an ordered list of module roots.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings section name used by editors that nest our options
pub const SETTINGS_SECTION: &str = "teardownIntellisense";

/// Subdirectory of the Teardown install that additional include paths are relative to
pub const GAME_DATA_DIR: &str = "data";

/// Lexical constants of the source language the engine analyzes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLanguage {
    /// LSP language id of documents to analyze
    pub language_id: String,
    /// Extension of plain module sources
    pub module_extension: String,
    /// Extension of API definition files, rewritten to `module_extension` in include paths
    pub definition_extension: String,
    /// Prefix of a line comment
    pub comment_prefix: String,
}

impl Default for SourceLanguage {
    fn default() -> Self {
        Self {
            language_id: "lua".to_string(),
            module_extension: ".lua".to_string(),
            definition_extension: ".meta.lua".to_string(),
            comment_prefix: "--".to_string(),
        }
    }
}

impl SourceLanguage {
    /// Whether a file name looks like a module source (plain or definition)
    pub fn is_module_file(&self, file_name: &str) -> bool {
        file_name.ends_with(&self.module_extension) || file_name.ends_with(&self.definition_extension)
    }

    /// Rewrite a definition-file path to the include path a script would use
    pub fn to_include_path(&self, relative: &str) -> String {
        let normalized = relative.replace('\\', "/");
        match normalized.strip_suffix(&self.definition_extension) {
            Some(stem) => format!("{}{}", stem, self.module_extension),
            None => normalized,
        }
    }
}

/// A directory (or single file) scanned for function definitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRoot {
    /// Absolute path to scan
    pub path: PathBuf,
    /// Include paths are computed relative to this directory
    pub base: PathBuf,
    /// Walk all subdirectories instead of direct children only
    pub recursive: bool,
}

impl ModuleRoot {
    pub fn new(path: impl Into<PathBuf>, base: impl Into<PathBuf>, recursive: bool) -> Self {
        Self {
            path: path.into(),
            base: base.into(),
            recursive,
        }
    }

    /// Root whose include paths are relative to itself, walked recursively
    pub fn bundled(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::new(path.clone(), path, true)
    }

    /// Resolve a user-configured include path against the game data directory.
    ///
    /// A trailing `*` marks the path as recursive. The path always lands
    /// inside `data_dir`, even when written with a leading separator.
    pub fn from_setting(data_dir: &Path, raw: &str) -> Self {
        let (trimmed, recursive) = match raw.strip_suffix('*') {
            Some(rest) => (rest, true),
            None => (raw, false),
        };
        let trimmed = trimmed.trim_matches(['/', '\\']);
        let path = if trimmed.is_empty() {
            data_dir.to_path_buf()
        } else {
            data_dir.join(trimmed)
        };
        Self::new(path, data_dir, recursive)
    }
}

/// User-facing settings, as sent in `initializationOptions` or
/// `workspace/didChangeConfiguration`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    /// Master switch for include diagnostics
    #[serde(alias = "enabled")]
    pub enable_intellisense: bool,
    /// Teardown installation directory
    pub teardown_directory: Option<PathBuf>,
    /// Extra module paths, relative to `<teardownDirectory>/data`
    pub additional_include_paths: Vec<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            enable_intellisense: true,
            teardown_directory: None,
            additional_include_paths: Vec::new(),
        }
    }
}

impl EngineSettings {
    /// Parse settings from a JSON payload, either bare or nested under
    /// [`SETTINGS_SECTION`]. `null` yields `None`.
    pub fn from_json(value: &serde_json::Value) -> Result<Option<Self>, serde_json::Error> {
        let section = value.get(SETTINGS_SECTION).unwrap_or(value);
        if section.is_null() {
            return Ok(None);
        }
        serde_json::from_value(section.clone()).map(Some)
    }

    /// Ordered module roots: bundled definitions first, then user paths in
    /// configured order.
    pub fn module_roots(&self, bundled_modules: Option<&Path>) -> Vec<ModuleRoot> {
        let mut roots = Vec::new();

        if let Some(bundled) = bundled_modules {
            roots.push(ModuleRoot::bundled(bundled));
        }

        if let Some(teardown_dir) = &self.teardown_directory {
            let data_dir = teardown_dir.join(GAME_DATA_DIR);
            for raw in &self.additional_include_paths {
                let root = ModuleRoot::from_setting(&data_dir, raw);
                debug!("Resolved include path '{}' to {:?}", raw, root.path);
                roots.push(root);
            }
        } else if !self.additional_include_paths.is_empty() {
            debug!(
                "Ignoring {} additional include paths: teardownDirectory is not set",
                self.additional_include_paths.len()
            );
        }

        roots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_definition_extension_rewritten() {
        let language = SourceLanguage::default();
        assert_eq!(language.to_include_path("weapons/fire.meta.lua"), "weapons/fire.lua");
        assert_eq!(language.to_include_path("weapons\\fire.lua"), "weapons/fire.lua");
        assert!(language.is_module_file("fire.meta.lua"));
        assert!(!language.is_module_file("fire.txt"));
    }

    #[test]
    fn test_roots_keep_precedence() {
        let settings = EngineSettings {
            enable_intellisense: true,
            teardown_directory: Some(PathBuf::from("/games/teardown")),
            additional_include_paths: vec!["script/*".to_string(), "ui".to_string()],
        };

        let roots = settings.module_roots(Some(Path::new("/ext/modules")));

        assert_eq!(roots.len(), 3);
        assert_eq!(roots[0], ModuleRoot::bundled("/ext/modules"));
        assert_eq!(
            roots[1],
            ModuleRoot::new("/games/teardown/data/script", "/games/teardown/data", true)
        );
        assert_eq!(
            roots[2],
            ModuleRoot::new("/games/teardown/data/ui", "/games/teardown/data", false)
        );
    }

    #[test]
    fn test_leading_separator_stays_in_data_dir() {
        let data_dir = Path::new("/games/teardown/data");

        let root = ModuleRoot::from_setting(data_dir, "/script/*");
        assert_eq!(root, ModuleRoot::new("/games/teardown/data/script", data_dir, true));

        let root = ModuleRoot::from_setting(data_dir, "\\ui");
        assert_eq!(root, ModuleRoot::new("/games/teardown/data/ui", data_dir, false));

        let root = ModuleRoot::from_setting(data_dir, "/");
        assert_eq!(root, ModuleRoot::new(data_dir, data_dir, false));
    }

    #[test]
    fn test_additional_paths_need_teardown_directory() {
        let settings = EngineSettings {
            additional_include_paths: vec!["script".to_string()],
            ..Default::default()
        };
        assert!(settings.module_roots(None).is_empty());
    }

    #[test]
    fn test_settings_from_nested_json() {
        let value = json!({
            "teardownIntellisense": {
                "enableIntellisense": false,
                "teardownDirectory": "/games/teardown",
                "additionalIncludePaths": ["script/*"]
            }
        });

        let settings = EngineSettings::from_json(&value).unwrap().unwrap();
        assert!(!settings.enable_intellisense);
        assert_eq!(settings.teardown_directory, Some(PathBuf::from("/games/teardown")));
        assert_eq!(settings.additional_include_paths, vec!["script/*".to_string()]);
    }

    #[test]
    fn test_settings_defaults_fill_missing_fields() {
        let settings = EngineSettings::from_json(&json!({})).unwrap().unwrap();
        assert_eq!(settings, EngineSettings::default());
        assert!(EngineSettings::from_json(&serde_json::Value::Null).unwrap().is_none());
    }
}
