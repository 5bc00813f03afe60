use crate::server::ServerOptions;
use clap::Parser;
use std::path::PathBuf;
use teardown_lsp_core::SourceLanguage;

/// Directory searched next to the executable when `--modules-dir` is not given
const DEFAULT_MODULES_DIR: &str = "api-definitions/modules";

#[derive(Debug, Parser)]
#[command(name = "teardown-lsp", version, about = "Include diagnostics for Teardown Lua mods")]
pub struct Args {
    /// Directory of bundled API definition modules
    #[arg(long, env = "TEARDOWN_LSP_MODULES_DIR")]
    pub modules_dir: Option<PathBuf>,

    /// Write logs to a daily rotated file in this directory instead of stderr
    #[arg(long, env = "TEARDOWN_LSP_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Language id of documents to analyze
    #[arg(long, default_value = "lua")]
    pub language_id: String,

    /// Use stdio transport (the only transport; accepted for client compatibility)
    #[arg(long)]
    pub stdio: bool,
}

impl Args {
    pub fn server_options(&self) -> ServerOptions {
        let bundled_modules = self.modules_dir.clone().or_else(default_modules_dir);

        ServerOptions {
            bundled_modules,
            language: SourceLanguage {
                language_id: self.language_id.clone(),
                ..SourceLanguage::default()
            },
        }
    }
}

fn default_modules_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let candidate = exe.parent()?.join(DEFAULT_MODULES_DIR);
    candidate.is_dir().then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arguments() {
        let args = Args::try_parse_from([
            "teardown-lsp",
            "--modules-dir",
            "/opt/teardown-lsp/modules",
            "--language-id",
            "teardown-lua",
            "--stdio",
        ])
        .unwrap();

        let options = args.server_options();
        assert_eq!(options.bundled_modules, Some(PathBuf::from("/opt/teardown-lsp/modules")));
        assert_eq!(options.language.language_id, "teardown-lua");
        assert_eq!(options.language.comment_prefix, "--");
    }

    #[test]
    fn test_default_language() {
        let args = Args::try_parse_from(["teardown-lsp"]).unwrap();
        assert_eq!(args.language_id, "lua");
        assert!(!args.stdio);
    }
}
