pub mod analyzer;
pub mod config;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod header;
pub mod quick_fix;
pub mod scanner;
pub mod symbol;
pub mod workspace;

pub use analyzer::{CallSite, DocumentAnalyzer, IncludeDirective, MissingIncludeData};
pub use config::{EngineSettings, ModuleRoot, SourceLanguage};
pub use diagnostics::DiagnosticsStore;
pub use document::Document;
pub use error::{EngineError, EngineResult};
pub use quick_fix::QuickFixProvider;
pub use scanner::{ModuleScanner, ScanSummary};
pub use symbol::{FunctionSymbol, SymbolIndex};
pub use workspace::{EngineStats, IncludeEngine, SettingsChange};
