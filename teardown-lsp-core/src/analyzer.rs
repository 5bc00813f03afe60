use crate::symbol::SymbolIndex;
use lsp_types::{
    CodeDescription, Diagnostic, DiagnosticRelatedInformation, DiagnosticSeverity, Location,
    NumberOrString, Position, Range, Url,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

/// Structured code carried by every missing-include diagnostic
pub const MISSING_INCLUDE_CODE: &str = "missing-include";

/// `source` field of published diagnostics
pub const DIAGNOSTIC_SOURCE: &str = "teardown-lsp";

static MODDING_DOCS: LazyLock<Url> =
    LazyLock::new(|| Url::parse("https://teardowngame.com/modding").expect("modding docs url"));

static INCLUDE_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"#include\s+"([^"]+)""#).expect("include directive pattern"));

static CALL_SITE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z0-9_]+)\s*\(").expect("call site pattern"));

/// A declared `#include "path"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeDirective {
    pub path: String,
    pub line: u32,
}

/// An identifier followed by `(`, with the identifier's range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub name: String,
    pub range: Range,
}

/// Fix data attached to a missing-include diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingIncludeData {
    pub required_include: String,
    pub function_name: String,
}

impl MissingIncludeData {
    /// Decode the data of a diagnostic carrying our missing-include code
    pub fn from_diagnostic(diagnostic: &Diagnostic) -> Option<Self> {
        if !is_missing_include(diagnostic) {
            return None;
        }
        let data = diagnostic.data.as_ref()?;
        serde_json::from_value(data.clone()).ok()
    }
}

pub fn is_missing_include(diagnostic: &Diagnostic) -> bool {
    matches!(&diagnostic.code, Some(NumberOrString::String(code)) if code == MISSING_INCLUDE_CODE)
}

/// Lexical analysis of a single document against the symbol index
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentAnalyzer;

impl DocumentAnalyzer {
    /// All include directives in the text, in order of appearance. The
    /// directive may span lines; its line is where `#include` starts.
    pub fn extract_includes(&self, text: &str) -> Vec<IncludeDirective> {
        INCLUDE_DIRECTIVE
            .captures_iter(text)
            .filter_map(|captures| {
                let directive = captures.get(0)?;
                let path = captures.get(1)?;
                let line = text[..directive.start()].matches('\n').count() as u32;
                Some(IncludeDirective {
                    path: path.as_str().to_string(),
                    line,
                })
            })
            .collect()
    }

    /// Every identifier immediately followed by `(` on each line.
    ///
    /// Definition sites match as well as calls.
    pub fn extract_call_sites(&self, text: &str) -> Vec<CallSite> {
        let mut calls = Vec::new();

        for (line_index, line) in text.split('\n').enumerate() {
            for captures in CALL_SITE.captures_iter(line) {
                let Some(name) = captures.get(1) else {
                    continue;
                };
                let start = utf16_len(&line[..name.start()]);
                let end = start + utf16_len(name.as_str());
                calls.push(CallSite {
                    name: name.as_str().to_string(),
                    range: Range::new(
                        Position::new(line_index as u32, start),
                        Position::new(line_index as u32, end),
                    ),
                });
            }
        }

        calls
    }

    /// One diagnostic per call site whose defining include is not declared.
    /// Repeated calls each get their own diagnostic.
    pub fn check_missing_includes(&self, uri: &Url, text: &str, index: &SymbolIndex) -> Vec<Diagnostic> {
        let includes = self.extract_includes(text);
        let declared: Vec<&str> = includes.iter().map(|include| include.path.as_str()).collect();

        let diagnostics: Vec<Diagnostic> = self
            .extract_call_sites(text)
            .into_iter()
            .filter_map(|call| {
                let required = index.get(&call.name)?;
                if declared.contains(&required) {
                    return None;
                }
                Some(missing_include_diagnostic(uri, &call, required))
            })
            .collect();

        debug!(
            "{}: {} includes declared, {} missing-include diagnostics",
            uri,
            includes.len(),
            diagnostics.len()
        );

        diagnostics
    }
}

fn missing_include_diagnostic(uri: &Url, call: &CallSite, required_include: &str) -> Diagnostic {
    let data = MissingIncludeData {
        required_include: required_include.to_string(),
        function_name: call.name.clone(),
    };

    Diagnostic {
        range: call.range,
        severity: Some(DiagnosticSeverity::WARNING),
        code: Some(NumberOrString::String(MISSING_INCLUDE_CODE.to_string())),
        code_description: Some(CodeDescription {
            href: MODDING_DOCS.clone(),
        }),
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message: format!(
            "Function '{}' requires #include \"{}\"",
            call.name, required_include
        ),
        related_information: Some(vec![DiagnosticRelatedInformation {
            location: Location::new(uri.clone(), call.range),
            message: format!("Add #include \"{}\"", required_include),
        }]),
        tags: None,
        data: serde_json::to_value(&data).ok(),
    }
}

/// Length in UTF-16 code units, the unit of LSP character offsets
fn utf16_len(text: &str) -> u32 {
    text.encode_utf16().count() as u32
}
