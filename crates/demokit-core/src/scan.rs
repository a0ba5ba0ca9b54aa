//! Workspace scanning: collect every factory call under a directory.
//!
//! The scan never aborts on a bad file; parse failures become diagnostics
//! and the walk continues, so one broken demo cannot hide the rest.

use std::path::Path;

use glob::Pattern;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::config::DemokitConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::factory::{locate_factory_calls, parse_located_call, ParsedFactoryCall};
use crate::imports::parse_imports;
use crate::span::Span;

/// One variant of a scanned demo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantEntry {
    pub name: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exported_name: Option<String>,
}

/// One factory call found during a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoEntry {
    /// File path relative to the workspace root.
    pub file: String,
    pub function: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub variants: Vec<VariantEntry>,
    pub line: usize,
    pub column: usize,
    pub has_precompute: bool,
    pub skip_precompute: bool,
}

impl DemoEntry {
    fn from_parsed(file: &str, source: &str, call: &ParsedFactoryCall) -> Self {
        let span = Span::from_offsets(source, call.arguments_start, call.arguments_end);
        let mut variants: Vec<VariantEntry> = call
            .variants
            .iter()
            .map(|(name, path)| VariantEntry {
                name: name.clone(),
                path: path.clone(),
                exported_name: call.named_exports.get(name).cloned().flatten(),
            })
            .collect();
        variants.sort_by(|a, b| a.name.cmp(&b.name));

        Self {
            file: file.to_string(),
            function: call.function_name.clone(),
            name: call.name(),
            slug: call.slug(),
            variants,
            line: span.start.line,
            column: span.start.column,
            has_precompute: call.has_precompute(),
            skip_precompute: call.skip_precompute(),
        }
    }
}

/// Result of scanning a workspace.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub entries: Vec<DemoEntry>,
    pub diagnostics: Diagnostics,
    pub files_scanned: usize,
}

/// Walk `workspace` and parse every factory call in files matched by the
/// scan configuration.
pub fn scan_workspace(workspace: &str, config: &DemokitConfig) -> ScanReport {
    let mut report = ScanReport::default();

    let include = compile_patterns(&config.scan.include, &mut report.diagnostics);
    let exclude = compile_patterns(&config.scan.exclude, &mut report.diagnostics);

    let root = Path::new(workspace);
    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = match entry.path().strip_prefix(root) {
            Ok(p) => p.to_string_lossy().replace('\\', "/"),
            Err(_) => continue,
        };
        if !include.iter().any(|p| p.matches(&relative)) {
            continue;
        }
        if exclude.iter().any(|p| p.matches(&relative)) {
            continue;
        }

        let source = match std::fs::read_to_string(entry.path()) {
            Ok(s) => s,
            Err(e) => {
                report.diagnostics.push(
                    Diagnostic::error("E301", format!("Failed to read {relative}: {e}"))
                        .with_file(&relative)
                        .build(),
                );
                continue;
            }
        };
        report.files_scanned += 1;
        scan_file(&source, &relative, config, &mut report);
    }

    report
}

/// Parse the factory calls of one file into the report.
pub fn scan_file(source: &str, file: &str, config: &DemokitConfig, report: &mut ScanReport) {
    let calls = match locate_factory_calls(source, file) {
        Ok(calls) => calls,
        Err(error) => {
            report
                .diagnostics
                .push(Diagnostic::from_factory_error(&error, file, Span::default()));
            return;
        }
    };
    if calls.is_empty() {
        return;
    }

    if calls.len() > 1 {
        let all_allow_multiple = calls
            .iter()
            .all(|c| config.parse_options_for(&c.function_name).allow_multiple_factories);
        if !all_allow_multiple {
            let error = crate::error::FactoryError::MultipleFactoryCalls {
                file: file.to_string(),
                count: calls.len(),
            };
            let span = Span::from_offsets(source, calls[1].arguments_start, calls[1].arguments_end);
            report
                .diagnostics
                .push(Diagnostic::from_factory_error(&error, file, span));
            return;
        }
    }

    let imports = parse_imports(source, file);
    for located in &calls {
        let options = config.parse_options_for(&located.function_name);
        match parse_located_call(source, file, located, &imports, &options) {
            Ok(parsed) => report
                .entries
                .push(DemoEntry::from_parsed(file, source, &parsed)),
            Err(error) => {
                let span =
                    Span::from_offsets(source, located.arguments_start, located.arguments_end);
                report
                    .diagnostics
                    .push(Diagnostic::from_factory_error(&error, file, span));
            }
        }
    }
}

fn compile_patterns(patterns: &[String], diagnostics: &mut Diagnostics) -> Vec<Pattern> {
    let mut compiled = Vec::new();
    for pattern in patterns {
        match Pattern::new(pattern) {
            Ok(p) => compiled.push(p),
            Err(e) => diagnostics.push(
                Diagnostic::error("E302", format!("Invalid glob pattern '{pattern}': {e}")).build(),
            ),
        }
    }
    compiled
}
