//! Demokit CLI
//!
//! Command-line interface for parsing, checking, and rewriting demo
//! factory calls.

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use demokit_core::catalog::DemoCatalog;
use demokit_core::config::DemokitConfig;
use demokit_core::diagnostics::{Diagnostic, DiagnosticSeverity, DiagnosticsOutput};
use demokit_core::factory::parse_factory_calls_with_config;
use demokit_core::rewrite::{replace_precompute_value, PrecomputeFormat};
use demokit_core::scan::scan_workspace;

#[derive(Parser)]
#[command(name = "demokit")]
#[command(author, version, about = "Parse, check, and rewrite demo factory calls in TypeScript sources", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a file and print its factory calls as JSON (for debugging)
    Parse {
        /// Path to the .ts/.tsx file
        file: String,
    },

    /// Scan a workspace and report factory-call problems
    Check {
        /// Workspace directory (defaults to current directory)
        #[arg(short, long)]
        workspace: Option<String>,

        /// Output format (human, json)
        #[arg(short, long, default_value = "human")]
        format: String,
    },

    /// Inject a precompute payload into a file's factory call
    Inject {
        /// Path to the .ts/.tsx file
        file: String,

        /// Path to a JSON file holding the payload
        #[arg(short, long)]
        data: String,

        /// Splice the payload in verbatim instead of as pretty JSON
        #[arg(long)]
        raw: bool,

        /// Write the rewritten source back to the file instead of stdout
        #[arg(short = 'i', long)]
        in_place: bool,
    },

    /// Generate a catalog of every demo in a workspace
    Catalog {
        /// Workspace directory (defaults to current directory)
        #[arg(short, long)]
        workspace: Option<String>,

        /// Output format (markdown, json)
        #[arg(short, long, default_value = "markdown")]
        format: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { file } => cmd_parse(&file),
        Commands::Check { workspace, format } => cmd_check(workspace.as_deref(), &format),
        Commands::Inject {
            file,
            data,
            raw,
            in_place,
        } => cmd_inject(&file, &data, raw, in_place),
        Commands::Catalog {
            workspace,
            format,
            output,
        } => cmd_catalog(workspace.as_deref(), &format, output.as_deref()),
    }
}

fn load_config(workspace: &str) -> Result<DemokitConfig, ExitCode> {
    DemokitConfig::load_workspace(workspace).map_err(|e| {
        eprintln!("{} {}", "error:".red().bold(), e);
        ExitCode::from(2)
    })
}

/// Config for a single target file: walk up from the file's directory so a
/// workspace-root `demokit.toml` applies to files in subdirectories.
fn discover_config(file: &str) -> Result<DemokitConfig, ExitCode> {
    let start = Path::new(file).parent().unwrap_or_else(|| Path::new("."));
    DemokitConfig::discover(start).map_err(|e| {
        eprintln!("{} {}", "error:".red().bold(), e);
        ExitCode::from(2)
    })
}

fn cmd_parse(file: &str) -> ExitCode {
    let source = match fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!(
                "{} Failed to read file '{}': {}",
                "error:".red().bold(),
                file,
                e
            );
            return ExitCode::from(2);
        }
    };

    let config = match discover_config(file) {
        Ok(c) => c,
        Err(code) => return code,
    };

    match parse_factory_calls_with_config(&source, file, &config) {
        Ok(calls) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&calls).unwrap_or_default()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!(
                "{}{}: {}",
                "error".red().bold(),
                format!("[{}]", e.code()).dimmed(),
                e
            );
            ExitCode::from(1)
        }
    }
}

fn cmd_check(workspace: Option<&str>, format: &str) -> ExitCode {
    let workspace_dir = workspace.unwrap_or(".");
    let config = match load_config(workspace_dir) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let report = scan_workspace(workspace_dir, &config);

    match format {
        "json" => {
            let output = DiagnosticsOutput::from_diagnostics(&report.diagnostics);
            println!(
                "{}",
                serde_json::to_string_pretty(&output).unwrap_or_default()
            );
        }
        _ => {
            for diag in report.diagnostics.iter() {
                print_diagnostic(diag);
            }

            if report.diagnostics.has_errors() {
                let error_count = report.diagnostics.errors().count();
                eprintln!(
                    "{}: found {} error{} in {} file{}",
                    "error".red().bold(),
                    error_count,
                    if error_count == 1 { "" } else { "s" },
                    report.files_scanned,
                    if report.files_scanned == 1 { "" } else { "s" }
                );
            } else {
                println!(
                    "{} {} demo{} in {} file{}, no errors",
                    "Finished".green().bold(),
                    report.entries.len(),
                    if report.entries.len() == 1 { "" } else { "s" },
                    report.files_scanned,
                    if report.files_scanned == 1 { "" } else { "s" }
                );
            }
        }
    }

    if report.diagnostics.has_errors() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

fn print_diagnostic(diag: &Diagnostic) {
    let severity_str = match diag.severity {
        DiagnosticSeverity::Error => "error".red().bold(),
        DiagnosticSeverity::Warning => "warning".yellow().bold(),
        DiagnosticSeverity::Info => "info".blue().bold(),
    };

    println!(
        "{}{} {} {}",
        severity_str,
        format!("[{}]", diag.code).dimmed(),
        ":".bold(),
        diag.message
    );
    println!(
        "  {} {}:{}:{}",
        "-->".blue().bold(),
        diag.file,
        diag.span.start.line,
        diag.span.start.column
    );
    if let Some(ref help) = diag.help {
        println!("   {} {}: {}", "=".blue().bold(), "help".bold(), help);
    }
    println!();
}

fn cmd_inject(file: &str, data_file: &str, raw: bool, in_place: bool) -> ExitCode {
    let source = match fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!(
                "{} Failed to read file '{}': {}",
                "error:".red().bold(),
                file,
                e
            );
            return ExitCode::from(2);
        }
    };

    let data_content = match fs::read_to_string(data_file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!(
                "{} Failed to read data file '{}': {}",
                "error:".red().bold(),
                data_file,
                e
            );
            return ExitCode::from(2);
        }
    };

    let (data, format) = if raw {
        (
            serde_json::Value::String(data_content.trim_end().to_string()),
            PrecomputeFormat::PassAsIs,
        )
    } else {
        match serde_json::from_str(&data_content) {
            Ok(value) => (value, PrecomputeFormat::Json),
            Err(e) => {
                eprintln!(
                    "{} Invalid JSON in '{}': {}",
                    "error:".red().bold(),
                    data_file,
                    e
                );
                return ExitCode::from(2);
            }
        }
    };

    let config = match discover_config(file) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let calls = match parse_factory_calls_with_config(&source, file, &config) {
        Ok(calls) => calls,
        Err(e) => {
            eprintln!(
                "{}{}: {}",
                "error".red().bold(),
                format!("[{}]", e.code()).dimmed(),
                e
            );
            return ExitCode::from(1);
        }
    };

    let rewritten = replace_precompute_value(&source, &data, calls.first(), format);

    if in_place {
        if let Err(e) = fs::write(file, &rewritten) {
            eprintln!(
                "{} Failed to write '{}': {}",
                "error:".red().bold(),
                file,
                e
            );
            return ExitCode::from(2);
        }
        if rewritten == source {
            println!("{} '{}' unchanged", "Info".blue().bold(), file);
        } else {
            println!("{} Updated '{}'", "Success".green().bold(), file);
        }
    } else {
        print!("{rewritten}");
    }

    ExitCode::SUCCESS
}

fn cmd_catalog(workspace: Option<&str>, format: &str, output: Option<&str>) -> ExitCode {
    let workspace_dir = workspace.unwrap_or(".");
    let config = match load_config(workspace_dir) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let report = scan_workspace(workspace_dir, &config);
    for diag in report.diagnostics.iter() {
        print_diagnostic(diag);
    }

    let catalog = DemoCatalog::from_report(workspace_dir, &report);
    let output_content = match format {
        "json" => catalog.to_json(),
        _ => catalog.to_markdown(),
    };

    if let Some(output_file) = output {
        let output_path = Path::new(output_file);
        if output_path.is_absolute() {
            eprintln!(
                "{} Absolute paths are not allowed for output files. Use a relative path.",
                "error:".red().bold()
            );
            return ExitCode::from(2);
        }
        if output_path
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            eprintln!(
                "{} Output path cannot contain parent directory references (..).",
                "error:".red().bold()
            );
            return ExitCode::from(2);
        }

        match fs::write(output_file, &output_content) {
            Ok(_) => {
                println!(
                    "{} Catalog written to '{}'",
                    "Success".green().bold(),
                    output_file
                );
            }
            Err(e) => {
                eprintln!(
                    "{} Failed to write to '{}': {}",
                    "error:".red().bold(),
                    output_file,
                    e
                );
                return ExitCode::from(2);
            }
        }
    } else {
        println!("{output_content}");
    }

    if report.diagnostics.has_errors() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
