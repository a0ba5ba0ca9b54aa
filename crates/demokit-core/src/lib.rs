//! Demokit Core Library
//!
//! This crate provides the core functionality for parsing, checking, and
//! rewriting demo factory calls in TypeScript sources, including the
//! argument splitter, the argument classifier, import resolution, and
//! precompute injection.

pub mod catalog;
pub mod classifier;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod factory;
pub mod imports;
pub mod ir;
pub mod rewrite;
pub mod scan;
pub mod serializer;
pub mod span;
pub mod splitter;

pub use catalog::DemoCatalog;
pub use classifier::classify;
pub use config::{ConfigError, DemokitConfig, FactoryConfig, ScanConfig, CONFIG_FILE_NAME};
pub use diagnostics::{
    Diagnostic, DiagnosticSeverity, Diagnostics, DiagnosticsOutput, DiagnosticsSummary,
};
pub use error::{FactoryError, FactoryResult};
pub use factory::{
    locate_factory_calls, parse_factory_call, parse_factory_calls,
    parse_factory_calls_with_config, parse_located_call, LocatedCall, ParseOptions,
    ParsedFactoryCall,
};
pub use imports::{parse_imports, ImportBinding, ImportKind, ImportTable};
pub use ir::{Argument, ObjectLiteral, Property};
pub use rewrite::{replace_precompute_value, PrecomputeFormat};
pub use scan::{scan_workspace, DemoEntry, ScanReport, VariantEntry};
pub use serializer::{serialize, serialize_object};
pub use span::{Position, Span};
pub use splitter::{find_matching_paren, split_parameters};
