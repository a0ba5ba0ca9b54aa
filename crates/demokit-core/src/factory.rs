//! Factory call location and parsing.
//!
//! Locates `create*(url, variants, options?)` invocations in raw source
//! text, validates their shape, and resolves the variants argument against
//! the file's import table.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::classifier::classify;
use crate::config::DemokitConfig;
use crate::error::{FactoryError, FactoryResult};
use crate::imports::{parse_imports, ImportTable};
use crate::ir::{Argument, ObjectLiteral, Property};
use crate::serializer::serialize;
use crate::splitter::{find_matching_paren, is_ident_byte, split_parameters};

/// Grammar/arity toggles for factory-call parsing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Metadata-only calls take `(url, options?)` with no variants argument.
    pub metadata_only: bool,
    /// Permit variants bound to non-relative module specifiers.
    pub allow_external_variants: bool,
    /// Permit more than one factory call per file.
    pub allow_multiple_factories: bool,
}

/// A located but not yet parsed factory call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedCall {
    pub function_name: String,
    /// Byte offset of the first byte after the opening `(`.
    pub arguments_start: usize,
    /// Byte offset of the closing `)`.
    pub arguments_end: usize,
}

/// One fully parsed `create*` invocation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedFactoryCall {
    /// The matched factory function, e.g. `createDemo`.
    pub function_name: String,
    /// Variant name to resolved module path. A bare-identifier variants
    /// argument produces a single `"Default"` entry.
    pub variants: HashMap<String, String>,
    /// Variant name to original exported name (`None` for default and
    /// namespace imports), parallel to `variants`.
    pub named_exports: HashMap<String, Option<String>>,
    /// Structured variants argument, kept for faithful re-serialization.
    /// `None` in metadata-only mode.
    pub variants_argument: Option<Argument>,
    /// Structured options object, property order preserved. Empty when the
    /// call had no options argument.
    pub options: ObjectLiteral,
    /// Non-relative side-effect imports of the file.
    pub externals: Vec<String>,
    /// Byte offsets of the argument list in the original source.
    pub arguments_start: usize,
    pub arguments_end: usize,
}

impl ParsedFactoryCall {
    /// Clean value of one option, coerced for consumption.
    pub fn option_value(&self, key: &str) -> Option<serde_json::Value> {
        self.options.get(key).map(|arg| arg.to_clean_value())
    }

    /// The `name` option, if present and a string.
    pub fn name(&self) -> Option<String> {
        match self.option_value("name") {
            Some(serde_json::Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// The `slug` option, if present and a string.
    pub fn slug(&self) -> Option<String> {
        match self.option_value("slug") {
            Some(serde_json::Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Whether the call opted out of precompute injection.
    pub fn skip_precompute(&self) -> bool {
        matches!(
            self.option_value("skipPrecompute"),
            Some(serde_json::Value::Bool(true))
        )
    }

    /// Whether the call already carries a `precompute` option.
    pub fn has_precompute(&self) -> bool {
        self.options.get("precompute").is_some()
    }
}

fn factory_call_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bcreate\w*\s*\(").expect("static factory pattern"))
}

/// Locate every `create*(` call in `source` and find its balancing paren.
///
/// Member calls (`React.createContext(...)`) are not factory calls and are
/// skipped.
pub fn locate_factory_calls(source: &str, file_path: &str) -> FactoryResult<Vec<LocatedCall>> {
    let bytes = source.as_bytes();
    let mut calls = Vec::new();

    for m in factory_call_re().find_iter(source) {
        if m.start() > 0 {
            let previous = bytes[m.start() - 1];
            if previous == b'.' || is_ident_byte(previous) {
                continue;
            }
        }
        let matched = m.as_str();
        let function_name = matched
            .trim_end_matches('(')
            .trim_end()
            .to_string();
        let open = m.end() - 1;
        let close = find_matching_paren(source, open).ok_or_else(|| {
            FactoryError::UnbalancedParentheses {
                function: function_name.clone(),
                file: file_path.to_string(),
            }
        })?;
        calls.push(LocatedCall {
            function_name,
            arguments_start: open + 1,
            arguments_end: close,
        });
    }

    Ok(calls)
}

/// Parse the single factory call of a file.
///
/// Returns `Ok(None)` when the file contains no factory call. More than one
/// call is an error unless `allow_multiple_factories` is set, in which case
/// the first call is returned.
pub fn parse_factory_call(
    source: &str,
    file_path: &str,
    options: &ParseOptions,
) -> FactoryResult<Option<ParsedFactoryCall>> {
    let calls = locate_factory_calls(source, file_path)?;
    if calls.is_empty() {
        return Ok(None);
    }
    if calls.len() > 1 && !options.allow_multiple_factories {
        return Err(FactoryError::MultipleFactoryCalls {
            file: file_path.to_string(),
            count: calls.len(),
        });
    }
    let imports = parse_imports(source, file_path);
    parse_located_call(source, file_path, &calls[0], &imports, options).map(Some)
}

/// Parse every factory call of a file sequentially, reusing one import
/// table. Requires `allow_multiple_factories` when the file has more than
/// one call.
pub fn parse_factory_calls(
    source: &str,
    file_path: &str,
    options: &ParseOptions,
) -> FactoryResult<Vec<ParsedFactoryCall>> {
    let calls = locate_factory_calls(source, file_path)?;
    if calls.len() > 1 && !options.allow_multiple_factories {
        return Err(FactoryError::MultipleFactoryCalls {
            file: file_path.to_string(),
            count: calls.len(),
        });
    }
    let imports = parse_imports(source, file_path);
    calls
        .iter()
        .map(|call| parse_located_call(source, file_path, call, &imports, options))
        .collect()
}

/// Parse every factory call of a file, looking up each call's parse options
/// by its own function name in the workspace configuration.
///
/// A file with several calls is an error unless every matched factory is
/// configured with `allow_multiple`.
pub fn parse_factory_calls_with_config(
    source: &str,
    file_path: &str,
    config: &DemokitConfig,
) -> FactoryResult<Vec<ParsedFactoryCall>> {
    let calls = locate_factory_calls(source, file_path)?;
    if calls.len() > 1 {
        let all_allow_multiple = calls
            .iter()
            .all(|c| config.parse_options_for(&c.function_name).allow_multiple_factories);
        if !all_allow_multiple {
            return Err(FactoryError::MultipleFactoryCalls {
                file: file_path.to_string(),
                count: calls.len(),
            });
        }
    }
    let imports = parse_imports(source, file_path);
    calls
        .iter()
        .map(|call| {
            let options = config.parse_options_for(&call.function_name);
            parse_located_call(source, file_path, call, &imports, &options)
        })
        .collect()
}

/// Parse one located call against an already parsed import table.
pub fn parse_located_call(
    source: &str,
    file_path: &str,
    call: &LocatedCall,
    imports: &ImportTable,
    options: &ParseOptions,
) -> FactoryResult<ParsedFactoryCall> {
    let arguments_text = &source[call.arguments_start..call.arguments_end];
    let arguments = split_parameters(arguments_text);

    let (expected, valid) = if options.metadata_only {
        ("1-2", (1..=2).contains(&arguments.len()))
    } else {
        ("2-3", (2..=3).contains(&arguments.len()))
    };
    if !valid {
        return Err(FactoryError::InvalidArity {
            function: call.function_name.clone(),
            file: file_path.to_string(),
            expected,
            actual: arguments.len(),
        });
    }

    if arguments[0] != "import.meta.url" {
        return Err(FactoryError::InvalidUrlArgument {
            function: call.function_name.clone(),
            file: file_path.to_string(),
            actual: arguments[0].clone(),
        });
    }

    let (variants_argument, options_index) = if options.metadata_only {
        (None, 1)
    } else {
        (Some(classify(&arguments[1])), 2)
    };

    let (variants, named_exports) = match &variants_argument {
        Some(argument) => resolve_variants(
            argument,
            imports,
            &call.function_name,
            file_path,
            options.allow_external_variants,
        )?,
        None => (HashMap::new(), HashMap::new()),
    };

    let parsed_options = match arguments.get(options_index) {
        Some(text) => match classify(text) {
            Argument::Object { object } => object,
            other => {
                return Err(FactoryError::InvalidOptionsArgument {
                    function: call.function_name.clone(),
                    file: file_path.to_string(),
                    actual: serialize(&other),
                })
            }
        },
        None => ObjectLiteral::new(),
    };

    Ok(ParsedFactoryCall {
        function_name: call.function_name.clone(),
        variants,
        named_exports,
        variants_argument,
        options: parsed_options,
        externals: imports.externals.clone(),
        arguments_start: call.arguments_start,
        arguments_end: call.arguments_end,
    })
}

type VariantMaps = (HashMap<String, String>, HashMap<String, Option<String>>);

/// Resolve the variants argument against the import table.
///
/// Fails on the first unresolved binding, naming exactly that component.
fn resolve_variants(
    argument: &Argument,
    imports: &ImportTable,
    function: &str,
    file_path: &str,
    allow_external: bool,
) -> FactoryResult<VariantMaps> {
    let mut variants = HashMap::new();
    let mut named_exports = HashMap::new();

    match argument {
        Argument::Identifier { text } => {
            let binding = resolve_binding(text, imports, function, file_path, allow_external)?;
            variants.insert("Default".to_string(), binding.0);
            named_exports.insert("Default".to_string(), binding.1);
        }
        Argument::Object { object } => {
            for property in &object.properties {
                let variant_name = property.key_name();
                let binding_name = match property {
                    Property::Shorthand { key } => key.clone(),
                    Property::KeyValue { value, .. } => {
                        // `Name: Expr as Type` resolves the bare expression
                        let inner = match value {
                            Argument::TypeAssertion { expression, .. } => expression,
                            other => other,
                        };
                        serialize(inner)
                    }
                };
                let binding =
                    resolve_binding(&binding_name, imports, function, file_path, allow_external)?;
                variants.insert(variant_name.clone(), binding.0);
                named_exports.insert(variant_name, binding.1);
            }
        }
        other => {
            return Err(FactoryError::InvalidVariantsArgument {
                function: function.to_string(),
                file: file_path.to_string(),
                actual: serialize(other),
            })
        }
    }

    Ok((variants, named_exports))
}

fn resolve_binding(
    name: &str,
    imports: &ImportTable,
    function: &str,
    file_path: &str,
    allow_external: bool,
) -> FactoryResult<(String, Option<String>)> {
    let binding = imports.resolve(name).ok_or_else(|| {
        FactoryError::ComponentNotImported {
            function: function.to_string(),
            file: file_path.to_string(),
            name: name.to_string(),
        }
    })?;
    if binding.external && !allow_external {
        return Err(FactoryError::ExternalVariant {
            function: function.to_string(),
            file: file_path.to_string(),
            name: name.to_string(),
            module: binding.module_path.clone(),
        });
    }
    Ok((binding.module_path.clone(), binding.exported_name.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE: &str = "/app/demos/accordion/index.ts";

    fn parse(source: &str) -> FactoryResult<Option<ParsedFactoryCall>> {
        parse_factory_call(source, FILE, &ParseOptions::default())
    }

    #[test]
    fn test_no_factory_call_is_noop() {
        let result = parse("export const nothing = 1;\n").expect("parse");
        assert!(result.is_none());
    }

    #[test]
    fn test_parse_shorthand_variants() {
        let source = "\
import Component from './Component';

export const demo = createDemo(import.meta.url, { Component });
";
        let call = parse(source).expect("parse").expect("call");
        assert_eq!(call.function_name, "createDemo");
        assert_eq!(
            call.variants.get("Component").map(String::as_str),
            Some("/app/demos/accordion/Component")
        );
        assert_eq!(call.named_exports.get("Component"), Some(&None));
        assert!(call.options.is_empty());
    }

    #[test]
    fn test_parse_bare_identifier_variants() {
        let source = "\
import Component from './Component';

export const demo = createDemo(import.meta.url, Component);
";
        let call = parse(source).expect("parse").expect("call");
        assert_eq!(
            call.variants.get("Default").map(String::as_str),
            Some("/app/demos/accordion/Component")
        );
        assert_eq!(call.named_exports.get("Default"), Some(&None));
    }

    #[test]
    fn test_parse_named_export_variant() {
        let source = "\
import { CssModules as Styled } from './variants';

export const demo = createDemo(import.meta.url, { Styled });
";
        let call = parse(source).expect("parse").expect("call");
        assert_eq!(
            call.named_exports.get("Styled"),
            Some(&Some("CssModules".to_string()))
        );
    }

    #[test]
    fn test_parse_variant_with_type_assertion() {
        let source = "\
import { Impl } from './impl';

export const demo = createDemo(import.meta.url, { Variant: Impl as React.FC });
";
        let call = parse(source).expect("parse").expect("call");
        assert_eq!(
            call.variants.get("Variant").map(String::as_str),
            Some("/app/demos/accordion/impl")
        );
    }

    #[test]
    fn test_parse_options() {
        let source = "\
import Component from './Component';

export const demo = createDemo(import.meta.url, { Component }, {
  name: 'Accordion',
  slug: 'accordion-demo',
  skipPrecompute: true,
});
";
        let call = parse(source).expect("parse").expect("call");
        assert_eq!(call.name().as_deref(), Some("Accordion"));
        assert_eq!(call.slug().as_deref(), Some("accordion-demo"));
        assert!(call.skip_precompute());
        assert!(!call.has_precompute());
    }

    #[test]
    fn test_missing_import_error_names_first_component() {
        let source = "\
import Component from './Component';

export const demo = createDemo(import.meta.url, { UnknownComponent, AlsoMissing });
";
        let err = parse(source).expect_err("must fail");
        assert_eq!(
            err.to_string(),
            format!(
                "Invalid variants argument in createDemo call in {FILE}. \
                 Component 'UnknownComponent' is not imported. Make sure to import it first."
            )
        );
    }

    #[test]
    fn test_type_only_import_does_not_satisfy_variants() {
        let source = "\
import type { Component } from './Component';

export const demo = createDemo(import.meta.url, { Component });
";
        let err = parse(source).expect_err("must fail");
        assert!(matches!(err, FactoryError::ComponentNotImported { ref name, .. } if name == "Component"));
    }

    #[test]
    fn test_invalid_url_argument() {
        let source = "export const demo = createDemo('./here', { Component });\n";
        let err = parse(source).expect_err("must fail");
        assert_eq!(
            err.to_string(),
            format!(
                "Invalid URL argument in createDemo call in {FILE}. \
                 Expected 'import.meta.url' but got: './here'"
            )
        );
    }

    #[test]
    fn test_arity_error() {
        let source = "export const demo = createDemo(import.meta.url);\n";
        let err = parse(source).expect_err("must fail");
        assert_eq!(
            err.to_string(),
            format!("Invalid arguments in createDemo call in {FILE}. Expected 2-3 arguments but got 1.")
        );
    }

    #[test]
    fn test_metadata_only_arity() {
        let source = "export const types = createTypes(import.meta.url, { name: 'Props' });\n";
        let options = ParseOptions {
            metadata_only: true,
            ..ParseOptions::default()
        };
        let call = parse_factory_call(source, FILE, &options)
            .expect("parse")
            .expect("call");
        assert!(call.variants_argument.is_none());
        assert!(call.variants.is_empty());
        assert_eq!(call.name().as_deref(), Some("Props"));
    }

    #[test]
    fn test_config_selects_options_per_function_name() {
        let source = "export const types = createTypes(import.meta.url, { name: 'Props' });\n";
        let mut config = DemokitConfig::default();
        config.factories.insert(
            "createTypes".to_string(),
            crate::config::FactoryConfig {
                metadata_only: true,
                ..Default::default()
            },
        );

        let calls = parse_factory_calls_with_config(source, FILE, &config).expect("parse");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name().as_deref(), Some("Props"));
        assert!(calls[0].variants.is_empty());

        // The same source must not be parsed with another factory's defaults
        assert!(parse_factory_call(source, FILE, &ParseOptions::default()).is_err());
    }

    #[test]
    fn test_config_multiple_calls_need_every_factory_to_allow() {
        let source = "\
import A from './A';

export const one = createDemo(import.meta.url, { A });
export const types = createTypes(import.meta.url, { name: 'Props' });
";
        let mut config = DemokitConfig::default();
        config.factories.insert(
            "createTypes".to_string(),
            crate::config::FactoryConfig {
                metadata_only: true,
                allow_multiple: true,
                ..Default::default()
            },
        );
        let err = parse_factory_calls_with_config(source, FILE, &config).expect_err("must fail");
        assert!(matches!(err, FactoryError::MultipleFactoryCalls { count: 2, .. }));

        config.factories.insert(
            "createDemo".to_string(),
            crate::config::FactoryConfig {
                allow_multiple: true,
                ..Default::default()
            },
        );
        let calls = parse_factory_calls_with_config(source, FILE, &config).expect("parse");
        assert_eq!(calls.len(), 2);
        assert!(calls[0].variants.contains_key("A"));
        assert_eq!(calls[1].name().as_deref(), Some("Props"));
    }

    #[test]
    fn test_multiple_calls_rejected_by_default() {
        let source = "\
import A from './A';
import B from './B';

export const one = createDemo(import.meta.url, { A });
export const two = createDemo(import.meta.url, { B });
";
        let err = parse(source).expect_err("must fail");
        assert_eq!(
            err.to_string(),
            format!("Multiple factory calls in {FILE}. Expected at most one create* call but found 2.")
        );
    }

    #[test]
    fn test_multiple_calls_allowed_with_option() {
        let source = "\
import A from './A';
import B from './B';

export const one = createDemo(import.meta.url, { A });
export const two = createDemo(import.meta.url, { B });
";
        let options = ParseOptions {
            allow_multiple_factories: true,
            ..ParseOptions::default()
        };
        let calls = parse_factory_calls(source, FILE, &options).expect("parse");
        assert_eq!(calls.len(), 2);
        assert!(calls[0].variants.contains_key("A"));
        assert!(calls[1].variants.contains_key("B"));
    }

    #[test]
    fn test_member_call_is_not_a_factory() {
        let source = "\
import A from './A';

const ctx = React.createContext(null);
export const demo = createDemo(import.meta.url, { A });
";
        let call = parse(source).expect("parse").expect("call");
        assert_eq!(call.function_name, "createDemo");
    }

    #[test]
    fn test_external_variant_rejected_without_flag() {
        let source = "\
import { Slider } from '@base-ui/react';

export const demo = createDemo(import.meta.url, { Slider });
";
        let err = parse(source).expect_err("must fail");
        assert!(matches!(err, FactoryError::ExternalVariant { ref module, .. } if module == "@base-ui/react"));
    }

    #[test]
    fn test_external_variant_allowed_with_flag() {
        let source = "\
import { Slider } from '@base-ui/react';

export const demo = createDemo(import.meta.url, { Slider });
";
        let options = ParseOptions {
            allow_external_variants: true,
            ..ParseOptions::default()
        };
        let call = parse_factory_call(source, FILE, &options)
            .expect("parse")
            .expect("call");
        assert_eq!(
            call.variants.get("Slider").map(String::as_str),
            Some("@base-ui/react")
        );
    }

    #[test]
    fn test_unbalanced_parens() {
        let source = "export const demo = createDemo(import.meta.url, { A }\n";
        let err = parse(source).expect_err("must fail");
        assert!(matches!(err, FactoryError::UnbalancedParentheses { .. }));
    }

    #[test]
    fn test_argument_offsets_cover_argument_list() {
        let source = "export const demo = createDemo(import.meta.url, { A });\n";
        let calls = locate_factory_calls(source, FILE).expect("locate");
        assert_eq!(calls.len(), 1);
        let inner = &source[calls[0].arguments_start..calls[0].arguments_end];
        assert_eq!(inner, "import.meta.url, { A }");
    }

    #[test]
    fn test_externals_surface_on_parsed_call() {
        let source = "\
import Component from './Component';
import '@scope/tokens';
import './local.css';

export const demo = createDemo(import.meta.url, { Component });
";
        let call = parse(source).expect("parse").expect("call");
        assert_eq!(call.externals, vec!["@scope/tokens"]);
    }
}
