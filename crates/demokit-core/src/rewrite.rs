//! Precompute injection: rewriting a factory call's argument list in place.
//!
//! The rewriter only ever touches the characters between the factory call's
//! opening and closing parens; everything else in the file is carried over
//! byte for byte.

use crate::factory::ParsedFactoryCall;
use crate::ir::Argument;
use crate::serializer::{serialize, serialize_object};

/// How the precompute payload is rendered into the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrecomputeFormat {
    /// Pretty-printed JSON (2-space indent).
    #[default]
    Json,
    /// The payload string is spliced in verbatim.
    PassAsIs,
}

/// Replace (or insert) the `precompute` option of a parsed factory call.
///
/// Every existing option is kept in its original order, minus any previous
/// `precompute`, and the new `precompute` is appended last. Applying the
/// same payload twice produces byte-identical output both times. When
/// `parsed` is `None`, or the call sets `skipPrecompute: true`, the source
/// is returned unchanged.
pub fn replace_precompute_value(
    source: &str,
    data: &serde_json::Value,
    parsed: Option<&ParsedFactoryCall>,
    format: PrecomputeFormat,
) -> String {
    let Some(call) = parsed else {
        return source.to_string();
    };
    if call.skip_precompute() {
        return source.to_string();
    }

    let payload = match format {
        PrecomputeFormat::PassAsIs => match data {
            serde_json::Value::String(raw) => raw.clone(),
            other => other.to_string(),
        },
        PrecomputeFormat::Json => {
            // A serde_json::Value always serializes; failure here means a
            // serializer bug, not bad input
            serde_json::to_string_pretty(data).expect("JSON value serialization cannot fail")
        }
    };

    let mut options = call.options.clone();
    options.remove("precompute");
    options.push("precompute", Argument::identifier(payload));

    let mut parameters = vec!["import.meta.url".to_string()];
    if let Some(variants) = &call.variants_argument {
        parameters.push(serialize(variants));
    }
    parameters.push(serialize_object(&options));
    let argument_list = parameters.join(", ");

    debug_assert!(call.arguments_end <= source.len());
    format!(
        "{}{}{}",
        &source[..call.arguments_start],
        argument_list,
        &source[call.arguments_end..]
    )
}
