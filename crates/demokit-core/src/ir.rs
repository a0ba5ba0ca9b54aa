//! Intermediate representation for factory-call arguments.
//!
//! The IR keeps the exact original text of every leaf so that an argument
//! can be re-serialized without drift. Consumers that want plain data use
//! [`Argument::to_clean_value`], which performs best-effort coercion.

use serde::{Deserialize, Serialize};

/// A classified factory-call argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Argument {
    /// Opaque expression text: literals, property access chains,
    /// `import.meta.url`, optional chaining, and anything else that is not
    /// decomposed further.
    Identifier { text: String },
    /// Object literal with property order preserved.
    Object { object: ObjectLiteral },
    /// Array literal.
    Array { items: Vec<Argument> },
    /// Plain function call: `name(args)`.
    Call {
        name: String,
        arguments: Vec<Argument>,
    },
    /// Generic type reference or generic function invocation.
    /// `call_arguments` is `None` for a bare `Foo<T>` and `Some` for
    /// `Foo<T>(...)`.
    Generic {
        name: String,
        type_arguments: Vec<String>,
        call_arguments: Option<Vec<Argument>>,
    },
    /// Arrow function. Parameters keep their annotation text; the return
    /// annotation (from `(a): R => ...`) is stored separately.
    Arrow {
        parameters: Vec<Argument>,
        return_type: Option<String>,
        body: Box<Argument>,
    },
    /// Type assertion: `expr as Type`.
    TypeAssertion {
        expression: Box<Argument>,
        type_text: String,
    },
}

impl Argument {
    pub fn identifier(text: impl Into<String>) -> Self {
        Argument::Identifier { text: text.into() }
    }

    /// The object literal inside this argument, if it is one.
    pub fn as_object(&self) -> Option<&ObjectLiteral> {
        match self {
            Argument::Object { object } => Some(object),
            _ => None,
        }
    }

    /// Best-effort conversion to plain data for presentation to callers.
    ///
    /// Quoted strings are unwrapped, `true`/`false` become booleans, and
    /// numeric literals become numbers, except `N.0`-shaped decimals which
    /// read as version strings and stay text. Structured arguments that have
    /// no data equivalent re-serialize to their source text.
    pub fn to_clean_value(&self) -> serde_json::Value {
        match self {
            Argument::Identifier { text } => clean_scalar(text),
            Argument::Object { object } => {
                let mut map = serde_json::Map::new();
                for property in &object.properties {
                    match property {
                        Property::Shorthand { key } => {
                            map.insert(clean_key(key), clean_scalar(key));
                        }
                        Property::KeyValue { key, value } => {
                            map.insert(clean_key(key), value.to_clean_value());
                        }
                    }
                }
                serde_json::Value::Object(map)
            }
            Argument::Array { items } => {
                serde_json::Value::Array(items.iter().map(Argument::to_clean_value).collect())
            }
            other => serde_json::Value::String(crate::serializer::serialize(other)),
        }
    }
}

/// An object literal as an ordered sequence of properties.
///
/// A vector, not a map: property order must survive a parse/serialize round
/// trip.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectLiteral {
    pub properties: Vec<Property>,
}

/// One property of an object literal.
///
/// Shorthand `{ Foo }` is distinct from `{ Foo: Foo }` so both re-serialize
/// faithfully.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Property {
    Shorthand { key: String },
    KeyValue { key: String, value: Argument },
}

impl Property {
    /// The property key with any surrounding quotes removed.
    pub fn key_name(&self) -> String {
        match self {
            Property::Shorthand { key } | Property::KeyValue { key, .. } => clean_key(key),
        }
    }

    /// The property value; shorthand properties evaluate to their own key.
    pub fn value(&self) -> Argument {
        match self {
            Property::Shorthand { key } => Argument::identifier(key.clone()),
            Property::KeyValue { value, .. } => value.clone(),
        }
    }
}

impl ObjectLiteral {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Look up a property by key (quotes on the key are ignored).
    pub fn get(&self, key: &str) -> Option<Argument> {
        self.properties
            .iter()
            .find(|p| p.key_name() == key)
            .map(Property::value)
    }

    /// Remove every property with the given key.
    pub fn remove(&mut self, key: &str) {
        self.properties.retain(|p| p.key_name() != key);
    }

    /// Append a `key: value` property.
    pub fn push(&mut self, key: impl Into<String>, value: Argument) {
        self.properties.push(Property::KeyValue {
            key: key.into(),
            value,
        });
    }
}

/// Strip one level of matching quotes from an object key.
fn clean_key(key: &str) -> String {
    strip_quotes(key.trim()).to_string()
}

fn strip_quotes(text: &str) -> &str {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'\'' || first == b'"') && bytes[bytes.len() - 1] == first {
            return &text[1..text.len() - 1];
        }
    }
    text
}

/// Coerce a raw expression text to plain data.
fn clean_scalar(text: &str) -> serde_json::Value {
    let t = text.trim();
    let unquoted = strip_quotes(t);
    if unquoted.len() != t.len() {
        return serde_json::Value::String(unquoted.to_string());
    }
    match t {
        "true" => return serde_json::Value::Bool(true),
        "false" => return serde_json::Value::Bool(false),
        _ => {}
    }
    if is_integer_literal(t) {
        if let Ok(n) = t.parse::<i64>() {
            return serde_json::Value::Number(n.into());
        }
    }
    if let Some(fraction) = decimal_fraction(t) {
        // `N.0` reads as a version string, not a number. The heuristic is
        // imprecise on purpose: downstream consumers depend on it.
        if fraction != "0" {
            if let Ok(f) = t.parse::<f64>() {
                if let Some(n) = serde_json::Number::from_f64(f) {
                    return serde_json::Value::Number(n);
                }
            }
        }
    }
    serde_json::Value::String(t.to_string())
}

fn is_integer_literal(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// For a `digits.digits` literal, the fractional part; otherwise `None`.
fn decimal_fraction(text: &str) -> Option<&str> {
    let body = text.strip_prefix('-').unwrap_or(text);
    let (whole, fraction) = body.split_once('.')?;
    if whole.is_empty() || fraction.is_empty() {
        return None;
    }
    let all_digits =
        |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if all_digits(whole) && all_digits(fraction) {
        Some(fraction)
    } else {
        None
    }
}
