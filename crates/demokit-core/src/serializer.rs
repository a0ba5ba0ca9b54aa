//! Serialization of argument IR back into source text.
//!
//! The exact inverse of the classifier, emitting canonical formatting:
//! single-space padding inside object literals, shorthand elision when a
//! property value matches its key, and `(a, b) => body` arrows.

use crate::ir::{Argument, ObjectLiteral, Property};

/// Serialize an argument back to source syntax.
pub fn serialize(argument: &Argument) -> String {
    match argument {
        Argument::Identifier { text } => text.clone(),
        Argument::Object { object } => serialize_object(object),
        Argument::Array { items } => format!("[{}]", join(items)),
        Argument::Call { name, arguments } => format!("{}({})", name, join(arguments)),
        Argument::Generic {
            name,
            type_arguments,
            call_arguments,
        } => {
            let head = format!("{}<{}>", name, type_arguments.join(", "));
            match call_arguments {
                Some(arguments) => format!("{}({})", head, join(arguments)),
                None => head,
            }
        }
        Argument::Arrow {
            parameters,
            return_type,
            body,
        } => {
            let params = format!("({})", join(parameters));
            match return_type {
                Some(annotation) => {
                    format!("{}: {} => {}", params, annotation, serialize(body))
                }
                None => format!("{} => {}", params, serialize(body)),
            }
        }
        Argument::TypeAssertion {
            expression,
            type_text,
        } => format!("{} as {}", serialize(expression), type_text),
    }
}

/// Serialize an object literal with property order preserved.
pub fn serialize_object(object: &ObjectLiteral) -> String {
    if object.is_empty() {
        return "{}".to_string();
    }
    let entries: Vec<String> = object
        .properties
        .iter()
        .map(serialize_property)
        .collect();
    format!("{{ {} }}", entries.join(", "))
}

fn serialize_property(property: &Property) -> String {
    match property {
        Property::Shorthand { key } => key.clone(),
        Property::KeyValue { key, value } => {
            let value_text = serialize(value);
            // `{ Foo: Foo }` collapses back to shorthand
            if value_text == *key {
                key.clone()
            } else {
                format!("{}: {}", key, value_text)
            }
        }
    }
}

fn join(arguments: &[Argument]) -> String {
    arguments
        .iter()
        .map(serialize)
        .collect::<Vec<_>>()
        .join(", ")
}
