//! Structural classification of factory-call arguments.
//!
//! Patterns are tried in a fixed order because the surface syntaxes overlap:
//! arrow function, type assertion, generic/function call, object literal,
//! array literal, and finally opaque identifier text. The classifier never
//! coerces values; [`crate::ir::Argument`] keeps the exact original text.

use crate::ir::{Argument, ObjectLiteral, Property};
use crate::splitter::{
    find_matching_angle, find_matching_brace, find_matching_bracket, find_matching_paren,
    find_top_level, is_ident_byte, is_ident_start, split_parameters,
};

/// Classify a single argument string into its IR form.
pub fn classify(text: &str) -> Argument {
    let text = text.trim();

    if let Some(arrow) = classify_arrow(text) {
        return arrow;
    }
    if let Some(assertion) = classify_assertion(text) {
        return assertion;
    }
    if let Some(call) = classify_call_or_generic(text) {
        return call;
    }
    if let Some(object) = classify_object(text) {
        return object;
    }
    if let Some(array) = classify_array(text) {
        return array;
    }
    Argument::identifier(text)
}

/// `(a, b) => body`, `(a): R => body`, or `a => body`.
fn classify_arrow(text: &str) -> Option<Argument> {
    let idx = find_top_level(text, "=>")?;
    if idx == 0 {
        return None;
    }
    let params_text = text[..idx].trim_end();
    let body_text = text[idx + 2..].trim_start();
    if body_text.is_empty() {
        return None;
    }

    let (parameters, return_type) = if params_text.starts_with('(') {
        let close = find_matching_paren(params_text, 0)?;
        let trailing = params_text[close + 1..].trim();
        let return_type = if trailing.is_empty() {
            None
        } else if let Some(annotation) = trailing.strip_prefix(':') {
            Some(annotation.trim().to_string())
        } else {
            return None;
        };
        let parameters = split_parameters(&params_text[1..close])
            .iter()
            .map(|p| classify(p))
            .collect();
        (parameters, return_type)
    } else {
        // Bare single parameter: `x => ...`
        if !is_plain_identifier(params_text) {
            return None;
        }
        (vec![Argument::identifier(params_text)], None)
    };

    // Block bodies are statements, not expressions; keep them opaque
    let body = if body_text.starts_with('{') {
        Argument::identifier(body_text)
    } else {
        classify(body_text)
    };

    Some(Argument::Arrow {
        parameters,
        return_type,
        body: Box::new(body),
    })
}

/// `expr as Type` with the assertion at the top level.
fn classify_assertion(text: &str) -> Option<Argument> {
    let idx = find_top_level(text, " as ")?;
    let expression = text[..idx].trim();
    let type_text = text[idx + 4..].trim();
    if expression.is_empty() || type_text.is_empty() {
        return None;
    }
    Some(Argument::TypeAssertion {
        expression: Box::new(classify(expression)),
        type_text: type_text.to_string(),
    })
}

/// `Name(args)`, `Name<T>`, or `Name<T>(args)`.
fn classify_call_or_generic(text: &str) -> Option<Argument> {
    let bytes = text.as_bytes();
    if bytes.is_empty() || !is_ident_start(bytes[0]) {
        return None;
    }
    let mut i = 1;
    while i < bytes.len() && is_ident_byte(bytes[i]) {
        i += 1;
    }
    let name = &text[..i];

    match bytes.get(i) {
        Some(b'<') => {
            let angle_close = find_matching_angle(text, i)?;
            let type_arguments = split_parameters(&text[i + 1..angle_close]);
            match bytes.get(angle_close + 1) {
                None => Some(Argument::Generic {
                    name: name.to_string(),
                    type_arguments,
                    call_arguments: None,
                }),
                Some(b'(') => {
                    let paren_close = find_matching_paren(text, angle_close + 1)?;
                    if paren_close != bytes.len() - 1 {
                        return None;
                    }
                    let call_arguments = split_parameters(&text[angle_close + 2..paren_close])
                        .iter()
                        .map(|a| classify(a))
                        .collect();
                    Some(Argument::Generic {
                        name: name.to_string(),
                        type_arguments,
                        call_arguments: Some(call_arguments),
                    })
                }
                Some(_) => None,
            }
        }
        Some(b'(') => {
            let paren_close = find_matching_paren(text, i)?;
            if paren_close != bytes.len() - 1 {
                return None;
            }
            let arguments = split_parameters(&text[i + 1..paren_close])
                .iter()
                .map(|a| classify(a))
                .collect();
            Some(Argument::Call {
                name: name.to_string(),
                arguments,
            })
        }
        _ => None,
    }
}

/// Text fully wrapped in `{ }`.
fn classify_object(text: &str) -> Option<Argument> {
    if !text.starts_with('{') {
        return None;
    }
    let close = find_matching_brace(text, 0)?;
    if close != text.len() - 1 {
        return None;
    }

    let mut properties = Vec::new();
    for entry in split_parameters(&text[1..close]) {
        properties.push(classify_property(&entry));
    }
    Some(Argument::Object {
        object: ObjectLiteral { properties },
    })
}

/// One `key: value` or shorthand `key` entry of an object literal.
fn classify_property(entry: &str) -> Property {
    match find_top_level(entry, ":") {
        Some(idx) if idx > 0 => {
            let key = entry[..idx].trim();
            let value = entry[idx + 1..].trim();
            Property::KeyValue {
                key: key.to_string(),
                value: classify(value),
            }
        }
        _ => Property::Shorthand {
            key: entry.trim().to_string(),
        },
    }
}

/// Text fully wrapped in `[ ]`.
fn classify_array(text: &str) -> Option<Argument> {
    if !text.starts_with('[') {
        return None;
    }
    let close = find_matching_bracket(text, 0)?;
    if close != text.len() - 1 {
        return None;
    }
    let items = split_parameters(&text[1..close])
        .iter()
        .map(|item| classify(item))
        .collect();
    Some(Argument::Array { items })
}

fn is_plain_identifier(text: &str) -> bool {
    let bytes = text.as_bytes();
    !bytes.is_empty()
        && is_ident_start(bytes[0])
        && bytes.iter().all(|&b| is_ident_byte(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_identifier() {
        assert_eq!(
            classify("import.meta.url"),
            Argument::identifier("import.meta.url")
        );
        assert_eq!(classify("  Component  "), Argument::identifier("Component"));
    }

    #[test]
    fn test_classify_property_access_stays_opaque() {
        assert_eq!(classify("foo.bar?.baz"), Argument::identifier("foo.bar?.baz"));
        assert_eq!(classify("items[0]"), Argument::identifier("items[0]"));
        assert_eq!(classify("foo(a).bar"), Argument::identifier("foo(a).bar"));
    }

    #[test]
    fn test_classify_object_shorthand() {
        let arg = classify("{ Component }");
        let object = arg.as_object().expect("object literal");
        assert_eq!(
            object.properties,
            vec![Property::Shorthand {
                key: "Component".into()
            }]
        );
    }

    #[test]
    fn test_classify_object_key_value() {
        let arg = classify("{ x: 1, y: 2 }");
        let object = arg.as_object().expect("object literal");
        assert_eq!(object.properties.len(), 2);
        assert_eq!(
            object.properties[0],
            Property::KeyValue {
                key: "x".into(),
                value: Argument::identifier("1"),
            }
        );
        assert_eq!(
            object.properties[1],
            Property::KeyValue {
                key: "y".into(),
                value: Argument::identifier("2"),
            }
        );
    }

    #[test]
    fn test_classify_object_preserves_property_order() {
        let arg = classify("{ z: 1, a: 2, m: 3 }");
        let object = arg.as_object().expect("object literal");
        let keys: Vec<_> = object.properties.iter().map(Property::key_name).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_classify_nested_object() {
        let arg = classify("{ outer: { inner: 'x, y' } }");
        let object = arg.as_object().expect("object literal");
        let inner = object.get("outer").expect("outer");
        let inner = inner.as_object().expect("nested object literal");
        assert_eq!(inner.get("inner"), Some(Argument::identifier("'x, y'")));
    }

    #[test]
    fn test_classify_array() {
        assert_eq!(
            classify("[1, two, 'three']"),
            Argument::Array {
                items: vec![
                    Argument::identifier("1"),
                    Argument::identifier("two"),
                    Argument::identifier("'three'"),
                ]
            }
        );
    }

    #[test]
    fn test_classify_call() {
        assert_eq!(
            classify("func(a, b)"),
            Argument::Call {
                name: "func".into(),
                arguments: vec![Argument::identifier("a"), Argument::identifier("b")],
            }
        );
    }

    #[test]
    fn test_classify_bare_generic() {
        assert_eq!(
            classify("Component<{ foo: string }>"),
            Argument::Generic {
                name: "Component".into(),
                type_arguments: vec!["{ foo: string }".into()],
                call_arguments: None,
            }
        );
    }

    #[test]
    fn test_classify_generic_invocation() {
        assert_eq!(
            classify("create<Props, State>(a)"),
            Argument::Generic {
                name: "create".into(),
                type_arguments: vec!["Props".into(), "State".into()],
                call_arguments: Some(vec![Argument::identifier("a")]),
            }
        );
    }

    #[test]
    fn test_classify_nested_angle_brackets() {
        assert_eq!(
            classify("wrap<Map<string, number>>"),
            Argument::Generic {
                name: "wrap".into(),
                type_arguments: vec!["Map<string, number>".into()],
                call_arguments: None,
            }
        );
    }

    #[test]
    fn test_classify_arrow() {
        assert_eq!(
            classify("(a, b) => a"),
            Argument::Arrow {
                parameters: vec![Argument::identifier("a"), Argument::identifier("b")],
                return_type: None,
                body: Box::new(Argument::identifier("a")),
            }
        );
    }

    #[test]
    fn test_classify_arrow_bare_parameter() {
        assert_eq!(
            classify("x => x"),
            Argument::Arrow {
                parameters: vec![Argument::identifier("x")],
                return_type: None,
                body: Box::new(Argument::identifier("x")),
            }
        );
    }

    #[test]
    fn test_classify_arrow_with_return_type() {
        assert_eq!(
            classify("(a: number): string => label(a)"),
            Argument::Arrow {
                parameters: vec![Argument::identifier("a: number")],
                return_type: Some("string".into()),
                body: Box::new(Argument::Call {
                    name: "label".into(),
                    arguments: vec![Argument::identifier("a")],
                }),
            }
        );
    }

    #[test]
    fn test_classify_arrow_block_body_opaque() {
        assert_eq!(
            classify("(a) => { return a; }"),
            Argument::Arrow {
                parameters: vec![Argument::identifier("a")],
                return_type: None,
                body: Box::new(Argument::identifier("{ return a; }")),
            }
        );
    }

    #[test]
    fn test_classify_type_assertion() {
        assert_eq!(
            classify("Component as any"),
            Argument::TypeAssertion {
                expression: Box::new(Argument::identifier("Component")),
                type_text: "any".into(),
            }
        );
    }

    #[test]
    fn test_classify_chained_assertion_keeps_full_type_text() {
        assert_eq!(
            classify("value as unknown as Props"),
            Argument::TypeAssertion {
                expression: Box::new(Argument::identifier("value")),
                type_text: "unknown as Props".into(),
            }
        );
    }

    #[test]
    fn test_classify_assertion_inside_object_value() {
        let arg = classify("{ Foo: FooImpl as React.FC }");
        let object = arg.as_object().expect("object literal");
        assert_eq!(
            object.get("Foo"),
            Some(Argument::TypeAssertion {
                expression: Box::new(Argument::identifier("FooImpl")),
                type_text: "React.FC".into(),
            })
        );
    }

    #[test]
    fn test_classify_quoted_object_key() {
        let arg = classify("{ 'data-testid': 'root' }");
        let object = arg.as_object().expect("object literal");
        assert_eq!(object.get("data-testid"), Some(Argument::identifier("'root'")));
    }
}
