//! Standard SassDoc annotations.
//!
//! The default registry covers the annotations documentation themes display
//! for functions, mixins, placeholders and variables. Callers with their own
//! conventions build an [`AnnotationRegistry`] from scratch instead.

use crate::annotation::{Annotation, AnnotationRegistry};
use crate::model::ContextKind;
use crate::parser::extract::strip_indent;
use regex::Regex;
use serde_json::{json, Map, Value};
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

// {type} $name [default] - description
static RE_PARAMETER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\{([^}]*)\})?\s*\$?([\w.-]+)\s*(?:\[([^\]]*)\])?\s*(?:-\s*)?([\s\S]*)$")
        .unwrap()
});

// {type} description
static RE_RETURNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:\{([^}]*)\})?\s*([\s\S]*)$").unwrap());

// {type} name
static RE_REQUIRES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:\{(\w+)\})?\s*(\$)?([\w-]+)").unwrap());

// version - description
static RE_SINCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\S+)\s*(?:-\s*)?([\s\S]*)$").unwrap());

// url caption
static RE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\S+)\s*([\s\S]*)$").unwrap());

// type - description (first line of an example)
static RE_EXAMPLE_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([\w-]+)?\s*(?:-\s*(.*))?$").unwrap());

// -- Registry -----------------------------------------------------------------

/// Registry with every standard annotation.
pub fn registry() -> AnnotationRegistry {
    use ContextKind::*;

    AnnotationRegistry::new()
        .with(Annotation::new("access", word).with_default(|| json!("public")))
        .with(Annotation::new("alias", text).allowed_on([Function, Mixin]))
        .with(Annotation::new("author", text))
        .with(Annotation::new("content", text).allowed_on([Mixin]))
        .with(Annotation::new("deprecated", text))
        .with(Annotation::new("example", example))
        .with(
            Annotation::new("group", |s| Some(json!(s.trim().to_lowercase())))
                .with_default(|| json!("undefined")),
        )
        .with(Annotation::new("ignore", |_| None))
        .with(Annotation::new("link", link).alias("source"))
        .with(Annotation::new("output", text).allowed_on([Mixin]))
        .with(
            Annotation::new("parameter", parameter)
                .alias("param")
                .alias("arg")
                .alias("argument")
                .allowed_on([Function, Mixin]),
        )
        .with(
            Annotation::new("prop", parameter)
                .alias("property")
                .allowed_on([Variable]),
        )
        .with(Annotation::new("requires", requires).alias("require"))
        .with(
            Annotation::new("returns", returns)
                .alias("return")
                .allowed_on([Function]),
        )
        .with(Annotation::new("see", text))
        .with(Annotation::new("since", since))
        .with(
            Annotation::new("throws", text)
                .alias("throw")
                .alias("exception")
                .allowed_on([Function, Mixin]),
        )
        .with(Annotation::new("todo", text))
        .with(Annotation::new("type", text).allowed_on([Variable]))
}

// -- Annotation parsers -------------------------------------------------------

fn text(s: &str) -> Option<Value> {
    Some(Value::String(s.trim().to_string()))
}

fn word(s: &str) -> Option<Value> {
    s.split_whitespace().next().map(|w| json!(w))
}

fn parameter(s: &str) -> Option<Value> {
    let caps = RE_PARAMETER.captures(s)?;
    Some(object([
        ("type", caps.get(1).map(|m| m.as_str())),
        ("name", caps.get(2).map(|m| m.as_str())),
        ("default", caps.get(3).map(|m| m.as_str())),
        ("description", caps.get(4).map(|m| m.as_str())),
    ]))
}

fn returns(s: &str) -> Option<Value> {
    let caps = RE_RETURNS.captures(s)?;
    Some(object([
        ("type", caps.get(1).map(|m| m.as_str())),
        ("description", caps.get(2).map(|m| m.as_str())),
    ]))
}

fn requires(s: &str) -> Option<Value> {
    let caps = RE_REQUIRES.captures(s)?;
    let kind = match (caps.get(1), caps.get(2)) {
        (Some(explicit), _) => explicit.as_str(),
        (None, Some(_)) => "variable",
        (None, None) => "function",
    };
    Some(object([
        ("type", Some(kind)),
        ("name", caps.get(3).map(|m| m.as_str())),
    ]))
}

fn since(s: &str) -> Option<Value> {
    let caps = RE_SINCE.captures(s)?;
    Some(object([
        ("version", caps.get(1).map(|m| m.as_str())),
        ("description", caps.get(2).map(|m| m.as_str())),
    ]))
}

fn link(s: &str) -> Option<Value> {
    let caps = RE_LINK.captures(s)?;
    Some(object([
        ("url", caps.get(1).map(|m| m.as_str())),
        ("caption", caps.get(2).map(|m| m.as_str())),
    ]))
}

/// First line: `TYPE - DESCRIPTION`. Following lines: the code.
fn example(s: &str) -> Option<Value> {
    let (head, body) = s.split_once('\n').unwrap_or((s, ""));
    let caps = RE_EXAMPLE_HEAD.captures(head.trim());
    let kind = caps
        .as_ref()
        .and_then(|c| c.get(1))
        .map_or("scss", |m| m.as_str());
    let description = caps.as_ref().and_then(|c| c.get(2)).map(|m| m.as_str());
    let code = strip_indent(body);

    Some(object([
        ("type", Some(kind)),
        ("description", description),
        ("code", Some(code.trim_matches('\n'))),
    ]))
}

/// JSON object of the trimmed, non-empty fields.
fn object<const N: usize>(fields: [(&str, Option<&str>); N]) -> Value {
    let map: Map<String, Value> = fields
        .into_iter()
        .filter_map(|(key, value)| {
            let value = value?.trim();
            (!value.is_empty()).then(|| (key.to_string(), json!(value)))
        })
        .collect();
    Value::Object(map)
}
