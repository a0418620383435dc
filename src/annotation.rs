//! Annotation registry: maps `@name` tags to their parsers.
//!
//! Built once by the caller and shared read-only across every parse call.

use crate::model::ContextKind;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Parses the text following an `@name` tag. `None` consumes the tag
/// without contributing a value; `Some(Value::Bool(_))` sets a flag.
pub type ParseFn = Box<dyn Fn(&str) -> Option<Value> + Send + Sync>;

/// Produces the value used when a record never sets the annotation.
pub type DefaultFn = Box<dyn Fn() -> Value + Send + Sync>;

/// Record fields that share the serialized namespace with annotations.
pub const RESERVED_NAMES: &[&str] = &["description", "context"];

/// One registered annotation.
pub struct Annotation {
    name: String,
    aliases: Vec<String>,
    parse: ParseFn,
    default: Option<DefaultFn>,
    allowed_on: Option<Vec<ContextKind>>,
}

impl Annotation {
    pub fn new<F>(name: impl Into<String>, parse: F) -> Self
    where
        F: Fn(&str) -> Option<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            parse: Box::new(parse),
            default: None,
            allowed_on: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn with_default<F>(mut self, default: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = Some(Box::new(default));
        self
    }

    /// Restrict the annotation to the given declaration kinds.
    pub fn allowed_on(mut self, kinds: impl IntoIterator<Item = ContextKind>) -> Self {
        self.allowed_on = Some(kinds.into_iter().collect());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn parse(&self, text: &str) -> Option<Value> {
        (self.parse)(text)
    }

    pub fn default_value(&self) -> Option<Value> {
        self.default.as_ref().map(|f| f())
    }

    pub fn is_allowed_on(&self, kind: ContextKind) -> bool {
        match &self.allowed_on {
            Some(kinds) => kinds.contains(&kind),
            None => true,
        }
    }
}

impl fmt::Debug for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Annotation")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("has_default", &self.default.is_some())
            .field("allowed_on", &self.allowed_on)
            .finish()
    }
}

/// Annotations by canonical name, plus the alias table.
#[derive(Debug, Default)]
pub struct AnnotationRegistry {
    annotations: BTreeMap<String, Annotation>,
    aliases: HashMap<String, String>,
}

impl AnnotationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an annotation, replacing any earlier one with the same name.
    /// Annotations named after a record field are ignored.
    pub fn register(&mut self, annotation: Annotation) {
        if RESERVED_NAMES.contains(&annotation.name.as_str()) {
            tracing::debug!(name = %annotation.name, "ignoring annotation with reserved name");
            return;
        }
        for alias in &annotation.aliases {
            self.aliases.insert(alias.clone(), annotation.name.clone());
        }
        self.annotations.insert(annotation.name.clone(), annotation);
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, annotation: Annotation) -> Self {
        self.register(annotation);
        self
    }

    /// Canonical name for `name`: its alias target, or `name` itself.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map_or(name, String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&Annotation> {
        self.annotations.get(name)
    }

    /// Registered annotations in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.values()
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}
