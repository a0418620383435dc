//! Format-agnostic data model for parsed documentation.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Kind of declaration a documentation comment is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextKind {
    Function,
    Mixin,
    Placeholder,
    Variable,
    Unknown,
}

impl ContextKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextKind::Function => "function",
            ContextKind::Mixin => "mixin",
            ContextKind::Placeholder => "placeholder",
            ContextKind::Variable => "variable",
            ContextKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variable scope: `!global` flag present or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Private,
    Global,
}

/// 1-based, inclusive source line range of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

/// The declaration immediately following a documentation comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Context {
    Function {
        name: String,
        code: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        line: Option<LineRange>,
    },
    Mixin {
        name: String,
        code: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        line: Option<LineRange>,
    },
    Placeholder {
        name: String,
        code: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        line: Option<LineRange>,
    },
    Variable {
        name: String,
        value: String,
        scope: Scope,
        #[serde(skip_serializing_if = "Option::is_none")]
        line: Option<LineRange>,
    },
    Unknown,
}

impl Context {
    pub fn kind(&self) -> ContextKind {
        match self {
            Context::Function { .. } => ContextKind::Function,
            Context::Mixin { .. } => ContextKind::Mixin,
            Context::Placeholder { .. } => ContextKind::Placeholder,
            Context::Variable { .. } => ContextKind::Variable,
            Context::Unknown => ContextKind::Unknown,
        }
    }

    /// Declared name, if the context has one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Context::Function { name, .. }
            | Context::Mixin { name, .. }
            | Context::Placeholder { name, .. }
            | Context::Variable { name, .. } => Some(name),
            Context::Unknown => None,
        }
    }

    pub fn line(&self) -> Option<LineRange> {
        match self {
            Context::Function { line, .. }
            | Context::Mixin { line, .. }
            | Context::Placeholder { line, .. }
            | Context::Variable { line, .. } => *line,
            Context::Unknown => None,
        }
    }
}

/// Normal comment, or the one-per-file poster whose annotations every
/// following comment inherits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    Normal,
    Poster,
}

/// A documentation comment as extracted from source, before annotation parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawComment {
    pub lines: Vec<String>,
    pub kind: CommentKind,
    pub context: Context,
}

/// Accumulated value of one annotation within a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnnotationSlot {
    /// Set by a parser that returned a boolean.
    Flag(bool),
    /// Every non-boolean value, in line order.
    Values(Vec<Value>),
}

impl AnnotationSlot {
    pub fn values(&self) -> &[Value] {
        match self {
            AnnotationSlot::Values(values) => values,
            AnnotationSlot::Flag(_) => &[],
        }
    }

    pub fn flag(&self) -> Option<bool> {
        match self {
            AnnotationSlot::Flag(flag) => Some(*flag),
            AnnotationSlot::Values(_) => None,
        }
    }
}

/// One documented declaration.
///
/// Annotations serialize as top-level keys next to `description` and
/// `context`; the registry refuses annotations with those names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocRecord {
    pub description: String,
    pub context: Context,
    #[serde(flatten)]
    pub annotations: BTreeMap<String, AnnotationSlot>,
}

impl DocRecord {
    pub fn annotation(&self, name: &str) -> Option<&AnnotationSlot> {
        self.annotations.get(name)
    }
}

/// Records grouped by declaration kind, kinds in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseResult {
    groups: Vec<(ContextKind, Vec<DocRecord>)>,
}

impl ParseResult {
    pub fn push(&mut self, record: DocRecord) {
        let kind = record.context.kind();
        match self.groups.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, records)) => records.push(record),
            None => self.groups.push((kind, vec![record])),
        }
    }

    pub fn get(&self, kind: ContextKind) -> Option<&[DocRecord]> {
        self.groups
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, records)| records.as_slice())
    }

    /// Kinds present, in first-seen order.
    pub fn kinds(&self) -> impl Iterator<Item = ContextKind> + '_ {
        self.groups.iter().map(|(k, _)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ContextKind, &[DocRecord])> {
        self.groups.iter().map(|(k, r)| (*k, r.as_slice()))
    }

    /// Total number of records across all kinds.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|(_, r)| r.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Serialize for ParseResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (kind, records) in &self.groups {
            map.serialize_entry(kind.as_str(), records)?;
        }
        map.end()
    }
}
