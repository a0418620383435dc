//! SCSS source to grouped documentation records.
//!
//! `extract` finds the comments (using `context`, `braces` and `lines`),
//! `comments` turns them into records through an annotation registry.

pub mod braces;
pub mod comments;
pub mod context;
pub mod extract;
pub mod lines;

pub use comments::{parse_comments, Parsed};

use crate::annotation::AnnotationRegistry;

/// Parse one SCSS buffer into records grouped by declaration kind.
pub fn parse(code: &str, registry: &AnnotationRegistry) -> Parsed {
    parse_comments(extract::extract_comments(code), registry)
}

/// Parser bound to a registry, for parsing many buffers.
#[derive(Debug, Default)]
pub struct ScssCommentParser {
    registry: AnnotationRegistry,
}

impl ScssCommentParser {
    pub fn new(registry: AnnotationRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &AnnotationRegistry {
        &self.registry
    }

    pub fn parse(&self, code: &str) -> Parsed {
        parse(code, &self.registry)
    }
}
