//! Warnings raised while parsing documentation comments.
//!
//! None of them stop a parse; they are returned next to the records.

use crate::model::ContextKind;
use thiserror::Error;

/// Non-fatal problems found while turning comments into records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Tag with no registered parser; holds the tag as written.
    #[error("Parser for annotation `{0}` not found.")]
    UnknownAnnotation(String),

    #[error("Annotation \"{name}\" is not allowed on comment from type \"{kind}\"")]
    NotAllowed { name: String, kind: ContextKind },

    #[error("You can't have more than one poster comment.")]
    DuplicatePoster,
}
