//! Extract structured documentation from annotated SCSS sources.
//!
//! Documentation comments (`/** ... */` blocks or `///` runs) are paired with
//! the declaration that follows them, their `@annotation` tags are parsed
//! through an [`AnnotationRegistry`], and the resulting records are grouped
//! by declaration kind.
//!
//! ```ignore
//! let parsed = scssdoc::parse(source, &scssdoc::builtin::registry());
//! for warning in &parsed.warnings {
//!     eprintln!("warning: {warning}");
//! }
//! ```

pub mod annotation;
pub mod builtin;
pub mod model;
pub mod parser;
pub mod warning;

pub use annotation::{Annotation, AnnotationRegistry};
pub use model::{
    AnnotationSlot, CommentKind, Context, ContextKind, DocRecord, LineRange, ParseResult,
    RawComment, Scope,
};
pub use parser::{parse, Parsed, ScssCommentParser};
pub use warning::Warning;
