//! Declaration context parser.
//!
//! Classifies the code that follows a documentation comment as a function,
//! mixin, placeholder, variable, or unknown construct.

use crate::model::{Context, LineRange, Scope};
use crate::parser::braces;
use regex::Regex;
use std::sync::LazyLock;

// Groups: 1 sigil, 2 identifier, 3 callable name, 4 variable value, 5 variable flags
static RE_CONTEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(@|%|\$)([\w-]+)?(?:\s+([\w-]+)|[\s\S]*?:([\s\S]*?)((?:\s*!\w+)*)\s*;)?")
        .unwrap()
});

/// Parse the declaration at the start of `code`.
///
/// `line_for` maps an offset into `code` to a 1-based source line; when
/// given, the context records the lines its declaration spans.
pub fn parse_context(code: &str, line_for: Option<&dyn Fn(usize) -> usize>) -> Context {
    let trimmed = code.trim_start();
    let lead = code.len() - trimmed.len();

    let Some(caps) = RE_CONTEXT.captures(trimmed) else {
        return Context::Unknown;
    };
    let Some(ident) = caps.get(2).map(|m| m.as_str()) else {
        return Context::Unknown;
    };
    // Offset of the last character of the matched header
    let header_end = lead + caps[0].len() - 1;

    let line = |end: usize| {
        line_for.map(|f| LineRange {
            start: f(lead),
            end: f(end),
        })
    };

    match &caps[1] {
        "@" if ident == "function" || ident == "mixin" => {
            let Some(name) = caps.get(3).map(|m| m.as_str().to_string()) else {
                return Context::Unknown;
            };
            let (code, end) = body(code, lead, header_end);
            let line = line(end);
            if ident == "function" {
                Context::Function { name, code, line }
            } else {
                Context::Mixin { name, code, line }
            }
        }
        "%" => {
            let (code, end) = body(code, lead, header_end);
            Context::Placeholder {
                name: ident.to_string(),
                code,
                line: line(end),
            }
        }
        "$" => {
            let Some(value) = caps.get(4) else {
                return Context::Unknown;
            };
            let global = caps
                .get(5)
                .is_some_and(|flags| flags.as_str().split('!').any(|f| f.trim() == "global"));
            let scope = if global { Scope::Global } else { Scope::Private };
            Context::Variable {
                name: ident.to_string(),
                value: value.as_str().trim().to_string(),
                scope,
                line: line(header_end),
            }
        }
        _ => Context::Unknown,
    }
}

/// Block body following the header, and the offset the declaration ends at:
/// the closing brace, or the header end when there is no block.
fn body(code: &str, from: usize, header_end: usize) -> (String, usize) {
    match braces::block_span(code, from) {
        Some(span) => (code[span.start..span.end].to_string(), span.end),
        None => (String::new(), header_end),
    }
}
