//! Documentation comment extraction.
//!
//! Finds `/** ... */` block comments and runs of `///` line comments,
//! strips the comment syntax and common indentation, groups annotation
//! continuation lines, and attaches the declaration that follows each
//! comment.

use crate::model::{CommentKind, RawComment};
use crate::parser::context::parse_context;
use crate::parser::lines::LineIndex;
use regex::Regex;
use std::sync::LazyLock;

// Either a run of `///` lines, or a `/** ... */` block. For blocks, group 1
// is the body and group 2 the closing asterisks.
static RE_DOC_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?m)(?:[ \t]*///.*\S*[\s]?)+$",
        r"|^[ \t]*/\*\*((?:[^*]|[\r\n]|(?:\*+(?:[^*/]|[\r\n])))*)(\*+)/",
    ))
    .unwrap()
});

static RE_LEADING_STAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\*").unwrap());

/// Extract every documentation comment in `code`, in source order.
pub fn extract_comments(code: &str) -> Vec<RawComment> {
    let index = LineIndex::new(code);
    let mut comments = Vec::new();

    for caps in RE_DOC_COMMENT.captures_iter(code) {
        let Some(whole) = caps.get(0) else {
            continue;
        };

        let (lines, kind) = match (caps.get(1), caps.get(2)) {
            (Some(body), Some(stars)) => {
                let kind = if stars.as_str().len() > 1 {
                    CommentKind::Poster
                } else {
                    CommentKind::Normal
                };
                (clean_block_comment(body.as_str()), kind)
            }
            _ => clean_line_comments(whole.as_str()),
        };

        let base = whole.end();
        let line_for = |offset: usize| index.line_for(base + offset);
        let context = parse_context(&code[base..], Some(&line_for));

        comments.push(RawComment {
            lines: group_lines(lines),
            kind,
            context,
        });
    }

    tracing::debug!(count = comments.len(), "extracted documentation comments");
    comments
}

/// Clean the body of a `/** ... */` comment.
///
/// The opening line and the line holding the closing delimiter are dropped,
/// then one leading `*` per line and the common indentation.
fn clean_block_comment(body: &str) -> Vec<String> {
    let mut text = body;
    if let Some(first_break) = text.find(['\r', '\n']) {
        text = text[first_break..].trim_start_matches(['\r', '\n']);
        if let Some(last_break) = text.rfind(['\r', '\n']) {
            text = &text[..last_break];
        }
    }
    let unstarred = RE_LEADING_STAR.replace_all(text, "");
    split_lines(&strip_indent(&unstarred))
}

/// Clean a run of `///` comment lines. A run opened by `////` is a poster
/// and loses its first line.
fn clean_line_comments(run: &str) -> (Vec<String>, CommentKind) {
    let mut lines: Vec<&str> = run
        .lines()
        .map(|line| line.trim_start_matches([' ', '\t']).trim_start_matches('/'))
        .collect();

    let kind = if run.trim_start().starts_with("////") {
        if !lines.is_empty() {
            lines.remove(0);
        }
        CommentKind::Poster
    } else {
        CommentKind::Normal
    };

    (split_lines(&strip_indent(&lines.join("\n"))), kind)
}

fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

/// Remove the smallest leading `[ \t]` indentation found on non-blank lines
/// from every line that has at least that much.
pub(crate) fn strip_indent(text: &str) -> String {
    let indent_of = |line: &str| line.len() - line.trim_start_matches([' ', '\t']).len();

    let indent = text
        .split('\n')
        .filter(|line| {
            line.trim_start_matches([' ', '\t'])
                .chars()
                .next()
                .is_some_and(|c| !c.is_whitespace())
        })
        .map(indent_of)
        .min()
        .unwrap_or(0);

    if indent == 0 {
        return text.to_string();
    }

    text.split('\n')
        .map(|line| {
            if indent_of(line) >= indent {
                &line[indent..]
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

enum GroupState {
    NoAnnotationYet,
    InAnnotation(String),
}

/// Drop `---` separator lines and fold every line following an `@` line
/// into it, up to the next `@` line.
pub fn group_lines(lines: Vec<String>) -> Vec<String> {
    let mut grouped = Vec::with_capacity(lines.len());
    let mut state = GroupState::NoAnnotationYet;

    for line in lines {
        if line.trim_start().starts_with("---") {
            continue;
        }
        let is_annotation = line.starts_with('@');

        state = match (state, is_annotation) {
            (GroupState::NoAnnotationYet, false) => {
                grouped.push(line);
                GroupState::NoAnnotationYet
            }
            (GroupState::NoAnnotationYet, true) => GroupState::InAnnotation(line),
            (GroupState::InAnnotation(current), true) => {
                grouped.push(current);
                GroupState::InAnnotation(line)
            }
            (GroupState::InAnnotation(mut current), false) => {
                current.push('\n');
                current.push_str(&line);
                GroupState::InAnnotation(current)
            }
        };
    }

    if let GroupState::InAnnotation(current) = state {
        grouped.push(current);
    }
    grouped
}
