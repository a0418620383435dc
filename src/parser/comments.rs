//! Comment-to-record parser.
//!
//! Resolves `@name` tags through the annotation registry, accumulates their
//! values, applies poster inheritance and registered defaults, and groups
//! the finished records by declaration kind.

use crate::annotation::AnnotationRegistry;
use crate::model::*;
use crate::warning::Warning;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static RE_ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@([A-Za-z0-9_]+)").unwrap());

/// Records and warnings from one parse call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parsed {
    pub result: ParseResult,
    pub warnings: Vec<Warning>,
}

/// Turn extracted comments into documentation records.
pub fn parse_comments(comments: Vec<RawComment>, registry: &AnnotationRegistry) -> Parsed {
    let mut parsed = Parsed::default();
    let mut poster: Option<BTreeMap<String, AnnotationSlot>> = None;

    for comment in comments {
        let mut record = parse_record(comment.lines, comment.context, registry, &mut parsed.warnings);

        if comment.kind == CommentKind::Poster {
            // Posters never reach the output; only the first one is kept
            if poster.is_none() {
                poster = Some(record.annotations);
            } else {
                parsed.warnings.push(Warning::DuplicatePoster);
            }
            continue;
        }

        if let Some(poster) = &poster {
            for (name, slot) in poster {
                record
                    .annotations
                    .entry(name.clone())
                    .or_insert_with(|| slot.clone());
            }
        }

        for annotation in registry.iter() {
            if record.annotations.contains_key(annotation.name()) {
                continue;
            }
            if let Some(value) = annotation.default_value() {
                record
                    .annotations
                    .insert(annotation.name().to_string(), AnnotationSlot::Values(vec![value]));
            }
        }

        parsed.result.push(record);
    }

    tracing::debug!(
        records = parsed.result.len(),
        warnings = parsed.warnings.len(),
        "parsed documentation comments"
    );
    parsed
}

/// Parse the lines of one comment. Lines without a leading `@name` form
/// the description.
fn parse_record(
    lines: Vec<String>,
    context: Context,
    registry: &AnnotationRegistry,
    warnings: &mut Vec<Warning>,
) -> DocRecord {
    let kind = context.kind();
    let mut description = String::new();
    let mut annotations: BTreeMap<String, AnnotationSlot> = BTreeMap::new();

    for line in &lines {
        let Some(caps) = RE_ANNOTATION.captures(line) else {
            description.push_str(line);
            description.push('\n');
            continue;
        };

        let tag = &caps[1];
        let name = registry.resolve(tag);
        let Some(annotation) = registry.get(name) else {
            tracing::trace!(tag, "unknown annotation");
            warnings.push(Warning::UnknownAnnotation(tag.to_string()));
            continue;
        };
        if !annotation.is_allowed_on(kind) {
            warnings.push(Warning::NotAllowed {
                name: name.to_string(),
                kind,
            });
            continue;
        }

        let content = line[caps[0].len()..].trim_matches([' ', '\t']);
        // The slot counts as set even when the parser yields nothing
        let slot = annotations
            .entry(name.to_string())
            .or_insert_with(|| AnnotationSlot::Values(Vec::new()));

        match annotation.parse(content) {
            Some(Value::Bool(flag)) => *slot = AnnotationSlot::Flag(flag),
            Some(value) => match slot {
                AnnotationSlot::Values(values) => values.push(value),
                AnnotationSlot::Flag(_) => *slot = AnnotationSlot::Values(vec![value]),
            },
            None => {}
        }
    }

    DocRecord {
        description,
        context,
        annotations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::Annotation;
    use serde_json::json;

    fn registry() -> AnnotationRegistry {
        AnnotationRegistry::new()
            .with(Annotation::new("ignore", |_| None))
            .with(
                Annotation::new("test", |_| Some(json!("Working")))
                    .alias("aliasTest")
                    .with_default(|| json!("Default")),
            )
            .with(Annotation::new("flag", |_| Some(json!(true))))
            .with(Annotation::new("multiline", |s| Some(json!(s))))
            .with(
                Annotation::new("allowedLimited", |_| None)
                    .allowed_on([ContextKind::Placeholder]),
            )
    }

    fn comment(lines: &[&str], context: Context) -> RawComment {
        RawComment {
            lines: lines.iter().map(|s| s.to_string()).collect(),
            kind: CommentKind::Normal,
            context,
        }
    }

    fn poster(lines: &[&str]) -> RawComment {
        RawComment {
            kind: CommentKind::Poster,
            ..comment(lines, Context::Unknown)
        }
    }

    fn mixin(name: &str) -> Context {
        Context::Mixin {
            name: name.to_string(),
            code: String::new(),
            line: None,
        }
    }

    fn variable(name: &str) -> Context {
        Context::Variable {
            name: name.to_string(),
            value: "1".to_string(),
            scope: Scope::Private,
            line: None,
        }
    }

    fn fixture() -> Vec<RawComment> {
        vec![
            comment(&["test", "test", "@test"], Context::Unknown),
            comment(&["test", "test", " @test"], Context::Unknown),
            comment(&["test", "@ignore ingore this", "test", "@ignore ingore this"], Context::Unknown),
            comment(&["test", "test", "@aliasTest"], mixin("a")),
            comment(&["test", "test", "@test"], mixin("b")),
            comment(&["test", "test", "@test"], variable("a")),
            comment(&["test", "test", "@flag"], variable("b")),
            comment(&["@multiline\nThis is a\nmultiline\nannotation\n"], variable("c")),
        ]
    }

    #[test]
    fn groups_by_context_kind() {
        let parsed = parse_comments(fixture(), &registry());
        let result = &parsed.result;
        assert_eq!(result.get(ContextKind::Unknown).map(|r| r.len()), Some(3));
        assert_eq!(result.get(ContextKind::Mixin).map(|r| r.len()), Some(2));
        assert_eq!(result.get(ContextKind::Variable).map(|r| r.len()), Some(3));
        let kinds: Vec<_> = result.kinds().collect();
        assert_eq!(
            kinds,
            vec![ContextKind::Unknown, ContextKind::Mixin, ContextKind::Variable]
        );
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn value_is_a_single_element_list() {
        let parsed = parse_comments(fixture(), &registry());
        let first = &parsed.result.get(ContextKind::Unknown).unwrap()[0];
        assert_eq!(
            first.annotation("test"),
            Some(&AnnotationSlot::Values(vec![json!("Working")]))
        );
    }

    #[test]
    fn adds_default_values() {
        let parsed = parse_comments(fixture(), &registry());
        let flagged = &parsed.result.get(ContextKind::Variable).unwrap()[1];
        assert_eq!(flagged.annotation("test").unwrap().values(), &[json!("Default")]);
    }

    #[test]
    fn joins_plain_lines_into_description() {
        let parsed = parse_comments(fixture(), &registry());
        let first = &parsed.result.get(ContextKind::Unknown).unwrap()[0];
        assert_eq!(first.description, "test\ntest\n");
    }

    #[test]
    fn resolves_alias_to_canonical_name() {
        let parsed = parse_comments(fixture(), &registry());
        let aliased = &parsed.result.get(ContextKind::Mixin).unwrap()[0];
        assert_eq!(aliased.annotation("test").unwrap().values(), &[json!("Working")]);
        assert!(aliased.annotation("aliasTest").is_none());
    }

    #[test]
    fn boolean_result_is_a_flag() {
        let parsed = parse_comments(fixture(), &registry());
        let flagged = &parsed.result.get(ContextKind::Variable).unwrap()[1];
        assert_eq!(flagged.annotation("flag").and_then(|s| s.flag()), Some(true));
    }

    #[test]
    fn multiline_annotation_keeps_newlines() {
        let parsed = parse_comments(fixture(), &registry());
        let multi = &parsed.result.get(ContextKind::Variable).unwrap()[2];
        assert_eq!(
            multi.annotation("multiline").unwrap().values(),
            &[json!("\nThis is a\nmultiline\nannotation\n")]
        );
    }

    #[test]
    fn indented_tag_is_description() {
        let parsed = parse_comments(fixture(), &registry());
        let second = &parsed.result.get(ContextKind::Unknown).unwrap()[1];
        assert_eq!(second.description, "test\ntest\n @test\n");
        assert_eq!(second.annotation("test").unwrap().values(), &[json!("Default")]);
    }

    #[test]
    fn empty_result_still_sets_slot() {
        let parsed = parse_comments(fixture(), &registry());
        let ignored = &parsed.result.get(ContextKind::Unknown).unwrap()[2];
        assert_eq!(ignored.annotation("ignore"), Some(&AnnotationSlot::Values(vec![])));
        assert_eq!(ignored.description, "test\ntest\n");
    }

    #[test]
    fn warns_on_unknown_annotation() {
        let parsed = parse_comments(vec![comment(&["@notFound", "text"], Context::Unknown)], &registry());
        assert_eq!(
            parsed.warnings,
            vec![Warning::UnknownAnnotation("notFound".to_string())]
        );
        let record = &parsed.result.get(ContextKind::Unknown).unwrap()[0];
        assert_eq!(record.description, "text\n");
        assert!(record.annotation("notFound").is_none());
    }

    #[test]
    fn warns_on_disallowed_kind() {
        let parsed = parse_comments(vec![comment(&["@allowedLimited"], variable("x"))], &registry());
        assert_eq!(
            parsed.warnings,
            vec![Warning::NotAllowed {
                name: "allowedLimited".to_string(),
                kind: ContextKind::Variable,
            }]
        );
        let record = &parsed.result.get(ContextKind::Variable).unwrap()[0];
        assert!(record.annotation("allowedLimited").is_none());
    }

    #[test]
    fn allowed_kind_is_accepted() {
        let placeholder = Context::Placeholder {
            name: "p".to_string(),
            code: String::new(),
            line: None,
        };
        let parsed = parse_comments(vec![comment(&["@allowedLimited"], placeholder)], &registry());
        assert!(parsed.warnings.is_empty());
        let record = &parsed.result.get(ContextKind::Placeholder).unwrap()[0];
        assert_eq!(record.annotation("allowedLimited"), Some(&AnnotationSlot::Values(vec![])));
    }

    #[test]
    fn poster_annotations_are_inherited() {
        let comments = vec![
            poster(&["@flag", "@multiline from poster"]),
            comment(&["first"], mixin("a")),
            comment(&["second", "@multiline own"], mixin("b")),
        ];
        let parsed = parse_comments(comments, &registry());
        let mixins = parsed.result.get(ContextKind::Mixin).unwrap();

        assert_eq!(parsed.result.len(), 2);
        assert!(parsed.result.get(ContextKind::Unknown).is_none());
        assert_eq!(mixins[0].annotation("flag").and_then(|s| s.flag()), Some(true));
        assert_eq!(mixins[0].annotation("multiline").unwrap().values(), &[json!("from poster")]);
        assert_eq!(mixins[1].annotation("flag").and_then(|s| s.flag()), Some(true));
        assert_eq!(mixins[1].annotation("multiline").unwrap().values(), &[json!("own")]);
    }

    #[test]
    fn poster_value_beats_default() {
        let comments = vec![poster(&["@test"]), comment(&["x"], Context::Unknown)];
        let parsed = parse_comments(comments, &registry());
        let record = &parsed.result.get(ContextKind::Unknown).unwrap()[0];
        assert_eq!(record.annotation("test").unwrap().values(), &[json!("Working")]);
    }

    #[test]
    fn comments_before_poster_do_not_inherit() {
        let comments = vec![
            comment(&["before"], Context::Unknown),
            poster(&["@flag"]),
            comment(&["after"], Context::Unknown),
        ];
        let parsed = parse_comments(comments, &registry());
        let records = parsed.result.get(ContextKind::Unknown).unwrap();
        assert!(records[0].annotation("flag").is_none());
        assert_eq!(records[1].annotation("flag").and_then(|s| s.flag()), Some(true));
    }

    #[test]
    fn second_poster_is_ignored_with_warning() {
        let comments = vec![
            poster(&["@flag"]),
            poster(&["@multiline second"]),
            comment(&["item"], Context::Unknown),
        ];
        let parsed = parse_comments(comments, &registry());
        assert_eq!(parsed.warnings, vec![Warning::DuplicatePoster]);
        let record = &parsed.result.get(ContextKind::Unknown).unwrap()[0];
        assert_eq!(record.annotation("flag").and_then(|s| s.flag()), Some(true));
        assert!(record.annotation("multiline").is_none());
        assert_eq!(parsed.result.len(), 1);
    }

    #[test]
    fn later_value_replaces_flag() {
        let registry = AnnotationRegistry::new().with(Annotation::new("mode", |s| {
            if s.is_empty() {
                Some(json!(false))
            } else {
                Some(json!(s))
            }
        }));
        let parsed = parse_comments(vec![comment(&["@mode", "@mode on"], Context::Unknown)], &registry);
        let record = &parsed.result.get(ContextKind::Unknown).unwrap()[0];
        assert_eq!(record.annotation("mode").unwrap().values(), &[json!("on")]);
    }
}
