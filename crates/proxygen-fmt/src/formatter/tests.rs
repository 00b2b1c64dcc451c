use super::*;
use crate::config::CANONICAL;

/// Helper to format and return just the output string
fn fmt(source: &str) -> String {
    Canonical::new(CANONICAL).format(source).unwrap().output
}

fn fmt_err(source: &str) -> FormatError {
    Canonical::new(CANONICAL).format(source).unwrap_err()
}

#[test]
fn test_canonical_source_is_unchanged() {
    let source = "package p\n\nimport (\n\t\"fmt\"\n)\n\nfunc f() {\n\tfmt.Println(\"hi\")\n}\n";
    let result = Canonical::default().format(source).unwrap();
    assert_eq!(result.output, source);
    assert!(!result.changed);
}

#[test]
fn test_reindents_by_delimiter_depth() {
    let source = "package p\n\ntype T struct {\n        a int\n  b struct {\nc string\n    }\n}\n\nfunc (t *T) F(x int) int {\n  if x > 0 {\n  return g(\n  x,\n  )\n  }\n  return 0\n}\n";
    let expected = "package p\n\ntype T struct {\n\ta int\n\tb struct {\n\t\tc string\n\t}\n}\n\nfunc (t *T) F(x int) int {\n\tif x > 0 {\n\t\treturn g(\n\t\t\tx,\n\t\t)\n\t}\n\treturn 0\n}\n";
    assert_eq!(fmt(source), expected);
}

#[test]
fn test_strips_trailing_whitespace_and_collapses_blank_lines() {
    let source = "\n\npackage p   \n\n\n\nvar x = 1\t\n\n\n";
    assert_eq!(fmt(source), "package p\n\nvar x = 1\n");
}

#[test]
fn test_removes_blank_lines_inside_delimiters() {
    let source = "package p\n\nfunc f() {\n\n\tg()\n\n}\n";
    assert_eq!(fmt(source), "package p\n\nfunc f() {\n\tg()\n}\n");
}

#[test]
fn test_raw_strings_are_left_alone() {
    let source = "package p\n\nfunc f() {\n\tx := `line one\n   indented   \n\nlast`\n\t_ = x\n}\n";
    assert_eq!(fmt(source), source);
}

#[test]
fn test_comment_lines_follow_depth() {
    let source = "package p\n\nfunc f() {\n// comment\n  g()\n}\n";
    assert_eq!(fmt(source), "package p\n\nfunc f() {\n\t// comment\n\tg()\n}\n");
}

#[test]
fn test_adds_trailing_newline() {
    assert_eq!(fmt("package p"), "package p\n");
}

#[test]
fn test_rejects_unbalanced_delimiters() {
    match fmt_err("package p\n\nfunc f() {\n\tg(]\n}\n") {
        FormatError::Syntax { message, .. } => assert!(message.contains("unbalanced")),
        other => panic!("expected syntax error, got {other:?}"),
    }
    match fmt_err("package p\n\nfunc f() {\n") {
        FormatError::Syntax { message, .. } => assert!(message.contains("unclosed")),
        other => panic!("expected syntax error, got {other:?}"),
    }
}

#[test]
fn test_rejects_lexical_errors() {
    assert!(matches!(
        fmt_err("package p\n\nvar s = \"open\n"),
        FormatError::Syntax { .. }
    ));
}

#[test]
fn test_rejects_invalid_top_level() {
    assert!(matches!(
        fmt_err("package p\n\nx := 1\n"),
        FormatError::Syntax { .. }
    ));
    assert!(matches!(fmt_err("type T int\n"), FormatError::Syntax { .. }));
}

#[test]
fn test_builtin_choice() {
    let formatter = FormatterChoice::Builtin.build();
    assert_eq!(formatter.name(), "builtin");
    assert_eq!(formatter.format("package p\n").unwrap().output, "package p\n");
}

#[test]
fn test_missing_gofmt_binary_fails_to_spawn() {
    let gofmt = Gofmt::new("/nonexistent/path/gofmt-xyz123");
    assert!(matches!(
        gofmt.format("package p\n"),
        Err(FormatError::Spawn { .. })
    ));
}
