use super::*;
use crate::ast::{ImportName, InterfaceElem, TypeExprKind};

fn parse(source: &str) -> SourceFile {
    Parser::new(source).parse_file().unwrap()
}

fn parse_err(source: &str) -> ParserError {
    Parser::new(source).parse_file().unwrap_err().error
}

#[test]
fn parse_package_clause() {
    let file = parse("package greeter\n");
    assert_eq!(file.package.name, "greeter");
    assert!(file.imports.is_empty());
    assert!(file.types.is_empty());
}

#[test]
fn missing_package_clause() {
    assert!(matches!(
        parse_err("type T int\n"),
        ParserError::MissingPackageClause { .. }
    ));
}

#[test]
fn parse_imports() {
    let file = parse(
        r#"package p

import "fmt"

import (
    "context"
    nethttp "net/http"
    . "strings"
    _ "embed"
)
"#,
    );
    let paths: Vec<&str> = file.imports.iter().map(|i| i.path.as_str()).collect();
    assert_eq!(paths, ["fmt", "context", "net/http", "strings", "embed"]);
    assert_eq!(file.imports[0].name, ImportName::Default);
    match &file.imports[2].name {
        ImportName::Alias(alias) => assert_eq!(alias.name, "nethttp"),
        other => panic!("expected alias, got {other:?}"),
    }
    assert_eq!(file.imports[3].name, ImportName::Dot);
    assert_eq!(file.imports[4].name, ImportName::Blank);
}

#[test]
fn parse_interface_methods_and_embeds() {
    let file = parse(
        r#"package p

import "io"

type ReadCloser interface {
    io.Reader
    Close() error
    Stat(name string) (size int64, err error)
}
"#,
    );
    let spec = file.type_spec("ReadCloser").unwrap();
    let iface = spec.as_interface().unwrap();
    assert_eq!(iface.elems.len(), 3);

    let embeds: Vec<String> = iface.embeds().map(|ty| ty.to_string()).collect();
    assert_eq!(embeds, ["io.Reader"]);

    let methods: Vec<&str> = iface.methods().map(|(n, _)| n.name.as_str()).collect();
    assert_eq!(methods, ["Close", "Stat"]);

    let (_, stat) = iface.methods().nth(1).unwrap();
    assert_eq!(stat.params.len(), 1);
    assert_eq!(stat.results.len(), 2);
    assert_eq!(stat.results[1].names[0].name, "err");
}

#[test]
fn grouped_parameters_keep_every_name() {
    let file = parse("package p\n\ntype A interface { Add(a, b int) int }\n");
    let iface = file.types[0].as_interface().unwrap();
    let (_, sig) = iface.methods().next().unwrap();
    assert_eq!(sig.params.len(), 1);
    let names: Vec<&str> = sig.params[0].names.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, ["a", "b"]);
    assert_eq!(sig.params[0].arity(), 2);
}

#[test]
fn unnamed_parameters_are_types() {
    let file = parse("package p\n\ntype A interface { Do(int, string, []byte) }\n");
    let iface = file.types[0].as_interface().unwrap();
    let (_, sig) = iface.methods().next().unwrap();
    let tys: Vec<String> = sig.params.iter().map(|f| f.ty.to_string()).collect();
    assert_eq!(tys, ["int", "string", "[]byte"]);
    assert!(sig.params.iter().all(|f| f.names.is_empty()));
    assert!(sig.results.is_empty());
}

#[test]
fn variadic_parameter() {
    let file = parse("package p\n\ntype L interface { Log(format string, args ...any) }\n");
    let iface = file.types[0].as_interface().unwrap();
    let (_, sig) = iface.methods().next().unwrap();
    assert!(matches!(sig.params[1].ty.kind, TypeExprKind::Variadic(_)));
    assert_eq!(sig.params[1].ty.to_string(), "...any");
}

#[test]
fn misplaced_variadic_is_rejected() {
    assert!(matches!(
        parse_err("package p\n\ntype L interface { Log(args ...any, n int) }\n"),
        ParserError::MisplacedEllipsis { .. }
    ));
}

#[test]
fn mixed_parameters_are_rejected() {
    assert!(matches!(
        parse_err("package p\n\ntype L interface { Log(a int, string) }\n"),
        ParserError::MixedParameters { .. }
    ));
}

#[test]
fn parameter_named_like_slice_type() {
    let file = parse("package p\n\ntype W interface { Write(buf []byte, list List[int]) }\n");
    let iface = file.types[0].as_interface().unwrap();
    let (_, sig) = iface.methods().next().unwrap();
    assert_eq!(sig.params[0].names[0].name, "buf");
    assert_eq!(sig.params[0].ty.to_string(), "[]byte");
    assert_eq!(sig.params[1].ty.to_string(), "List[int]");
}

#[test]
fn generic_type_declarations() {
    let file = parse(
        "package p\n\ntype Store[K comparable, V any] interface { Get(key K) (V, bool) }\n\ntype Pair[A, B any] struct { First A; Second B }\n",
    );
    let store = &file.types[0];
    assert_eq!(store.type_params.len(), 2);
    assert_eq!(store.type_params[0].names[0].name, "K");
    assert_eq!(store.type_params[0].constraint.to_string(), "comparable");

    let pair = &file.types[1];
    assert_eq!(pair.type_params.len(), 1);
    assert_eq!(pair.type_params[0].names.len(), 2);
}

#[test]
fn array_type_is_not_type_params() {
    let file = parse("package p\n\nconst N = 4\n\ntype Buf [N]byte\n");
    let buf = file.type_spec("Buf").unwrap();
    assert!(buf.type_params.is_empty());
    assert_eq!(buf.ty.to_string(), "[N]byte");
}

#[test]
fn multiplied_array_length_is_not_type_params() {
    let file = parse(
        "package p\n\nconst Size = 4\n\ntype Block [Size * 2]byte\n\ntype Wide [Size * (Size + 1)]int\n\ntype Reader interface { Read(b Block) error }\n",
    );
    let block = file.type_spec("Block").unwrap();
    assert!(block.type_params.is_empty());
    match &block.ty.kind {
        TypeExprKind::Array { len, elem } => {
            assert_eq!(len, "Size * 2");
            assert_eq!(elem.to_string(), "byte");
        }
        other => panic!("expected array, got {other:?}"),
    }
    let wide = file.type_spec("Wide").unwrap();
    assert!(wide.type_params.is_empty());
    assert_eq!(wide.ty.to_string(), "[Size * (Size + 1)]int");
    assert!(file.type_spec("Reader").unwrap().as_interface().is_some());
}

#[test]
fn pointer_constraint_starts_type_params() {
    let file = parse(
        "package p\n\ntype Ptr[P *Node] struct{ Value P }\n\ntype Pair[P *Node, Q any] struct{}\n\ntype Ref[P *pkg.Node] struct{}\n",
    );
    for name in ["Ptr", "Pair", "Ref"] {
        let spec = file.type_spec(name).unwrap();
        assert!(!spec.type_params.is_empty(), "{name} should be generic");
    }
    assert_eq!(
        file.type_spec("Ptr").unwrap().type_params[0].constraint.to_string(),
        "*Node"
    );
}

#[test]
fn constraint_unions() {
    let file = parse("package p\n\ntype Number interface { ~int | ~int64 | float64 }\n");
    let iface = file.types[0].as_interface().unwrap();
    let embed = iface.embeds().next().unwrap();
    match &embed.kind {
        TypeExprKind::Union(terms) => assert_eq!(terms.len(), 3),
        other => panic!("expected union, got {other:?}"),
    }
    assert_eq!(embed.to_string(), "~int | ~int64 | float64");
}

#[test]
fn type_alias_and_grouped_types() {
    let file = parse(
        "package p\n\ntype (\n    ID = string\n    Handler func(ID) error\n)\n",
    );
    assert_eq!(file.types.len(), 2);
    assert!(file.types[0].alias);
    assert!(!file.types[1].alias);
    assert_eq!(file.types[1].ty.to_string(), "func(ID) error");
}

#[test]
fn functions_vars_and_consts_are_skipped() {
    let file = parse(
        r#"package p

var defaults = map[string]int{"a": 1, "b": 2}

const (
    A = iota
    B
)

func (s *server) Handle(w io.Writer) error {
    if s == nil {
        return nil
    }
    for _, x := range []int{1, 2} {
        _ = x
    }
    return nil
}

type Server interface { Handle(w io.Writer) error }
"#,
    );
    assert_eq!(file.types.len(), 1);
    assert!(file.types[0].is_interface());
}

#[test]
fn unclosed_function_body() {
    assert!(matches!(
        parse_err("package p\n\nfunc f() {\n    x := 1\n"),
        ParserError::UnclosedDelimiter { .. }
    ));
}

#[test]
fn lexical_errors_take_priority() {
    match parse_err("package p\n\nvar s = \"unterminated\n") {
        ParserError::Lexical { errors, .. } => {
            assert!(matches!(errors[0], LexerError::UnterminatedString { .. }))
        }
        other => panic!("expected lexical error, got {other:?}"),
    }
}

#[test]
fn build_constraint_is_recorded() {
    let file = parse("//go:build ignore\n\npackage main\n");
    assert_eq!(file.build_constraint.as_deref(), Some("ignore"));
    assert_eq!(parse("package p\n").build_constraint, None);
}

#[test]
fn channels_and_func_values() {
    let file = parse(
        "package p\n\ntype S interface { Watch(ctx context.Context, done <-chan struct{}) (chan<- Event, func()) }\n",
    );
    let iface = file.types[0].as_interface().unwrap();
    let (_, sig) = iface.methods().next().unwrap();
    assert_eq!(sig.params[1].ty.to_string(), "<-chan struct{}");
    assert_eq!(sig.results[0].ty.to_string(), "chan<- Event");
    assert_eq!(sig.results[1].ty.to_string(), "func()");
    assert!(matches!(
        iface.elems[0],
        InterfaceElem::Method { ref name, .. } if name.name == "Watch"
    ));
}
