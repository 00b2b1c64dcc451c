// ast_display.rs
//
// Render syntax back to Go source text, as written (no qualification).

use std::fmt;

use crate::ast::{ChanDir, Field, InterfaceElem, Signature, TypeExpr, TypeExprKind};

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeExprKind::Named {
                package,
                name,
                type_args,
            } => {
                if let Some(pkg) = package {
                    write!(f, "{}.", pkg.name)?;
                }
                f.write_str(&name.name)?;
                if !type_args.is_empty() {
                    f.write_str("[")?;
                    write_list(f, type_args, ", ")?;
                    f.write_str("]")?;
                }
                Ok(())
            }
            TypeExprKind::Pointer(elem) => write!(f, "*{elem}"),
            TypeExprKind::Slice(elem) => write!(f, "[]{elem}"),
            TypeExprKind::Array { len, elem } => write!(f, "[{len}]{elem}"),
            TypeExprKind::Map { key, value } => write!(f, "map[{key}]{value}"),
            TypeExprKind::Chan { dir, elem } => match dir {
                ChanDir::Both => write!(f, "chan {elem}"),
                ChanDir::Send => write!(f, "chan<- {elem}"),
                ChanDir::Recv => write!(f, "<-chan {elem}"),
            },
            TypeExprKind::Func(sig) => write!(f, "func{sig}"),
            TypeExprKind::Interface(iface) => {
                if iface.elems.is_empty() {
                    return f.write_str("interface{}");
                }
                f.write_str("interface{ ")?;
                for (i, elem) in iface.elems.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    match elem {
                        InterfaceElem::Method { name, sig } => write!(f, "{}{sig}", name.name)?,
                        InterfaceElem::Embed(ty) => write!(f, "{ty}")?,
                    }
                }
                f.write_str(" }")
            }
            TypeExprKind::Struct(fields) => {
                if fields.is_empty() {
                    return f.write_str("struct{}");
                }
                f.write_str("struct{ ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    if !field.names.is_empty() {
                        let names: Vec<&str> =
                            field.names.iter().map(|n| n.name.as_str()).collect();
                        write!(f, "{} ", names.join(", "))?;
                    }
                    write!(f, "{}", field.ty)?;
                    if let Some(tag) = &field.tag {
                        write!(f, " {tag}")?;
                    }
                }
                f.write_str(" }")
            }
            TypeExprKind::Variadic(elem) => write!(f, "...{elem}"),
            TypeExprKind::Tilde(elem) => write!(f, "~{elem}"),
            TypeExprKind::Union(terms) => write_list(f, terms, " | "),
            TypeExprKind::Paren(inner) => write!(f, "({inner})"),
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        write_fields(f, &self.params)?;
        f.write_str(")")?;
        match self.results.as_slice() {
            [] => Ok(()),
            [single] if single.names.is_empty() => write!(f, " {}", single.ty),
            results => {
                f.write_str(" (")?;
                write_fields(f, results)?;
                f.write_str(")")
            }
        }
    }
}

fn write_fields(f: &mut fmt::Formatter<'_>, fields: &[Field]) -> fmt::Result {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        if !field.names.is_empty() {
            let names: Vec<&str> = field.names.iter().map(|n| n.name.as_str()).collect();
            write!(f, "{} ", names.join(", "))?;
        }
        write!(f, "{}", field.ty)?;
    }
    Ok(())
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[TypeExpr], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::Parser;

    fn roundtrip(ty: &str) -> String {
        let source = format!("package p\n\ntype T {ty}\n");
        let file = Parser::new(&source).parse_file().expect("parse");
        file.types[0].ty.to_string()
    }

    #[test]
    fn renders_composite_types() {
        assert_eq!(roundtrip("map[string][]*io.Reader"), "map[string][]*io.Reader");
        assert_eq!(roundtrip("[4]byte"), "[4]byte");
        assert_eq!(roundtrip("<-chan error"), "<-chan error");
        assert_eq!(roundtrip("chan<- int"), "chan<- int");
        assert_eq!(roundtrip("Pair[string, int]"), "Pair[string, int]");
    }

    #[test]
    fn renders_function_types() {
        assert_eq!(
            roundtrip("func(a, b int, rest ...string) (n int, err error)"),
            "func(a, b int, rest ...string) (n int, err error)"
        );
        assert_eq!(roundtrip("func(int) error"), "func(int) error");
        assert_eq!(roundtrip("func()"), "func()");
    }

    #[test]
    fn renders_inline_interfaces_and_structs() {
        assert_eq!(roundtrip("interface{}"), "interface{}");
        assert_eq!(
            roundtrip("interface{ Close() error }"),
            "interface{ Close() error }"
        );
        assert_eq!(
            roundtrip("struct{ X, Y int; Name string `json:\"name\"` }"),
            "struct{ X, Y int; Name string `json:\"name\"` }"
        );
    }
}
