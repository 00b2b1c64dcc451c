// ast.rs
//
// Syntax tree for the parts of a Go source file that declare types.

use smallvec::SmallVec;

use crate::Span;

/// An identifier together with where it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }

    /// Go exports identifiers that start with an upper-case letter.
    pub fn is_exported(&self) -> bool {
        is_exported(&self.name)
    }
}

pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// A parsed `.go` file.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub package: Ident,
    pub imports: Vec<ImportSpec>,
    pub types: Vec<TypeSpec>,
    /// `//go:build` constraint found before the package clause, if any.
    pub build_constraint: Option<String>,
}

impl SourceFile {
    /// Find a type declaration by name.
    pub fn type_spec(&self, name: &str) -> Option<&TypeSpec> {
        self.types.iter().find(|spec| spec.name.name == name)
    }
}

/// How an import is bound in the importing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportName {
    /// `import "path"`: bound by the imported package's own name.
    Default,
    /// `import name "path"`
    Alias(Ident),
    /// `import . "path"`
    Dot,
    /// `import _ "path"`
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub name: ImportName,
    /// Import path with the quotes removed.
    pub path: String,
    pub span: Span,
}

/// `type Name[Params] Type` or `type Name = Type`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub name: Ident,
    pub type_params: Vec<TypeParam>,
    pub ty: TypeExpr,
    pub alias: bool,
    pub span: Span,
}

impl TypeSpec {
    pub fn is_interface(&self) -> bool {
        matches!(self.ty.kind, TypeExprKind::Interface(_))
    }

    pub fn as_interface(&self) -> Option<&InterfaceType> {
        match &self.ty.kind {
            TypeExprKind::Interface(iface) => Some(iface),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    pub names: SmallVec<[Ident; 2]>,
    pub constraint: TypeExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub span: Span,
}

impl TypeExpr {
    pub fn new(kind: TypeExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExprKind {
    /// `Name`, `pkg.Name`, `Name[A, B]`
    Named {
        package: Option<Ident>,
        name: Ident,
        type_args: Vec<TypeExpr>,
    },
    Pointer(Box<TypeExpr>),
    Slice(Box<TypeExpr>),
    /// `[N]T`; the length is kept as written.
    Array {
        len: String,
        elem: Box<TypeExpr>,
    },
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    Chan {
        dir: ChanDir,
        elem: Box<TypeExpr>,
    },
    Func(Signature),
    Interface(InterfaceType),
    Struct(Vec<StructField>),
    /// `...T`, only valid as the last parameter type.
    Variadic(Box<TypeExpr>),
    /// `~T` inside a constraint.
    Tilde(Box<TypeExpr>),
    /// `A | B` inside a constraint.
    Union(Vec<TypeExpr>),
    Paren(Box<TypeExpr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub params: Vec<Field>,
    pub results: Vec<Field>,
}

/// One entry of a parameter or result list. `names` is empty for unnamed entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub names: SmallVec<[Ident; 2]>,
    pub ty: TypeExpr,
}

impl Field {
    /// Number of values this entry declares (`a, b int` declares two).
    pub fn arity(&self) -> usize {
        self.names.len().max(1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    /// Empty for embedded fields.
    pub names: SmallVec<[Ident; 2]>,
    pub ty: TypeExpr,
    pub tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceType {
    pub elems: Vec<InterfaceElem>,
}

impl InterfaceType {
    pub fn methods(&self) -> impl Iterator<Item = (&Ident, &Signature)> {
        self.elems.iter().filter_map(|elem| match elem {
            InterfaceElem::Method { name, sig } => Some((name, sig)),
            InterfaceElem::Embed(_) => None,
        })
    }

    pub fn embeds(&self) -> impl Iterator<Item = &TypeExpr> {
        self.elems.iter().filter_map(|elem| match elem {
            InterfaceElem::Embed(ty) => Some(ty),
            InterfaceElem::Method { .. } => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InterfaceElem {
    Method { name: Ident, sig: Signature },
    /// Embedded interface or constraint element (no method name).
    Embed(TypeExpr),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exported_names_start_upper_case() {
        assert!(is_exported("Greeter"));
        assert!(is_exported("Ärger"));
        assert!(!is_exported("greeter"));
        assert!(!is_exported("_Greeter"));
        assert!(!is_exported(""));
    }

    #[test]
    fn field_arity_counts_unnamed_as_one() {
        let ty = TypeExpr::new(
            TypeExprKind::Named {
                package: None,
                name: Ident::new("int", Span::default()),
                type_args: Vec::new(),
            },
            Span::default(),
        );
        let unnamed = Field {
            names: SmallVec::new(),
            ty: ty.clone(),
        };
        let pair = Field {
            names: [
                Ident::new("a", Span::default()),
                Ident::new("b", Span::default()),
            ]
            .into_iter()
            .collect(),
            ty,
        };
        assert_eq!(unnamed.arity(), 1);
        assert_eq!(pair.arity(), 2);
    }
}
