//! Fully qualified type expressions.
//!
//! Every named leaf carries the generation alias of the module declaring it,
//! so a `TypeExpression` renders the same wherever the generated code lives.

use std::fmt;

pub use proxygen_frontend::ast::ChanDir;

/// The module a named type comes from and the alias it is imported under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Qualifier {
    pub module_path: String,
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpression {
    /// Predeclared identifier (`int`, `error`, `any`, ...)
    Primitive(String),
    /// `alias.Name[Args]`
    Named {
        qualifier: Qualifier,
        name: String,
        type_args: Vec<TypeExpression>,
    },
    Pointer(Box<TypeExpression>),
    Slice(Box<TypeExpression>),
    /// Length kept as written in the declaring source.
    Array {
        len: String,
        elem: Box<TypeExpression>,
    },
    Map {
        key: Box<TypeExpression>,
        value: Box<TypeExpression>,
    },
    Chan {
        dir: ChanDir,
        elem: Box<TypeExpression>,
    },
    Func(FuncType),
    Variadic(Box<TypeExpression>),
    Interface(Vec<InterfaceMember>),
    Struct(Vec<StructMember>),
    Tilde(Box<TypeExpression>),
    Union(Vec<TypeExpression>),
}

/// Parameter and result types of a function type; names are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncType {
    pub params: Vec<TypeExpression>,
    pub results: Vec<TypeExpression>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceMember {
    Method { name: String, func: FuncType },
    Embed(TypeExpression),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructMember {
    /// Empty for embedded fields
    pub names: Vec<String>,
    pub ty: TypeExpression,
    pub tag: Option<String>,
}

impl TypeExpression {
    pub fn primitive(name: impl Into<String>) -> Self {
        TypeExpression::Primitive(name.into())
    }

    pub fn is_variadic(&self) -> bool {
        matches!(self, TypeExpression::Variadic(_))
    }

    /// Call `f` on every qualifier referenced by this expression.
    pub fn for_each_qualifier(&self, f: &mut dyn FnMut(&Qualifier)) {
        match self {
            TypeExpression::Primitive(_) => {}
            TypeExpression::Named {
                qualifier,
                type_args,
                ..
            } => {
                f(qualifier);
                for arg in type_args {
                    arg.for_each_qualifier(f);
                }
            }
            TypeExpression::Pointer(inner)
            | TypeExpression::Slice(inner)
            | TypeExpression::Variadic(inner)
            | TypeExpression::Tilde(inner)
            | TypeExpression::Array { elem: inner, .. }
            | TypeExpression::Chan { elem: inner, .. } => inner.for_each_qualifier(f),
            TypeExpression::Map { key, value } => {
                key.for_each_qualifier(f);
                value.for_each_qualifier(f);
            }
            TypeExpression::Func(func) => func.for_each_qualifier(f),
            TypeExpression::Interface(members) => {
                for member in members {
                    match member {
                        InterfaceMember::Method { func, .. } => func.for_each_qualifier(f),
                        InterfaceMember::Embed(ty) => ty.for_each_qualifier(f),
                    }
                }
            }
            TypeExpression::Struct(fields) => {
                for field in fields {
                    field.ty.for_each_qualifier(f);
                }
            }
            TypeExpression::Union(terms) => {
                for term in terms {
                    term.for_each_qualifier(f);
                }
            }
        }
    }

    /// Render for code living in the module `local`: types declared there
    /// are written without a qualifier.
    pub fn display_in<'a>(&'a self, local: Option<&'a str>) -> TypeDisplay<'a> {
        TypeDisplay { ty: self, local }
    }
}

impl FuncType {
    pub fn for_each_qualifier(&self, f: &mut dyn FnMut(&Qualifier)) {
        for ty in self.params.iter().chain(&self.results) {
            ty.for_each_qualifier(f);
        }
    }
}

/// Rendering of a `TypeExpression` relative to a module.
pub struct TypeDisplay<'a> {
    ty: &'a TypeExpression,
    local: Option<&'a str>,
}

impl TypeDisplay<'_> {
    fn nested<'b>(&'b self, ty: &'b TypeExpression) -> TypeDisplay<'b> {
        TypeDisplay {
            ty,
            local: self.local,
        }
    }

    fn write_list(
        &self,
        f: &mut fmt::Formatter<'_>,
        items: &[TypeExpression],
        sep: &str,
    ) -> fmt::Result {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            write!(f, "{}", self.nested(item))?;
        }
        Ok(())
    }

    fn write_func(&self, f: &mut fmt::Formatter<'_>, func: &FuncType) -> fmt::Result {
        f.write_str("(")?;
        self.write_list(f, &func.params, ", ")?;
        f.write_str(")")?;
        match func.results.as_slice() {
            [] => Ok(()),
            [single] => write!(f, " {}", self.nested(single)),
            results => {
                f.write_str(" (")?;
                self.write_list(f, results, ", ")?;
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            TypeExpression::Primitive(name) => f.write_str(name),
            TypeExpression::Named {
                qualifier,
                name,
                type_args,
            } => {
                if self.local != Some(qualifier.module_path.as_str()) {
                    write!(f, "{}.", qualifier.alias)?;
                }
                f.write_str(name)?;
                if !type_args.is_empty() {
                    f.write_str("[")?;
                    self.write_list(f, type_args, ", ")?;
                    f.write_str("]")?;
                }
                Ok(())
            }
            TypeExpression::Pointer(elem) => write!(f, "*{}", self.nested(elem)),
            TypeExpression::Slice(elem) => write!(f, "[]{}", self.nested(elem)),
            TypeExpression::Array { len, elem } => write!(f, "[{len}]{}", self.nested(elem)),
            TypeExpression::Map { key, value } => {
                write!(f, "map[{}]{}", self.nested(key), self.nested(value))
            }
            TypeExpression::Chan { dir, elem } => match dir {
                // `chan <-chan T` would parse as `chan<- (chan T)`
                ChanDir::Both if matches!(**elem, TypeExpression::Chan { dir: ChanDir::Recv, .. }) => {
                    write!(f, "chan ({})", self.nested(elem))
                }
                ChanDir::Both => write!(f, "chan {}", self.nested(elem)),
                ChanDir::Send => write!(f, "chan<- {}", self.nested(elem)),
                ChanDir::Recv => write!(f, "<-chan {}", self.nested(elem)),
            },
            TypeExpression::Func(func) => {
                f.write_str("func")?;
                self.write_func(f, func)
            }
            TypeExpression::Variadic(elem) => write!(f, "...{}", self.nested(elem)),
            TypeExpression::Interface(members) => {
                if members.is_empty() {
                    return f.write_str("interface{}");
                }
                f.write_str("interface{ ")?;
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    match member {
                        InterfaceMember::Method { name, func } => {
                            f.write_str(name)?;
                            self.write_func(f, func)?;
                        }
                        InterfaceMember::Embed(ty) => write!(f, "{}", self.nested(ty))?,
                    }
                }
                f.write_str(" }")
            }
            TypeExpression::Struct(fields) => {
                if fields.is_empty() {
                    return f.write_str("struct{}");
                }
                f.write_str("struct{ ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    if !field.names.is_empty() {
                        write!(f, "{} ", field.names.join(", "))?;
                    }
                    write!(f, "{}", self.nested(&field.ty))?;
                    if let Some(tag) = &field.tag {
                        write!(f, " {tag}")?;
                    }
                }
                f.write_str(" }")
            }
            TypeExpression::Tilde(elem) => write!(f, "~{}", self.nested(elem)),
            TypeExpression::Union(terms) => self.write_list(f, terms, " | "),
        }
    }
}

impl fmt::Display for TypeExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_in(None))
    }
}

/// Go's predeclared type identifiers.
pub fn is_predeclared(name: &str) -> bool {
    matches!(
        name,
        "any"
            | "bool"
            | "byte"
            | "comparable"
            | "complex64"
            | "complex128"
            | "error"
            | "float32"
            | "float64"
            | "int"
            | "int8"
            | "int16"
            | "int32"
            | "int64"
            | "rune"
            | "string"
            | "uint"
            | "uint8"
            | "uint16"
            | "uint32"
            | "uint64"
            | "uintptr"
    )
}
