//! Type qualification: rewrite a type as written in a module so that every
//! name resolves through the generation's import table.

use proxygen_frontend::ast::{
    Field, Ident, ImportName, InterfaceElem, Signature, TypeExpr, TypeExprKind,
};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::errors::ResolveError;
use crate::module::{Module, ModuleFile, default_import_name};
use crate::types::{
    FuncType, InterfaceMember, Qualifier, StructMember, TypeExpression, is_predeclared,
};

/// A module imported with `import . "path"`.
#[derive(Debug, Clone)]
pub struct DotImport {
    pub path: String,
    /// Exported type names the module declares
    pub names: FxHashSet<String>,
}

/// Import bindings as written in one source file.
#[derive(Debug, Clone, Default)]
pub struct FileScope {
    /// Qualifier as written -> module path
    pub qualifiers: FxHashMap<String, String>,
    pub dot_imports: Vec<DotImport>,
}

impl FileScope {
    /// Named and default imports of `file`. Dot imports are returned as paths
    /// for the caller to load and register with `add_dot_import`.
    pub fn new(file: &ModuleFile, module: &Module) -> (Self, Vec<String>) {
        let mut scope = FileScope::default();
        let mut dot_paths = Vec::new();
        for import in file.imports() {
            match &import.name {
                ImportName::Default => {
                    let name = module
                        .import_name(&import.path)
                        .map(str::to_string)
                        .unwrap_or_else(|| default_import_name(&import.path));
                    scope.qualifiers.insert(name, import.path.clone());
                }
                ImportName::Alias(alias) => {
                    scope
                        .qualifiers
                        .insert(alias.name.clone(), import.path.clone());
                }
                ImportName::Dot => dot_paths.push(import.path.clone()),
                ImportName::Blank => {}
            }
        }
        (scope, dot_paths)
    }

    pub fn add_dot_import(&mut self, module: &Module) {
        let names = module
            .files
            .iter()
            .flat_map(|file| &file.syntax.types)
            .filter(|spec| spec.name.is_exported())
            .map(|spec| spec.name.name.clone())
            .collect();
        self.dot_imports.push(DotImport {
            path: module.path.clone(),
            names,
        });
    }
}

/// What a type name refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameTarget {
    Predeclared,
    /// Declared in the module with this path
    Module(String),
}

/// Qualifies types written in `file` of `module`.
pub struct TypeQualifier<'a> {
    module: &'a Module,
    file: &'a ModuleFile,
    scope: &'a FileScope,
    /// Generation bindings of the module itself and of its imports, by path
    new_imports: &'a FxHashMap<String, Qualifier>,
}

impl<'a> TypeQualifier<'a> {
    pub fn new(
        module: &'a Module,
        file: &'a ModuleFile,
        scope: &'a FileScope,
        new_imports: &'a FxHashMap<String, Qualifier>,
    ) -> Self {
        Self {
            module,
            file,
            scope,
            new_imports,
        }
    }

    pub fn module(&self) -> &'a Module {
        self.module
    }

    /// Resolve the module declaring `name` as referenced from this file.
    pub fn resolve_name(
        &self,
        ty: &TypeExpr,
        package: Option<&Ident>,
        name: &Ident,
    ) -> Result<NameTarget, ResolveError> {
        if let Some(package) = package {
            return match self.scope.qualifiers.get(&package.name) {
                Some(path) => Ok(NameTarget::Module(path.clone())),
                None => Err(self.error(
                    ty,
                    format!("no import is bound to `{}`", package.name),
                )),
            };
        }

        if is_predeclared(&name.name) {
            return Ok(NameTarget::Predeclared);
        }
        if self.module.declares(&name.name) {
            if !name.is_exported() {
                return Err(self.error(
                    ty,
                    format!("`{}` is not exported by {}", name.name, self.module.path),
                ));
            }
            return Ok(NameTarget::Module(self.module.path.clone()));
        }
        self.scope
            .dot_imports
            .iter()
            .find(|dot| dot.names.contains(&name.name))
            .map(|dot| NameTarget::Module(dot.path.clone()))
            .ok_or_else(|| self.error(ty, format!("undefined type `{}`", name.name)))
    }

    pub fn qualify(&self, ty: &TypeExpr) -> Result<TypeExpression, ResolveError> {
        Ok(match &ty.kind {
            TypeExprKind::Named {
                package,
                name,
                type_args,
            } => {
                let type_args = type_args
                    .iter()
                    .map(|arg| self.qualify(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                match self.resolve_name(ty, package.as_ref(), name)? {
                    NameTarget::Predeclared => TypeExpression::Primitive(name.name.clone()),
                    NameTarget::Module(path) => TypeExpression::Named {
                        qualifier: self.binding(ty, &path)?,
                        name: name.name.clone(),
                        type_args,
                    },
                }
            }
            TypeExprKind::Pointer(inner) => TypeExpression::Pointer(self.boxed(inner)?),
            TypeExprKind::Slice(inner) => TypeExpression::Slice(self.boxed(inner)?),
            TypeExprKind::Array { len, elem } => TypeExpression::Array {
                len: len.clone(),
                elem: self.boxed(elem)?,
            },
            TypeExprKind::Map { key, value } => TypeExpression::Map {
                key: self.boxed(key)?,
                value: self.boxed(value)?,
            },
            TypeExprKind::Chan { dir, elem } => TypeExpression::Chan {
                dir: *dir,
                elem: self.boxed(elem)?,
            },
            TypeExprKind::Func(sig) => TypeExpression::Func(self.qualify_signature(sig)?),
            TypeExprKind::Variadic(inner) => TypeExpression::Variadic(self.boxed(inner)?),
            TypeExprKind::Tilde(inner) => TypeExpression::Tilde(self.boxed(inner)?),
            TypeExprKind::Union(terms) => TypeExpression::Union(
                terms
                    .iter()
                    .map(|term| self.qualify(term))
                    .collect::<Result<_, _>>()?,
            ),
            TypeExprKind::Interface(iface) => TypeExpression::Interface(
                iface
                    .elems
                    .iter()
                    .map(|elem| {
                        Ok(match elem {
                            InterfaceElem::Method { name, sig } => InterfaceMember::Method {
                                name: name.name.clone(),
                                func: self.qualify_signature(sig)?,
                            },
                            InterfaceElem::Embed(ty) => InterfaceMember::Embed(self.qualify(ty)?),
                        })
                    })
                    .collect::<Result<_, ResolveError>>()?,
            ),
            TypeExprKind::Struct(fields) => TypeExpression::Struct(
                fields
                    .iter()
                    .map(|field| {
                        Ok(StructMember {
                            names: field.names.iter().map(|n| n.name.clone()).collect(),
                            ty: self.qualify(&field.ty)?,
                            tag: field.tag.clone(),
                        })
                    })
                    .collect::<Result<_, ResolveError>>()?,
            ),
            TypeExprKind::Paren(inner) => self.qualify(inner)?,
        })
    }

    /// Parameter and result types; a grouped `a, b T` yields `T` twice.
    pub fn qualify_signature(&self, sig: &Signature) -> Result<FuncType, ResolveError> {
        Ok(FuncType {
            params: self.qualify_fields(&sig.params)?,
            results: self.qualify_fields(&sig.results)?,
        })
    }

    fn qualify_fields(&self, fields: &[Field]) -> Result<Vec<TypeExpression>, ResolveError> {
        let mut out = Vec::new();
        for field in fields {
            let ty = self.qualify(&field.ty)?;
            for _ in 1..field.arity() {
                out.push(ty.clone());
            }
            out.push(ty);
        }
        Ok(out)
    }

    fn boxed(&self, inner: &TypeExpr) -> Result<Box<TypeExpression>, ResolveError> {
        self.qualify(inner).map(Box::new)
    }

    fn binding(&self, ty: &TypeExpr, path: &str) -> Result<Qualifier, ResolveError> {
        self.new_imports
            .get(path)
            .cloned()
            .ok_or_else(|| self.error(ty, format!("module {path} is not imported")))
    }

    fn error(&self, ty: &TypeExpr, reason: String) -> ResolveError {
        // Quote the type as written; synthesized nodes have no source text.
        let written = ty.span.text(&self.file.source);
        ResolveError::TypeQualification {
            ty: if written.is_empty() {
                ty.to_string()
            } else {
                written.to_string()
            },
            reason,
            file: self.file.path.clone(),
            span: ty.span.into(),
        }
    }
}
