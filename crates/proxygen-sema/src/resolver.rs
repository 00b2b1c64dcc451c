//! Interface resolution: flatten an interface's method set across modules.
//!
//! A `Resolver` is the per-invocation context. It owns the module loader,
//! the generation-wide import table and the stack of interfaces currently
//! being resolved, which is what detects embedding cycles.

use std::fmt;
use std::rc::Rc;

use proxygen_frontend::ast::{InterfaceType, TypeExpr, TypeExprKind};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::errors::ResolveError;
use crate::imports::{ImportBinding, ImportTable};
use crate::module::{Module, ModuleFile, ModuleLoader};
use crate::qualify::{FileScope, NameTarget, TypeQualifier};
use crate::types::{FuncType, InterfaceMember, Qualifier, TypeExpression};

/// What to do when an embedded interface cannot be resolved, including an
/// embed whose package qualifier names no import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbedPolicy {
    /// Fail the whole resolution
    #[default]
    Propagate,
    /// Log a warning and leave the embedded methods out
    WarnAndSkip,
}

#[derive(Debug, Clone, Default)]
pub struct ResolverConfig {
    pub embed_policy: EmbedPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub name: String,
    pub params: Vec<TypeExpression>,
    pub results: Vec<TypeExpression>,
}

impl MethodSignature {
    fn from_func(name: String, func: FuncType) -> Self {
        Self {
            name,
            params: func.params,
            results: func.results,
        }
    }

    /// The last parameter is `...T`.
    pub fn is_variadic(&self) -> bool {
        self.params.last().is_some_and(TypeExpression::is_variadic)
    }

    pub fn for_each_qualifier(&self, f: &mut dyn FnMut(&Qualifier)) {
        for ty in self.params.iter().chain(&self.results) {
            ty.for_each_qualifier(f);
        }
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let func = TypeExpression::Func(FuncType {
            params: self.params.clone(),
            results: self.results.clone(),
        });
        let rendered = func.to_string();
        write!(f, "{}{}", self.name, rendered.trim_start_matches("func"))
    }
}

/// The flattened, fully qualified method set of one interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDescriptor {
    pub module_path: String,
    /// Package name of the declaring module
    pub module_name: String,
    pub name: String,
    pub imports: Vec<ImportBinding>,
    pub methods: Vec<MethodSignature>,
    pub implementation_type: TypeExpression,
}

impl InterfaceDescriptor {
    pub fn method(&self, name: &str) -> Option<&MethodSignature> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn used_imports(&self) -> impl Iterator<Item = &ImportBinding> {
        self.imports.iter().filter(|binding| binding.used)
    }

    /// Recompute `used` from the types this descriptor exposes.
    fn mark_used(&mut self) {
        let mut referenced = FxHashSet::default();
        let mut record = |q: &Qualifier| {
            referenced.insert(q.module_path.clone());
        };
        self.implementation_type.for_each_qualifier(&mut record);
        for method in &self.methods {
            method.for_each_qualifier(&mut record);
        }
        for binding in &mut self.imports {
            binding.used = referenced.contains(&binding.module_path);
        }
    }

    /// Append an embedded interface's imports and methods. Imports are
    /// deduplicated by path and methods by name, first occurrence wins.
    fn merge(&mut self, embedded: InterfaceDescriptor) {
        for binding in embedded.imports {
            if !self
                .imports
                .iter()
                .any(|b| b.module_path == binding.module_path)
            {
                self.imports.push(binding);
            }
        }
        for method in embedded.methods {
            self.push_method(method);
        }
    }

    fn push_method(&mut self, method: MethodSignature) {
        if self.method(&method.name).is_none() {
            self.methods.push(method);
        }
    }
}

impl fmt::Display for InterfaceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "interface {}.{} ({})",
            self.module_name, self.name, self.module_path
        )?;
        writeln!(f, "implementation: {}", self.implementation_type)?;
        writeln!(f, "imports:")?;
        for binding in &self.imports {
            writeln!(
                f,
                "  {} \"{}\" ({}){}",
                binding.alias,
                binding.module_path,
                binding.declared_name,
                if binding.used { "" } else { " unused" }
            )?;
        }
        writeln!(f, "methods:")?;
        for method in &self.methods {
            writeln!(f, "  {method}")?;
        }
        Ok(())
    }
}

/// An embedded element after name resolution.
enum Embedded {
    Interface { module_path: String, name: String },
    Methods(Vec<MethodSignature>),
    Nothing,
}

/// Per-invocation resolution context.
pub struct Resolver {
    loader: ModuleLoader,
    config: ResolverConfig,
    imports: ImportTable,
    /// `(module path, interface name)` currently being resolved
    stack: Vec<(String, String)>,
}

impl Resolver {
    pub fn new(loader: ModuleLoader, config: ResolverConfig) -> Self {
        Self {
            loader,
            config,
            imports: ImportTable::new(),
            stack: Vec::new(),
        }
    }

    pub fn loader(&self) -> &ModuleLoader {
        &self.loader
    }

    pub fn import_table(&self) -> &ImportTable {
        &self.imports
    }

    /// Resolve `interface` declared in `module_path`.
    ///
    /// Each call starts a new generation: the import table is rebuilt from
    /// scratch, only parsed modules are reused.
    #[tracing::instrument(skip(self))]
    pub fn resolve(
        &mut self,
        module_path: &str,
        interface: &str,
    ) -> Result<InterfaceDescriptor, ResolveError> {
        self.imports.clear();
        self.stack.clear();
        let descriptor = self.resolve_interface(module_path, interface)?;
        tracing::debug!(
            methods = descriptor.methods.len(),
            imports = descriptor.imports.len(),
            "resolved interface"
        );
        Ok(descriptor)
    }

    fn resolve_interface(
        &mut self,
        module_path: &str,
        interface: &str,
    ) -> Result<InterfaceDescriptor, ResolveError> {
        let key = (module_path.to_string(), interface.to_string());
        if let Some(start) = self.stack.iter().position(|entry| *entry == key) {
            let chain: Vec<String> = self.stack[start..]
                .iter()
                .chain(std::iter::once(&key))
                .map(|(path, name)| format!("{path}.{name}"))
                .collect();
            return Err(ResolveError::CyclicEmbedding {
                chain: chain.join(" -> "),
            });
        }

        self.stack.push(key);
        let result = self.resolve_uncached(module_path, interface);
        self.stack.pop();
        result
    }

    fn resolve_uncached(
        &mut self,
        module_path: &str,
        interface: &str,
    ) -> Result<InterfaceDescriptor, ResolveError> {
        tracing::trace!(module = module_path, interface, "resolving");
        let module = self.loader.load(module_path)?;

        let not_found = || ResolveError::InterfaceNotFound {
            module: module_path.to_string(),
            name: interface.to_string(),
        };
        let (file, spec) = module.type_spec(interface).ok_or_else(not_found)?;
        // Embedded interfaces may be unexported when local to their embedder.
        let top_level = self.stack.len() == 1;
        let iface = match spec.as_interface() {
            Some(iface) if spec.name.is_exported() || !top_level => iface,
            _ => return Err(not_found()),
        };
        if !spec.type_params.is_empty() {
            return Err(ResolveError::GenericInterface {
                name: interface.to_string(),
                file: file.path.clone(),
                span: spec.name.span.into(),
            });
        }

        // The module itself first, then everything it imports.
        let mut own_imports = Vec::with_capacity(module.imports.len() + 1);
        let mut new_imports = FxHashMap::default();
        let self_binding = self
            .imports
            .intern(&module.path, &module.name, &module.name, interface);
        own_imports.push(module.path.clone());
        new_imports.insert(module.path.clone(), self_binding.clone());
        for import in &module.imports {
            let binding = self
                .imports
                .intern(&import.path, &import.name, &module.name, interface);
            own_imports.push(import.path.clone());
            new_imports.insert(import.path.clone(), binding);
        }

        let scope = self.file_scope(&module, file)?;
        let qualifier = TypeQualifier::new(&module, file, &scope, &new_imports);

        let mut methods = Vec::new();
        for (name, sig) in iface.methods() {
            let func = qualifier.qualify_signature(sig)?;
            methods.push(MethodSignature::from_func(name.name.clone(), func));
        }

        let mut embedded = Vec::new();
        for ty in iface.embeds() {
            match self.classify_embed(&qualifier, ty) {
                Ok(embed) => embedded.push(embed),
                Err(err) => self.skip_or_propagate(interface, &ty.to_string(), err)?,
            }
        }

        let mut descriptor = InterfaceDescriptor {
            module_path: module.path.clone(),
            module_name: module.name.clone(),
            name: interface.to_string(),
            imports: own_imports
                .iter()
                .filter_map(|path| self.imports.get(path).cloned())
                .collect(),
            methods: Vec::new(),
            implementation_type: TypeExpression::Named {
                qualifier: self_binding,
                name: interface.to_string(),
                type_args: Vec::new(),
            },
        };
        for method in methods {
            descriptor.push_method(method);
        }

        for embed in embedded {
            match embed {
                Embedded::Interface { module_path, name } => {
                    match self.resolve_interface(&module_path, &name) {
                        Ok(inner) => descriptor.merge(inner),
                        Err(err) => {
                            self.skip_or_propagate(interface, &format!("{module_path}.{name}"), err)?
                        }
                    }
                }
                Embedded::Methods(methods) => {
                    for method in methods {
                        descriptor.push_method(method);
                    }
                }
                Embedded::Nothing => {}
            }
        }

        descriptor.mark_used();
        Ok(descriptor)
    }

    /// Apply the embed policy to an embedded reference that failed to
    /// resolve. Cycles always propagate.
    fn skip_or_propagate(
        &self,
        interface: &str,
        embedded: &str,
        err: ResolveError,
    ) -> Result<(), ResolveError> {
        if err.is_cyclic() || self.config.embed_policy == EmbedPolicy::Propagate {
            return Err(err);
        }
        tracing::warn!(
            interface,
            embedded,
            error = %err,
            "skipping unresolved embedded interface"
        );
        Ok(())
    }

    /// Import scope of the declaring file, with dot imports loaded.
    fn file_scope(&mut self, module: &Module, file: &ModuleFile) -> Result<FileScope, ResolveError> {
        let (mut scope, dot_paths) = FileScope::new(file, module);
        for path in dot_paths {
            let dot: Rc<Module> = self.loader.load(&path)?;
            scope.add_dot_import(&dot);
        }
        Ok(scope)
    }

    fn classify_embed(
        &self,
        qualifier: &TypeQualifier<'_>,
        ty: &TypeExpr,
    ) -> Result<Embedded, ResolveError> {
        match &ty.kind {
            TypeExprKind::Named {
                package: None,
                name,
                ..
            } if qualifier.module().declares(&name.name) => Ok(Embedded::Interface {
                module_path: qualifier.module().path.clone(),
                name: name.name.clone(),
            }),
            TypeExprKind::Named { package, name, .. } => match qualifier.resolve_name(
                ty,
                package.as_ref(),
                name,
            )? {
                NameTarget::Predeclared if name.name == "error" => {
                    Ok(Embedded::Methods(vec![error_method()]))
                }
                NameTarget::Predeclared => Ok(Embedded::Nothing),
                NameTarget::Module(module_path) => Ok(Embedded::Interface {
                    module_path,
                    name: name.name.clone(),
                }),
            },
            TypeExprKind::Paren(inner) => self.classify_embed(qualifier, inner),
            TypeExprKind::Interface(iface) => Ok(Embedded::Methods(inline_methods(
                qualifier, iface,
            )?)),
            // Constraint elements carry no methods.
            _ => Ok(Embedded::Nothing),
        }
    }
}

/// `Error() string`, contributed by embedding `error`.
fn error_method() -> MethodSignature {
    MethodSignature {
        name: "Error".to_string(),
        params: Vec::new(),
        results: vec![TypeExpression::primitive("string")],
    }
}

fn inline_methods(
    qualifier: &TypeQualifier<'_>,
    iface: &InterfaceType,
) -> Result<Vec<MethodSignature>, ResolveError> {
    let qualified = qualifier.qualify(&TypeExpr::new(
        TypeExprKind::Interface(iface.clone()),
        Default::default(),
    ))?;
    let TypeExpression::Interface(members) = qualified else {
        return Ok(Vec::new());
    };
    Ok(members
        .into_iter()
        .filter_map(|member| match member {
            InterfaceMember::Method { name, func } => Some(MethodSignature::from_func(name, func)),
            InterfaceMember::Embed(_) => None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_signatures_render_like_go() {
        let method = MethodSignature {
            name: "Stat".to_string(),
            params: vec![TypeExpression::primitive("string")],
            results: vec![
                TypeExpression::primitive("int64"),
                TypeExpression::primitive("error"),
            ],
        };
        assert_eq!(method.to_string(), "Stat(string) (int64, error)");
        assert!(!method.is_variadic());
        assert_eq!(error_method().to_string(), "Error() string");
    }

    #[test]
    fn merge_keeps_first_method_and_import() {
        let binding = |path: &str, alias: &str| ImportBinding {
            module_path: path.to_string(),
            declared_name: path.to_string(),
            alias: alias.to_string(),
            used: false,
        };
        let mut outer = InterfaceDescriptor {
            module_path: "b".to_string(),
            module_name: "b".to_string(),
            name: "Logger".to_string(),
            imports: vec![binding("b", "i0"), binding("a", "i1")],
            methods: vec![error_method()],
            implementation_type: TypeExpression::primitive("any"),
        };
        let inner = InterfaceDescriptor {
            module_path: "a".to_string(),
            module_name: "a".to_string(),
            name: "Greeter".to_string(),
            imports: vec![binding("a", "i1"), binding("c", "i2")],
            methods: vec![
                MethodSignature {
                    name: "Error".to_string(),
                    params: vec![TypeExpression::primitive("int")],
                    results: Vec::new(),
                },
                MethodSignature {
                    name: "Greet".to_string(),
                    params: Vec::new(),
                    results: Vec::new(),
                },
            ],
            implementation_type: TypeExpression::primitive("any"),
        };
        outer.merge(inner);

        let paths: Vec<&str> = outer.imports.iter().map(|b| b.module_path.as_str()).collect();
        assert_eq!(paths, ["b", "a", "c"]);
        let names: Vec<&str> = outer.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Error", "Greet"]);
        assert!(outer.method("Error").unwrap().params.is_empty());
    }
}
