//! Fixed document template for a proxy file.

use pretty::{Arena, DocAllocator, DocBuilder};

use proxygen_sema::{InterfaceDescriptor, MethodSignature, TypeExpression};

use crate::options::EmitOptions;

/// Indent width of the rendered document; the formatter re-indents with tabs.
pub(super) const INDENT: isize = 4;

pub const HEADER: &str = "// Code generated by proxygen. DO NOT EDIT.";

pub(super) const IMPLEMENTATION_FIELD: &str = "Implementation";
pub(super) const INTERCEPTORS_FIELD: &str = "Interceptors";

type Doc<'a> = DocBuilder<'a, Arena<'a>>;

pub(super) struct ProxyTemplate<'d> {
    pub descriptor: &'d InterfaceDescriptor,
    pub options: &'d EmitOptions,
    /// Module path whose qualifier is dropped (the output package itself)
    pub local: Option<&'d str>,
}

impl<'d> ProxyTemplate<'d> {
    pub fn print<'a>(&self, arena: &'a Arena<'a>) -> Doc<'a> {
        let mut sections = vec![
            arena.text(HEADER),
            arena.text(format!("package {}", self.options.package_name)),
            self.print_imports(arena),
            self.print_struct(arena),
            self.print_assertion(arena),
        ];
        sections.extend(
            self.descriptor
                .methods
                .iter()
                .map(|method| self.print_method(arena, method)),
        );
        arena.intersperse(sections, arena.hardline().append(arena.hardline()))
    }

    /// `(local name, path)` of every import the file needs, in groups:
    /// runtime packages first, then the interface's own imports.
    pub fn import_groups(&self) -> [Vec<(String, String)>; 2] {
        let runtime = &self.options.runtime;
        let mut runtime_group = vec![(
            runtime.interceptors_name.clone(),
            runtime.interceptors_path.clone(),
        )];
        if self.uses_caster() {
            runtime_group.push((runtime.caster_name.clone(), runtime.caster_path.clone()));
        }

        let mut own_group: Vec<(String, String)> = self
            .descriptor
            .used_imports()
            .filter(|binding| Some(binding.module_path.as_str()) != self.local)
            .map(|binding| (binding.alias.clone(), binding.module_path.clone()))
            .collect();

        // gofmt orders specs by path within a group
        runtime_group.sort_by(|a, b| a.1.cmp(&b.1));
        own_group.sort_by(|a, b| a.1.cmp(&b.1));
        [runtime_group, own_group]
    }

    fn uses_caster(&self) -> bool {
        self.descriptor
            .methods
            .iter()
            .any(|m| !m.params.is_empty() || !m.results.is_empty())
    }

    fn print_imports<'a>(&self, arena: &'a Arena<'a>) -> Doc<'a> {
        let groups: Vec<Doc<'a>> = self
            .import_groups()
            .into_iter()
            .filter(|group| !group.is_empty())
            .map(|group| {
                let specs = group
                    .into_iter()
                    .map(|(name, path)| arena.text(format!("{name} \"{path}\"")));
                arena.intersperse(specs, arena.hardline())
            })
            .collect();

        arena
            .text("import (")
            .append(
                arena
                    .hardline()
                    .append(arena.intersperse(groups, arena.hardline().append(arena.hardline())))
                    .nest(INDENT),
            )
            .append(arena.hardline())
            .append(arena.text(")"))
    }

    fn print_struct<'a>(&self, arena: &'a Arena<'a>) -> Doc<'a> {
        let runtime = &self.options.runtime;
        let fields = [
            (
                IMPLEMENTATION_FIELD,
                self.ty(&self.descriptor.implementation_type),
            ),
            (
                INTERCEPTORS_FIELD,
                format!("{}.{}", runtime.interceptors_name, runtime.chain_type),
            ),
        ];
        let width = fields.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        let lines = fields
            .into_iter()
            .map(|(name, ty)| arena.text(format!("{name:<width$} {ty}")));

        arena
            .text(format!("type {} struct {{", self.options.type_name))
            .append(
                arena
                    .hardline()
                    .append(arena.intersperse(lines, arena.hardline()))
                    .nest(INDENT),
            )
            .append(arena.hardline())
            .append(arena.text("}"))
    }

    fn print_assertion<'a>(&self, arena: &'a Arena<'a>) -> Doc<'a> {
        arena.text(format!(
            "var _ {} = (*{})(nil)",
            self.ty(&self.descriptor.implementation_type),
            self.options.type_name
        ))
    }

    fn print_method<'a>(&self, arena: &'a Arena<'a>, method: &MethodSignature) -> Doc<'a> {
        let caster = &self.options.runtime.caster_name;

        let params: Vec<String> = method
            .params
            .iter()
            .enumerate()
            .map(|(i, ty)| format!("arg{i} {}", self.ty(ty)))
            .collect();
        let results = match method.results.as_slice() {
            [] => String::new(),
            [single] => format!(" {}", self.ty(single)),
            many => format!(
                " ({})",
                many.iter().map(|ty| self.ty(ty)).collect::<Vec<_>>().join(", ")
            ),
        };
        let signature = format!(
            "func (this *{}) {}({}){} {{",
            self.options.type_name,
            method.name,
            params.join(", "),
            results
        );

        let packed = numbered("arg", method.params.len()).join(", ");
        let forwarded: Vec<String> = method
            .params
            .iter()
            .enumerate()
            .map(|(i, ty)| match ty {
                TypeExpression::Variadic(elem) => {
                    format!("{caster}.Cast[[]{}](args[{i}])...", self.ty(elem))
                }
                _ => format!("{caster}.Cast[{}](args[{i}])", self.ty(ty)),
            })
            .collect();
        let call = format!(
            "this.{IMPLEMENTATION_FIELD}.{}({})",
            method.name,
            forwarded.join(", ")
        );
        let res = numbered("res", method.results.len());
        let invoke = if res.is_empty() {
            call
        } else {
            format!("{} := {call}", res.join(", "))
        };

        let continuation = arena
            .text("func(args []interface{}) []interface{} {")
            .append(
                arena
                    .hardline()
                    .append(arena.text(invoke))
                    .append(arena.hardline())
                    .append(arena.text(format!("return []interface{{}}{{{}}}", res.join(", "))))
                    .nest(INDENT),
            )
            .append(arena.hardline())
            .append(arena.text("},"));

        let assign = if method.results.is_empty() {
            ""
        } else {
            "rets := "
        };
        let apply = arena
            .text(format!("{assign}this.{INTERCEPTORS_FIELD}.Apply("))
            .append(
                arena
                    .hardline()
                    .append(arena.text(format!("[]interface{{}}{{{packed}}},")))
                    .append(arena.hardline())
                    .append(arena.text(format!("\"{}\",", method.name)))
                    .append(arena.hardline())
                    .append(continuation)
                    .nest(INDENT),
            )
            .append(arena.hardline())
            .append(arena.text(")"));

        let body = if method.results.is_empty() {
            apply
        } else {
            let casts: Vec<String> = method
                .results
                .iter()
                .enumerate()
                .map(|(i, ty)| format!("{caster}.Cast[{}](rets[{i}])", self.ty(ty)))
                .collect();
            apply
                .append(arena.hardline())
                .append(arena.text(format!("return {}", casts.join(", "))))
        };

        arena
            .text(signature)
            .append(arena.hardline().append(body).nest(INDENT))
            .append(arena.hardline())
            .append(arena.text("}"))
    }

    fn ty(&self, ty: &TypeExpression) -> String {
        ty.display_in(self.local).to_string()
    }
}

fn numbered(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{prefix}{i}")).collect()
}
