//! Descriptor to Go proxy source.

mod template;

use pretty::Arena;
use rustc_hash::FxHashSet;

use proxygen_fmt::SourceFormatter;
use proxygen_frontend::{Lexer, TokenType};
use proxygen_sema::InterfaceDescriptor;

use crate::errors::EmitError;
use crate::options::EmitOptions;

pub use template::HEADER;
use template::{IMPLEMENTATION_FIELD, INTERCEPTORS_FIELD, ProxyTemplate};

/// Line width handed to the document renderer. The template only uses hard
/// line breaks, so this never changes the layout.
const WIDTH: usize = 100;

/// Renders descriptors and hands the text to a formatter.
pub struct CodeEmitter<'f> {
    formatter: &'f dyn SourceFormatter,
}

impl<'f> CodeEmitter<'f> {
    pub fn new(formatter: &'f dyn SourceFormatter) -> Self {
        Self { formatter }
    }

    /// Produce the formatted proxy file for `descriptor`.
    #[tracing::instrument(
        skip_all,
        fields(interface = %descriptor.name, proxy = %options.type_name, formatter = self.formatter.name())
    )]
    pub fn emit(
        &self,
        descriptor: &InterfaceDescriptor,
        options: &EmitOptions,
    ) -> Result<String, EmitError> {
        let generated = render(descriptor, options)?;
        tracing::debug!(bytes = generated.len(), "rendered proxy template");

        match self.formatter.format(&generated) {
            Ok(result) => {
                tracing::trace!(changed = result.changed, "formatted proxy");
                Ok(result.output)
            }
            Err(source) => {
                tracing::debug!(%generated, "formatter rejected generated proxy");
                Err(EmitError::Formatting {
                    formatter: self.formatter.name().to_string(),
                    source,
                    generated,
                })
            }
        }
    }
}

/// Shorthand for `CodeEmitter::new(formatter).emit(descriptor, options)`.
pub fn emit(
    descriptor: &InterfaceDescriptor,
    options: &EmitOptions,
    formatter: &dyn SourceFormatter,
) -> Result<String, EmitError> {
    CodeEmitter::new(formatter).emit(descriptor, options)
}

/// Render the proxy template without formatting it.
pub fn render(descriptor: &InterfaceDescriptor, options: &EmitOptions) -> Result<String, EmitError> {
    let local = options
        .is_same_package(&descriptor.module_path, &descriptor.module_name)
        .then_some(descriptor.module_path.as_str());
    let template = ProxyTemplate {
        descriptor,
        options,
        local,
    };
    validate(&template)?;

    let arena = Arena::new();
    let doc = template.print(&arena);
    let mut rendered = String::new();
    doc.render_fmt(WIDTH, &mut rendered)?;

    // Nesting leaves indentation on blank lines
    let mut output = rendered
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");
    output.push('\n');
    Ok(output)
}

fn validate(template: &ProxyTemplate<'_>) -> Result<(), EmitError> {
    let options = template.options;
    let runtime = &options.runtime;
    for (name, role) in [
        (options.package_name.as_str(), "package name"),
        (options.type_name.as_str(), "proxy type name"),
        (runtime.interceptors_name.as_str(), "interceptor import name"),
        (runtime.chain_type.as_str(), "interceptor chain type"),
        (runtime.caster_name.as_str(), "caster import name"),
    ] {
        if !is_identifier(name) {
            return Err(EmitError::InvalidIdentifier {
                name: name.to_string(),
                role,
            });
        }
    }

    if template.local.is_some() && options.type_name == template.descriptor.name {
        return Err(EmitError::TypeNameClash {
            name: options.type_name.clone(),
        });
    }

    for method in &template.descriptor.methods {
        if method.name == IMPLEMENTATION_FIELD || method.name == INTERCEPTORS_FIELD {
            return Err(EmitError::FieldClash {
                method: method.name.clone(),
                fields: format!("{IMPLEMENTATION_FIELD} and {INTERCEPTORS_FIELD}"),
            });
        }
    }

    let mut seen = FxHashSet::default();
    for (name, _) in template.import_groups().iter().flatten() {
        if !seen.insert(name.clone()) {
            return Err(EmitError::ImportNameClash { name: name.clone() });
        }
    }
    Ok(())
}

/// Whether `name` lexes as exactly one non-blank Go identifier.
fn is_identifier(name: &str) -> bool {
    if name == "_" {
        return false;
    }
    let mut lexer = Lexer::new(name);
    let token = lexer.next_token();
    token.ty == TokenType::Identifier && token.lexeme == name && !lexer.has_errors()
}

#[cfg(test)]
mod tests;
