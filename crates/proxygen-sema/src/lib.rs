//! proxygen semantic analysis: module loading, type qualification and
//! interface resolution.

pub mod errors;
pub mod imports;
pub mod module;
pub mod qualify;
pub mod resolver;
pub mod types;

pub use errors::{LoadError, ResolveError};
pub use imports::{ImportBinding, ImportTable};
pub use module::{LoaderConfig, Module, ModuleLoader};
pub use qualify::{FileScope, TypeQualifier};
pub use resolver::{
    EmbedPolicy, InterfaceDescriptor, MethodSignature, Resolver, ResolverConfig,
};
pub use types::{ChanDir, FuncType, Qualifier, TypeExpression};

/// Resolve `interface` in `module_path` with a fresh loader and import table.
pub fn resolve(
    loader: LoaderConfig,
    config: ResolverConfig,
    module_path: &str,
    interface: &str,
) -> Result<InterfaceDescriptor, ResolveError> {
    Resolver::new(ModuleLoader::new(loader), config).resolve(module_path, interface)
}
