//! Emission options.

/// Import paths and local names of the runtime packages the generated code
/// depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeImports {
    /// Local name of the interception package
    pub interceptors_name: String,
    pub interceptors_path: String,
    /// Type of the `Interceptors` field, resolved inside the interception package
    pub chain_type: String,
    /// Local name of the caster package
    pub caster_name: String,
    pub caster_path: String,
}

impl Default for RuntimeImports {
    fn default() -> Self {
        Self {
            interceptors_name: "proxygenInterceptors".to_string(),
            interceptors_path: "github.com/panagiotisptr/proxygen/interceptor".to_string(),
            chain_type: "InterceptorChain".to_string(),
            caster_name: "proxygenCaster".to_string(),
            caster_path: "github.com/panagiotisptr/proxygen/caster".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Package clause of the generated file
    pub package_name: String,
    /// Name of the generated proxy type
    pub type_name: String,
    /// Import path of the output package, when known
    pub package_path: Option<String>,
    pub runtime: RuntimeImports,
}

impl EmitOptions {
    pub fn new(package_name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            type_name: type_name.into(),
            package_path: None,
            runtime: RuntimeImports::default(),
        }
    }

    pub fn with_package_path(mut self, path: impl Into<String>) -> Self {
        self.package_path = Some(path.into());
        self
    }

    /// Whether the proxy lands in the package that declares the interface.
    ///
    /// With a known output path the import paths are compared; otherwise the
    /// package names are.
    pub fn is_same_package(&self, module_path: &str, module_name: &str) -> bool {
        match &self.package_path {
            Some(path) => path == module_path,
            None => self.package_name == module_name,
        }
    }
}
