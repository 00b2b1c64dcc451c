//! Generation-wide import table with collision-free aliases.

use rustc_hash::FxHashMap;

use crate::types::Qualifier;

/// A module usable from the generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    pub module_path: String,
    /// Package name the module declares
    pub declared_name: String,
    /// Alias unique within one generation
    pub alias: String,
    /// Set when an exposed type expression references this binding
    pub used: bool,
}

impl ImportBinding {
    pub fn qualifier(&self) -> Qualifier {
        Qualifier {
            module_path: self.module_path.clone(),
            alias: self.alias.clone(),
        }
    }
}

/// Bindings introduced during one generation, keyed by module path.
///
/// The first introduction of a path allocates the alias
/// `import{module}{interface}{seq}` from a shared sequence; later
/// introductions of the same path reuse it.
#[derive(Debug, Default)]
pub struct ImportTable {
    bindings: Vec<ImportBinding>,
    by_path: FxHashMap<String, usize>,
}

impl ImportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binding for `module_path`, allocating one on first use.
    /// `origin_module` and `interface` name the interface being resolved.
    pub fn intern(
        &mut self,
        module_path: &str,
        declared_name: &str,
        origin_module: &str,
        interface: &str,
    ) -> Qualifier {
        if let Some(&idx) = self.by_path.get(module_path) {
            return self.bindings[idx].qualifier();
        }
        let seq = self.bindings.len();
        let mut alias = format!("import{origin_module}{interface}{seq}");
        // `Id1` + seq 1 and `Id` + seq 11 render the same.
        while self.bindings.iter().any(|b| b.alias == alias) {
            alias.push('_');
        }
        let binding = ImportBinding {
            module_path: module_path.to_string(),
            declared_name: declared_name.to_string(),
            alias,
            used: false,
        };
        tracing::trace!(path = module_path, alias = %binding.alias, "allocated import alias");
        let qualifier = binding.qualifier();
        self.by_path.insert(module_path.to_string(), seq);
        self.bindings.push(binding);
        qualifier
    }

    pub fn get(&self, module_path: &str) -> Option<&ImportBinding> {
        self.by_path.get(module_path).map(|&idx| &self.bindings[idx])
    }

    pub fn bindings(&self) -> &[ImportBinding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
        self.by_path.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_follow_the_shared_sequence() {
        let mut table = ImportTable::new();
        let own = table.intern("example.com/b", "b", "b", "Logger");
        let dep = table.intern("example.com/a", "a", "b", "Logger");
        let ctx = table.intern("context", "context", "a", "Greeter");
        assert_eq!(own.alias, "importbLogger0");
        assert_eq!(dep.alias, "importbLogger1");
        assert_eq!(ctx.alias, "importaGreeter2");
    }

    #[test]
    fn reintroduced_paths_reuse_their_binding() {
        let mut table = ImportTable::new();
        let first = table.intern("example.com/a", "a", "b", "Logger");
        let again = table.intern("example.com/a", "a", "a", "Greeter");
        assert_eq!(first, again);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("example.com/a").unwrap().declared_name, "a");
    }

    #[test]
    fn aliases_are_unique() {
        let mut table = ImportTable::new();
        for (i, path) in ["x", "y", "x", "z", "y"].iter().enumerate() {
            table.intern(path, path, "m", if i % 2 == 0 { "I" } else { "J" });
        }
        let mut aliases: Vec<&str> = table.bindings().iter().map(|b| b.alias.as_str()).collect();
        let total = aliases.len();
        aliases.sort_unstable();
        aliases.dedup();
        assert_eq!(aliases.len(), total);
        assert_eq!(total, 3);
    }

    #[test]
    fn digit_suffixed_interface_names_do_not_collide() {
        let mut table = ImportTable::new();
        table.intern("x", "x", "m", "Api");
        let early = table.intern("y", "y", "m", "Api1");
        for i in 2..11 {
            table.intern(&format!("p{i}"), "p", "m", "Api");
        }
        let late = table.intern("z", "z", "m", "Api");
        assert_eq!(early.alias, "importmApi11");
        assert_eq!(late.alias, "importmApi11_");
    }
}
