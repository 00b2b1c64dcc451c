// src/commands/common.rs
//! Pieces shared by the commands.

use proxygen_sema::{EmbedPolicy, InterfaceDescriptor, LoaderConfig, ResolverConfig};

use crate::cli::LoadArgs;
use crate::errors::{ProxygenError, split_interface_path};

impl LoadArgs {
    pub fn loader_config(&self) -> LoaderConfig {
        self.search_paths
            .iter()
            .fold(LoaderConfig::new(&self.dir), |config, path| {
                config.with_search_path(path)
            })
    }

    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            embed_policy: if self.skip_unresolved_embeds {
                EmbedPolicy::WarnAndSkip
            } else {
                EmbedPolicy::Propagate
            },
        }
    }
}

/// Resolve `<module path>.<Interface>` with the given lookup settings.
pub fn resolve_interface(
    interface: &str,
    load: &LoadArgs,
) -> Result<InterfaceDescriptor, ProxygenError> {
    let (module_path, name) = split_interface_path(interface)?;
    let descriptor = proxygen_sema::resolve(
        load.loader_config(),
        load.resolver_config(),
        module_path,
        name,
    )?;
    tracing::debug!(
        module = module_path,
        interface = name,
        methods = descriptor.methods.len(),
        "resolved interface"
    );
    Ok(descriptor)
}
