//! Go package location and loading.

pub mod loader;
pub mod locator;

pub use loader::{
    LoaderConfig, Module, ModuleFile, ModuleImport, ModuleLoader, default_import_name,
};
pub use locator::{GoModule, LocationSource, PackageLocation, PackageLocator, go_files};
