//! Module loader for Go packages.
//!
//! Handles:
//! - Import path resolution (see `locator`)
//! - File selection (no tests, no `//go:build ignore`)
//! - Parsing and package-name consistency
//! - Per-invocation caching

use std::path::{Path, PathBuf};
use std::rc::Rc;

use proxygen_frontend::ast::{ImportName, ImportSpec, SourceFile, TypeSpec};
use proxygen_frontend::{Lexer, Parser, TokenType};
use rustc_hash::FxHashMap;

use super::locator::{PackageLocation, PackageLocator, go_files};
use crate::errors::LoadError;

/// Where and how modules are looked up.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Directory the `go.mod` search starts from
    pub dir: PathBuf,
    /// `$GOROOT`, for standard library packages
    pub goroot: Option<PathBuf>,
    /// Extra roots searched last, as `<root>/<import path>`
    pub search_paths: Vec<PathBuf>,
}

impl LoaderConfig {
    /// Configuration rooted at `dir`, with `GOROOT` taken from the environment.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            goroot: std::env::var_os("GOROOT")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            search_paths: Vec::new(),
        }
    }

    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_paths.push(path.into());
        self
    }

    pub fn without_goroot(mut self) -> Self {
        self.goroot = None;
        self
    }
}

/// One import of a module: the path and the name it binds by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleImport {
    pub path: String,
    pub name: String,
}

/// A parsed source file of a module.
#[derive(Debug, Clone)]
pub struct ModuleFile {
    pub path: PathBuf,
    pub source: String,
    pub syntax: SourceFile,
}

impl ModuleFile {
    pub fn imports(&self) -> &[ImportSpec] {
        &self.syntax.imports
    }
}

/// A loaded Go package.
#[derive(Debug, Clone)]
pub struct Module {
    /// Import path
    pub path: String,
    /// Declared package name
    pub name: String,
    pub dir: PathBuf,
    /// Union of all files' imports, sorted by path
    pub imports: Vec<ModuleImport>,
    pub files: Vec<ModuleFile>,
}

impl Module {
    /// First type declaration with this name, with the file declaring it.
    pub fn type_spec(&self, name: &str) -> Option<(&ModuleFile, &TypeSpec)> {
        self.files
            .iter()
            .find_map(|file| file.syntax.type_spec(name).map(|spec| (file, spec)))
    }

    pub fn declares(&self, name: &str) -> bool {
        self.type_spec(name).is_some()
    }

    /// Default binding name of an imported path.
    pub fn import_name(&self, path: &str) -> Option<&str> {
        self.imports
            .iter()
            .find(|import| import.path == path)
            .map(|import| import.name.as_str())
    }
}

/// Module loader with caching
pub struct ModuleLoader {
    locator: PackageLocator,
    /// Cache of loaded modules by import path
    cache: FxHashMap<String, Rc<Module>>,
}

impl ModuleLoader {
    pub fn new(config: LoaderConfig) -> Self {
        let locator = PackageLocator::new(&config.dir, config.goroot, config.search_paths);
        Self {
            locator,
            cache: FxHashMap::default(),
        }
    }

    pub fn locator(&self) -> &PackageLocator {
        &self.locator
    }

    /// Load a module by import path.
    pub fn load(&mut self, import_path: &str) -> Result<Rc<Module>, LoadError> {
        if let Some(cached) = self.cache.get(import_path) {
            return Ok(Rc::clone(cached));
        }

        let location = self.locate(import_path)?;
        tracing::debug!(path = import_path, %location, "loading module");
        let module = Rc::new(self.load_uncached(import_path, &location.dir)?);
        self.cache
            .insert(import_path.to_string(), Rc::clone(&module));
        Ok(module)
    }

    fn locate(&self, import_path: &str) -> Result<PackageLocation, LoadError> {
        self.locator.locate(import_path).ok_or_else(|| {
            let searched: Vec<String> = self
                .locator
                .candidates(import_path)
                .iter()
                .map(|loc| loc.dir.display().to_string())
                .collect();
            LoadError::ModuleNotFound {
                path: import_path.to_string(),
                searched: if searched.is_empty() {
                    "no go.mod, GOROOT or search path configured".to_string()
                } else {
                    searched.join(", ")
                },
            }
        })
    }

    fn load_uncached(&self, import_path: &str, dir: &Path) -> Result<Module, LoadError> {
        let mut files = Vec::new();
        for path in go_files(dir).map_err(|err| read_error(dir, &err))? {
            let source = std::fs::read_to_string(&path).map_err(|err| read_error(&path, &err))?;
            let syntax = Parser::new(&source)
                .parse_file()
                .map_err(|err| LoadError::ModuleParse {
                    file: path.clone(),
                    message: err.error.to_string(),
                    span: err.span.into(),
                })?;
            if syntax.build_constraint.as_deref() == Some("ignore") {
                tracing::trace!(file = %path.display(), "skipping ignored file");
                continue;
            }
            files.push(ModuleFile {
                path,
                source,
                syntax,
            });
        }

        let Some(first) = files.first() else {
            return Err(LoadError::ModuleNotFound {
                path: import_path.to_string(),
                searched: format!("{} (no buildable files)", dir.display()),
            });
        };
        let name = first.syntax.package.name.clone();
        for file in &files[1..] {
            if file.syntax.package.name != name {
                return Err(LoadError::MixedPackages {
                    path: import_path.to_string(),
                    first: name,
                    second: file.syntax.package.name.clone(),
                    file: file.path.clone(),
                    span: file.syntax.package.span.into(),
                });
            }
        }

        let mut paths: Vec<&str> = files
            .iter()
            .flat_map(|file| file.imports())
            .filter(|import| import.name != ImportName::Blank)
            .map(|import| import.path.as_str())
            .collect();
        paths.sort_unstable();
        paths.dedup();
        let imports = paths
            .into_iter()
            .map(|path| ModuleImport {
                path: path.to_string(),
                name: self.package_name(path),
            })
            .collect();

        Ok(Module {
            path: import_path.to_string(),
            name,
            dir: dir.to_path_buf(),
            imports,
            files,
        })
    }

    /// Declared package name of an import path without fully loading it,
    /// falling back to the name implied by the path.
    fn package_name(&self, import_path: &str) -> String {
        if let Some(cached) = self.cache.get(import_path) {
            return cached.name.clone();
        }
        self.locator
            .locate(import_path)
            .and_then(|loc| go_files(&loc.dir).ok())
            .into_iter()
            .flatten()
            .find_map(|file| std::fs::read_to_string(file).ok().and_then(|s| package_clause(&s)))
            .unwrap_or_else(|| default_import_name(import_path))
    }
}

fn read_error(path: &Path, err: &std::io::Error) -> LoadError {
    LoadError::Read {
        file: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Package name from the leading tokens of a file.
fn package_clause(source: &str) -> Option<String> {
    let mut lexer = Lexer::new(source);
    if lexer.next_token().ty != TokenType::KwPackage {
        return None;
    }
    let name = lexer.next_token();
    (name.ty == TokenType::Identifier).then(|| name.lexeme.into_owned())
}

/// The name an import binds when its package cannot be inspected:
/// the last path segment, skipping a `vN` major version suffix.
pub fn default_import_name(import_path: &str) -> String {
    let mut segments = import_path.rsplit('/').filter(|s| !s.is_empty());
    let last = segments.next().unwrap_or(import_path);
    let is_major_version = last.len() > 1
        && last.starts_with('v')
        && last[1..].bytes().all(|b| b.is_ascii_digit());
    let segment = match segments.next() {
        Some(parent) if is_major_version => parent,
        _ => last,
    };
    segment.replace(['-', '.'], "_")
}
