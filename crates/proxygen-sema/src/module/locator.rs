//! Module locator - maps Go import paths to package directories.
//!
//! Search order for an import path:
//! 1. `<module root>/<rest>` when the path equals or extends the `go.mod` module path
//! 2. `<module root>/vendor/<path>`
//! 3. `$GOROOT/src/<path>`
//! 4. `<search path>/<path>` for each configured extra root

use std::path::{Path, PathBuf};

/// The Go module enclosing the working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoModule {
    /// Directory containing `go.mod`
    pub root: PathBuf,
    /// Module path from the `module` directive
    pub path: String,
}

/// Result of a package directory search
#[derive(Debug, Clone)]
pub struct PackageLocation {
    pub dir: PathBuf,
    pub source: LocationSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSource {
    Module,
    Vendor,
    GoRoot,
    SearchPath,
}

impl std::fmt::Display for PackageLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:?})", self.dir.display(), self.source)
    }
}

/// Locator for package directories
#[derive(Debug, Clone)]
pub struct PackageLocator {
    module: Option<GoModule>,
    goroot: Option<PathBuf>,
    search_paths: Vec<PathBuf>,
}

impl PackageLocator {
    pub fn new(start_dir: &Path, goroot: Option<PathBuf>, search_paths: Vec<PathBuf>) -> Self {
        let module = Self::find_go_mod(start_dir);
        if let Some(module) = &module {
            tracing::debug!(root = %module.root.display(), path = %module.path, "found go.mod");
        }
        Self {
            module,
            goroot,
            search_paths,
        }
    }

    pub fn module(&self) -> Option<&GoModule> {
        self.module.as_ref()
    }

    /// Search upward from `start_dir` for a `go.mod` with a module directive.
    pub fn find_go_mod(start_dir: &Path) -> Option<GoModule> {
        let mut current = Some(start_dir);
        while let Some(dir) = current {
            let go_mod = dir.join("go.mod");
            if let Ok(contents) = std::fs::read_to_string(&go_mod)
                && let Some(path) = module_directive(&contents)
            {
                return Some(GoModule {
                    root: dir.to_path_buf(),
                    path,
                });
            }
            current = dir.parent();
        }
        None
    }

    /// Every directory an import path may live in, in search order.
    pub fn candidates(&self, import_path: &str) -> Vec<PackageLocation> {
        let mut out = Vec::new();
        let relative = relative_path(import_path);

        if let Some(module) = &self.module {
            if let Some(rest) = strip_module_prefix(import_path, &module.path) {
                out.push(PackageLocation {
                    dir: module.root.join(relative_path(rest)),
                    source: LocationSource::Module,
                });
            }
            out.push(PackageLocation {
                dir: module.root.join("vendor").join(&relative),
                source: LocationSource::Vendor,
            });
        }
        if let Some(goroot) = &self.goroot {
            out.push(PackageLocation {
                dir: goroot.join("src").join(&relative),
                source: LocationSource::GoRoot,
            });
        }
        for root in &self.search_paths {
            out.push(PackageLocation {
                dir: root.join(&relative),
                source: LocationSource::SearchPath,
            });
        }
        out
    }

    /// Locate the directory for an import path.
    /// Returns the first candidate holding at least one Go source file.
    pub fn locate(&self, import_path: &str) -> Option<PackageLocation> {
        self.candidates(import_path)
            .into_iter()
            .find(|loc| has_go_files(&loc.dir))
    }
}

/// Non-test `.go` files of a directory, sorted by file name.
pub fn go_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.ends_with(".go") && !name.ends_with("_test.go") && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn has_go_files(dir: &Path) -> bool {
    dir.is_dir() && go_files(dir).is_ok_and(|files| !files.is_empty())
}

/// `module example.com/proj` -> `example.com/proj`
fn module_directive(go_mod: &str) -> Option<String> {
    go_mod.lines().find_map(|line| {
        let line = line.split("//").next().unwrap_or_default().trim();
        let path = line.strip_prefix("module")?;
        if !path.starts_with(char::is_whitespace) {
            return None;
        }
        let path = path.trim().trim_matches(|c| c == '"' || c == '`');
        (!path.is_empty()).then(|| path.to_string())
    })
}

fn strip_module_prefix<'a>(import_path: &'a str, module_path: &str) -> Option<&'a str> {
    if import_path == module_path {
        return Some("");
    }
    import_path
        .strip_prefix(module_path)
        .and_then(|rest| rest.strip_prefix('/'))
}

fn relative_path(import_path: &str) -> PathBuf {
    import_path.split('/').filter(|s| !s.is_empty()).collect()
}
