// src/commands/generate.rs
//! Resolve an interface and write its proxy.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use proxygen_codegen::{CodeEmitter, EmitOptions};
use proxygen_fmt::FormatterChoice;

use super::common::resolve_interface;
use crate::cli::{ColorMode, LoadArgs};
use crate::errors::{ProxygenError, render_error};

/// Everything `proxygen generate` needs.
pub struct GenerateOptions {
    pub interface: String,
    pub package: String,
    pub name: String,
    pub output: Option<PathBuf>,
    pub package_path: Option<String>,
    pub load: LoadArgs,
    pub formatter: FormatterChoice,
    pub stdout: bool,
}

pub fn generate(options: &GenerateOptions, color: ColorMode) -> ExitCode {
    match generate_source(options).and_then(|source| deliver(options, &source)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            render_error(err, color);
            ExitCode::FAILURE
        }
    }
}

/// Resolve, emit and format the proxy without touching the filesystem.
pub fn generate_source(options: &GenerateOptions) -> Result<String, ProxygenError> {
    let descriptor = resolve_interface(&options.interface, &options.load)?;

    let mut emit_options = EmitOptions::new(&options.package, &options.name);
    emit_options.package_path = options.package_path.clone();

    let formatter = options.formatter.build();
    tracing::debug!(formatter = formatter.name(), "emitting proxy");
    let source = CodeEmitter::new(formatter.as_ref()).emit(&descriptor, &emit_options)?;
    Ok(source)
}

fn deliver(options: &GenerateOptions, source: &str) -> Result<(), ProxygenError> {
    match &options.output {
        Some(path) if !options.stdout => write_atomically(path, source),
        _ => {
            print!("{source}");
            Ok(())
        }
    }
}

/// Write through a temporary sibling file so a failed run never leaves a
/// partial proxy behind.
fn write_atomically(path: &Path, contents: &str) -> Result<(), ProxygenError> {
    let io_error = |err: std::io::Error| ProxygenError::FileIo {
        path: path.to_path_buf(),
        message: err.to_string(),
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(io_error)?;
    file.write_all(contents.as_bytes()).map_err(io_error)?;
    file.as_file().sync_all().map_err(io_error)?;
    file.persist(path).map_err(|err| io_error(err.error))?;

    tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote proxy");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_and_replaces_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proxy.go");
        write_atomically(&path, "package a\n").unwrap();
        write_atomically(&path, "package b\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "package b\n");
        // Only the target remains; no temporary siblings.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn missing_directory_is_a_file_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("proxy.go");
        let err = write_atomically(&path, "package a\n").unwrap_err();
        assert!(matches!(err, ProxygenError::FileIo { .. }));
        assert!(!path.exists());
    }
}
