//! External `gofmt` backend.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::{FormatResult, SourceFormatter};
use crate::errors::FormatError;

/// Pipes source through `gofmt`.
#[derive(Debug, Clone)]
pub struct Gofmt {
    pub program: PathBuf,
}

impl Default for Gofmt {
    fn default() -> Self {
        Self {
            program: PathBuf::from("gofmt"),
        }
    }
}

impl Gofmt {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Locate `gofmt` on `PATH`.
    pub fn find() -> Option<Self> {
        let path = std::env::var_os("PATH")?;
        std::env::split_paths(&path)
            .map(|dir| dir.join(executable_name()))
            .find(|candidate| is_executable(candidate))
            .map(Self::new)
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

impl SourceFormatter for Gofmt {
    fn format(&self, source: &str) -> Result<FormatResult, FormatError> {
        let spawn_error = |err: std::io::Error| FormatError::Spawn {
            program: self.program_name(),
            message: err.to_string(),
        };

        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(source.as_bytes()).map_err(spawn_error)?;
        }
        let output = child.wait_with_output().map_err(spawn_error)?;

        if !output.status.success() {
            return Err(FormatError::External {
                program: self.program_name(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let formatted = String::from_utf8_lossy(&output.stdout).into_owned();
        tracing::debug!(program = %self.program.display(), "formatted with gofmt");
        Ok(FormatResult::new(source, formatted))
    }

    fn name(&self) -> &str {
        "gofmt"
    }
}

fn executable_name() -> &'static str {
    if cfg!(windows) { "gofmt.exe" } else { "gofmt" }
}

fn is_executable(path: &Path) -> bool {
    path.is_file()
}
