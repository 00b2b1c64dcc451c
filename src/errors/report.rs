// src/errors/report.rs
//! Rendering utilities for miette diagnostics.

use miette::{
    Diagnostic, GraphicalReportHandler, GraphicalTheme, NamedSource, Report, ThemeCharacters,
    ThemeStyles,
};
use std::io::{IsTerminal, Write as IoWrite};

use super::ProxygenError;
use crate::cli::ColorMode;

/// Create a handler for terminal output (unicode + colors).
pub fn terminal_handler() -> GraphicalReportHandler {
    let theme = GraphicalTheme {
        characters: ThemeCharacters::unicode(),
        styles: ThemeStyles::ansi(),
    };
    GraphicalReportHandler::new_themed(theme)
}

/// Create a handler for plain output (ascii + no colors).
pub fn snapshot_handler() -> GraphicalReportHandler {
    let theme = GraphicalTheme {
        characters: ThemeCharacters::ascii(),
        styles: ThemeStyles::none(),
    };
    GraphicalReportHandler::new_themed(theme)
}

fn handler_for(color: ColorMode) -> GraphicalReportHandler {
    let colored = match color {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => std::io::stderr().is_terminal(),
    };
    if colored {
        terminal_handler()
    } else {
        snapshot_handler()
    }
}

/// Render to stderr.
pub fn render_to_stderr(report: &dyn Diagnostic, color: ColorMode) {
    let handler = handler_for(color);
    let mut output = String::new();
    if handler.render_report(&mut output, report).is_ok() {
        eprint!("{}", output);
    }
}

/// Render to a buffer without colors.
pub fn render_to_string(report: &dyn Diagnostic) -> String {
    let mut output = String::new();
    let handler = snapshot_handler();
    let _ = handler.render_report(&mut output, report);
    output
}

/// Render to any Write impl.
pub fn render_to_writer<W: IoWrite>(report: &dyn Diagnostic, mut writer: W) -> std::io::Result<()> {
    let output = render_to_string(report);
    writer.write_all(output.as_bytes())
}

/// Wrap `err` in a report carrying the source text its labels point into.
pub fn attach_source(err: ProxygenError) -> Report {
    if let Some(generated) = err.generated_source() {
        let source = NamedSource::new("<generated>", generated.to_string()).with_language("go");
        return Report::new(err).with_source_code(source);
    }
    let source = err.source_file().and_then(|path| {
        std::fs::read_to_string(path)
            .ok()
            .map(|text| NamedSource::new(path.display().to_string(), text).with_language("go"))
    });
    match source {
        Some(source) => Report::new(err).with_source_code(source),
        None => Report::new(err),
    }
}

/// Render a driver error to stderr with its Go source attached.
pub fn render_error(err: ProxygenError, color: ColorMode) {
    let report = attach_source(err);
    render_to_stderr(report.as_ref(), color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proxygen_sema::ResolveError;

    #[test]
    fn render_interface_path_error() {
        let err = ProxygenError::InterfacePath {
            path: "Greeter".to_string(),
        };
        let output = render_to_string(&err);
        assert!(output.contains("E5001"), "should contain error code");
        assert!(output.contains("Greeter"), "should contain the path");
        assert!(output.contains("help"), "should contain help text");
    }

    #[test]
    fn render_with_go_source() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.go");
        let source = "package a\n\ntype Store[T any] interface{ Get() T }\n";
        std::fs::write(&file, source).unwrap();

        let err = ProxygenError::Resolve(ResolveError::GenericInterface {
            name: "Store".to_string(),
            file: file.clone(),
            span: (16, 5).into(),
        });
        let report = attach_source(err);
        let output = render_to_string(report.as_ref());
        assert!(output.contains("E3004"), "should contain error code");
        assert!(output.contains("a.go"), "should name the file");
        assert!(output.contains("type Store[T any]"), "should show the source line");
    }
}
