// src/commands/version.rs
use std::process::ExitCode;

use proxygen_fmt::Gofmt;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version_string() -> &'static str {
    VERSION
}

pub fn print_version() -> ExitCode {
    println!("proxygen {}", version_string());
    match Gofmt::find() {
        Some(gofmt) => println!("gofmt: {}", gofmt.program.display()),
        None => println!("gofmt: not found (using built-in formatter)"),
    }
    match std::env::var_os("GOROOT").filter(|v| !v.is_empty()) {
        Some(goroot) => println!("GOROOT: {}", goroot.to_string_lossy()),
        None => println!("GOROOT: not set"),
    }
    ExitCode::SUCCESS
}
