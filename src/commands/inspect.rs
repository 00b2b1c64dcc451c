// src/commands/inspect.rs
//! Print the resolved method set of an interface.

use std::process::ExitCode;

use super::common::resolve_interface;
use crate::cli::{ColorMode, LoadArgs};
use crate::errors::render_error;

pub fn inspect_interface(interface: &str, load: &LoadArgs, color: ColorMode) -> ExitCode {
    match resolve_interface(interface, load) {
        Ok(descriptor) => {
            print!("{descriptor}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            render_error(err, color);
            ExitCode::FAILURE
        }
    }
}
