// src/cli/args.rs

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use proxygen_fmt::FormatterChoice;

/// Color output mode
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect based on terminal
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Which formatter normalizes the generated file
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum FormatterArg {
    /// gofmt when it is on PATH, otherwise the built-in formatter
    #[default]
    Auto,
    /// Built-in formatter
    Builtin,
    /// External gofmt
    Gofmt,
}

impl From<FormatterArg> for FormatterChoice {
    fn from(arg: FormatterArg) -> Self {
        match arg {
            FormatterArg::Auto => FormatterChoice::Auto,
            FormatterArg::Builtin => FormatterChoice::Builtin,
            FormatterArg::Gofmt => FormatterChoice::Gofmt,
        }
    }
}

/// Interception proxy generator for Go interfaces
#[derive(Parser)]
#[command(name = "proxygen")]
#[command(version)]
#[command(about = "Generates interception proxies for Go interfaces", long_about = None)]
pub struct Cli {
    /// Color output: auto, always, never
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where modules are looked up.
#[derive(Args, Clone, Debug)]
pub struct LoadArgs {
    /// Directory inside the Go module to resolve from
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Extra roots searched for module paths outside the main module
    #[arg(long = "search-path", value_name = "DIR")]
    pub search_paths: Vec<PathBuf>,

    /// Leave out embedded interfaces that fail to resolve instead of failing
    #[arg(long)]
    pub skip_unresolved_embeds: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a proxy for an interface
    #[command(visible_alias = "g")]
    Generate {
        /// Interface to proxy, as <module path>.<Interface>
        #[arg(value_name = "INTERFACE")]
        interface: String,

        /// Package clause of the generated file
        #[arg(short, long, value_name = "NAME")]
        package: String,

        /// Name of the generated proxy type
        #[arg(short, long, value_name = "TYPE")]
        name: String,

        /// File to write
        #[arg(short, long, value_name = "PATH", required_unless_present = "stdout")]
        output: Option<PathBuf>,

        /// Import path of the output package
        #[arg(long, value_name = "PATH")]
        package_path: Option<String>,

        #[command(flatten)]
        load: LoadArgs,

        /// Formatter: auto, builtin, gofmt
        #[arg(long, value_enum, default_value_t = FormatterArg::Auto)]
        formatter: FormatterArg,

        /// Print the proxy instead of writing it
        #[arg(long)]
        stdout: bool,
    },
    /// Print the resolved method set of an interface
    #[command(visible_alias = "i")]
    Inspect {
        /// Interface to inspect, as <module path>.<Interface>
        #[arg(value_name = "INTERFACE")]
        interface: String,

        #[command(flatten)]
        load: LoadArgs,
    },
    /// Show version information
    Version,
}
