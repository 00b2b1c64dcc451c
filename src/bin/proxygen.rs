// src/bin/proxygen.rs

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::time::FormatTime;

use proxygen::cli::{Cli, Commands};
use proxygen::commands::generate::{GenerateOptions, generate};
use proxygen::commands::inspect::inspect_interface;
use proxygen::commands::version::print_version;

/// A timer that outputs nothing but still enables span timing calculation
struct NoTimestamp;

impl FormatTime for NoTimestamp {
    fn format_time(
        &self,
        _w: &mut tracing_subscriber::fmt::format::Writer<'_>,
    ) -> std::fmt::Result {
        Ok(())
    }
}

fn main() -> ExitCode {
    // Initialize tracing if PROXYGEN_LOG is set
    // PROXYGEN_LOG_STYLE: "compact" (default) or "full" (with timestamps)
    if let Ok(filter) = EnvFilter::try_from_env("PROXYGEN_LOG") {
        let style = std::env::var("PROXYGEN_LOG_STYLE").unwrap_or_default();
        if style == "full" {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_level(true)
                .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
                .with_writer(std::io::stderr)
                .init();
        } else {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_level(true)
                .with_timer(NoTimestamp)
                .with_writer(std::io::stderr)
                .init();
        }
        tracing::debug!("tracing initialized");
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            interface,
            package,
            name,
            output,
            package_path,
            load,
            formatter,
            stdout,
        } => generate(
            &GenerateOptions {
                interface,
                package,
                name,
                output,
                package_path,
                load,
                formatter: formatter.into(),
                stdout,
            },
            cli.color,
        ),
        Commands::Inspect { interface, load } => inspect_interface(&interface, &load, cli.color),
        Commands::Version => print_version(),
    }
}
