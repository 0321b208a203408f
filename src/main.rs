use clap::Parser;
use slicekit::cli::{self, Cli};
use slicekit::init_logging;
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.log_json)?;
    tracing::debug!("slicekit {} (built {})", slicekit::VERSION, slicekit::BUILD_DATE);

    cli::run(cli)
}
