use clap::Parser;
use license_report::{Cli, handlers::handle_report, logging::init_logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    handle_report(&cli)
}
