use clap::Parser;

use rsenroll::cli::args::Cli;
use rsenroll::cli::commands::execute_command;
use rsenroll::cli::{output, CliError};
use rsenroll::config::Settings;
use rsenroll::exitcode;
use rsenroll::infrastructure::di::ServiceContainer;
use rsenroll::infrastructure::logging::init_logging;

fn main() {
    let cli = Cli::parse();

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            let e = CliError::from(e);
            output::error(&e);
            std::process::exit(e.exit_code());
        }
    };

    let container = ServiceContainer::new(settings);

    let log_guard = match init_logging(
        cli.debug,
        container.settings.record_file(),
        container.fs.as_ref(),
    ) {
        Ok(guard) => guard,
        Err(e) => {
            output::warning(&e);
            None
        }
    };

    let code = match execute_command(&cli, &container) {
        Ok(()) => exitcode::OK,
        Err(e) => {
            output::error(&e);
            e.exit_code()
        }
    };
    // process::exit skips destructors, flush the record file first
    drop(log_guard);
    std::process::exit(code);
}
