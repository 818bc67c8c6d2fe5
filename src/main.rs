use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

use vex_cli::app::{AppContext, StartupOptions};
use vex_cli::cli::Args;
use vex_cli::cli::commands::repl::run_repl;
use vex_cli::output::{self, OutputConfig};
use vex_cli::repl::ExitReason;
use vex_cli::ui;

/// Conventional status for termination by SIGINT (128 + 2).
const EXIT_INTERRUPTED: i32 = 130;

fn main() {
    let args = Args::parse();

    let defaults = OutputConfig::default();
    let no_color = args.no_color || defaults.no_color;
    output::init(OutputConfig {
        quiet: args.quiet,
        no_color,
    });

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("VEX_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .init();

    let options = StartupOptions {
        config_path: args.config,
        team: args.team,
    };
    let mut app = match AppContext::init(&options) {
        Ok(app) => app,
        Err(e) => {
            ui::print_error(&format!("{e:#}"));
            process::exit(exitcode::CONFIG);
        }
    };

    let code = match run_repl(&mut app) {
        Ok(ExitReason::Interrupted) => EXIT_INTERRUPTED,
        Ok(_) => exitcode::OK,
        Err(e) => {
            ui::print_error(&format!("{e:#}"));
            exitcode::SOFTWARE
        }
    };

    app.shutdown();
    process::exit(code);
}
