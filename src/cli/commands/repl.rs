use anyhow::Result;
use std::io::{self, IsTerminal};

use crate::app::AppContext;
use crate::input::{BufferedReader, LineReader, TerminalReader};
use crate::repl::{self, ExitReason, Repl};

/// Runs the REPL on stdin/stdout until it stops.
///
/// Uses the interactive reader when stdin is a terminal and plain line
/// reading otherwise. The goodbye banner is skipped on interrupt.
pub fn run_repl(app: &mut AppContext) -> Result<ExitReason> {
    repl::print_header();

    let reason = if io::stdin().is_terminal() {
        run_with(app, &mut TerminalReader::new())?
    } else {
        let stdin = io::stdin();
        let mut reader = BufferedReader::new(stdin.lock(), io::stdout());
        run_with(app, &mut reader)?
    };

    tracing::debug!(?reason, "REPL stopped");
    if reason != ExitReason::Interrupted {
        repl::print_goodbye();
    }
    Ok(reason)
}

fn run_with(app: &mut AppContext, reader: &mut impl LineReader) -> Result<ExitReason> {
    let mut session = Repl::new(app, io::stdout());
    session.run(reader)
}
