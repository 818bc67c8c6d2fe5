//! REPL UI components.

use std::io::{self, Write};

use super::command::CommandName;
use super::context::Scope;
use crate::config::{API_ENDPOINT, ConfigStore, DEFAULT_API_ENDPOINT, KNOWN_KEYS};
use crate::status;
use crate::ui::Style;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn print_header() {
    status!(
        "{} {} - VEX competition data",
        Style::header("vex"),
        Style::version(format!("v{VERSION}"))
    );
    status!(
        "{}",
        Style::secondary("Type 'help' for commands, 'exit' to leave.")
    );
    status!();
}

pub fn print_goodbye() {
    status!("{}", Style::success("Goodbye!"));
}

pub fn write_help(out: &mut impl Write, scope: Scope) -> io::Result<()> {
    writeln!(
        out,
        "{} {}",
        Style::header("Available commands"),
        Style::secondary(format!("({scope})"))
    )?;

    for name in CommandName::available(scope) {
        writeln!(
            out,
            "  {} {}",
            Style::command(format!("{:<44}", name.usage())),
            Style::secondary(name.description())
        )?;
    }
    writeln!(out)
}

pub fn write_config(out: &mut impl Write, config: &ConfigStore) -> io::Result<()> {
    writeln!(out, "{}", Style::header("Configuration"))?;

    for (key, _, description) in KNOWN_KEYS {
        let value = match (config.get(key), *key) {
            (Some(value), _) => Style::value(value),
            (None, API_ENDPOINT) => {
                Style::secondary(format!("(default: {DEFAULT_API_ENDPOINT})"))
            }
            (None, _) => Style::secondary("(not set)"),
        };
        writeln!(
            out,
            "  {} {value}  {}",
            Style::label(format!("{key:<36}")),
            Style::secondary(description)
        )?;
    }
    writeln!(out)
}
