//! Command-line interface definitions and handlers.

/// CLI argument parsing with clap.
pub mod args;

/// Entry points driven by the parsed arguments.
pub mod commands;

pub use args::Args;
