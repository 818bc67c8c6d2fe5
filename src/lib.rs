//! # vex - VEX Competition Data REPL
//!
//! `vex` is an interactive shell for looking up VEX robotics competition
//! data: teams, matches, rankings, and season stats.
//!
//! ## Quick Start
//!
//! ```bash
//! # Start with the configured team
//! vex
//!
//! # Start with another team
//! vex --team 8838E
//! ```
//!
//! Inside the REPL:
//!
//! ```text
//! 750B> comp RE-VRC-17-3805 ||team|| 750B
//! 750B> match next
//! 750B> where
//! 750B> exit
//! ```
//!
//! ## Configuration
//!
//! Settings are read from `~/.config/vex/config.toml`:
//!
//! ```toml
//! current_team = "750B"
//! match_load_default_to_organization = false
//! api_endpoint = "https://api.vexdb.io/v1"
//! ```

/// Competition-data API queries and request preparation.
pub mod api;

/// Application context shared by the REPL.
pub mod app;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration store and config file loading.
pub mod config;

/// Line input from the terminal or piped stdin.
pub mod input;

/// Global output configuration (quiet mode, colors, stderr/stdout routing).
pub mod output;

/// XDG-style path utilities for configuration.
pub mod paths;

/// The interactive REPL: command grammar, scopes, and evaluation.
pub mod repl;

/// Terminal UI components (colors, error printing).
pub mod ui;
