//! Interactive REPL over the competition-data API.
//!
//! Commands are parsed into a tagged [`command::Command`] and evaluated
//! against a stack of nested scopes ([`context::ContextStack`]).

/// Command grammar, parsing, and autocomplete.
pub mod command;
/// Nested command scopes.
pub mod context;
mod session;
mod ui;

pub use command::{Command, CommandCompleter, Input, ParseError, parse_input};
pub use context::{ContextStack, Scope, Subcontext};
pub use session::{EXIT_SENTINEL, EvalOutcome, ExitReason, Repl, ReplError, is_exit_sentinel};
pub use ui::{print_goodbye, print_header};
