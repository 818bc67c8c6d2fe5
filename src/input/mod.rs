//! Line input for the REPL.

mod reader;

pub use reader::{BufferedReader, LineReader, ReadOutcome, TerminalReader};
