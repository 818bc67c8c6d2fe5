/// The interactive REPL.
pub mod repl;
