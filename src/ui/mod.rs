//! Terminal UI components.

mod style;

pub use style::Style;

/// Prints an error message to stderr.
pub fn print_error(message: &str) {
    eprintln!("{} {message}", Style::error("Error:"));
}
