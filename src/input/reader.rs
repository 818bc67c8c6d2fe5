use anyhow::{Context, Result};
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};
use inquire::{InquireError, Text};
use std::io::{BufRead, Write};

use crate::repl::{CommandCompleter, Scope};

/// Result of reading one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// Ctrl+C while reading.
    Interrupted,
    /// Input stream closed.
    Eof,
}

/// A source of REPL input lines.
pub trait LineReader {
    /// Displays `prefix` and reads one line. `scope` drives completion.
    fn read_line(&mut self, prefix: &str, scope: Scope) -> Result<ReadOutcome>;
}

/// Interactive terminal reader with command completion.
#[derive(Default)]
pub struct TerminalReader;

impl TerminalReader {
    pub const fn new() -> Self {
        Self
    }
}

impl LineReader for TerminalReader {
    fn read_line(&mut self, prefix: &str, scope: Scope) -> Result<ReadOutcome> {
        let prompt_style = Styled::new(prefix.trim_end())
            .with_fg(Color::LightBlue)
            .with_attr(Attributes::BOLD);
        let mut render_config = RenderConfig::default()
            .with_prompt_prefix(prompt_style)
            .with_answered_prompt_prefix(prompt_style);

        // Non-highlighted suggestions: gray
        render_config.option = StyleSheet::new().with_fg(Color::Grey);
        // Highlighted suggestion: purple
        render_config.selected_option = Some(StyleSheet::new().with_fg(Color::DarkMagenta));

        let input = Text::new("")
            .with_render_config(render_config)
            .with_autocomplete(CommandCompleter::new(scope))
            .with_help_message("Type a command, help for commands, exit to leave, Ctrl+C to quit")
            .prompt();

        match input {
            Ok(line) => Ok(ReadOutcome::Line(line)),
            Err(InquireError::OperationInterrupted) => Ok(ReadOutcome::Interrupted),
            // Esc drops the current line only
            Err(InquireError::OperationCanceled) => Ok(ReadOutcome::Line(String::new())),
            Err(e) => Err(e).context("Failed to read input"),
        }
    }
}

/// Plain line reader for piped input.
///
/// Writes the prompt prefix to `prompt_out` before each read.
pub struct BufferedReader<R, W> {
    input: R,
    prompt_out: W,
}

impl<R: BufRead, W: Write> BufferedReader<R, W> {
    pub const fn new(input: R, prompt_out: W) -> Self {
        Self { input, prompt_out }
    }
}

impl<R: BufRead, W: Write> LineReader for BufferedReader<R, W> {
    fn read_line(&mut self, prefix: &str, _scope: Scope) -> Result<ReadOutcome> {
        write!(self.prompt_out, "{prefix}")?;
        self.prompt_out.flush()?;

        let mut line = String::new();
        let bytes_read = self
            .input
            .read_line(&mut line)
            .context("Failed to read from stdin")?;

        if bytes_read == 0 {
            return Ok(ReadOutcome::Eof);
        }

        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(ReadOutcome::Line(line))
    }
}
