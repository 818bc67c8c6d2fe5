use anyhow::Result;
use std::io::{self, Write};
use thiserror::Error;

use super::command::{Command, ConfigAction, Input, MatchAction, ParseError, parse_input};
use super::context::{
    ContextStack, MatchFilter, MatchSelector, Scope, StatsTarget, Subcontext, organization_of,
};
use super::ui;
use crate::api::{ApiError, Query};
use crate::app::{AppContext, AppError};
use crate::config::{ConfigError, kind_of};
use crate::input::{LineReader, ReadOutcome};
use crate::ui::Style;

/// Literal that ends the session at global scope.
pub const EXIT_SENTINEL: &str = "exit";

/// Returns `true` if `line` is the exit sentinel (any case).
pub fn is_exit_sentinel(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(EXIT_SENTINEL)
}

#[derive(Debug, Error)]
pub enum ReplError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    App(#[from] AppError),

    #[error("No team selected. Name one or run 'config set current_team <team>'")]
    NoTeam,

    #[error("Writing the config file is not supported. Edit {0} instead")]
    UpdateUnsupported(String),

    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl From<ConfigError> for ReplError {
    fn from(err: ConfigError) -> Self {
        Self::App(AppError::Config(err))
    }
}

impl From<ApiError> for ReplError {
    fn from(err: ApiError) -> Self {
        Self::App(AppError::Api(err))
    }
}

/// What the loop does after evaluating a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalOutcome {
    Continue,
    Terminate,
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// `exit` at global scope.
    Sentinel,
    /// `quit`.
    Quit,
    /// Input stream closed.
    EndOfInput,
    /// Ctrl+C while reading.
    Interrupted,
}

/// The read-evaluate-print loop.
///
/// Command results are written to `out`; errors are reported on stderr by
/// [`Repl::run`].
pub struct Repl<'a, W: Write> {
    app: &'a mut AppContext,
    contexts: ContextStack,
    out: W,
}

impl<'a, W: Write> Repl<'a, W> {
    pub fn new(app: &'a mut AppContext, out: W) -> Self {
        Self {
            app,
            contexts: ContextStack::new(),
            out,
        }
    }

    pub const fn contexts(&self) -> &ContextStack {
        &self.contexts
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// `current_team + "> "` when a team is configured, `"> "` otherwise.
    pub fn prompt_prefix(&self) -> String {
        self.app
            .config()
            .current_team()
            .map_or_else(|| "> ".to_string(), |team| format!("{team}> "))
    }

    /// Displays the prompt and reads one line.
    pub fn prompt(&self, reader: &mut impl LineReader) -> Result<ReadOutcome> {
        reader.read_line(&self.prompt_prefix(), self.contexts.scope())
    }

    /// Runs until the sentinel, `quit`, end of input, or an interrupt.
    pub fn run(&mut self, reader: &mut impl LineReader) -> Result<ExitReason> {
        loop {
            let line = match self.prompt(reader)? {
                ReadOutcome::Line(line) => line,
                ReadOutcome::Eof => return Ok(ExitReason::EndOfInput),
                ReadOutcome::Interrupted => return Ok(ExitReason::Interrupted),
            };

            if self.contexts.is_global() && is_exit_sentinel(&line) {
                return Ok(ExitReason::Sentinel);
            }

            match self.eval(&line) {
                Ok(EvalOutcome::Continue) => {}
                Ok(EvalOutcome::Terminate) => return Ok(ExitReason::Quit),
                Err(ReplError::Io(e)) => return Err(e.into()),
                Err(e) => crate::ui::print_error(&e.to_string()),
            }
        }
    }

    /// Evaluates one line in the current scope.
    pub fn eval(&mut self, line: &str) -> Result<EvalOutcome, ReplError> {
        match parse_input(line, self.contexts.scope())? {
            Input::Empty => Ok(EvalOutcome::Continue),
            Input::Text(text) => {
                self.echo_reversed(&text)?;
                Ok(EvalOutcome::Continue)
            }
            Input::Command(cmd) => self.execute(cmd),
        }
    }

    /// Placeholder evaluation for anything that is not a command.
    fn echo_reversed(&mut self, text: &str) -> io::Result<()> {
        let reversed: String = text.chars().rev().collect();
        writeln!(self.out, "{reversed}")
    }

    fn execute(&mut self, cmd: Command) -> Result<EvalOutcome, ReplError> {
        match cmd {
            Command::Help => ui::write_help(&mut self.out, self.contexts.scope())?,
            Command::Where => {
                writeln!(self.out, "{}", Style::context(self.contexts.path()))?;
            }
            Command::Exit => match self.contexts.pop() {
                Some(left) => self.report_context_change(&format!("Left {left}"))?,
                None => return Ok(EvalOutcome::Terminate),
            },
            Command::Quit => return Ok(EvalOutcome::Terminate),
            Command::Global(inner) => {
                self.contexts.clear();
                match inner {
                    Some(cmd) => return self.execute(*cmd),
                    None => self.report_context_change("Back to global scope")?,
                }
            }
            Command::Config(action) => self.execute_config(action)?,
            Command::Competition { sku, team } => {
                self.plan(&Query::event(&sku))?;
                self.enter(Subcontext::Competition { sku })?;
                if let Some(name) = team {
                    self.plan(&Query::team(&name))?;
                    self.enter(Subcontext::Team { name })?;
                }
            }
            Command::Team { name } => {
                self.plan(&Query::team(&name))?;
                self.enter(Subcontext::Team { name })?;
            }
            Command::Match { action, team, sku } => self.execute_match(action, team, sku)?,
            Command::Stats { target } => {
                let target = match target {
                    Some(target) => StatsTarget::parse(&target),
                    None => StatsTarget::Team(self.selected_team(None)?),
                };
                let query = match &target {
                    StatsTarget::Team(team) => Query::season_rankings().param("team", team),
                    StatsTarget::Organization(org) => Query::team(org),
                };
                self.plan(&query)?;
                self.enter(Subcontext::Stats { target })?;
            }
            Command::Rank { team, sku } => {
                let team = self.selected_team(team)?;
                let sku = sku.or_else(|| self.contexts.competition_sku().map(str::to_string));
                self.plan(
                    &Query::rankings()
                        .param_opt("sku", sku.as_deref())
                        .param("team", team),
                )?;
            }
            Command::History { team } => {
                let team = self.selected_team(team)?;
                self.plan(&Query::matches().param("team", &team))?;
                self.enter(Subcontext::History { team })?;
            }
        }
        Ok(EvalOutcome::Continue)
    }

    fn execute_config(&mut self, action: ConfigAction) -> Result<(), ReplError> {
        match action {
            ConfigAction::Enter => self.enter(Subcontext::Config)?,
            ConfigAction::Set { key, value } => {
                self.app.set_config(&key, &value)?;
                let stored = self.app.config().get(&key).unwrap_or_default();
                writeln!(
                    self.out,
                    "{} {} set to {}",
                    Style::success("✓"),
                    Style::label(&key),
                    Style::value(stored)
                )?;
            }
            ConfigAction::Get { key } => {
                if kind_of(&key).is_none() {
                    return Err(ConfigError::UnknownKey { key }.into());
                }
                let value = self
                    .app
                    .config()
                    .get(&key)
                    .map_or_else(|| Style::secondary("(not set)"), Style::value);
                writeln!(self.out, "{} = {value}", Style::label(&key))?;
            }
            ConfigAction::Unset { key } => {
                self.app.unset_config(&key)?;
                writeln!(
                    self.out,
                    "{} {} cleared",
                    Style::success("✓"),
                    Style::label(&key)
                )?;
            }
            ConfigAction::Show => ui::write_config(&mut self.out, self.app.config())?,
            ConfigAction::Update => {
                let path = self
                    .app
                    .config_path()
                    .map_or_else(|| "the config file".to_string(), |p| p.display().to_string());
                return Err(ReplError::UpdateUnsupported(path));
            }
        }
        Ok(())
    }

    fn execute_match(
        &mut self,
        action: MatchAction,
        team: Option<String>,
        sku: Option<String>,
    ) -> Result<(), ReplError> {
        let sku = sku.or_else(|| self.contexts.competition_sku().map(str::to_string));

        match action {
            MatchAction::Next | MatchAction::Previous | MatchAction::Lookup(_) => {
                let team = team.or_else(|| self.optional_team());
                let (selector, query) = match action {
                    MatchAction::Lookup(n) => (
                        MatchSelector::Lookup(n),
                        Query::matches()
                            .param_opt("sku", sku.as_deref())
                            .param("matchnum", n.to_string()),
                    ),
                    MatchAction::Previous => (
                        MatchSelector::Previous,
                        Query::matches()
                            .param_opt("sku", sku.as_deref())
                            .param_opt("team", team.as_deref())
                            .param("scored", "1"),
                    ),
                    _ => (
                        MatchSelector::Next,
                        Query::matches()
                            .param_opt("sku", sku.as_deref())
                            .param_opt("team", team.as_deref())
                            .param("scored", "0"),
                    ),
                };
                self.plan(&query)?;

                let context = Subcontext::Match {
                    sku,
                    team,
                    selector,
                };
                if self.contexts.scope() == Scope::Match {
                    let message = format!("Now at {context}");
                    self.contexts.replace_top(context);
                    self.report_context_change(&message)?;
                } else {
                    self.enter(context)?;
                }
            }
            MatchAction::Load => {
                let filter = team.or_else(|| self.optional_team()).map(|team| {
                    if self.app.config().match_load_defaults_to_organization() {
                        MatchFilter::Organization(organization_of(&team).to_string())
                    } else {
                        MatchFilter::Team(team)
                    }
                });
                let team_param = match &filter {
                    Some(MatchFilter::Team(team)) => Some(team.as_str()),
                    _ => None,
                };
                self.plan(
                    &Query::matches()
                        .param_opt("sku", sku.as_deref())
                        .param_opt("team", team_param),
                )?;
                self.enter(Subcontext::MatchList { sku, filter })?;
            }
            MatchAction::Wait => {
                let team = self.selected_team(team)?;
                self.plan(
                    &Query::matches()
                        .param_opt("sku", sku.as_deref())
                        .param("team", team)
                        .param("scored", "0"),
                )?;
            }
            MatchAction::History => {
                let team = self.selected_team(team)?;
                self.plan(&Query::matches().param("team", &team))?;
                self.enter(Subcontext::History { team })?;
            }
        }
        Ok(())
    }

    /// Team named by the command, the innermost team context, or `current_team`.
    fn selected_team(&self, explicit: Option<String>) -> Result<String, ReplError> {
        explicit
            .or_else(|| self.optional_team())
            .ok_or(ReplError::NoTeam)
    }

    fn optional_team(&self) -> Option<String> {
        self.contexts
            .team()
            .or_else(|| self.app.config().current_team())
            .map(str::to_string)
    }

    /// Prepares the request for `query` and shows it. Nothing is sent.
    fn plan(&mut self, query: &Query) -> Result<(), ReplError> {
        let request = self.app.api().prepare(query)?;
        writeln!(
            self.out,
            "{} {} {}",
            Style::label(request.method()),
            Style::value(request.url()),
            Style::secondary("(not sent)")
        )?;
        Ok(())
    }

    fn enter(&mut self, context: Subcontext) -> io::Result<()> {
        let message = format!("Entered {context}");
        self.contexts.push(context);
        self.report_context_change(&message)
    }

    fn report_context_change(&mut self, message: &str) -> io::Result<()> {
        writeln!(
            self.out,
            "{} {}",
            message,
            Style::secondary(format!("[{}]", self.contexts.path()))
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{CURRENT_TEAM, ConfigStore, MATCH_LOAD_DEFAULT_TO_ORGANIZATION};
    use std::collections::VecDeque;

    /// Replays scripted lines and records every prompt prefix shown.
    struct ScriptedReader {
        lines: VecDeque<ReadOutcome>,
        prefixes: Vec<String>,
    }

    impl ScriptedReader {
        fn new(lines: &[&str]) -> Self {
            Self {
                lines: lines
                    .iter()
                    .map(|l| ReadOutcome::Line((*l).to_string()))
                    .collect(),
                prefixes: Vec::new(),
            }
        }

        fn then(mut self, outcome: ReadOutcome) -> Self {
            self.lines.push_back(outcome);
            self
        }
    }

    impl LineReader for ScriptedReader {
        fn read_line(&mut self, prefix: &str, _scope: Scope) -> Result<ReadOutcome> {
            self.prefixes.push(prefix.to_string());
            Ok(self.lines.pop_front().unwrap_or(ReadOutcome::Eof))
        }
    }

    fn app() -> AppContext {
        AppContext::new(ConfigStore::with_defaults()).unwrap()
    }

    fn output(repl: Repl<'_, Vec<u8>>) -> String {
        String::from_utf8(repl.into_output()).unwrap()
    }

    #[test]
    fn test_prompt_prefix_with_team() {
        let mut app = app();
        let repl = Repl::new(&mut app, Vec::new());
        assert_eq!(repl.prompt_prefix(), "750B> ");
    }

    #[test]
    fn test_prompt_prefix_without_team() {
        let mut app = AppContext::new(ConfigStore::empty()).unwrap();
        let repl = Repl::new(&mut app, Vec::new());
        assert_eq!(repl.prompt_prefix(), "> ");
    }

    #[test]
    fn test_prompt_displays_prefix() {
        let mut app = app();
        let repl = Repl::new(&mut app, Vec::new());
        let mut reader = ScriptedReader::new(&["abc"]);

        let outcome = repl.prompt(&mut reader).unwrap();

        assert_eq!(outcome, ReadOutcome::Line("abc".to_string()));
        assert_eq!(reader.prefixes, vec!["750B> "]);
    }

    #[test]
    fn test_placeholder_reverses_text() {
        let mut app = app();
        let mut repl = Repl::new(&mut app, Vec::new());

        assert_eq!(repl.eval("abc").unwrap(), EvalOutcome::Continue);
        assert_eq!(output(repl), "cba\n");
    }

    #[test]
    fn test_placeholder_reverses_unicode() {
        let mut app = app();
        let mut repl = Repl::new(&mut app, Vec::new());

        repl.eval("héllo 🌍").unwrap();
        assert_eq!(output(repl), "🌍 olléh\n");
    }

    #[test]
    fn test_exit_sentinel_any_case_skips_evaluator() {
        for sentinel in ["exit", "EXIT", "Exit"] {
            let mut app = app();
            let mut repl = Repl::new(&mut app, Vec::new());
            let mut reader = ScriptedReader::new(&["abc", sentinel, "xyz"]);

            let reason = repl.run(&mut reader).unwrap();

            assert_eq!(reason, ExitReason::Sentinel);
            assert_eq!(reader.lines.len(), 1, "loop must stop at the sentinel");
            assert_eq!(output(repl), "cba\n");
        }
    }

    #[test]
    fn test_is_exit_sentinel() {
        assert!(is_exit_sentinel("exit"));
        assert!(is_exit_sentinel(" ExIt \n"));
        assert!(!is_exit_sentinel("exit now"));
        assert!(!is_exit_sentinel("quit"));
    }

    #[test]
    fn test_run_stops_on_interrupt_and_eof() {
        let mut app = app();
        let mut repl = Repl::new(&mut app, Vec::new());

        let mut reader = ScriptedReader::new(&["abc"]).then(ReadOutcome::Interrupted);
        assert_eq!(repl.run(&mut reader).unwrap(), ExitReason::Interrupted);

        let mut reader = ScriptedReader::new(&[]);
        assert_eq!(repl.run(&mut reader).unwrap(), ExitReason::EndOfInput);
    }

    #[test]
    fn test_quit_terminates_from_any_depth() {
        let mut app = app();
        let mut repl = Repl::new(&mut app, Vec::new());
        let mut reader = ScriptedReader::new(&["comp RE-VRC-17-3805", "team 750B", "quit", "abc"]);

        assert_eq!(repl.run(&mut reader).unwrap(), ExitReason::Quit);
        assert_eq!(reader.lines.len(), 1);
    }

    #[test]
    fn test_errors_do_not_stop_the_loop() {
        let mut app = app();
        let mut repl = Repl::new(&mut app, Vec::new());
        let mut reader = ScriptedReader::new(&["team 750-B", "config set nope 1", "abc", "exit"]);

        assert_eq!(repl.run(&mut reader).unwrap(), ExitReason::Sentinel);
        assert!(output(repl).ends_with("cba\n"));
    }

    #[test]
    fn test_config_set_changes_prompt() {
        let mut app = app();
        let mut repl = Repl::new(&mut app, Vec::new());
        let mut reader = ScriptedReader::new(&["config set current_team 1234a", "exit"]);

        repl.run(&mut reader).unwrap();

        assert_eq!(reader.prefixes, vec!["750B> ", "1234A> "]);
    }

    #[test]
    fn test_config_unset_falls_back_to_bare_prompt() {
        let mut app = app();
        let mut repl = Repl::new(&mut app, Vec::new());

        repl.eval("config unset current_team").unwrap();
        assert_eq!(repl.prompt_prefix(), "> ");
    }

    #[test]
    fn test_config_invalid_set_is_error_and_store_unchanged() {
        let mut app = app();
        let mut repl = Repl::new(&mut app, Vec::new());

        let err = repl.eval("config set current_team 750-B").unwrap_err();
        assert!(err.to_string().contains("Invalid value for current_team"));

        let err = repl.eval("config set favourite_team 750B").unwrap_err();
        assert!(err.to_string().contains("Unknown setting"));

        drop(repl);
        assert_eq!(app.config().get(CURRENT_TEAM), Some("750B"));
    }

    #[test]
    fn test_config_get() {
        let mut app = app();
        let mut repl = Repl::new(&mut app, Vec::new());

        repl.eval("config get current_team").unwrap();
        repl.eval("config get api_endpoint").unwrap();
        assert!(repl.eval("config get bogus").is_err());

        let out = output(repl);
        assert!(out.contains("750B"));
        assert!(out.contains("(not set)"));
    }

    #[test]
    fn test_config_scope() {
        let mut app = app();
        let mut repl = Repl::new(&mut app, Vec::new());

        repl.eval("config").unwrap();
        assert_eq!(repl.contexts().scope(), Scope::Config);

        repl.eval("set match_load_default_to_organization true").unwrap();
        repl.eval("show").unwrap();
        assert!(matches!(
            repl.eval("comp X"),
            Err(ReplError::Parse(ParseError::Unavailable { .. }))
        ));

        assert_eq!(repl.eval("exit").unwrap(), EvalOutcome::Continue);
        assert!(repl.contexts().is_global());

        drop(repl);
        assert!(app.config().match_load_defaults_to_organization());
    }

    #[test]
    fn test_config_update_unsupported() {
        let mut app = app().with_config_path("/tmp/vex/config.toml");
        let mut repl = Repl::new(&mut app, Vec::new());

        let err = repl.eval("config update").unwrap_err();
        assert!(matches!(err, ReplError::UpdateUnsupported(_)));
        assert!(err.to_string().contains("/tmp/vex/config.toml"));
    }

    #[test]
    fn test_config_set_endpoint_changes_planned_urls() {
        let mut app = app();
        let mut repl = Repl::new(&mut app, Vec::new());

        repl.eval("config set api_endpoint http://localhost:9000").unwrap();
        repl.eval("team 8838E").unwrap();

        assert!(output(repl).contains("http://localhost:9000/get_teams?team=8838E"));
    }

    #[test]
    fn test_exit_pops_one_subcontext() {
        let mut app = app();
        let mut repl = Repl::new(&mut app, Vec::new());

        repl.eval("comp RE-VRC-17-3805 ||team|| 750B").unwrap();
        assert_eq!(repl.contexts().depth(), 2);
        assert_eq!(repl.contexts().scope(), Scope::Team);

        assert_eq!(repl.eval("exit").unwrap(), EvalOutcome::Continue);
        assert_eq!(repl.contexts().scope(), Scope::Competition);

        assert_eq!(repl.eval("EXIT").unwrap(), EvalOutcome::Continue);
        assert!(repl.contexts().is_global());

        assert_eq!(repl.eval("exit").unwrap(), EvalOutcome::Terminate);
    }

    #[test]
    fn test_run_exit_inside_subcontext_returns_to_global() {
        let mut app = app();
        let mut repl = Repl::new(&mut app, Vec::new());
        let mut reader = ScriptedReader::new(&["comp RE-VRC-17-3805", "exit", "exit", "abc"]);

        assert_eq!(repl.run(&mut reader).unwrap(), ExitReason::Sentinel);
        assert_eq!(reader.lines.len(), 1);
    }

    #[test]
    fn test_global_clears_any_depth() {
        let mut app = app();
        let mut repl = Repl::new(&mut app, Vec::new());

        repl.eval("comp RE-VRC-17-3805").unwrap();
        repl.eval("team 750B").unwrap();
        repl.eval("stats").unwrap();
        assert_eq!(repl.contexts().depth(), 3);

        repl.eval("global").unwrap();
        assert!(repl.contexts().is_global());
    }

    #[test]
    fn test_global_runs_command_at_global_scope() {
        let mut app = app();
        let mut repl = Repl::new(&mut app, Vec::new());

        repl.eval("config").unwrap();
        repl.eval("global team 8838E").unwrap();

        assert_eq!(repl.contexts().depth(), 1);
        assert_eq!(repl.contexts().team(), Some("8838E"));
    }

    #[test]
    fn test_where_shows_path() {
        let mut app = app();
        let mut repl = Repl::new(&mut app, Vec::new());

        repl.eval("comp RE-VRC-17-3805").unwrap();
        repl.eval("match lookup 4").unwrap();
        repl.eval("where").unwrap();

        assert!(output(repl).contains("global > comp RE-VRC-17-3805 > match #4"));
    }

    #[test]
    fn test_comp_plans_event_request() {
        let mut app = app();
        let mut repl = Repl::new(&mut app, Vec::new());

        repl.eval("comp RE-VRC-17-3805").unwrap();

        let out = output(repl);
        assert!(out.contains("https://api.vexdb.io/v1/get_events?sku=RE-VRC-17-3805"));
        assert!(out.contains("(not sent)"));
    }

    #[test]
    fn test_match_next_uses_context_selection() {
        let mut app = app();
        let mut repl = Repl::new(&mut app, Vec::new());

        repl.eval("comp RE-VRC-17-3805").unwrap();
        repl.eval("match").unwrap();

        assert_eq!(repl.contexts().scope(), Scope::Match);
        assert!(output(repl).contains("get_matches?sku=RE-VRC-17-3805&team=750B&scored=0"));
    }

    #[test]
    fn test_match_scope_navigation_replaces_top() {
        let mut app = app();
        let mut repl = Repl::new(&mut app, Vec::new());

        repl.eval("comp X").unwrap();
        repl.eval("match next").unwrap();
        repl.eval("prev").unwrap();
        repl.eval("lookup 7").unwrap();

        assert_eq!(repl.contexts().depth(), 2);
        assert_eq!(
            repl.contexts().top(),
            Some(&Subcontext::Match {
                sku: Some("X".to_string()),
                team: Some("750B".to_string()),
                selector: MatchSelector::Lookup(7),
            })
        );
        assert!(output(repl).contains("get_matches?sku=X&team=750B&scored=1"));
    }

    #[test]
    fn test_match_list_pushes_match() {
        let mut app = app();
        let mut repl = Repl::new(&mut app, Vec::new());

        repl.eval("comp X").unwrap();
        repl.eval("match load").unwrap();
        assert_eq!(repl.contexts().scope(), Scope::MatchList);

        repl.eval("next").unwrap();
        assert_eq!(repl.contexts().depth(), 3);
        assert_eq!(repl.contexts().scope(), Scope::Match);
    }

    #[test]
    fn test_match_load_filters() {
        let mut app = app();
        let mut repl = Repl::new(&mut app, Vec::new());

        repl.eval("match load ||comp|| X").unwrap();
        assert_eq!(
            repl.contexts().top(),
            Some(&Subcontext::MatchList {
                sku: Some("X".to_string()),
                filter: Some(MatchFilter::Team("750B".to_string())),
            })
        );

        repl.eval("global").unwrap();
        repl.eval(&format!("config set {MATCH_LOAD_DEFAULT_TO_ORGANIZATION} true"))
            .unwrap();
        repl.eval("match load ||comp|| X").unwrap();
        assert_eq!(
            repl.contexts().top(),
            Some(&Subcontext::MatchList {
                sku: Some("X".to_string()),
                filter: Some(MatchFilter::Organization("750".to_string())),
            })
        );
    }

    #[test]
    fn test_commands_needing_a_team() {
        let mut app = AppContext::new(ConfigStore::empty()).unwrap();
        let mut repl = Repl::new(&mut app, Vec::new());

        assert!(matches!(repl.eval("wait"), Err(ReplError::NoTeam)));
        assert!(matches!(repl.eval("history"), Err(ReplError::NoTeam)));
        assert!(matches!(repl.eval("stats"), Err(ReplError::NoTeam)));
        assert!(matches!(repl.eval("rank"), Err(ReplError::NoTeam)));
        assert!(repl.contexts().is_global());

        repl.eval("history 750B").unwrap();
        assert_eq!(repl.contexts().scope(), Scope::History);
    }

    #[test]
    fn test_team_context_overrides_current_team() {
        let mut app = app();
        let mut repl = Repl::new(&mut app, Vec::new());

        repl.eval("team 8838E").unwrap();
        repl.eval("wait").unwrap();

        assert!(output(repl).contains("get_matches?team=8838E&scored=0"));
    }

    #[test]
    fn test_stats_team_and_organization() {
        let mut app = app();
        let mut repl = Repl::new(&mut app, Vec::new());

        repl.eval("stats").unwrap();
        assert_eq!(
            repl.contexts().top(),
            Some(&Subcontext::Stats {
                target: StatsTarget::Team("750B".to_string()),
            })
        );
        repl.eval("rank").unwrap();

        repl.eval("global stats 750").unwrap();
        assert_eq!(
            repl.contexts().top(),
            Some(&Subcontext::Stats {
                target: StatsTarget::Organization("750".to_string()),
            })
        );

        let out = output(repl);
        assert!(out.contains("get_season_rankings?team=750B"));
        assert!(out.contains("get_rankings?team=750B"));
        assert!(out.contains("get_teams?team=750"));
    }

    #[test]
    fn test_rank_in_stats_scope_uses_its_team() {
        let mut app = app();
        let mut repl = Repl::new(&mut app, Vec::new());

        repl.eval("stats 8838E").unwrap();
        repl.eval("rank").unwrap();

        let out = output(repl);
        assert!(out.contains("get_rankings?team=8838E"));
        assert!(!out.contains("get_rankings?team=750B"));
    }

    #[test]
    fn test_rank_in_organization_stats_falls_back_to_current_team() {
        let mut app = app();
        let mut repl = Repl::new(&mut app, Vec::new());

        repl.eval("stats 8838").unwrap();
        repl.eval("rank").unwrap();

        assert!(output(repl).contains("get_rankings?team=750B"));
    }

    #[test]
    fn test_match_navigation_keeps_selected_team() {
        let mut app = app();
        let mut repl = Repl::new(&mut app, Vec::new());

        repl.eval("match ||team|| 8838E ||comp|| X").unwrap();
        repl.eval("next").unwrap();
        repl.eval("prev").unwrap();

        assert_eq!(
            repl.contexts().top(),
            Some(&Subcontext::Match {
                sku: Some("X".to_string()),
                team: Some("8838E".to_string()),
                selector: MatchSelector::Previous,
            })
        );
        let out = output(repl);
        assert!(out.contains("get_matches?sku=X&team=8838E&scored=1"));
        assert!(!out.contains("team=750B"));
    }

    #[test]
    fn test_match_list_team_filter_carries_into_next() {
        let mut app = app();
        let mut repl = Repl::new(&mut app, Vec::new());

        repl.eval("match load ||team|| 8838E").unwrap();
        repl.eval("next").unwrap();

        assert_eq!(
            repl.contexts().top(),
            Some(&Subcontext::Match {
                sku: None,
                team: Some("8838E".to_string()),
                selector: MatchSelector::Next,
            })
        );
        assert!(!output(repl).contains("team=750B"));
    }

    #[test]
    fn test_help_lists_scope_commands() {
        let mut app = app();
        let mut repl = Repl::new(&mut app, Vec::new());

        repl.eval("config").unwrap();
        repl.eval("help").unwrap();

        let out = output(repl);
        assert!(out.contains("config scope"));
        assert!(out.contains("set <key> <value>"));
        assert!(!out.contains("comp <sku>"));
    }
}
