use inquire::autocompletion::{Autocomplete, Replacement};
use thiserror::Error;

use super::context::Scope;
use crate::config::is_team_number;

/// Every command word the grammar knows, in any scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandName {
    Help,
    Where,
    Exit,
    Quit,
    Global,
    Config,
    Competition,
    Team,
    Match,
    Wait,
    Stats,
    Rank,
    History,
    Set,
    Get,
    Unset,
    Show,
    Update,
    Next,
    Prev,
    Lookup,
}

impl CommandName {
    /// Display order for help and completion.
    pub const ALL: &[Self] = &[
        Self::Config,
        Self::Competition,
        Self::Team,
        Self::Match,
        Self::Wait,
        Self::Stats,
        Self::Rank,
        Self::History,
        Self::Set,
        Self::Get,
        Self::Unset,
        Self::Show,
        Self::Update,
        Self::Next,
        Self::Prev,
        Self::Lookup,
        Self::Where,
        Self::Global,
        Self::Help,
        Self::Exit,
        Self::Quit,
    ];

    /// Resolves a command word, case-insensitively.
    ///
    /// `comp(etition)` and `prev(ious)` accept their optional letters.
    pub fn lookup(word: &str) -> Option<Self> {
        let word = word.to_ascii_lowercase();
        if abbreviates(&word, "competition", 4) {
            return Some(Self::Competition);
        }
        if abbreviates(&word, "previous", 4) {
            return Some(Self::Prev);
        }
        Self::ALL.iter().copied().find(|name| name.as_str() == word)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Where => "where",
            Self::Exit => "exit",
            Self::Quit => "quit",
            Self::Global => "global",
            Self::Config => "config",
            Self::Competition => "comp",
            Self::Team => "team",
            Self::Match => "match",
            Self::Wait => "wait",
            Self::Stats => "stats",
            Self::Rank => "rank",
            Self::History => "history",
            Self::Set => "set",
            Self::Get => "get",
            Self::Unset => "unset",
            Self::Show => "show",
            Self::Update => "update",
            Self::Next => "next",
            Self::Prev => "prev",
            Self::Lookup => "lookup",
        }
    }

    pub const fn usage(self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Where => "where",
            Self::Exit => "exit",
            Self::Quit => "quit",
            Self::Global => "global [command]",
            Self::Config => "config [set <key> <value> | get <key> | unset <key> | show | update]",
            Self::Competition => "comp <sku> [||team|| <team>]",
            Self::Team => "team <team>",
            Self::Match => {
                "match [next | prev | load | lookup <n> | wait | history] [||team|| <team>] [||comp|| <sku>]"
            }
            Self::Wait => "wait [||team|| <team>] [||comp|| <sku>]",
            Self::Stats => "stats [team | organization]",
            Self::Rank => "rank [team] [||comp|| <sku>]",
            Self::History => "history [team]",
            Self::Set => "set <key> <value>",
            Self::Get => "get <key>",
            Self::Unset => "unset <key>",
            Self::Show => "show",
            Self::Update => "update",
            Self::Next => "next [||team|| <team>] [||comp|| <sku>]",
            Self::Prev => "prev [||team|| <team>] [||comp|| <sku>]",
            Self::Lookup => "lookup <n> [||comp|| <sku>]",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Help => "Show available commands",
            Self::Where => "Show the current context",
            Self::Exit => "Leave the current context (quits at global scope)",
            Self::Quit => "Quit immediately",
            Self::Global => "Return to global scope, optionally running a command there",
            Self::Config => "Show or change settings",
            Self::Competition => "Select a competition",
            Self::Team => "Select a team",
            Self::Match => "Look up matches",
            Self::Wait => "Wait for the team's next match",
            Self::Stats => "Season stats for a team or organization",
            Self::Rank => "Rankings for a team",
            Self::History => "Match history for a team",
            Self::Set => "Change a setting",
            Self::Get => "Show a setting",
            Self::Unset => "Clear a setting",
            Self::Show => "Show all settings",
            Self::Update => "Write settings to the config file",
            Self::Next => "Next match",
            Self::Prev => "Previous match",
            Self::Lookup => "Match by number",
        }
    }

    pub const fn available_in(self, scope: Scope) -> bool {
        match self {
            Self::Help | Self::Where | Self::Exit | Self::Quit | Self::Global => true,
            Self::Config
            | Self::Competition
            | Self::Team
            | Self::Match
            | Self::Stats
            | Self::History => scope.is_base(),
            Self::Wait => scope.is_base() || matches!(scope, Scope::Match | Scope::MatchList),
            Self::Rank => scope.is_base() || matches!(scope, Scope::Stats),
            Self::Set | Self::Get | Self::Unset | Self::Show | Self::Update => {
                matches!(scope, Scope::Config)
            }
            Self::Next | Self::Prev | Self::Lookup => {
                matches!(scope, Scope::Match | Scope::MatchList)
            }
        }
    }

    /// Commands usable in `scope`, in display order.
    pub fn available(scope: Scope) -> impl Iterator<Item = Self> {
        Self::ALL
            .iter()
            .copied()
            .filter(move |name| name.available_in(scope))
    }
}

fn abbreviates(word: &str, full: &str, min_len: usize) -> bool {
    word.len() >= min_len && full.starts_with(word)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchAction {
    Next,
    Previous,
    Load,
    Lookup(u32),
    Wait,
    History,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    Enter,
    Set { key: String, value: String },
    Get { key: String },
    Unset { key: String },
    Show,
    Update,
}

/// A parsed command with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Where,
    Exit,
    Quit,
    Global(Option<Box<Command>>),
    Config(ConfigAction),
    Competition {
        sku: String,
        team: Option<String>,
    },
    Team {
        name: String,
    },
    Match {
        action: MatchAction,
        team: Option<String>,
        sku: Option<String>,
    },
    Stats {
        target: Option<String>,
    },
    Rank {
        team: Option<String>,
        sku: Option<String>,
    },
    History {
        team: Option<String>,
    },
}

/// Input types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Empty,
    Command(Command),
    /// Anything that does not start with a command word.
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unterminated quote")]
    UnterminatedQuote,

    #[error("Unterminated keyword: ||{0}")]
    UnterminatedKeyword(String),

    #[error("Empty keyword: ||||")]
    EmptyKeyword,

    #[error("Keyword ||{0}|| needs a value")]
    MissingKeywordValue(String),

    #[error("Keyword ||{0}|| given more than once")]
    DuplicateKeyword(String),

    #[error("Keywords must come after the command")]
    KeywordBeforeCommand,

    #[error("Unknown keyword ||{keyword}|| for '{command}'")]
    UnknownKeyword {
        command: &'static str,
        keyword: String,
    },

    #[error("Invalid team number: '{0}'")]
    InvalidTeam(String),

    #[error("Invalid match number: '{0}' (expected a positive integer)")]
    InvalidMatchNumber(String),

    #[error("'{command}' is not available in {scope}")]
    Unavailable {
        command: &'static str,
        scope: Scope,
    },

    #[error("Usage: {0}")]
    Usage(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Word(String),
    Keyword(String),
}

/// Splits a line into words, `"quoted words"` and `||keyword||` markers.
pub fn tokenize(line: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut rest = line.trim_start();

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("||") {
            let end = after
                .find("||")
                .ok_or_else(|| ParseError::UnterminatedKeyword(after.trim().to_string()))?;
            let name = after[..end].trim();
            if name.is_empty() {
                return Err(ParseError::EmptyKeyword);
            }
            tokens.push(Token::Keyword(name.to_ascii_lowercase()));
            rest = &after[end + 2..];
        } else if let Some(after) = rest.strip_prefix('"') {
            let end = after.find('"').ok_or(ParseError::UnterminatedQuote)?;
            tokens.push(Token::Word(after[..end].to_string()));
            rest = &after[end + 1..];
        } else {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            tokens.push(Token::Word(rest[..end].to_string()));
            rest = &rest[end..];
        }
        rest = rest.trim_start();
    }

    Ok(tokens)
}

/// Positional and keyword arguments following a command word.
#[derive(Debug, Default)]
struct Args {
    positional: Vec<String>,
    keywords: Vec<(String, String)>,
}

impl Args {
    fn from_tokens(tokens: &[Token]) -> Result<Self, ParseError> {
        let mut args = Self::default();
        let mut iter = tokens.iter();

        while let Some(token) = iter.next() {
            match token {
                Token::Word(word) => args.positional.push(word.clone()),
                Token::Keyword(name) => {
                    let Some(Token::Word(value)) = iter.next() else {
                        return Err(ParseError::MissingKeywordValue(name.clone()));
                    };
                    if args.keywords.iter().any(|(k, _)| k == name) {
                        return Err(ParseError::DuplicateKeyword(name.clone()));
                    }
                    args.keywords.push((name.clone(), value.clone()));
                }
            }
        }

        Ok(args)
    }

    fn allow_keywords(&self, command: CommandName, allowed: &[&str]) -> Result<(), ParseError> {
        match self
            .keywords
            .iter()
            .find(|(k, _)| !allowed.contains(&k.as_str()))
        {
            Some((keyword, _)) => Err(ParseError::UnknownKeyword {
                command: command.as_str(),
                keyword: keyword.clone(),
            }),
            None => Ok(()),
        }
    }

    fn keyword(&self, name: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn positional(&self, index: usize) -> Option<&str> {
        self.positional.get(index).map(String::as_str)
    }

    /// Checks the positional count lies in `min..=max`.
    fn arity(&self, command: CommandName, min: usize, max: usize) -> Result<(), ParseError> {
        let count = self.positional.len();
        if count < min || count > max {
            return Err(ParseError::Usage(command.usage()));
        }
        Ok(())
    }
}

/// Parses one line of input as seen from `scope`.
pub fn parse_input(line: &str, scope: Scope) -> Result<Input, ParseError> {
    let line = line.trim();

    let Some(first) = line.split_whitespace().next() else {
        return Ok(Input::Empty);
    };

    if first.starts_with("||") {
        return Err(ParseError::KeywordBeforeCommand);
    }

    if CommandName::lookup(first).is_none() {
        return Ok(Input::Text(line.to_string()));
    }

    let tokens = tokenize(line)?;
    parse_tokens(&tokens, scope).map(Input::Command)
}

fn parse_tokens(tokens: &[Token], scope: Scope) -> Result<Command, ParseError> {
    let (name, rest) = match tokens.split_first() {
        Some((Token::Word(word), rest)) => match CommandName::lookup(word) {
            Some(name) => (name, rest),
            None => return Err(ParseError::Usage(CommandName::Global.usage())),
        },
        Some((Token::Keyword(_), _)) => return Err(ParseError::KeywordBeforeCommand),
        None => return Err(ParseError::Usage(CommandName::Global.usage())),
    };

    if !name.available_in(scope) {
        return Err(ParseError::Unavailable {
            command: name.as_str(),
            scope,
        });
    }

    if name == CommandName::Global {
        if rest.is_empty() {
            return Ok(Command::Global(None));
        }
        let inner = parse_tokens(rest, Scope::Global)?;
        return Ok(Command::Global(Some(Box::new(inner))));
    }

    let args = Args::from_tokens(rest)?;
    parse_command(name, &args)
}

fn parse_command(name: CommandName, args: &Args) -> Result<Command, ParseError> {
    let match_keywords: &[&str] = &["team", "comp"];

    match name {
        CommandName::Help | CommandName::Where | CommandName::Exit | CommandName::Quit => {
            args.allow_keywords(name, &[])?;
            args.arity(name, 0, 0)?;
            Ok(match name {
                CommandName::Help => Command::Help,
                CommandName::Where => Command::Where,
                CommandName::Exit => Command::Exit,
                _ => Command::Quit,
            })
        }
        CommandName::Global => Ok(Command::Global(None)),
        CommandName::Config => {
            args.allow_keywords(name, &[])?;
            let action = match args.positional(0).map(str::to_ascii_lowercase).as_deref() {
                None => ConfigAction::Enter,
                Some(sub) => {
                    let sub_name = match sub {
                        "set" => CommandName::Set,
                        "get" => CommandName::Get,
                        "unset" => CommandName::Unset,
                        "show" => CommandName::Show,
                        "update" => CommandName::Update,
                        _ => return Err(ParseError::Usage(name.usage())),
                    };
                    let sub_args = Args {
                        positional: args.positional[1..].to_vec(),
                        keywords: Vec::new(),
                    };
                    parse_config_action(sub_name, &sub_args)?
                }
            };
            Ok(Command::Config(action))
        }
        CommandName::Set
        | CommandName::Get
        | CommandName::Unset
        | CommandName::Show
        | CommandName::Update => {
            args.allow_keywords(name, &[])?;
            parse_config_action(name, args).map(Command::Config)
        }
        CommandName::Competition => {
            args.allow_keywords(name, &["team"])?;
            args.arity(name, 1, 1)?;
            Ok(Command::Competition {
                sku: args.positional[0].clone(),
                team: args.keyword("team").map(parse_team).transpose()?,
            })
        }
        CommandName::Team => {
            args.allow_keywords(name, &[])?;
            args.arity(name, 1, 1)?;
            Ok(Command::Team {
                name: parse_team(&args.positional[0])?,
            })
        }
        CommandName::Match => {
            args.allow_keywords(name, match_keywords)?;
            let action = match args.positional(0).map(str::to_ascii_lowercase).as_deref() {
                None | Some("next") => {
                    args.arity(name, 0, 1)?;
                    MatchAction::Next
                }
                Some("prev" | "previous") => {
                    args.arity(name, 1, 1)?;
                    MatchAction::Previous
                }
                Some("load") => {
                    args.arity(name, 1, 1)?;
                    MatchAction::Load
                }
                Some("wait") => {
                    args.arity(name, 1, 1)?;
                    MatchAction::Wait
                }
                Some("history") => {
                    args.arity(name, 1, 1)?;
                    MatchAction::History
                }
                Some("lookup") => {
                    args.arity(name, 2, 2)?;
                    MatchAction::Lookup(parse_match_number(&args.positional[1])?)
                }
                Some(_) => return Err(ParseError::Usage(name.usage())),
            };
            match_command(action, args)
        }
        CommandName::Wait | CommandName::Next | CommandName::Prev => {
            args.allow_keywords(name, match_keywords)?;
            args.arity(name, 0, 0)?;
            let action = match name {
                CommandName::Wait => MatchAction::Wait,
                CommandName::Next => MatchAction::Next,
                _ => MatchAction::Previous,
            };
            match_command(action, args)
        }
        CommandName::Lookup => {
            args.allow_keywords(name, &["comp"])?;
            args.arity(name, 1, 1)?;
            let action = MatchAction::Lookup(parse_match_number(&args.positional[0])?);
            match_command(action, args)
        }
        CommandName::Stats => {
            args.allow_keywords(name, &[])?;
            args.arity(name, 0, 1)?;
            Ok(Command::Stats {
                target: args.positional(0).map(parse_team).transpose()?,
            })
        }
        CommandName::Rank => {
            args.allow_keywords(name, &["comp"])?;
            args.arity(name, 0, 1)?;
            Ok(Command::Rank {
                team: args.positional(0).map(parse_team).transpose()?,
                sku: args.keyword("comp").map(str::to_string),
            })
        }
        CommandName::History => {
            args.allow_keywords(name, &[])?;
            args.arity(name, 0, 1)?;
            Ok(Command::History {
                team: args.positional(0).map(parse_team).transpose()?,
            })
        }
    }
}

fn parse_config_action(name: CommandName, args: &Args) -> Result<ConfigAction, ParseError> {
    let key = || args.positional[0].to_ascii_lowercase();

    match name {
        CommandName::Set => {
            args.arity(name, 2, 2)?;
            Ok(ConfigAction::Set {
                key: key(),
                value: args.positional[1].clone(),
            })
        }
        CommandName::Get => {
            args.arity(name, 1, 1)?;
            Ok(ConfigAction::Get { key: key() })
        }
        CommandName::Unset => {
            args.arity(name, 1, 1)?;
            Ok(ConfigAction::Unset { key: key() })
        }
        CommandName::Show => {
            args.arity(name, 0, 0)?;
            Ok(ConfigAction::Show)
        }
        _ => {
            args.arity(name, 0, 0)?;
            Ok(ConfigAction::Update)
        }
    }
}

fn match_command(action: MatchAction, args: &Args) -> Result<Command, ParseError> {
    Ok(Command::Match {
        action,
        team: args.keyword("team").map(parse_team).transpose()?,
        sku: args.keyword("comp").map(str::to_string),
    })
}

fn parse_team(raw: &str) -> Result<String, ParseError> {
    if is_team_number(raw) {
        Ok(raw.to_ascii_uppercase())
    } else {
        Err(ParseError::InvalidTeam(raw.to_string()))
    }
}

fn parse_match_number(raw: &str) -> Result<u32, ParseError> {
    match raw.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ParseError::InvalidMatchNumber(raw.to_string())),
    }
}

/// Command-word autocompleter for the commands of one scope.
#[derive(Clone)]
pub struct CommandCompleter {
    scope: Scope,
}

impl CommandCompleter {
    pub const fn new(scope: Scope) -> Self {
        Self { scope }
    }
}

impl Default for CommandCompleter {
    fn default() -> Self {
        Self::new(Scope::Global)
    }
}

impl Autocomplete for CommandCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, inquire::CustomUserError> {
        let input = input.trim_start();
        if input.is_empty() || input.contains(char::is_whitespace) {
            return Ok(vec![]);
        }

        let prefix = input.to_ascii_lowercase();
        let suggestions: Vec<String> = CommandName::available(self.scope)
            .filter(|name| name.as_str().starts_with(&prefix))
            .map(|name| format!("{}  {}", name.as_str(), name.description()))
            .collect();

        Ok(suggestions)
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, inquire::CustomUserError> {
        let replacement = highlighted_suggestion
            .map(|s| format!("{} ", s.split_whitespace().next().unwrap_or("")));
        Ok(replacement)
    }
}
