//! Nested command scopes (subcontexts).

use std::fmt;

/// Which matches `match load` lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchFilter {
    Team(String),
    Organization(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSelector {
    Next,
    Previous,
    /// The nth match of the competition (1-based).
    Lookup(u32),
}

impl fmt::Display for MatchSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Next => f.write_str("next"),
            Self::Previous => f.write_str("prev"),
            Self::Lookup(n) => write!(f, "#{n}"),
        }
    }
}

/// Subject of `stats`: a single team (`750B`) or a whole organization (`750`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsTarget {
    Team(String),
    Organization(String),
}

impl StatsTarget {
    pub fn parse(target: &str) -> Self {
        if !target.is_empty() && target.chars().all(|c| c.is_ascii_digit()) {
            Self::Organization(target.to_string())
        } else {
            Self::Team(target.to_ascii_uppercase())
        }
    }
}

impl fmt::Display for StatsTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Team(team) => f.write_str(team),
            Self::Organization(org) => write!(f, "{org} (organization)"),
        }
    }
}

/// Returns the organization number of a team (`750B` -> `750`).
///
/// Teams without a trailing letter are their own organization.
pub fn organization_of(team: &str) -> &str {
    let trimmed = team.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    if trimmed.is_empty() { team } else { trimmed }
}

/// One entry of the context stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subcontext {
    Config,
    Competition {
        sku: String,
    },
    Team {
        name: String,
    },
    MatchList {
        sku: Option<String>,
        filter: Option<MatchFilter>,
    },
    Match {
        sku: Option<String>,
        team: Option<String>,
        selector: MatchSelector,
    },
    Stats {
        target: StatsTarget,
    },
    History {
        team: String,
    },
}

impl Subcontext {
    pub const fn scope(&self) -> Scope {
        match self {
            Self::Config => Scope::Config,
            Self::Competition { .. } => Scope::Competition,
            Self::Team { .. } => Scope::Team,
            Self::MatchList { .. } => Scope::MatchList,
            Self::Match { .. } => Scope::Match,
            Self::Stats { .. } => Scope::Stats,
            Self::History { .. } => Scope::History,
        }
    }

    fn sku(&self) -> Option<&str> {
        match self {
            Self::Competition { sku } => Some(sku.as_str()),
            Self::MatchList { sku: Some(sku), .. } | Self::Match { sku: Some(sku), .. } => {
                Some(sku.as_str())
            }
            _ => None,
        }
    }

    fn team(&self) -> Option<&str> {
        match self {
            Self::Team { name } => Some(name.as_str()),
            Self::Stats {
                target: StatsTarget::Team(team),
            }
            | Self::Match {
                team: Some(team), ..
            }
            | Self::MatchList {
                filter: Some(MatchFilter::Team(team)),
                ..
            } => Some(team.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Subcontext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config => f.write_str("config"),
            Self::Competition { sku } => write!(f, "comp {sku}"),
            Self::Team { name } => write!(f, "team {name}"),
            Self::MatchList { filter, .. } => match filter {
                Some(MatchFilter::Team(team)) => write!(f, "matches {team}"),
                Some(MatchFilter::Organization(org)) => write!(f, "matches {org}*"),
                None => f.write_str("matches"),
            },
            Self::Match { selector, .. } => write!(f, "match {selector}"),
            Self::Stats { target } => write!(f, "stats {target}"),
            Self::History { team } => write!(f, "history {team}"),
        }
    }
}

/// The kind of scope commands are evaluated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Global,
    Config,
    Competition,
    Team,
    MatchList,
    Match,
    Stats,
    History,
}

impl Scope {
    /// Scopes that accept the base command set.
    pub const fn is_base(self) -> bool {
        matches!(self, Self::Global | Self::Competition | Self::Team)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Global => "global scope",
            Self::Config => "config scope",
            Self::Competition => "competition scope",
            Self::Team => "team scope",
            Self::MatchList => "match list scope",
            Self::Match => "match scope",
            Self::Stats => "stats scope",
            Self::History => "history scope",
        };
        f.write_str(name)
    }
}

/// Stack of entered subcontexts. Empty means global scope.
#[derive(Debug, Clone, Default)]
pub struct ContextStack {
    frames: Vec<Subcontext>,
}

impl ContextStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, context: Subcontext) {
        tracing::debug!(context = %context, depth = self.frames.len() + 1, "enter subcontext");
        self.frames.push(context);
    }

    pub fn pop(&mut self) -> Option<Subcontext> {
        let popped = self.frames.pop();
        if let Some(context) = &popped {
            tracing::debug!(context = %context, depth = self.frames.len(), "leave subcontext");
        }
        popped
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Swaps the innermost subcontext, or pushes if at global scope.
    pub fn replace_top(&mut self, context: Subcontext) {
        self.frames.pop();
        self.push(context);
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_global(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn top(&self) -> Option<&Subcontext> {
        self.frames.last()
    }

    pub fn scope(&self) -> Scope {
        self.top().map_or(Scope::Global, Subcontext::scope)
    }

    /// Innermost competition SKU on the stack.
    pub fn competition_sku(&self) -> Option<&str> {
        self.frames.iter().rev().find_map(Subcontext::sku)
    }

    /// Innermost team selected on the stack.
    ///
    /// Besides `team` frames this covers the subject of a team `stats`
    /// scope, a match's team and a match list filtered to one team.
    pub fn team(&self) -> Option<&str> {
        self.frames.iter().rev().find_map(Subcontext::team)
    }

    /// Human-readable path, e.g. `global > comp RE-VRC-17-3805 > team 750B`.
    pub fn path(&self) -> String {
        std::iter::once("global".to_string())
            .chain(self.frames.iter().map(ToString::to_string))
            .collect::<Vec<_>>()
            .join(" > ")
    }
}
