use std::fmt;

/// Endpoints of the competition-data API that commands can plan requests for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Events,
    Teams,
    Matches,
    Rankings,
    SeasonRankings,
}

impl Endpoint {
    pub const fn path(self) -> &'static str {
        match self {
            Self::Events => "get_events",
            Self::Teams => "get_teams",
            Self::Matches => "get_matches",
            Self::Rankings => "get_rankings",
            Self::SeasonRankings => "get_season_rankings",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A request against one endpoint with ordered query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    endpoint: Endpoint,
    params: Vec<(&'static str, String)>,
}

impl Query {
    pub const fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            params: Vec::new(),
        }
    }

    /// Event details for a competition SKU.
    pub fn event(sku: &str) -> Self {
        Self::new(Endpoint::Events).param("sku", sku)
    }

    /// Team details for a team number.
    pub fn team(team: &str) -> Self {
        Self::new(Endpoint::Teams).param("team", team)
    }

    pub fn matches() -> Self {
        Self::new(Endpoint::Matches)
    }

    pub fn rankings() -> Self {
        Self::new(Endpoint::Rankings)
    }

    pub fn season_rankings() -> Self {
        Self::new(Endpoint::SeasonRankings)
    }

    #[must_use]
    pub fn param(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.params.push((key, value.into()));
        self
    }

    /// Adds the parameter only when a value is present.
    #[must_use]
    pub fn param_opt(self, key: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    pub const fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}
