use reqwest::Url;
use std::collections::BTreeMap;
use thiserror::Error;

/// Team used when nothing else is configured.
pub const DEFAULT_TEAM: &str = "750B";

/// Default base URL of the competition-data API.
pub const DEFAULT_API_ENDPOINT: &str = "https://api.vexdb.io/v1";

pub const CURRENT_TEAM: &str = "current_team";
pub const MATCH_LOAD_DEFAULT_TO_ORGANIZATION: &str = "match_load_default_to_organization";
pub const API_ENDPOINT: &str = "api_endpoint";

const MAX_TEAM_LEN: usize = 8;

/// Value type of a known configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Team,
    Bool,
    Url,
}

impl ValueKind {
    const fn describe(self) -> &'static str {
        match self {
            Self::Team => "a team number (1-8 letters or digits, e.g. 750B)",
            Self::Bool => "true or false",
            Self::Url => "an http(s) URL",
        }
    }
}

/// Keys accepted by the store: (key, kind, description).
pub const KNOWN_KEYS: &[(&str, ValueKind, &str)] = &[
    (API_ENDPOINT, ValueKind::Url, "Base URL of the competition-data API"),
    (CURRENT_TEAM, ValueKind::Team, "Team used when a command names none"),
    (
        MATCH_LOAD_DEFAULT_TO_ORGANIZATION,
        ValueKind::Bool,
        "Load the whole organization's matches with 'match load'",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\nAvailable: {}", known_key_names())]
    UnknownKey { key: String },

    #[error("Invalid value for {key}: '{value}' (expected {expected})")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
}

fn known_key_names() -> String {
    KNOWN_KEYS
        .iter()
        .map(|(key, _, _)| *key)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Looks up the value kind of a known key.
pub fn kind_of(key: &str) -> Option<ValueKind> {
    KNOWN_KEYS
        .iter()
        .find(|(known, _, _)| *known == key)
        .map(|(_, kind, _)| *kind)
}

/// Checks `value` against the type of `key` and returns its canonical form.
pub fn validate(key: &str, value: &str) -> Result<String, ConfigError> {
    let kind = kind_of(key).ok_or_else(|| ConfigError::UnknownKey {
        key: key.to_string(),
    })?;

    let invalid = || ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected: kind.describe(),
    };

    let value = value.trim();
    match kind {
        ValueKind::Team => {
            if is_team_number(value) {
                Ok(value.to_ascii_uppercase())
            } else {
                Err(invalid())
            }
        }
        ValueKind::Bool => match value.to_ascii_lowercase().as_str() {
            "true" => Ok("true".to_string()),
            "false" => Ok("false".to_string()),
            _ => Err(invalid()),
        },
        ValueKind::Url => match Url::parse(value) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
                Ok(value.trim_end_matches('/').to_string())
            }
            _ => Err(invalid()),
        },
    }
}

/// Returns `true` for strings shaped like a team number (`750B`, `BLRS`).
pub fn is_team_number(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_TEAM_LEN
        && value.chars().all(|c| c.is_ascii_alphanumeric())
}

/// In-memory key/value configuration.
///
/// Lookups never fail: an absent key is simply `None`. Writes go through
/// [`validate`], so the store only ever holds known keys with well-formed
/// values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigStore {
    values: BTreeMap<String, String>,
}

impl ConfigStore {
    /// Creates a store with no values at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the built-in defaults.
    pub fn with_defaults() -> Self {
        let mut values = BTreeMap::new();
        values.insert(CURRENT_TEAM.to_string(), DEFAULT_TEAM.to_string());
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Validates and stores a value, returning the previous one.
    ///
    /// On error the store is left untouched.
    pub fn set(&mut self, key: &str, value: &str) -> Result<Option<String>, ConfigError> {
        let value = validate(key, value)?;
        tracing::debug!(key, value = %value, "config set");
        Ok(self.values.insert(key.to_string(), value))
    }

    /// Removes a known key, returning its value if it was set.
    pub fn unset(&mut self, key: &str) -> Result<Option<String>, ConfigError> {
        if kind_of(key).is_none() {
            return Err(ConfigError::UnknownKey {
                key: key.to_string(),
            });
        }
        tracing::debug!(key, "config unset");
        Ok(self.values.remove(key))
    }

    pub fn current_team(&self) -> Option<&str> {
        self.get(CURRENT_TEAM)
    }

    pub fn api_endpoint(&self) -> &str {
        self.get(API_ENDPOINT).unwrap_or(DEFAULT_API_ENDPOINT)
    }

    /// Whether `match load` should default to the organization's matches.
    pub fn match_load_defaults_to_organization(&self) -> bool {
        self.get(MATCH_LOAD_DEFAULT_TO_ORGANIZATION) == Some("true")
    }
}
