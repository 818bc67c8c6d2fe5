//! Configuration: the in-memory store and the read-only config file.

mod manager;
mod store;

pub use manager::{ConfigFile, ConfigManager, ResolveOptions, resolve_config};
pub use store::{
    API_ENDPOINT, CURRENT_TEAM, ConfigError, ConfigStore, DEFAULT_API_ENDPOINT, DEFAULT_TEAM,
    KNOWN_KEYS, MATCH_LOAD_DEFAULT_TO_ORGANIZATION, ValueKind, is_team_number, kind_of, validate,
};
