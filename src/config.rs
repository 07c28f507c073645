//! Process configuration parsed from environment variables.

use std::path::PathBuf;

use crate::action::ActionKind;
use crate::services::collab::JoinOrderMode;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_STATIC_DIR: &str = "./public";
pub const DEFAULT_CLIENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: '{value}' ({reason})")]
    Invalid { var: &'static str, value: String, reason: String },
}

/// Which action kinds the dispatcher writes into the action cache.
///
/// Every flag is off by default: relayed actions are not retained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CachePolicy {
    pub drawing: bool,
    pub mouse: bool,
    pub collab: bool,
    pub other: bool,
}

impl CachePolicy {
    #[must_use]
    pub fn all() -> Self {
        Self { drawing: true, mouse: true, collab: true, other: true }
    }

    #[must_use]
    pub fn caches(self, kind: ActionKind) -> bool {
        match kind {
            ActionKind::UpdateSingleDrawingPosition => self.drawing,
            ActionKind::RtMousePosition => self.mouse,
            ActionKind::CollabChange => self.collab,
            ActionKind::Other => self.other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub static_dir: PathBuf,
    pub client_channel_capacity: usize,
    pub cache_policy: CachePolicy,
    pub join_order: JoinOrderMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            client_channel_capacity: DEFAULT_CLIENT_CHANNEL_CAPACITY,
            cache_policy: CachePolicy::default(),
            join_order: JoinOrderMode::default(),
        }
    }
}

impl Config {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: listen port, default 5000
    /// - `STATIC_DIR`: directory served at `/`, default `./public`
    /// - `CLIENT_CHANNEL_CAPACITY`: per-connection outbound queue, default 256
    /// - `CACHE_ACTIONS`: comma list of `drawing`, `mouse`, `collab`, `other`,
    ///   or `all`; empty by default
    /// - `JOIN_ORDER_MODE`: `distinct-boards` (default) or `per-board`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first variable that fails
    /// to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading values through `lookup`.
    ///
    /// # Errors
    ///
    /// See `from_env`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => parse_number("PORT", &raw)?,
            None => defaults.port,
        };
        let static_dir = lookup("STATIC_DIR").map_or(defaults.static_dir, PathBuf::from);
        let client_channel_capacity = match lookup("CLIENT_CHANNEL_CAPACITY") {
            Some(raw) => parse_capacity(&raw)?,
            None => defaults.client_channel_capacity,
        };
        let cache_policy = match lookup("CACHE_ACTIONS") {
            Some(raw) => parse_cache_policy(&raw)?,
            None => defaults.cache_policy,
        };
        let join_order = parse_join_order(lookup("JOIN_ORDER_MODE").as_deref())?;

        Ok(Self { port, static_dir, client_channel_capacity, cache_policy, join_order })
    }
}

fn invalid(var: &'static str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { var, value: value.to_string(), reason: reason.into() }
}

fn parse_number<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| invalid(var, raw, e.to_string()))
}

fn parse_capacity(raw: &str) -> Result<usize, ConfigError> {
    let capacity: usize = parse_number("CLIENT_CHANNEL_CAPACITY", raw)?;
    if capacity == 0 {
        return Err(invalid("CLIENT_CHANNEL_CAPACITY", raw, "must be at least 1"));
    }
    Ok(capacity)
}

fn parse_cache_policy(raw: &str) -> Result<CachePolicy, ConfigError> {
    let mut policy = CachePolicy::default();
    for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match item {
            "all" => policy = CachePolicy::all(),
            "drawing" => policy.drawing = true,
            "mouse" => policy.mouse = true,
            "collab" => policy.collab = true,
            "other" => policy.other = true,
            other => return Err(invalid("CACHE_ACTIONS", raw, format!("unknown action kind '{other}'"))),
        }
    }
    Ok(policy)
}

fn parse_join_order(raw: Option<&str>) -> Result<JoinOrderMode, ConfigError> {
    match raw.map(str::trim).unwrap_or("distinct-boards") {
        "distinct-boards" => Ok(JoinOrderMode::DistinctBoards),
        "per-board" => Ok(JoinOrderMode::PerBoard),
        other => Err(invalid("JOIN_ORDER_MODE", other, "expected 'distinct-boards' or 'per-board'")),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
