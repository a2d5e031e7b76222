// Runtime configuration, read from the environment (and a `.env` file if
// one is present in the working directory).

use crate::error::ConfigError;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_AUTH_URL: &str =
    "https://functions.poehali.dev/6bf98199-0a57-4d98-9ca1-73bad291f931";
pub const DEFAULT_GAME_URL: &str =
    "https://functions.poehali.dev/e790ef55-3302-47ea-9839-00bd07a7963d";

const DEFAULT_REVEAL_MS: u64 = 600;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct Config {
    /// Auth endpoint (login).
    pub auth_url: String,
    /// Game endpoint; operations are selected with `?action=`.
    pub game_url: String,
    /// Where the saved session lives. `None` means the default location
    /// under the user's config directory.
    pub session_file: Option<PathBuf>,
    /// How long the card stays in the "flipping" phase.
    pub reveal_delay: Duration,
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auth_url: DEFAULT_AUTH_URL.to_string(),
            game_url: DEFAULT_GAME_URL.to_string(),
            session_file: None,
            reveal_delay: Duration::from_millis(DEFAULT_REVEAL_MS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup, so tests don't have
    /// to touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            auth_url: lookup("SPORTCARDS_AUTH_URL").unwrap_or(defaults.auth_url),
            game_url: lookup("SPORTCARDS_GAME_URL").unwrap_or(defaults.game_url),
            session_file: lookup("SPORTCARDS_SESSION_FILE").map(PathBuf::from),
            reveal_delay: match lookup("SPORTCARDS_REVEAL_MS") {
                Some(v) => Duration::from_millis(parse_u64("SPORTCARDS_REVEAL_MS", v)?),
                None => defaults.reveal_delay,
            },
            http_timeout: match lookup("SPORTCARDS_HTTP_TIMEOUT_SECS") {
                Some(v) => Duration::from_secs(parse_u64("SPORTCARDS_HTTP_TIMEOUT_SECS", v)?),
                None => defaults.http_timeout,
            },
        })
    }
}

fn parse_u64(name: &'static str, value: String) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}
