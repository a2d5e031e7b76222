// Error types for the library surface.
//
// The game service never returns structured errors we can act on, so every
// non-success status collapses into `ApiError::Failed` tagged only with the
// operation that was attempted. The shell turns these into notices; nothing
// is re-thrown past it.

use std::fmt;

/// The five logical operations exposed by the game service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    CompleteWorkout,
    Collection,
    Leaderboard,
    Stats,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Login => "login",
            Operation::CompleteWorkout => "complete workout",
            Operation::Collection => "fetch collection",
            Operation::Leaderboard => "fetch leaderboard",
            Operation::Stats => "fetch stats",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Phone number is required")]
    EmptyPhone,

    #[error("{0} failed")]
    Failed(Operation),

    #[error("{op} request could not be sent: {source}")]
    Transport {
        op: Operation,
        #[source]
        source: reqwest::Error,
    },

    #[error("{op} response could not be parsed: {source}")]
    Decode {
        op: Operation,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ApiError {
    /// Operation this error came from, if it came from a request.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            ApiError::Failed(op) => Some(*op),
            ApiError::Transport { op, .. } | ApiError::Decode { op, .. } => Some(*op),
            ApiError::EmptyPhone => Some(Operation::Login),
            ApiError::Client(_) | ApiError::Config(_) => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),

    #[error("No config directory available for the session file")]
    NoConfigDir,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}
