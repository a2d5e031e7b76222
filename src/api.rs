// API client module: a small blocking HTTP client for the two SportCards
// endpoints (auth and game). One call per operation, no retries, no
// caching. Any non-success status becomes a generic `ApiError::Failed`.

use crate::config::Config;
use crate::error::{ApiError, Operation};
use crate::models::{
    AthleteCard, CollectionResponse, Difficulty, LeaderboardEntry, LeaderboardResponse, User,
    UserStats, WorkoutResult,
};
use reqwest::blocking::{Client, Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// The five operations the game service offers. The shell only talks to
/// this trait, which lets tests swap in a scripted fake. `Sync` because
/// the eager load fans out over threads.
pub trait GameApi: Sync {
    fn login(&self, phone: &str) -> Result<User, ApiError>;
    fn complete_workout(&self, user_id: i64, difficulty: Difficulty)
        -> Result<WorkoutResult, ApiError>;
    fn get_collection(&self, user_id: i64) -> Result<Vec<AthleteCard>, ApiError>;
    fn get_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ApiError>;
    fn get_user_stats(&self, user_id: i64) -> Result<UserStats, ApiError>;
}

/// Login request payload. Exactly one field.
#[derive(Serialize, Debug)]
pub struct LoginRequest<'a> {
    pub phone: &'a str,
}

/// Workout completion payload. No idempotency key: the service treats a
/// repeated call as a new workout.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRequest {
    pub user_id: i64,
    pub difficulty: Difficulty,
}

/// Blocking client holding the reqwest client and both base URLs.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    auth_url: String,
    game_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(ApiError::Client)?;
        Ok(ApiClient {
            client,
            auth_url: config.auth_url.clone(),
            game_url: config.game_url.clone(),
        })
    }

    /// Create an ApiClient configured from the `SPORTCARDS_*` environment
    /// variables, falling back to the hosted endpoints.
    pub fn from_env() -> Result<Self, ApiError> {
        let config = Config::from_env()?;
        Self::new(&config)
    }

    pub fn login_request(&self, phone: &str) -> Result<Request, ApiError> {
        let phone = phone.trim();
        if phone.is_empty() {
            return Err(ApiError::EmptyPhone);
        }
        self.client
            .post(&self.auth_url)
            .json(&LoginRequest { phone })
            .build()
            .map_err(|source| ApiError::Transport { op: Operation::Login, source })
    }

    pub fn complete_workout_request(
        &self,
        user_id: i64,
        difficulty: Difficulty,
    ) -> Result<Request, ApiError> {
        self.client
            .post(&self.game_url)
            .query(&[("action", "complete-workout")])
            .json(&WorkoutRequest { user_id, difficulty })
            .build()
            .map_err(|source| ApiError::Transport { op: Operation::CompleteWorkout, source })
    }

    pub fn collection_request(&self, user_id: i64) -> Result<Request, ApiError> {
        self.game_get(Operation::Collection, "collection", Some(user_id))
    }

    pub fn leaderboard_request(&self) -> Result<Request, ApiError> {
        self.game_get(Operation::Leaderboard, "leaderboard", None)
    }

    pub fn stats_request(&self, user_id: i64) -> Result<Request, ApiError> {
        self.game_get(Operation::Stats, "stats", Some(user_id))
    }

    fn game_get(
        &self,
        op: Operation,
        action: &str,
        user_id: Option<i64>,
    ) -> Result<Request, ApiError> {
        let mut req = self.client.get(&self.game_url).query(&[("action", action)]);
        if let Some(id) = user_id {
            req = req.query(&[("userId", id)]);
        }
        req.build().map_err(|source| ApiError::Transport { op, source })
    }

    /// Send a built request once and decode the JSON body. The server's
    /// error body is never surfaced to the caller.
    fn execute<T: DeserializeOwned>(&self, op: Operation, req: Request) -> Result<T, ApiError> {
        debug!(%op, method = %req.method(), url = %req.url(), "sending request");
        let res = self
            .client
            .execute(req)
            .map_err(|source| {
                warn!(%op, error = %source, "request failed to send");
                ApiError::Transport { op, source }
            })?;
        let res = check_status(op, res)?;
        res.json().map_err(|source| ApiError::Decode { op, source })
    }
}

fn check_status(op: Operation, res: Response) -> Result<Response, ApiError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().unwrap_or_default();
    warn!(%op, %status, "service returned an error status");
    debug!(%op, %body, "error body");
    Err(ApiError::Failed(op))
}

impl GameApi for ApiClient {
    fn login(&self, phone: &str) -> Result<User, ApiError> {
        let req = self.login_request(phone)?;
        self.execute(Operation::Login, req)
    }

    fn complete_workout(
        &self,
        user_id: i64,
        difficulty: Difficulty,
    ) -> Result<WorkoutResult, ApiError> {
        let req = self.complete_workout_request(user_id, difficulty)?;
        self.execute(Operation::CompleteWorkout, req)
    }

    fn get_collection(&self, user_id: i64) -> Result<Vec<AthleteCard>, ApiError> {
        let req = self.collection_request(user_id)?;
        let data: CollectionResponse = self.execute(Operation::Collection, req)?;
        Ok(data.cards)
    }

    fn get_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ApiError> {
        let req = self.leaderboard_request()?;
        let data: LeaderboardResponse = self.execute(Operation::Leaderboard, req)?;
        Ok(data.leaderboard)
    }

    fn get_user_stats(&self, user_id: i64) -> Result<UserStats, ApiError> {
        let req = self.stats_request(user_id)?;
        self.execute(Operation::Stats, req)
    }
}
