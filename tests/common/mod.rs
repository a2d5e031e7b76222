// Scripted stand-in for the game service. Every call is recorded; an unset
// response makes the corresponding operation fail like a non-2xx status.

use sportcards_cli::api::GameApi;
use sportcards_cli::error::{ApiError, Operation};
use sportcards_cli::models::{
    AthleteCard, Difficulty, LeaderboardEntry, Rarity, RarityStats, User, UserStats,
    WorkoutResult,
};
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Login(String),
    CompleteWorkout { user_id: i64, difficulty: u8 },
    Collection(i64),
    Leaderboard,
    Stats(i64),
}

#[derive(Default)]
pub struct FakeApi {
    calls: Mutex<Vec<Call>>,
    pub user: Mutex<Option<User>>,
    pub workouts: Mutex<VecDeque<WorkoutResult>>,
    pub cards: Mutex<Option<Vec<AthleteCard>>>,
    pub leaderboard: Mutex<Option<Vec<LeaderboardEntry>>>,
    pub stats: Mutex<Option<UserStats>>,
}

#[allow(dead_code)]
impl FakeApi {
    /// A service that knows user 1 with an empty collection.
    pub fn healthy() -> Self {
        let api = Self::default();
        *api.user.lock().unwrap() = Some(user(1, "+70000000000", 0, 0));
        *api.cards.lock().unwrap() = Some(vec![]);
        *api.leaderboard.lock().unwrap() = Some(vec![entry(1, 1, "0000", 0)]);
        *api.stats.lock().unwrap() = Some(stats(0, 0));
        api
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl GameApi for FakeApi {
    fn login(&self, phone: &str) -> Result<User, ApiError> {
        self.record(Call::Login(phone.to_string()));
        self.user.lock().unwrap().clone().ok_or(ApiError::Failed(Operation::Login))
    }

    fn complete_workout(
        &self,
        user_id: i64,
        difficulty: Difficulty,
    ) -> Result<WorkoutResult, ApiError> {
        self.record(Call::CompleteWorkout { user_id, difficulty: difficulty.level() });
        self.workouts
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(ApiError::Failed(Operation::CompleteWorkout))
    }

    fn get_collection(&self, user_id: i64) -> Result<Vec<AthleteCard>, ApiError> {
        self.record(Call::Collection(user_id));
        self.cards.lock().unwrap().clone().ok_or(ApiError::Failed(Operation::Collection))
    }

    fn get_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ApiError> {
        self.record(Call::Leaderboard);
        self.leaderboard
            .lock()
            .unwrap()
            .clone()
            .ok_or(ApiError::Failed(Operation::Leaderboard))
    }

    fn get_user_stats(&self, user_id: i64) -> Result<UserStats, ApiError> {
        self.record(Call::Stats(user_id));
        self.stats.lock().unwrap().clone().ok_or(ApiError::Failed(Operation::Stats))
    }
}

pub fn user(user_id: i64, phone: &str, total_points: u32, week_workouts: u32) -> User {
    User { user_id, phone: phone.into(), total_points, week_workouts }
}

#[allow(dead_code)]
pub fn card(id: i64, rarity: Rarity) -> AthleteCard {
    AthleteCard {
        id,
        name: format!("Athlete {}", id),
        rarity,
        image_url: None,
        fact: "Multiple national champion".into(),
        sport: "Плавание".into(),
        obtained_at: Some("2024-05-01T12:00:00".into()),
    }
}

pub fn entry(rank: u32, user_id: i64, phone: &str, points: u32) -> LeaderboardEntry {
    LeaderboardEntry { rank, user_id, phone: phone.into(), points, card_count: 0 }
}

pub fn stats(total_points: u32, week_workouts: u32) -> UserStats {
    UserStats { total_points, week_workouts, rarity_stats: RarityStats::default() }
}

#[allow(dead_code)]
pub fn workout(card: AthleteCard, week_workouts: u32, was_weekly_bonus: bool) -> WorkoutResult {
    WorkoutResult {
        points: card.rarity.points(),
        card,
        week_workouts,
        was_weekly_bonus,
    }
}
