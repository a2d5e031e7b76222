// Application shell: owns the in-memory session state and drives the
// login, eager-load and workout workflows against a `GameApi`.
//
// All state changes go through `AppState::apply`, so each transition can be
// exercised without a terminal. `apply` hands back any notice the
// transition produces; the shell queues them for the UI to drain.

use crate::api::GameApi;
use crate::error::ApiError;
use crate::models::{AthleteCard, Difficulty, LeaderboardEntry, User, UserStats, WorkoutResult};
use crate::reveal::Reveal;
use crate::session::{SavedSession, SessionStore};
use crate::views::{self, LeaderboardRow, RarityCounts, WeeklyProgress};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Something the player should be told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Welcome,
    EmptyPhone,
    LoginFailed,
    LoadFailed,
    WorkoutFailed,
    NoDifficulty,
    WeeklyBonus,
    SignedOut,
}

impl Notice {
    pub fn is_error(self) -> bool {
        matches!(
            self,
            Notice::EmptyPhone
                | Notice::LoginFailed
                | Notice::LoadFailed
                | Notice::WorkoutFailed
                | Notice::NoDifficulty
        )
    }

    pub fn title(self) -> &'static str {
        match self {
            Notice::Welcome => "Welcome!",
            Notice::LoginFailed => "Login failed",
            Notice::WeeklyBonus => "🎉 Weekly bonus!",
            Notice::SignedOut => "Signed out",
            _ => "Error",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Notice::Welcome => "You are signed in",
            Notice::EmptyPhone => "Enter your phone number",
            Notice::LoginFailed => "Please try again",
            Notice::LoadFailed => "Could not load your data",
            Notice::WorkoutFailed => "Could not complete the workout",
            Notice::NoDifficulty => "Pick a difficulty first",
            Notice::WeeklyBonus => "You earned an epic card for 3 workouts this week!",
            Notice::SignedOut => "Your saved session was removed",
        }
    }
}

/// Every way the state can change.
#[derive(Debug, Clone)]
pub enum Action {
    SignedIn(SavedSession),
    UserLoaded(User),
    DataLoaded {
        stats: UserStats,
        cards: Vec<AthleteCard>,
        leaderboard: Vec<LeaderboardEntry>,
    },
    DifficultySelected(Difficulty),
    RevealStarted(WorkoutResult, Instant),
    /// Advance the reveal clock; settles the card once the delay is over.
    RevealPolled(Instant),
    RevealSettled(WorkoutResult),
    RevealDismissed,
    SignedOut,
}

#[derive(Debug, Clone)]
pub struct AppState {
    session: Option<SavedSession>,
    selected_difficulty: Option<Difficulty>,
    cards: Vec<AthleteCard>,
    total_points: u32,
    week_workouts: u32,
    leaderboard: Vec<LeaderboardEntry>,
    reveal: Reveal,
}

impl AppState {
    pub fn new(reveal_delay: Duration) -> Self {
        Self {
            session: None,
            selected_difficulty: None,
            cards: Vec::new(),
            total_points: 0,
            week_workouts: 0,
            leaderboard: Vec::new(),
            reveal: Reveal::new(reveal_delay),
        }
    }

    pub fn apply(&mut self, action: Action) -> Option<Notice> {
        match action {
            Action::SignedIn(session) => self.session = Some(session),
            Action::UserLoaded(user) => {
                self.total_points = user.total_points;
                self.week_workouts = user.week_workouts;
            }
            Action::DataLoaded { stats, cards, leaderboard } => {
                self.total_points = stats.total_points;
                self.week_workouts = stats.week_workouts;
                self.cards = cards;
                self.leaderboard = leaderboard;
            }
            Action::DifficultySelected(d) => self.selected_difficulty = Some(d),
            Action::RevealStarted(result, now) => {
                if !self.reveal.begin(result, now) {
                    warn!("reveal already in flight, workout result dropped");
                }
            }
            Action::RevealPolled(now) => {
                let result = self.reveal.poll(now)?;
                return self.apply(Action::RevealSettled(result));
            }
            Action::RevealSettled(result) => {
                self.total_points = self.total_points.saturating_add(result.points);
                self.week_workouts = result.week_workouts;
                self.cards.insert(0, result.card);
                if result.was_weekly_bonus {
                    return Some(Notice::WeeklyBonus);
                }
            }
            Action::RevealDismissed => self.reveal.dismiss(),
            Action::SignedOut => *self = Self::new(self.reveal.delay()),
        }
        None
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&SavedSession> {
        self.session.as_ref()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.session.as_ref().map(|s| s.user_id)
    }

    pub fn selected_difficulty(&self) -> Option<Difficulty> {
        self.selected_difficulty
    }

    /// Most recent first.
    pub fn cards(&self) -> &[AthleteCard] {
        &self.cards
    }

    pub fn total_points(&self) -> u32 {
        self.total_points
    }

    pub fn weekly_progress(&self) -> WeeklyProgress {
        WeeklyProgress::new(self.week_workouts)
    }

    pub fn leaderboard(&self) -> &[LeaderboardEntry] {
        &self.leaderboard
    }

    pub fn leaderboard_rows(&self) -> Vec<LeaderboardRow<'_>> {
        views::leaderboard_rows(&self.leaderboard, self.user_id())
    }

    pub fn rarity_counts(&self) -> RarityCounts {
        views::rarity_counts(&self.cards)
    }

    pub fn reveal(&self) -> &Reveal {
        &self.reveal
    }
}

pub struct Shell<A, S> {
    api: A,
    store: S,
    state: AppState,
    notices: Vec<Notice>,
}

impl<A: GameApi, S: SessionStore> Shell<A, S> {
    pub fn new(api: A, store: S, reveal_delay: Duration) -> Self {
        Self {
            api,
            store,
            state: AppState::new(reveal_delay),
            notices: Vec::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Resume a saved session, if any, and load its data. Returns whether a
    /// session was found.
    pub fn restore(&mut self) -> bool {
        let saved = match SavedSession::load(&self.store) {
            Ok(saved) => saved,
            Err(e) => {
                warn!(error = %e, "could not read saved session");
                None
            }
        };
        let Some(session) = saved else {
            return false;
        };
        let user_id = session.user_id;
        info!(user_id, "restoring saved session");
        self.state.apply(Action::SignedIn(session));
        self.load_user_data(user_id);
        true
    }

    pub fn login(&mut self, phone: &str) -> bool {
        let phone = phone.trim();
        if phone.is_empty() {
            self.notify(Notice::EmptyPhone);
            return false;
        }

        let user = match self.api.login(phone) {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, phone = %views::masked_phone(phone), "login failed");
                self.notify(Notice::LoginFailed);
                return false;
            }
        };

        let session = SavedSession { user_id: user.user_id, phone: phone.to_string() };
        if let Err(e) = session.save(&self.store) {
            warn!(error = %e, "could not persist session");
        }
        info!(user_id = user.user_id, "signed in");

        let user_id = user.user_id;
        self.state.apply(Action::SignedIn(session));
        self.state.apply(Action::UserLoaded(user));
        self.load_user_data(user_id);
        self.notify(Notice::Welcome);
        true
    }

    /// Reload stats, collection and leaderboard for the current session.
    pub fn refresh(&mut self) -> bool {
        match self.state.user_id() {
            Some(user_id) => self.load_user_data(user_id),
            None => false,
        }
    }

    /// Fetch stats, collection and leaderboard concurrently. The state is
    /// only updated when all three succeed.
    fn load_user_data(&mut self, user_id: i64) -> bool {
        let api = &self.api;
        let (stats, cards, leaderboard) = thread::scope(|s| {
            let stats = s.spawn(|| api.get_user_stats(user_id));
            let cards = s.spawn(|| api.get_collection(user_id));
            let leaderboard = api.get_leaderboard();
            (join(stats), join(cards), leaderboard)
        });

        match (stats, cards, leaderboard) {
            (Ok(stats), Ok(cards), Ok(leaderboard)) => {
                info!(user_id, cards = cards.len(), "user data loaded");
                self.state.apply(Action::DataLoaded { stats, cards, leaderboard });
                true
            }
            (stats, cards, leaderboard) => {
                for err in [stats.err(), cards.err(), leaderboard.err()].into_iter().flatten() {
                    warn!(user_id, op = ?err.operation(), error = %err, "eager load failed");
                }
                self.notify(Notice::LoadFailed);
                false
            }
        }
    }

    pub fn select_difficulty(&mut self, difficulty: Difficulty) {
        self.state.apply(Action::DifficultySelected(difficulty));
    }

    /// Complete a workout at the selected difficulty and start the card
    /// reveal. Nothing is applied to the totals until the reveal settles.
    pub fn complete_workout(&mut self, now: Instant) -> bool {
        let Some(user_id) = self.state.user_id() else {
            warn!("workout requested without a session");
            return false;
        };
        let Some(difficulty) = self.state.selected_difficulty() else {
            self.notify(Notice::NoDifficulty);
            return false;
        };
        if self.state.reveal().is_revealing() {
            return false;
        }

        match self.api.complete_workout(user_id, difficulty) {
            Ok(result) => {
                info!(
                    user_id,
                    difficulty = difficulty.level(),
                    rarity = %result.card.rarity,
                    "workout completed"
                );
                self.state.apply(Action::RevealStarted(result, now));
                true
            }
            Err(e) => {
                warn!(user_id, error = %e, "workout completion failed");
                self.notify(Notice::WorkoutFailed);
                false
            }
        }
    }

    /// Advance the reveal. When it settles the result is applied and, if
    /// it carried the weekly bonus, the bonus notice is queued.
    pub fn poll_reveal(&mut self, now: Instant) -> bool {
        if !self.state.reveal().is_revealing() {
            return false;
        }
        if let Some(notice) = self.state.apply(Action::RevealPolled(now)) {
            self.notify(notice);
        }
        !self.state.reveal().is_revealing()
    }

    pub fn dismiss_reveal(&mut self) {
        self.state.apply(Action::RevealDismissed);
    }

    pub fn logout(&mut self) {
        if let Err(e) = SavedSession::clear(&self.store) {
            warn!(error = %e, "could not clear saved session");
        }
        self.state.apply(Action::SignedOut);
        self.notify(Notice::SignedOut);
    }
}

fn join<T>(handle: thread::ScopedJoinHandle<'_, Result<T, ApiError>>) -> Result<T, ApiError> {
    handle
        .join()
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Rarity, RarityStats};

    fn card(id: i64, rarity: Rarity) -> AthleteCard {
        AthleteCard {
            id,
            name: format!("Athlete {}", id),
            rarity,
            image_url: None,
            fact: String::new(),
            sport: "Хоккей".into(),
            obtained_at: None,
        }
    }

    #[test]
    fn settled_reveal_prepends_and_adds_points() {
        let mut state = AppState::new(Duration::ZERO);
        state.apply(Action::DataLoaded {
            stats: UserStats {
                total_points: 10,
                week_workouts: 1,
                rarity_stats: RarityStats::default(),
            },
            cards: vec![card(1, Rarity::Common)],
            leaderboard: vec![],
        });
        state.apply(Action::RevealSettled(WorkoutResult {
            card: card(2, Rarity::Rare),
            points: 20,
            week_workouts: 2,
            was_weekly_bonus: false,
        }));
        assert_eq!(state.total_points(), 30);
        assert_eq!(state.weekly_progress().completed, 2);
        let ids: Vec<i64> = state.cards().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn sign_out_keeps_reveal_delay() {
        let mut state = AppState::new(Duration::from_millis(250));
        state.apply(Action::SignedIn(SavedSession { user_id: 1, phone: "+7".into() }));
        state.apply(Action::SignedOut);
        assert!(!state.is_authenticated());
        assert_eq!(state.reveal().delay(), Duration::from_millis(250));
    }

    #[test]
    fn polled_reveal_settles_through_apply_once() {
        let t0 = Instant::now();
        let delay = Duration::from_millis(600);
        let mut state = AppState::new(delay);
        let result = WorkoutResult {
            card: card(5, Rarity::Epic),
            points: 30,
            week_workouts: 0,
            was_weekly_bonus: true,
        };
        state.apply(Action::RevealStarted(result, t0));

        assert_eq!(state.apply(Action::RevealPolled(t0 + delay / 2)), None);
        assert_eq!(state.total_points(), 0);
        assert!(state.reveal().is_revealing());

        assert_eq!(state.apply(Action::RevealPolled(t0 + delay)), Some(Notice::WeeklyBonus));
        assert_eq!(state.apply(Action::RevealPolled(t0 + delay * 2)), None);
        assert_eq!(state.total_points(), 30);
        assert_eq!(state.cards().len(), 1);
    }

    #[test]
    fn second_start_keeps_first_card_in_flight() {
        let t0 = Instant::now();
        let mut state = AppState::new(Duration::ZERO);
        let first = WorkoutResult {
            card: card(1, Rarity::Common),
            points: 10,
            week_workouts: 1,
            was_weekly_bonus: false,
        };
        let second = WorkoutResult { card: card(2, Rarity::Rare), points: 20, ..first.clone() };
        state.apply(Action::RevealStarted(first, t0));
        state.apply(Action::RevealStarted(second, t0));

        assert_eq!(state.reveal().card().map(|c| c.id), Some(1));
        state.apply(Action::RevealPolled(t0));
        assert_eq!(state.total_points(), 10);
    }

    #[test]
    fn only_failures_are_errors() {
        assert!(Notice::LoadFailed.is_error());
        assert!(!Notice::WeeklyBonus.is_error());
        assert!(!Notice::Welcome.is_error());
    }
}
