// Static display data. The real draw happens inside the game service; these
// tables only tell the player what to expect from each difficulty.

use crate::models::{Difficulty, Rarity};

/// Workouts per week that earn the bonus card.
pub const WEEKLY_TARGET: u32 = 3;

/// Percent chance of each rarity for one difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RarityChances {
    pub common: u8,
    pub rare: u8,
    pub epic: u8,
}

impl RarityChances {
    pub fn for_rarity(&self, rarity: Rarity) -> u8 {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Rare => self.rare,
            Rarity::Epic => self.epic,
        }
    }
}

pub fn chances(difficulty: Difficulty) -> RarityChances {
    let (common, rare, epic) = match difficulty.level() {
        1 => (80, 15, 5),
        2 => (70, 20, 10),
        3 => (60, 25, 15),
        _ => (50, 30, 20),
    };
    RarityChances { common, rare, epic }
}

/// Title and short description shown in the difficulty picker.
pub fn difficulty_info(difficulty: Difficulty) -> (&'static str, &'static str) {
    match difficulty.level() {
        1 => ("Beginner", "First steps in sport"),
        2 => ("Keeping fit", "Light training"),
        3 => ("Progress", "Building strength"),
        _ => ("Fitness test prep", "Maximum effort"),
    }
}

// Keys are the sport names exactly as the service stores them.
const SPORT_EMOJIS: &[(&str, &str)] = &[
    ("Борьба", "🤼"),
    ("Лёгкая атлетика", "🏃"),
    ("Фигурное катание", "⛸️"),
    ("Хоккей", "🏒"),
    ("Теннис", "🎾"),
    ("Бокс", "🥊"),
    ("Плавание", "🏊"),
    ("Гимнастика", "🤸"),
    ("Прыжки в воду", "🤿"),
    ("Волейбол", "🏐"),
    ("Синхронное плавание", "💦"),
    ("Лыжные гонки", "⛷️"),
];

pub const DEFAULT_SPORT_EMOJI: &str = "🏅";

pub fn sport_emoji(sport: &str) -> &'static str {
    SPORT_EMOJIS
        .iter()
        .find(|(name, _)| *name == sport)
        .map(|(_, emoji)| *emoji)
        .unwrap_or(DEFAULT_SPORT_EMOJI)
}

pub const MOTIVATIONAL_TIPS: &[&str] = &[
    "🔥 Consistency beats intensity",
    "💪 Every workout is a step toward the goal",
    "⚡ The strong don't quit, and quitters never get strong",
    "🎯 You are stronger than you think",
    "✨ Results come to those who keep going",
];

/// Tip for the n-th visit to the training screen; cycles through the list.
pub fn tip(n: usize) -> &'static str {
    MOTIVATIONAL_TIPS[n % MOTIVATIONAL_TIPS.len()]
}
