// Wire types shared with the game service. Field names follow the
// service's camelCase JSON; the authoritative definitions live server-side.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Card rarity tier. Ordered: common < rare < epic.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
}

impl Rarity {
    pub const ALL: [Rarity; 3] = [Rarity::Common, Rarity::Rare, Rarity::Epic];

    /// Points awarded for a card of this rarity. Mirrors the service's table.
    pub fn points(self) -> u32 {
        match self {
            Rarity::Common => 10,
            Rarity::Rare => 20,
            Rarity::Epic => 30,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rarity::Common => "COMMON",
            Rarity::Rare => "RARE",
            Rarity::Epic => "EPIC",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Workout difficulty, 1..=4. Only the service knows what it means for
/// the draw; the client just forwards the number.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    pub fn new(level: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&level).then_some(Self(level))
    }

    pub fn level(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Difficulty> {
        (Self::MIN..=Self::MAX).map(Difficulty)
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Difficulty::new(level).ok_or_else(|| format!("difficulty {} out of range", level))
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> u8 {
        d.0
    }
}

/// User record returned by the auth endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: i64,
    pub phone: String,
    pub total_points: u32,
    pub week_workouts: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AthleteCard {
    pub id: i64,
    pub name: String,
    pub rarity: Rarity,
    #[serde(default)]
    pub image_url: Option<String>,
    pub fact: String,
    pub sport: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obtained_at: Option<String>,
}

/// Result of a completed workout. Consumed once by the shell.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutResult {
    pub card: AthleteCard,
    pub points: u32,
    pub week_workouts: u32,
    pub was_weekly_bonus: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RarityStats {
    pub common: u32,
    pub rare: u32,
    pub epic: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_points: u32,
    pub week_workouts: u32,
    pub rarity_stats: RarityStats,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: i64,
    /// Masked by the service: only the last four digits are present.
    pub phone: String,
    pub points: u32,
    pub card_count: u32,
}

// Envelopes for the list endpoints.
#[derive(Deserialize)]
pub(crate) struct CollectionResponse {
    pub cards: Vec<AthleteCard>,
}

#[derive(Deserialize)]
pub(crate) struct LeaderboardResponse {
    pub leaderboard: Vec<LeaderboardEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rarity_is_ordered_and_lowercase_on_the_wire() {
        assert!(Rarity::Common < Rarity::Rare && Rarity::Rare < Rarity::Epic);
        let r: Rarity = serde_json::from_str("\"epic\"").unwrap();
        assert_eq!(r, Rarity::Epic);
        assert!(serde_json::from_str::<Rarity>("\"legendary\"").is_err());
    }

    #[test]
    fn difficulty_range_is_enforced() {
        assert!(Difficulty::new(0).is_none());
        assert!(Difficulty::new(5).is_none());
        assert_eq!(Difficulty::new(4).map(Difficulty::level), Some(4));
        assert_eq!(Difficulty::all().count(), 4);
        assert!(serde_json::from_str::<Difficulty>("9").is_err());
    }

    #[test]
    fn workout_result_parses_service_shape() {
        let body = r#"{
            "card": {"id": 7, "name": "Ivan", "rarity": "rare", "imageUrl": null,
                     "fact": "Won gold", "sport": "Бокс"},
            "points": 20, "weekWorkouts": 1, "wasWeeklyBonus": false
        }"#;
        let result: WorkoutResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.card.rarity, Rarity::Rare);
        assert_eq!(result.card.image_url, None);
        assert_eq!(result.card.obtained_at, None);
        assert_eq!(result.points, 20);
        assert!(!result.was_weekly_bonus);
    }

    #[test]
    fn stats_parse_rarity_breakdown() {
        let body = r#"{"totalPoints": 60, "weekWorkouts": 2,
                       "rarityStats": {"common": 2, "rare": 1, "epic": 0}}"#;
        let stats: UserStats = serde_json::from_str(body).unwrap();
        assert_eq!(stats.rarity_stats, RarityStats { common: 2, rare: 1, epic: 0 });
    }
}
