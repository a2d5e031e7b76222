// Pure derivations over already-loaded state. Nothing here touches the
// network.

use crate::catalog::WEEKLY_TARGET;
use crate::models::{AthleteCard, LeaderboardEntry, Rarity};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RarityCounts {
    pub common: usize,
    pub rare: usize,
    pub epic: usize,
}

impl RarityCounts {
    pub fn get(&self, rarity: Rarity) -> usize {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Rare => self.rare,
            Rarity::Epic => self.epic,
        }
    }

    pub fn total(&self) -> usize {
        self.common + self.rare + self.epic
    }
}

pub fn rarity_counts(cards: &[AthleteCard]) -> RarityCounts {
    cards.iter().fold(RarityCounts::default(), |mut acc, card| {
        match card.rarity {
            Rarity::Common => acc.common += 1,
            Rarity::Rare => acc.rare += 1,
            Rarity::Epic => acc.epic += 1,
        }
        acc
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyProgress {
    pub completed: u32,
    pub target: u32,
}

impl WeeklyProgress {
    pub fn new(completed: u32) -> Self {
        Self { completed, target: WEEKLY_TARGET }
    }

    /// The service awards the bonus on the workout that reaches the target.
    pub fn bonus_on_next_workout(&self) -> bool {
        self.completed + 1 >= self.target
    }

    /// 0.0..=1.0 for the progress bar.
    pub fn fraction(&self) -> f64 {
        (self.completed.min(self.target) as f64) / (self.target as f64)
    }
}

impl std::fmt::Display for WeeklyProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.completed, self.target)
    }
}

/// One leaderboard line, in service order.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardRow<'a> {
    pub entry: &'a LeaderboardEntry,
    pub is_current_user: bool,
    pub label: String,
}

pub fn leaderboard_rows(
    entries: &[LeaderboardEntry],
    current_user: Option<i64>,
) -> Vec<LeaderboardRow<'_>> {
    entries
        .iter()
        .map(|entry| {
            let is_current_user = current_user == Some(entry.user_id);
            let label = if is_current_user {
                "You".to_string()
            } else {
                masked_phone(&entry.phone)
            };
            LeaderboardRow { entry, is_current_user, label }
        })
        .collect()
}

/// `****1234` from a full number or an already-masked suffix.
pub fn masked_phone(phone: &str) -> String {
    let digits: Vec<char> = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return "****".to_string();
    }
    let tail: String = digits[digits.len().saturating_sub(4)..].iter().collect();
    format!("****{}", tail)
}

/// Acquisition date for display; falls back to the raw string when the
/// service sends something chrono can't read.
pub fn obtained_label(card: &AthleteCard) -> Option<String> {
    let raw = card.obtained_at.as_deref()?;
    let parsed = chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_local())
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"));
    Some(match parsed {
        Ok(dt) => dt.format("%Y-%m-%d").to_string(),
        Err(_) => raw.to_string(),
    })
}
