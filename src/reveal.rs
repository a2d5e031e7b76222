// Two-phase card reveal: the freshly awarded card "flips" for a fixed delay
// before it settles and the workout result is applied.

use crate::models::{AthleteCard, WorkoutResult};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
pub enum RevealPhase {
    Idle,
    Revealing {
        pending: WorkoutResult,
        started: Instant,
    },
    Settled {
        card: AthleteCard,
    },
}

#[derive(Debug, Clone)]
pub struct Reveal {
    phase: RevealPhase,
    delay: Duration,
}

impl Reveal {
    pub fn new(delay: Duration) -> Self {
        Self { phase: RevealPhase::Idle, delay }
    }

    pub fn phase(&self) -> &RevealPhase {
        &self.phase
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_revealing(&self) -> bool {
        matches!(self.phase, RevealPhase::Revealing { .. })
    }

    /// Card currently on screen, in either phase.
    pub fn card(&self) -> Option<&AthleteCard> {
        match &self.phase {
            RevealPhase::Idle => None,
            RevealPhase::Revealing { pending, .. } => Some(&pending.card),
            RevealPhase::Settled { card } => Some(card),
        }
    }

    /// Start flipping a new card. Returns false (and changes nothing) if a
    /// reveal is already in flight.
    pub fn begin(&mut self, result: WorkoutResult, now: Instant) -> bool {
        if self.is_revealing() {
            return false;
        }
        self.phase = RevealPhase::Revealing { pending: result, started: now };
        true
    }

    /// Time left in the flipping phase, zero once it can settle.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        match &self.phase {
            RevealPhase::Revealing { started, .. } => {
                Some(self.delay.saturating_sub(now.saturating_duration_since(*started)))
            }
            _ => None,
        }
    }

    /// Settle once the delay has elapsed. The pending result is handed out
    /// exactly once; later polls return `None`.
    pub fn poll(&mut self, now: Instant) -> Option<WorkoutResult> {
        let ready = matches!(
            &self.phase,
            RevealPhase::Revealing { started, .. }
                if now.saturating_duration_since(*started) >= self.delay
        );
        if !ready {
            return None;
        }
        match std::mem::replace(&mut self.phase, RevealPhase::Idle) {
            RevealPhase::Revealing { pending, .. } => {
                self.phase = RevealPhase::Settled { card: pending.card.clone() };
                Some(pending)
            }
            other => {
                self.phase = other;
                None
            }
        }
    }

    /// Close a settled card. Ignored while still flipping.
    pub fn dismiss(&mut self) {
        if let RevealPhase::Settled { .. } = self.phase {
            self.phase = RevealPhase::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rarity;

    fn result(id: i64) -> WorkoutResult {
        WorkoutResult {
            card: AthleteCard {
                id,
                name: "Alina".into(),
                rarity: Rarity::Epic,
                image_url: None,
                fact: "Olympic champion".into(),
                sport: "Гимнастика".into(),
                obtained_at: None,
            },
            points: 30,
            week_workouts: 1,
            was_weekly_bonus: false,
        }
    }

    #[test]
    fn settles_only_after_delay_and_only_once() {
        let t0 = Instant::now();
        let mut reveal = Reveal::new(Duration::from_millis(600));
        assert!(reveal.begin(result(1), t0));

        assert!(reveal.poll(t0 + Duration::from_millis(599)).is_none());
        assert_eq!(
            reveal.remaining(t0 + Duration::from_millis(100)),
            Some(Duration::from_millis(500))
        );

        let settled = reveal.poll(t0 + Duration::from_millis(600)).unwrap();
        assert_eq!(settled.card.id, 1);
        assert!(matches!(reveal.phase(), RevealPhase::Settled { .. }));
        assert!(reveal.poll(t0 + Duration::from_secs(5)).is_none());
    }

    #[test]
    fn second_begin_is_refused_while_flipping() {
        let t0 = Instant::now();
        let mut reveal = Reveal::new(Duration::from_millis(600));
        reveal.begin(result(1), t0);
        assert!(!reveal.begin(result(2), t0));
        assert_eq!(reveal.card().map(|c| c.id), Some(1));
    }

    #[test]
    fn dismiss_only_closes_a_settled_card() {
        let t0 = Instant::now();
        let mut reveal = Reveal::new(Duration::ZERO);
        reveal.begin(result(1), t0);
        reveal.dismiss();
        assert!(reveal.is_revealing());

        reveal.poll(t0);
        reveal.dismiss();
        assert_eq!(reveal.phase(), &RevealPhase::Idle);
        assert!(reveal.begin(result(2), t0));
    }
}
