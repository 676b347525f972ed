//! Game session state machine: screen transitions, countdown, scoring and
//! the high-score ledger. Time only advances through [`GameSession::tick`];
//! scheduling the ticks belongs to the controller.

use rand::{rngs::StdRng, Rng};
use shared::{
    domain::{HoleIndex, Screen, HOLE_COUNT},
    protocol::{HitOutcome, SessionSnapshot},
};
use tracing::{debug, info};

use crate::high_scores::{HighScores, DEFAULT_CAPACITY, MAX_HIGH_SCORES};

pub const DEFAULT_ROUND_SECONDS: u32 = 15;
pub const MAX_ROUND_SECONDS: u32 = 15;
pub const SEED_HIGH_SCORES: [u32; 2] = [5, 0];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub round_seconds: u32,
    pub seed_high_scores: Vec<u32>,
    pub high_score_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            round_seconds: DEFAULT_ROUND_SECONDS,
            seed_high_scores: SEED_HIGH_SCORES.to_vec(),
            high_score_capacity: DEFAULT_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No countdown is running; nothing changed.
    Idle,
    Running { time_left: u32 },
    Expired,
}

pub struct GameSession {
    round_seconds: u32,
    screen: Screen,
    score: u32,
    mole_position: HoleIndex,
    time_left: u32,
    active: bool,
    high_scores: HighScores,
    score_saved: bool,
    rng: StdRng,
}

impl GameSession {
    pub fn new(config: SessionConfig, rng: StdRng) -> Self {
        let round_seconds = config.round_seconds.clamp(1, MAX_ROUND_SECONDS);
        let high_score_capacity = config.high_score_capacity.clamp(1, MAX_HIGH_SCORES);
        Self {
            round_seconds,
            screen: Screen::Welcome,
            score: 0,
            mole_position: HoleIndex::wrapping(0),
            time_left: round_seconds,
            active: false,
            high_scores: HighScores::with_seed(high_score_capacity, config.seed_high_scores),
            score_saved: false,
            rng,
        }
    }

    pub fn start_game(&mut self) {
        self.score = 0;
        self.time_left = self.round_seconds;
        self.score_saved = false;
        self.mole_position = self.random_hole();
        self.active = true;
        self.screen = Screen::Playing;
        info!(
            mole = %self.mole_position,
            time_left = self.time_left,
            "game started"
        );
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.active {
            return TickOutcome::Idle;
        }

        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left > 0 {
            debug!(time_left = self.time_left, "countdown tick");
            return TickOutcome::Running {
                time_left: self.time_left,
            };
        }

        self.active = false;
        self.finalize_score();
        self.screen = Screen::Welcome;
        info!(score = self.score, "countdown expired");
        TickOutcome::Expired
    }

    /// Scores one hit and moves the mole. Ignored unless the countdown is live.
    pub fn whack_mole(&mut self) -> bool {
        if !self.active {
            debug!("whack ignored while inactive");
            return false;
        }

        self.score += 1;
        self.relocate_mole();
        debug!(score = self.score, mole = %self.mole_position, "mole whacked");
        true
    }

    pub fn hit_hole(&mut self, hole: HoleIndex) -> HitOutcome {
        if !self.active {
            return HitOutcome::Inactive;
        }
        if hole != self.mole_position {
            debug!(%hole, mole = %self.mole_position, "clicked an empty hole");
            return HitOutcome::Miss;
        }

        self.whack_mole();
        HitOutcome::Hit
    }

    pub fn restart_game(&mut self) {
        self.active = false;
        self.finalize_score();
        self.screen = Screen::Welcome;
        info!(score = self.score, "game restarted");
    }

    fn finalize_score(&mut self) {
        if self.score == 0 || self.score_saved {
            return;
        }

        self.high_scores.record(self.score);
        self.score_saved = true;
        info!(
            score = self.score,
            best = self.high_scores.top(1).first().copied().unwrap_or_default(),
            "recorded high score"
        );
    }

    fn random_hole(&mut self) -> HoleIndex {
        HoleIndex::wrapping(self.rng.gen_range(0..HOLE_COUNT))
    }

    // Redraw until the cell changes; nine cells keep the expected draws tiny.
    fn relocate_mole(&mut self) {
        let previous = self.mole_position;
        let mut next = self.random_hole();
        while next == previous {
            next = self.random_hole();
        }
        self.mole_position = next;
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn mole_position(&self) -> HoleIndex {
        self.mole_position
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            screen: self.screen,
            score: self.score,
            mole_position: self.mole_position,
            time_left: self.time_left,
            active: self.active,
            high_scores: self.high_scores.as_slice().to_vec(),
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
