//! Bounded leaderboard kept in descending order.

pub const DEFAULT_CAPACITY: usize = 10;
/// Hard ceiling on retained scores; larger capacities are clamped to it.
pub const MAX_HIGH_SCORES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScores {
    scores: Vec<u32>,
    capacity: usize,
}

impl HighScores {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_HIGH_SCORES);
        Self {
            scores: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn with_seed(capacity: usize, seed: impl IntoIterator<Item = u32>) -> Self {
        let capacity = capacity.clamp(1, MAX_HIGH_SCORES);
        let mut scores: Vec<u32> = seed.into_iter().collect();
        scores.sort_unstable_by(|a, b| b.cmp(a));
        scores.truncate(capacity);
        Self { scores, capacity }
    }

    pub fn record(&mut self, score: u32) {
        self.scores.push(score);
        self.scores.sort_unstable_by(|a, b| b.cmp(a));
        self.scores.truncate(self.capacity);
    }

    pub fn top(&self, limit: usize) -> &[u32] {
        &self.scores[..self.scores.len().min(limit)]
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.scores
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl Default for HighScores {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
