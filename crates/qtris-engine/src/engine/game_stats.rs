use serde::{Deserialize, Serialize};

/// Score values for line clears, indexed by the number of lines cleared together.
const SCORE_TABLE: [usize; 5] = [0, 100, 300, 500, 800];

/// Score, lines and piece counters of one game.
///
/// - **Score**: 0, 100, 300, 500 or 800 points per lock, by number of lines cleared
/// - **Level**: one level per 10 cleared lines
/// - **Completed pieces**: number of pieces locked into the grid
/// - **Line clear distribution**: count of locks by number of lines cleared
///
/// There are no combo, back-to-back or T-spin bonuses.
///
/// ```
/// use qtris_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.record_lock(1);
/// stats.record_lock(4);
///
/// assert_eq!(stats.score(), 900);
/// assert_eq!(stats.lines_removed(), 5);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    score: usize,
    completed_pieces: usize,
    lines_removed: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            lines_removed: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Returns the current level: total lines removed divided by 10.
    #[must_use]
    pub const fn level(&self) -> usize {
        self.lines_removed / 10
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn lines_removed(&self) -> usize {
        self.lines_removed
    }

    /// Returns a histogram of locks by number of lines cleared (index 0 to 4).
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Updates the counters after a piece is locked.
    ///
    /// More than 4 lines can never be cleared by a single tetromino; larger values are
    /// scored as a 4-line clear.
    pub fn record_lock(&mut self, cleared_lines: usize) {
        let index = cleared_lines.min(SCORE_TABLE.len() - 1);
        self.completed_pieces += 1;
        self.lines_removed += cleared_lines;
        self.line_cleared_counter[index] += 1;
        self.score += SCORE_TABLE[index];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_table() {
        for (lines, expected) in [(0, 0), (1, 100), (2, 300), (3, 500), (4, 800)] {
            let mut stats = GameStats::new();
            stats.record_lock(lines);
            assert_eq!(stats.score(), expected, "{lines} lines");
            assert_eq!(stats.completed_pieces(), 1);
        }
    }

    #[test]
    fn test_level_follows_lines() {
        let mut stats = GameStats::new();
        for _ in 0..2 {
            stats.record_lock(4);
        }
        assert_eq!(stats.level(), 0);
        stats.record_lock(2);
        assert_eq!(stats.lines_removed(), 10);
        assert_eq!(stats.level(), 1);
        assert_eq!(stats.line_cleared_counter(), &[0, 0, 1, 0, 2]);
    }
}
