//! Scoring module - score, level and fall speed
//!
//! Line clears use the classic table (`LINE_SCORES`) multiplied by
//! `level + 1`, where the level is the one in effect before the clear. The
//! table is superadditive, so clearing rows together always beats clearing
//! them one at a time. Consecutive clearing locks add a combo bonus that is
//! not level-scaled. Levels stop at `MAX_LEVEL`, which keeps every award
//! exact in `u32`.

use serde::{Deserialize, Serialize};

use crate::clear::ClearEvent;
use crate::config::RuleConfig;
use crate::types::{DROP_INTERVALS, DROP_INTERVAL_FLOOR_MS, LINE_SCORES, MAX_LEVEL};

/// Cumulative score state, mutated only through [`Scoring`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct ScoreState {
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    /// Consecutive locks that cleared at least one row
    pub combo: u32,
}

/// What one clear event or drop was worth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScoreDelta {
    pub lines: u32,
    /// Level-scaled line clear points
    pub line_points: u32,
    pub combo_bonus: u32,
    /// Per-row soft or hard drop points
    pub drop_points: u32,
    pub total: u32,
    pub level_before: u32,
    pub level_after: u32,
}

impl ScoreDelta {
    pub fn leveled_up(&self) -> bool {
        self.level_after > self.level_before
    }
}

/// Base points for clearing `lines` rows in one lock, before the level multiplier.
///
/// Rows past the table (only possible on hand-built grids) each add the top entry.
pub fn line_clear_points(lines: usize) -> u32 {
    let top = LINE_SCORES.len() - 1;
    if lines <= top {
        LINE_SCORES[lines]
    } else {
        LINE_SCORES[top].saturating_mul(lines as u32 - top as u32 + 1)
    }
}

/// Line points for `lines` rows at `level`; levels past `MAX_LEVEL` score as the cap
pub fn calculate_line_score(lines: usize, level: u32) -> u32 {
    line_clear_points(lines).saturating_mul(level.min(MAX_LEVEL) + 1)
}

/// Level reached after `total_lines`, starting from `start_level`, capped at `MAX_LEVEL`
pub fn calculate_level(total_lines: u32, lines_per_level: u32, start_level: u32) -> u32 {
    start_level
        .saturating_add(total_lines / lines_per_level)
        .min(MAX_LEVEL)
}

/// Time between automatic downward steps at `level` (milliseconds)
pub fn fall_interval_ms(level: u32) -> u32 {
    DROP_INTERVALS
        .get(level as usize)
        .copied()
        .unwrap_or(DROP_INTERVAL_FLOOR_MS)
}

/// The scoring controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scoring {
    state: ScoreState,
    lines_per_level: u32,
    start_level: u32,
    combo_bonus: u32,
    soft_drop_points: u32,
    hard_drop_points: u32,
}

impl Scoring {
    pub fn new(config: &RuleConfig) -> Self {
        Self {
            state: ScoreState {
                level: config.start_level,
                ..ScoreState::default()
            },
            lines_per_level: config.lines_per_level,
            start_level: config.start_level,
            combo_bonus: config.combo_bonus,
            soft_drop_points: config.soft_drop_points,
            hard_drop_points: config.hard_drop_points,
        }
    }

    /// Rebuild from a saved state; the caller checks consistency with [`Scoring::is_consistent`]
    pub fn with_state(config: &RuleConfig, state: ScoreState) -> Self {
        Self {
            state,
            ..Self::new(config)
        }
    }

    /// Level matches the line total under this rule set
    pub fn is_consistent(&self, state: &ScoreState) -> bool {
        state.level == calculate_level(state.lines, self.lines_per_level, self.start_level)
    }

    pub fn state(&self) -> ScoreState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn lines(&self) -> u32 {
        self.state.lines
    }

    pub fn combo(&self) -> u32 {
        self.state.combo
    }

    /// Current automatic fall interval
    pub fn fall_interval_ms(&self) -> u32 {
        fall_interval_ms(self.state.level)
    }

    /// Consume one lock's clear event. An empty event breaks the combo and scores nothing.
    pub fn apply(&mut self, event: &ClearEvent) -> ScoreDelta {
        let level_before = self.state.level;
        if event.is_empty() {
            self.state.combo = 0;
            return ScoreDelta {
                level_before,
                level_after: level_before,
                ..ScoreDelta::default()
            };
        }

        let lines = event.count();
        self.state.combo = self.state.combo.saturating_add(1);

        let line_points = calculate_line_score(lines, level_before);
        let combo_bonus = self
            .combo_bonus
            .saturating_mul(self.state.combo.saturating_sub(1));
        let total = line_points.saturating_add(combo_bonus);

        self.state.score = self.state.score.saturating_add(total);
        self.state.lines = self.state.lines.saturating_add(lines as u32);
        self.state.level = calculate_level(self.state.lines, self.lines_per_level, self.start_level);

        ScoreDelta {
            lines: lines as u32,
            line_points,
            combo_bonus,
            drop_points: 0,
            total,
            level_before,
            level_after: self.state.level,
        }
    }

    /// Award per-row drop points. Drops never touch lines, level or combo.
    pub fn add_drop(&mut self, rows: u32, hard: bool) -> ScoreDelta {
        let per_row = if hard {
            self.hard_drop_points
        } else {
            self.soft_drop_points
        };
        let points = per_row.saturating_mul(rows);
        self.state.score = self.state.score.saturating_add(points);
        ScoreDelta {
            drop_points: points,
            total: points,
            level_before: self.state.level,
            level_after: self.state.level,
            ..ScoreDelta::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(rows: &[usize]) -> ClearEvent {
        ClearEvent {
            rows: rows.to_vec(),
        }
    }

    #[test]
    fn test_classic_line_scores() {
        assert_eq!(calculate_line_score(1, 0), 40);
        assert_eq!(calculate_line_score(2, 0), 100);
        assert_eq!(calculate_line_score(3, 0), 300);
        assert_eq!(calculate_line_score(4, 0), 1200);

        assert_eq!(calculate_line_score(1, 5), 40 * 6);
        assert_eq!(calculate_line_score(4, 5), 1200 * 6);
    }

    #[test]
    fn test_points_past_table_keep_growing() {
        assert_eq!(line_clear_points(5), 2400);
        assert!(line_clear_points(6) > line_clear_points(5));
    }

    #[test]
    fn test_level_calculation() {
        assert_eq!(calculate_level(0, 10, 0), 0);
        assert_eq!(calculate_level(9, 10, 0), 0);
        assert_eq!(calculate_level(10, 10, 0), 1);
        assert_eq!(calculate_level(29, 10, 0), 2);
        assert_eq!(calculate_level(5, 10, 3), 3);
        assert_eq!(calculate_level(u32::MAX, 1, MAX_LEVEL), MAX_LEVEL);
        assert_eq!(calculate_level(100, 10, MAX_LEVEL - 5), MAX_LEVEL);
    }

    #[test]
    fn test_scores_stay_exact_at_level_cap() {
        let single = calculate_line_score(1, MAX_LEVEL);
        let tetris = calculate_line_score(4, MAX_LEVEL);
        assert_eq!(single, 40 * (MAX_LEVEL + 1));
        assert_eq!(tetris, 1200 * (MAX_LEVEL + 1));
        assert!(tetris > 4 * single);

        // Anything above the cap scores as the cap rather than saturating
        assert_eq!(calculate_line_score(4, u32::MAX), tetris);
        assert!(calculate_line_score(4, u32::MAX) > calculate_line_score(3, u32::MAX));
    }

    #[test]
    fn test_level_cap_holds_while_clearing() {
        let config = RuleConfig {
            start_level: MAX_LEVEL,
            lines_per_level: 1,
            ..RuleConfig::default()
        };
        let mut scoring = Scoring::new(&config);
        let delta = scoring.apply(&event(&[16, 17, 18, 19]));
        assert_eq!(delta.line_points, 1200 * (MAX_LEVEL + 1));
        assert!(!delta.leveled_up());
        assert_eq!(scoring.level(), MAX_LEVEL);
        assert!(scoring.is_consistent(&scoring.state()));
    }

    #[test]
    fn test_fall_intervals() {
        assert_eq!(fall_interval_ms(0), 1000);
        assert_eq!(fall_interval_ms(8), 160);
        assert_eq!(fall_interval_ms(9), 120);
        assert_eq!(fall_interval_ms(40), 120);
    }

    #[test]
    fn test_apply_uses_level_before_clear() {
        let config = RuleConfig::default();
        let mut scoring = Scoring::with_state(
            &config,
            ScoreState {
                score: 0,
                level: 0,
                lines: 8,
                combo: 0,
            },
        );

        let delta = scoring.apply(&event(&[16, 17, 18, 19]));
        assert_eq!(delta.line_points, 1200);
        assert_eq!(delta.level_before, 0);
        assert_eq!(delta.level_after, 1);
        assert!(delta.leveled_up());
        assert_eq!(scoring.lines(), 12);
        assert_eq!(scoring.fall_interval_ms(), 800);
    }

    #[test]
    fn test_combo_bonus_and_reset() {
        let config = RuleConfig::default();
        let mut scoring = Scoring::new(&config);

        assert_eq!(scoring.apply(&event(&[19])).total, 40);
        let second = scoring.apply(&event(&[19]));
        assert_eq!(second.combo_bonus, 50);
        assert_eq!(second.total, 90);
        assert_eq!(scoring.combo(), 2);

        let miss = scoring.apply(&ClearEvent::default());
        assert_eq!(miss.total, 0);
        assert_eq!(scoring.combo(), 0);
        assert_eq!(scoring.score(), 130);
    }

    #[test]
    fn test_drop_points_follow_config() {
        let mut scoring = Scoring::new(&RuleConfig::default());
        assert_eq!(scoring.add_drop(10, true).total, 0);

        let config = RuleConfig {
            soft_drop_points: 1,
            hard_drop_points: 2,
            ..RuleConfig::default()
        };
        let mut scoring = Scoring::new(&config);
        assert_eq!(scoring.add_drop(10, false).drop_points, 10);
        let hard = scoring.add_drop(10, true);
        assert_eq!(hard.drop_points, 20);
        assert_eq!(hard.total, 20);
        assert_eq!(hard.lines, 0);
        assert!(!hard.leveled_up());
        assert_eq!(scoring.score(), 30);
        assert_eq!(scoring.combo(), 0);
    }
}
