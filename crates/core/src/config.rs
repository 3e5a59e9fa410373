//! Session rules and tuning
//!
//! Every policy that varies between rule sets lives here, with defaults taken
//! from the constants in the types crate. Missing fields in a JSON config fall
//! back to those defaults.

use serde::{Deserialize, Serialize};

use crate::catalog::KickPolicy;
use crate::error::ConfigError;
use crate::types::{
    BOARD_HEIGHT, BOARD_WIDTH, COMBO_BASE, LINES_PER_LEVEL, LOCK_DELAY_MS, LOCK_RESET_LIMIT,
    MAX_BOARD_EDGE, MAX_LEVEL, MAX_PREVIEW_COUNT, MIN_BOARD_EDGE, PREVIEW_COUNT, TICK_MS,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Grid columns
    pub width: u8,
    /// Grid rows
    pub height: u8,
    /// Simulated milliseconds per fixed step
    pub tick_ms: u32,
    pub kick_policy: KickPolicy,
    /// Grounded time before a piece locks; 0 locks on the first grounded tick
    pub lock_delay_ms: u32,
    /// Max lock timer resets earned by moving or rotating while grounded
    pub lock_reset_limit: u8,
    pub lines_per_level: u32,
    pub start_level: u32,
    /// Points per consecutive clearing lock after the first
    pub combo_bonus: u32,
    /// Points per row moved by a soft drop
    pub soft_drop_points: u32,
    /// Points per row moved by a hard drop
    pub hard_drop_points: u32,
    /// Upcoming kinds exposed to the renderer
    pub preview_count: usize,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            tick_ms: TICK_MS,
            kick_policy: KickPolicy::Srs,
            lock_delay_ms: LOCK_DELAY_MS,
            lock_reset_limit: LOCK_RESET_LIMIT,
            lines_per_level: LINES_PER_LEVEL,
            start_level: 0,
            combo_bonus: COMBO_BASE,
            soft_drop_points: 0,
            hard_drop_points: 0,
            preview_count: PREVIEW_COUNT,
        }
    }
}

impl RuleConfig {
    /// Check every value a session relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let edge = MIN_BOARD_EDGE..=MAX_BOARD_EDGE;
        if !edge.contains(&self.width) || !edge.contains(&self.height) {
            return Err(ConfigError::GridSize {
                width: self.width,
                height: self.height,
            });
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTick);
        }
        if self.lines_per_level == 0 {
            return Err(ConfigError::ZeroLinesPerLevel);
        }
        if self.preview_count > MAX_PREVIEW_COUNT {
            return Err(ConfigError::PreviewTooLong(self.preview_count));
        }
        if self.start_level > MAX_LEVEL {
            return Err(ConfigError::StartLevel(self.start_level));
        }
        Ok(())
    }

    /// Parse a JSON config and validate it
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
