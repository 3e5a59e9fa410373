//! Error types for configuration and session snapshots.
//!
//! Illegal moves and blocked spawns are not errors: the former are reported as
//! `false`, the latter as a transition to game over.

use std::fmt;

use crate::types::MAX_LEVEL;

/// Invalid tuning values in a [`crate::config::RuleConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Width or height outside the supported range.
    GridSize { width: u8, height: u8 },
    /// A zero tick would never advance timers.
    ZeroTick,
    /// Levels need a positive line threshold.
    ZeroLinesPerLevel,
    /// More preview entries than two bag cycles.
    PreviewTooLong(usize),
    /// Start level above the level cap.
    StartLevel(u32),
    /// The config text could not be parsed.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::GridSize { width, height } => {
                write!(f, "grid size {width}x{height} is outside the supported range")
            }
            ConfigError::ZeroTick => f.write_str("tick_ms must be greater than zero"),
            ConfigError::ZeroLinesPerLevel => {
                f.write_str("lines_per_level must be greater than zero")
            }
            ConfigError::PreviewTooLong(n) => write!(f, "preview_count {n} is too long"),
            ConfigError::StartLevel(level) => {
                write!(f, "start_level {level} is above the maximum of {MAX_LEVEL}")
            }
            ConfigError::Parse(msg) => write!(f, "could not parse config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Reasons a saved session is rejected on load.
///
/// A rejected snapshot is never partially applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// The text is not a snapshot at all.
    Malformed(String),
    /// Written by an incompatible format version.
    Version { found: u32, expected: u32 },
    /// The embedded config does not validate.
    Config(ConfigError),
    /// Row count or row length disagrees with the config.
    GridShape { expected_width: u8, expected_height: u8 },
    /// A grid row contains a glyph that is neither `.` nor a kind letter.
    UnknownGlyph { row: usize, col: usize, glyph: char },
    /// A full row survived, so the grid was saved mid-resolution.
    UnresolvedRow(usize),
    /// The saved active piece overlaps the stack or leaves the grid.
    ActiveBlocked,
    /// The bag state cannot continue a fair sequence.
    CorruptBag(&'static str),
    /// Level and line totals disagree.
    ScoreMismatch { level: u32, lines: u32 },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Malformed(msg) => write!(f, "malformed snapshot: {msg}"),
            SnapshotError::Version { found, expected } => {
                write!(f, "snapshot version {found} is not supported (expected {expected})")
            }
            SnapshotError::Config(err) => write!(f, "snapshot config rejected: {err}"),
            SnapshotError::GridShape {
                expected_width,
                expected_height,
            } => write!(
                f,
                "snapshot grid does not match {expected_width}x{expected_height}"
            ),
            SnapshotError::UnknownGlyph { row, col, glyph } => {
                write!(f, "unknown cell glyph {glyph:?} at row {row}, col {col}")
            }
            SnapshotError::UnresolvedRow(row) => {
                write!(f, "row {row} is full but was never cleared")
            }
            SnapshotError::ActiveBlocked => f.write_str("active piece does not fit the grid"),
            SnapshotError::CorruptBag(why) => write!(f, "corrupt bag state: {why}"),
            SnapshotError::ScoreMismatch { level, lines } => {
                write!(f, "level {level} is inconsistent with {lines} cleared lines")
            }
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for SnapshotError {
    fn from(err: ConfigError) -> Self {
        SnapshotError::Config(err)
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(err: serde_json::Error) -> Self {
        SnapshotError::Malformed(err.to_string())
    }
}
