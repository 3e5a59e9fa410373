//! Game state module - the session state machine
//!
//! [`GameSession`] owns every core component (grid, piece controller, bag,
//! scoring, input queue) and advances them one fixed step per [`GameSession::tick`].
//! Collaborators only queue intents, call `tick`, and read snapshots and
//! events; nothing else mutates the session.
//!
//! Lifecycle: `Ready --start--> Running <--pause/resume--> Paused`, and
//! `Running --blocked spawn--> GameOver`. `GameOver` is terminal; only
//! [`GameSession::reset`] leaves it.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::clear;
use crate::config::RuleConfig;
use crate::error::{ConfigError, SnapshotError};
use crate::event::GameEvent;
use crate::grid::Grid;
use crate::input::InputQueue;
use crate::piece::{ActivePiece, PieceController, PiecePhase};
use crate::rng::Bag;
use crate::scoring::{ScoreDelta, ScoreState, Scoring};
use crate::snapshot::{ActiveView, RenderSnapshot, SavedPiece, SessionSnapshot, SNAPSHOT_VERSION};
use crate::types::{Intent, MoveDirection, PieceKind, RotateDirection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameStatus {
    /// Created, waiting for `start`
    #[default]
    Ready,
    Running,
    Paused,
    /// Terminal until reset
    GameOver,
}

/// A complete single-player session
#[derive(Debug, Clone)]
pub struct GameSession {
    config: RuleConfig,
    seed: u32,
    status: GameStatus,
    grid: Grid,
    piece: PieceController,
    bag: Bag,
    scoring: Scoring,
    input: InputQueue,
    /// Time accumulated toward the next automatic downward step
    gravity_timer_ms: u32,
    /// Ticks processed while running or paused
    tick: u64,
    /// Events recorded by the latest tick
    events: Vec<GameEvent>,
}

impl GameSession {
    /// New `Ready` session on an empty grid
    pub fn new(config: RuleConfig, seed: u32) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = Grid::new(config.width, config.height);
        Ok(Self::assemble(config, seed, grid))
    }

    /// Default rules, empty 10x20 grid
    pub fn with_seed(seed: u32) -> Self {
        let config = RuleConfig::default();
        let grid = Grid::new(config.width, config.height);
        Self::assemble(config, seed, grid)
    }

    /// New `Ready` session on a pre-filled grid.
    ///
    /// The grid must match the configured size and hold no full rows, the same
    /// checks a restored snapshot goes through.
    pub fn with_grid(config: RuleConfig, seed: u32, grid: Grid) -> Result<Self, SnapshotError> {
        config.validate()?;
        check_grid(&config, &grid)?;
        Ok(Self::assemble(config, seed, grid))
    }

    fn assemble(config: RuleConfig, seed: u32, grid: Grid) -> Self {
        Self {
            piece: PieceController::new(config.kick_policy, config.lock_reset_limit),
            bag: Bag::new(seed),
            scoring: Scoring::new(&config),
            input: InputQueue::new(),
            status: GameStatus::Ready,
            gravity_timer_ms: 0,
            tick: 0,
            events: Vec::new(),
            config,
            seed,
            grid,
        }
    }

    /// `Ready -> Running`. Returns false in any other state.
    pub fn start(&mut self) -> bool {
        if self.status != GameStatus::Ready {
            return false;
        }
        info!("session started (seed {})", self.seed);
        self.status = GameStatus::Running;
        true
    }

    /// Discard everything and return to `Ready` with a new seed. Rules are kept.
    pub fn reset(&mut self, seed: u32) {
        info!("session reset (seed {seed})");
        let grid = Grid::new(self.config.width, self.config.height);
        *self = Self::assemble(self.config.clone(), seed, grid);
    }

    /// Queue an intent for the next tick.
    ///
    /// Returns false when it was discarded: the session is not running or
    /// paused, or the queue is full.
    pub fn queue(&mut self, intent: Intent) -> bool {
        match self.status {
            GameStatus::Running | GameStatus::Paused => self.input.push(intent),
            GameStatus::Ready | GameStatus::GameOver => {
                debug!("ignoring {} while {:?}", intent.as_str(), self.status);
                false
            }
        }
    }

    /// Advance one fixed step and return the events it produced.
    ///
    /// Queued intents apply first, in arrival order. Then a running session
    /// either spawns the next piece or runs one gravity step. A hard drop
    /// locks at once; the following piece spawns on the next tick.
    pub fn tick(&mut self) -> &[GameEvent] {
        self.events.clear();

        match self.status {
            GameStatus::Ready => return &self.events,
            GameStatus::GameOver => {
                self.input.clear();
                return &self.events;
            }
            GameStatus::Running | GameStatus::Paused => {}
        }

        self.tick = self.tick.wrapping_add(1);
        let had_piece = self.piece.active().is_some();

        for intent in self.input.drain() {
            self.apply_intent(intent);
        }

        if self.status == GameStatus::Running {
            match (had_piece, self.piece.active().is_some()) {
                (false, _) => self.spawn_next(),
                (true, true) => self.gravity_step(),
                // Hard-dropped this tick
                (true, false) => {}
            }
        }

        &self.events
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn active(&self) -> Option<ActivePiece> {
        self.piece.active()
    }

    pub fn piece_phase(&self) -> PiecePhase {
        self.piece.phase()
    }

    pub fn score(&self) -> u32 {
        self.scoring.score()
    }

    pub fn level(&self) -> u32 {
        self.scoring.level()
    }

    pub fn lines(&self) -> u32 {
        self.scoring.lines()
    }

    pub fn combo(&self) -> u32 {
        self.scoring.combo()
    }

    pub fn score_state(&self) -> ScoreState {
        self.scoring.state()
    }

    pub fn fall_interval_ms(&self) -> u32 {
        self.scoring.fall_interval_ms()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn pending_intents(&self) -> usize {
        self.input.len()
    }

    /// Upcoming kinds, without drawing them
    pub fn next_pieces(&self, count: usize) -> Vec<PieceKind> {
        self.bag.peek(count)
    }

    /// Events recorded by the latest tick
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Fill `out` with the current view, reusing its buffers
    pub fn snapshot_into(&self, out: &mut RenderSnapshot) {
        out.width = self.grid.width();
        out.height = self.grid.height();
        out.cells.clear();
        out.cells.extend_from_slice(self.grid.cells());
        out.active = self.piece.active().map(|piece| ActiveView {
            kind: piece.kind,
            rotation: piece.rotation,
            cells: piece.cells(),
        });
        out.ghost = self.piece.ghost_cells(&self.grid);
        self.bag.peek_into(&mut out.next, self.config.preview_count);
        out.score = self.scoring.score();
        out.level = self.scoring.level();
        out.lines = self.scoring.lines();
        out.combo = self.scoring.combo();
        out.status = self.status;
        out.tick = self.tick;
    }

    pub fn render_snapshot(&self) -> RenderSnapshot {
        let mut snapshot = RenderSnapshot::default();
        self.snapshot_into(&mut snapshot);
        snapshot
    }

    /// Capture everything needed to resume this exact session
    pub fn save(&self) -> SessionSnapshot {
        SessionSnapshot {
            version: SNAPSHOT_VERSION,
            seed: self.seed,
            config: self.config.clone(),
            status: self.status,
            grid: self.grid.to_rows(),
            active: self.piece.active().map(|piece| SavedPiece {
                piece,
                lock_timer_ms: self.piece.lock_timer_ms(),
                lock_resets: self.piece.lock_resets(),
                lowest_row: self.piece.lowest_row(),
            }),
            gravity_timer_ms: self.gravity_timer_ms,
            bag: self.bag.state(),
            score: self.scoring.state(),
            tick: self.tick,
        }
    }

    /// Rebuild a session from a snapshot.
    ///
    /// Every part is validated before anything is built; a rejected snapshot
    /// never yields a partially restored session. Queued intents and events
    /// are not part of a snapshot and start empty.
    pub fn restore(snapshot: &SessionSnapshot) -> Result<Self, SnapshotError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::Version {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        let config = snapshot.config.clone();
        config.validate()?;

        let grid = Grid::from_rows(snapshot.grid.as_slice(), config.width)?;
        check_grid(&config, &grid)?;

        let bag = Bag::from_state(&snapshot.bag)?;

        let scoring = Scoring::with_state(&config, snapshot.score);
        if !scoring.is_consistent(&snapshot.score) {
            return Err(SnapshotError::ScoreMismatch {
                level: snapshot.score.level,
                lines: snapshot.score.lines,
            });
        }

        let mut piece = PieceController::new(config.kick_policy, config.lock_reset_limit);
        if let Some(saved) = snapshot.active {
            if snapshot.status == GameStatus::GameOver || !saved.piece.fits(&grid) {
                return Err(SnapshotError::ActiveBlocked);
            }
            piece.restore(
                saved.piece,
                saved.lock_timer_ms,
                saved.lock_resets,
                saved.lowest_row,
                &grid,
            );
        }

        debug!(
            "restored session at tick {} ({:?}, score {})",
            snapshot.tick,
            snapshot.status,
            snapshot.score.score
        );

        Ok(Self {
            seed: snapshot.seed,
            status: snapshot.status,
            gravity_timer_ms: snapshot.gravity_timer_ms,
            tick: snapshot.tick,
            input: InputQueue::new(),
            events: Vec::new(),
            config,
            grid,
            piece,
            bag,
            scoring,
        })
    }

    /// Parse and restore a JSON session snapshot
    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        let snapshot = SessionSnapshot::from_json(text)?;
        Self::restore(&snapshot)
    }

    /// Restore from `text`, or start a fresh `Ready` session if it is rejected
    pub fn resume_or_new(text: &str, config: RuleConfig, seed: u32) -> Self {
        match Self::from_json(text) {
            Ok(session) => session,
            Err(err) => {
                warn!("discarding saved session: {err}");
                Self::new(config, seed).unwrap_or_else(|err| {
                    warn!("invalid rules ({err}), falling back to defaults");
                    Self::with_seed(seed)
                })
            }
        }
    }

    fn apply_intent(&mut self, intent: Intent) {
        match (self.status, intent) {
            (GameStatus::Paused, Intent::Resume) => {
                info!("resumed");
                self.status = GameStatus::Running;
                self.events.push(GameEvent::Resumed);
            }
            (GameStatus::Running, Intent::Pause) => {
                info!("paused");
                self.status = GameStatus::Paused;
                self.events.push(GameEvent::Paused);
            }
            (GameStatus::Running, _) => self.apply_piece_intent(intent),
            _ => {}
        }
    }

    fn apply_piece_intent(&mut self, intent: Intent) {
        match intent {
            Intent::MoveLeft => {
                self.piece.try_move(MoveDirection::Left, &self.grid);
            }
            Intent::MoveRight => {
                self.piece.try_move(MoveDirection::Right, &self.grid);
            }
            Intent::RotateCw => {
                self.piece.try_rotate(RotateDirection::Clockwise, &self.grid);
            }
            Intent::RotateCcw => {
                self.piece.try_rotate(RotateDirection::CounterClockwise, &self.grid);
            }
            Intent::SoftDrop => {
                if self.piece.try_move(MoveDirection::Down, &self.grid) {
                    let delta = self.scoring.add_drop(1, false);
                    self.push_drop_score(delta);
                    self.gravity_timer_ms = 0;
                }
            }
            Intent::HardDrop => {
                if self.piece.active().is_some() {
                    let rows = self.piece.hard_drop(&self.grid);
                    let delta = self.scoring.add_drop(rows, true);
                    self.push_drop_score(delta);
                    self.lock_active();
                }
            }
            Intent::Pause | Intent::Resume => {}
        }
    }

    /// Drop awards only surface as events when the rule set pays for drops
    fn push_drop_score(&mut self, delta: ScoreDelta) {
        if delta.total > 0 {
            self.events.push(GameEvent::Scored(delta));
        }
    }

    fn spawn_next(&mut self) {
        let kind = self.bag.next();
        self.gravity_timer_ms = 0;

        if self.piece.spawn(kind, &self.grid) {
            debug!("spawned {}", kind.as_str());
            self.events.push(GameEvent::Spawned { kind });
            return;
        }

        info!(
            "game over: {} blocked at spawn (score {}, lines {})",
            kind.as_str(),
            self.scoring.score(),
            self.scoring.lines()
        );
        self.status = GameStatus::GameOver;
        self.input.clear();
        self.events.push(GameEvent::GameOver {
            score: self.scoring.score(),
        });
    }

    fn gravity_step(&mut self) {
        if self.piece.is_grounded(&self.grid) {
            if self
                .piece
                .advance_lock_timer(self.config.tick_ms, self.config.lock_delay_ms)
            {
                self.lock_active();
            }
            return;
        }

        self.gravity_timer_ms = self.gravity_timer_ms.saturating_add(self.config.tick_ms);
        if self.gravity_timer_ms >= self.scoring.fall_interval_ms() {
            self.gravity_timer_ms = 0;
            self.piece.try_move(MoveDirection::Down, &self.grid);
        }
    }

    /// Commit the active piece, resolve clears and score them
    fn lock_active(&mut self) {
        let Some((cells, kind)) = self.piece.take_locked() else {
            return;
        };
        self.gravity_timer_ms = 0;

        self.grid.commit(&cells, kind);
        debug!("locked {} at {:?}", kind.as_str(), cells);
        self.events.push(GameEvent::Locked { kind, cells });

        let cleared = clear::resolve(&mut self.grid);
        let delta = self.scoring.apply(&cleared);
        if cleared.is_empty() {
            return;
        }

        debug!(
            "cleared rows {:?} for {} points (combo {})",
            cleared.rows,
            delta.total,
            self.scoring.combo()
        );
        self.events.push(GameEvent::LinesCleared(cleared));
        self.events.push(GameEvent::Scored(delta));
        if delta.leveled_up() {
            info!("level up: {}", delta.level_after);
            self.events.push(GameEvent::LevelUp {
                level: delta.level_after,
            });
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::with_seed(1)
    }
}

/// A grid a session can start from: configured size, no unresolved full rows
fn check_grid(config: &RuleConfig, grid: &Grid) -> Result<(), SnapshotError> {
    if grid.width() != config.width || grid.height() != config.height {
        return Err(SnapshotError::GridShape {
            expected_width: config.width,
            expected_height: config.height,
        });
    }
    if let Some(&row) = grid.full_rows().first() {
        return Err(SnapshotError::UnresolvedRow(row));
    }
    Ok(())
}
