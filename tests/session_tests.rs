//! End-to-end session tests: spawn, drop, clear, score, game over

use block_shock::core::{
    ClearEvent, GameEvent, GameSession, GameStatus, Grid, PiecePhase, RuleConfig,
};
use block_shock::types::{Intent, PieceKind};

/// First seed whose bag opens with `kind`
fn seed_opening_with(kind: PieceKind) -> u32 {
    (1..)
        .find(|&seed| GameSession::with_seed(seed).next_pieces(1)[0] == kind)
        .unwrap()
}

/// Running session on `grid` whose first tick spawns `kind`
fn session_with(kind: PieceKind, config: RuleConfig, grid: Grid) -> GameSession {
    let mut session = GameSession::with_grid(config, seed_opening_with(kind), grid).unwrap();
    session.start();
    let events = session.tick();
    assert_eq!(events, &[GameEvent::Spawned { kind }]);
    session
}

fn queue_all(session: &mut GameSession, intents: &[Intent]) {
    for &intent in intents {
        assert!(session.queue(intent));
    }
}

/// Stand an I piece up and push it against the left wall, then drop it
const I_DOWN_LEFT_WALL: [Intent; 7] = [
    Intent::RotateCw,
    Intent::MoveLeft,
    Intent::MoveLeft,
    Intent::MoveLeft,
    Intent::MoveLeft,
    Intent::MoveLeft,
    Intent::HardDrop,
];

/// Rows filled except column 0
fn well_grid(rows: std::ops::Range<i16>) -> Grid {
    let mut grid = Grid::new(10, 20);
    for row in rows {
        for col in 1..10 {
            grid.set(row, col, Some(PieceKind::O));
        }
    }
    grid
}

#[test]
fn test_hard_drop_of_flat_i_fills_bottom_row() {
    let mut session = session_with(PieceKind::I, RuleConfig::default(), Grid::new(10, 20));

    session.queue(Intent::HardDrop);
    let events = session.tick().to_vec();
    assert_eq!(
        events,
        vec![GameEvent::Locked {
            kind: PieceKind::I,
            cells: [(19, 3), (19, 4), (19, 5), (19, 6)],
        }]
    );

    let grid = session.grid();
    assert_eq!(grid.occupied_count(), 4);
    for col in 3..7 {
        assert_eq!(grid.get(19, col), Some(Some(PieceKind::I)));
    }
    assert_eq!(session.score(), 0);
    assert!(session.active().is_none());
}

#[test]
fn test_completing_one_row_clears_and_scores() {
    let mut session = session_with(PieceKind::I, RuleConfig::default(), well_grid(19..20));

    queue_all(&mut session, &I_DOWN_LEFT_WALL);
    let events = session.tick().to_vec();

    assert!(matches!(events[0], GameEvent::Locked { kind: PieceKind::I, .. }));
    assert_eq!(events[1], GameEvent::LinesCleared(ClearEvent { rows: vec![19] }));
    let GameEvent::Scored(delta) = events[2] else {
        panic!("expected a score event, got {:?}", events[2]);
    };
    assert_eq!(delta.total, 40);
    assert_eq!(events.len(), 3);

    assert_eq!(session.score(), 40);
    assert_eq!(session.lines(), 1);
    assert_eq!(session.level(), 0);

    // The three I cells above the cleared row fell into the bottom rows
    let grid = session.grid();
    assert_eq!(grid.occupied_count(), 3);
    for row in 17..20 {
        assert_eq!(grid.get(row, 0), Some(Some(PieceKind::I)));
    }
    assert!(grid.full_rows().is_empty());
}

#[test]
fn test_four_row_clear_beats_four_singles() {
    let mut session = session_with(PieceKind::I, RuleConfig::default(), well_grid(16..20));

    queue_all(&mut session, &I_DOWN_LEFT_WALL);
    session.tick();

    assert_eq!(session.lines(), 4);
    assert_eq!(session.score(), 1200);
    assert!(session.score() > 4 * 40);
    assert_eq!(session.grid().occupied_count(), 0);
}

#[test]
fn test_level_up_speeds_up_gravity() {
    let config = RuleConfig {
        lines_per_level: 1,
        ..RuleConfig::default()
    };
    let mut session = session_with(PieceKind::I, config, well_grid(19..20));
    assert_eq!(session.fall_interval_ms(), 1000);

    queue_all(&mut session, &I_DOWN_LEFT_WALL);
    let events = session.tick().to_vec();

    assert_eq!(events.last(), Some(&GameEvent::LevelUp { level: 1 }));
    assert_eq!(session.level(), 1);
    // Points use the level in effect before the clear
    assert_eq!(session.score(), 40);
    assert_eq!(session.fall_interval_ms(), 800);
}

#[test]
fn test_drop_points_are_reported_as_score_events() {
    let config = RuleConfig {
        soft_drop_points: 1,
        hard_drop_points: 2,
        ..RuleConfig::default()
    };
    let mut session = session_with(PieceKind::I, config, Grid::new(10, 20));

    session.queue(Intent::SoftDrop);
    let events = session.tick().to_vec();
    let GameEvent::Scored(soft) = events[0] else {
        panic!("expected a score event, got {events:?}");
    };
    assert_eq!(soft.drop_points, 1);
    assert_eq!(soft.lines, 0);
    assert_eq!(session.score(), 1);

    // The flat I now sits on row 2, 17 rows above the floor
    session.queue(Intent::HardDrop);
    let events = session.tick().to_vec();
    let GameEvent::Scored(hard) = events[0] else {
        panic!("expected a score event, got {events:?}");
    };
    assert_eq!(hard.drop_points, 34);
    assert_eq!(hard.total, 34);
    assert!(matches!(events[1], GameEvent::Locked { kind: PieceKind::I, .. }));
    assert_eq!(events.len(), 2);
    assert_eq!(session.score(), 35);
}

#[test]
fn test_drops_are_silent_when_they_pay_nothing() {
    let mut session = session_with(PieceKind::I, RuleConfig::default(), Grid::new(10, 20));

    session.queue(Intent::SoftDrop);
    assert!(session.tick().is_empty());
    session.queue(Intent::HardDrop);
    let events = session.tick().to_vec();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], GameEvent::Locked { .. }));
}

#[test]
fn test_kick_and_fall_back_cannot_stall_the_lock() {
    let config = RuleConfig {
        lock_reset_limit: 0,
        ..RuleConfig::default()
    };
    let mut session = session_with(PieceKind::T, config, Grid::new(10, 20));

    while session.piece_phase() != PiecePhase::Locking {
        session.queue(Intent::SoftDrop);
        session.tick();
    }

    // On the floor, North -> East kicks the T up a row and East -> North leaves
    // it airborne. Gravity then drops it back onto a row it already reached.
    let mut clockwise = true;
    let mut ticks = 0;
    loop {
        if session.piece_phase() == PiecePhase::Locking {
            session.queue(if clockwise { Intent::RotateCw } else { Intent::RotateCcw });
            clockwise = !clockwise;
        }
        let events = session.tick();
        if events.iter().any(|e| matches!(e, GameEvent::Locked { .. })) {
            break;
        }
        ticks += 1;
        assert!(ticks < 3000, "piece still active after {ticks} ticks");
    }
    assert_eq!(session.grid().occupied_count(), 4);
}

#[test]
fn test_blocked_spawn_ends_the_game_without_touching_the_grid() {
    let mut grid = Grid::new(10, 20);
    for row in 0..2 {
        for col in 2..9 {
            grid.set(row, col, Some(PieceKind::J));
        }
    }
    let mut session = GameSession::with_grid(RuleConfig::default(), 99, grid.clone()).unwrap();
    session.start();

    let events = session.tick().to_vec();
    assert_eq!(events, vec![GameEvent::GameOver { score: 0 }]);
    assert_eq!(session.status(), GameStatus::GameOver);
    assert_eq!(session.grid(), &grid);
    assert!(session.active().is_none());

    // Terminal: nothing further happens until reset
    assert!(!session.queue(Intent::MoveLeft));
    for _ in 0..10 {
        assert!(session.tick().is_empty());
    }
    assert_eq!(session.grid(), &grid);

    session.reset(99);
    assert_eq!(session.status(), GameStatus::Ready);
    assert_eq!(session.grid().occupied_count(), 0);
}

#[test]
fn test_stacking_until_game_over() {
    let mut session = GameSession::with_seed(2024);
    session.start();

    // Hard drop every piece where it spawns; the center column fills quickly
    let mut ticks = 0;
    while !session.is_game_over() {
        session.queue(Intent::HardDrop);
        session.tick();
        ticks += 1;
        assert!(ticks < 200, "game never ended");
    }

    let grid = session.grid();
    assert!(grid.full_rows().is_empty());
    assert!(grid.occupied_count() > 0);
    assert!(grid.occupied_count() % 4 == 0);
}

#[test]
fn test_same_seed_and_intents_replay_identically() {
    let script = [
        Intent::MoveLeft,
        Intent::RotateCw,
        Intent::SoftDrop,
        Intent::MoveRight,
        Intent::RotateCcw,
        Intent::HardDrop,
    ];

    let play = || {
        let mut session = GameSession::with_seed(31337);
        session.start();
        for step in 0..900 {
            if step % 5 == 0 {
                session.queue(script[(step / 5) % script.len()]);
            }
            session.tick();
        }
        session
    };

    let a = play();
    let b = play();
    assert_eq!(a.save(), b.save());
    assert_eq!(a.render_snapshot(), b.render_snapshot());
}

#[test]
fn test_preview_matches_spawn_order() {
    let mut session = GameSession::with_seed(8);
    session.start();
    let preview = session.next_pieces(7);

    let mut spawned = Vec::new();
    for _ in 0..7 {
        session.tick();
        spawned.push(session.active().unwrap().kind);
        session.queue(Intent::MoveLeft);
        session.queue(Intent::MoveLeft);
        session.queue(Intent::MoveLeft);
        session.queue(Intent::HardDrop);
        session.tick();
    }

    assert_eq!(spawned, preview);
    // One full bag: every kind exactly once
    let mut sorted = spawned.clone();
    sorted.sort();
    assert_eq!(sorted, PieceKind::ALL.to_vec());
}
