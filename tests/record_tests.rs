//! Game record integration tests: build, persist and replay full games.

use std::path::PathBuf;

use board_engine::core::{EngineError, GameInit};
use board_engine::games::bug::{BugBoard, BugEvaluator};
use board_engine::games::volcano::VolcanoBoard;
use board_engine::record::{GameRecord, RepetitionTable};
use board_engine::robot::{AutoPlayer, Robot, RobotConfig};
use board_engine::rules::GameBoard;
use board_engine::search::SearchConfig;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("board-engine-{}-{name}", std::process::id()))
}

fn robot_game(init: &GameInit) -> (BugBoard, Vec<String>) {
    let mut live = BugBoard::new(init).unwrap();
    let config = RobotConfig {
        search: SearchConfig::default().with_depth(2),
        ..RobotConfig::default()
    };
    let mut auto = AutoPlayer::new(Robot::new(config, BugEvaluator::default()));
    let plies = auto.play_out(&mut live, 60).unwrap();
    (live, plies)
}

// =============================================================================
// Build and Replay
// =============================================================================

#[test]
fn test_robot_game_record_replays() {
    let init = GameInit::latest("bug-4", 2, 21);
    let (live, plies) = robot_game(&init);
    let record = GameRecord::build(&init, plies, BugBoard::new).unwrap();

    assert_eq!(record.init.revision, Some(live.revision()));
    assert_eq!(record.final_digest, live.digest());
    let replayed: BugBoard = record.replay(BugBoard::new).unwrap();
    replayed.same_board(&live).unwrap();
}

#[test]
fn test_tampered_record_is_rejected() {
    let init = GameInit::latest("volcano", 2, 0);
    let moves = vec!["move C 3 C 2".to_string()];
    let mut record = GameRecord::build(&init, moves, VolcanoBoard::new).unwrap();
    record.final_digest ^= 1;
    let err = record.replay(VolcanoBoard::new).unwrap_err();
    assert!(matches!(err, EngineError::DigestMismatch { .. }));
}

#[test]
fn test_record_survives_disk_round_trip() {
    let init = GameInit::latest("bug-3", 2, 4);
    let (_, plies) = robot_game(&init);
    let record = GameRecord::build(&init, plies, BugBoard::new).unwrap();

    let path = temp_path("bug.rec");
    record.save(&path).unwrap();
    let loaded = GameRecord::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, record);
    loaded.replay(BugBoard::new).unwrap();
}

#[test]
fn test_load_missing_record_is_io_error() {
    let err = GameRecord::load(&temp_path("missing.rec")).unwrap_err();
    assert!(matches!(err, EngineError::Io(_)));
}

// =============================================================================
// Repetition
// =============================================================================

#[test]
fn test_repetition_counts_revisited_positions() {
    let mut board = VolcanoBoard::new(&GameInit::latest("volcano", 2, 0)).unwrap();
    let mut table = RepetitionTable::new();
    assert_eq!(table.observe(&board), Some(1));

    let mut m = board.parse_move("move C 3 C 2").unwrap();
    board
        .execute(&mut m, board_engine::core::ReplayMode::Live)
        .unwrap();
    let first = table.observe(&board);
    assert_eq!(first, Some(1));
    board.unexecute(&m).unwrap();
    board
        .execute(&mut m, board_engine::core::ReplayMode::Live)
        .unwrap();
    assert_eq!(table.observe(&board), Some(2));
    assert_eq!(table.len(), 2);
}

#[test]
fn test_repetition_skips_puzzle_positions() {
    let mut board = VolcanoBoard::new(&GameInit::latest("volcano", 2, 0)).unwrap();
    let mut edit = board.parse_move("edit").unwrap();
    board
        .execute(&mut edit, board_engine::core::ReplayMode::Live)
        .unwrap();
    let mut table = RepetitionTable::new();
    assert_eq!(table.observe(&board), None);
    assert!(table.is_empty());
}
