//! Robot integration tests: background worker, autoplay and config files.

use std::time::Duration;

use board_engine::core::{GameInit, ReplayMode};
use board_engine::games::bug::{BugBoard, BugEvaluator};
use board_engine::games::volcano::{VolcanoBoard, VolcanoEvaluator};
use board_engine::mcts::MCTSConfig;
use board_engine::moves::MoveSpec;
use board_engine::robot::{AutoPlayer, Robot, RobotConfig, RobotWorker, Strategy};
use board_engine::rules::GameBoard;
use board_engine::search::{Difficulty, SearchConfig};

fn shallow() -> RobotConfig {
    RobotConfig {
        search: SearchConfig::default().with_depth(2),
        ..RobotConfig::default()
    }
}

// =============================================================================
// Worker Thread
// =============================================================================

#[test]
fn test_worker_returns_move_for_live_board() {
    let mut live = BugBoard::new(&GameInit::latest("bug-4", 2, 5)).unwrap();
    let before = live.digest();
    let robot = Robot::new(shallow(), BugEvaluator::default());
    let worker = RobotWorker::spawn(robot, &live).unwrap();

    let mut m = worker.wait().unwrap().expect("a move");
    // the live board was only cloned
    assert_eq!(live.digest(), before);
    live.execute(&mut m, ReplayMode::Live).unwrap();
    live.finalize_ply(ReplayMode::Live).unwrap();
    assert_eq!(live.move_number(), 1);
}

#[test]
fn test_worker_polling_eventually_yields() {
    let live = VolcanoBoard::new(&GameInit::latest("volcano", 2, 0)).unwrap();
    let robot = Robot::new(
        RobotConfig::mcts(MCTSConfig::default().with_playouts(50)),
        VolcanoEvaluator::default(),
    );
    let mut worker = RobotWorker::spawn(robot, &live).unwrap();
    let result = loop {
        if let Some(result) = worker.try_result() {
            break result;
        }
        std::thread::sleep(Duration::from_millis(5));
    };
    let m = result.unwrap().expect("a move");
    assert_eq!(m.player(), live.whose_turn());
}

// =============================================================================
// Autoplay
// =============================================================================

#[test]
fn test_autoplay_volcano_stays_consistent() {
    let mut live = VolcanoBoard::new(&GameInit::latest("volcano-r", 2, 11)).unwrap();
    let robot = Robot::new(
        RobotConfig::for_difficulty(Difficulty::Dumbot),
        VolcanoEvaluator::default(),
    );
    let mut auto = AutoPlayer::new(robot);
    let plies = auto.play_out(&mut live, 12).unwrap();
    assert!(!plies.is_empty());

    let mut copy = VolcanoBoard::new(live.game_init()).unwrap();
    for text in &plies {
        let mut m = copy.parse_move(text).unwrap();
        copy.apply_ply(&mut m).unwrap();
    }
    assert_eq!(copy.digest(), live.digest());
}

#[test]
fn test_autoplay_stops_at_game_end() {
    let mut live = BugBoard::new(&GameInit::latest("bug-3", 2, 0)).unwrap();
    let mut auto = AutoPlayer::new(Robot::new(shallow(), BugEvaluator::default()));
    let plies = auto.play_out(&mut live, 500).unwrap();
    assert!(plies.len() < 500);
    assert!(live.is_over() || !auto.is_enabled());
    assert!(auto.step(&mut live).unwrap().is_none());
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_robot_config_from_toml() {
    let config = RobotConfig::from_toml(
        r#"
        strategy = "mcts"
        rollout_scale = 4.0

        [mcts]
        playouts = 250
        seed = 9
        "#,
    )
    .unwrap();
    assert_eq!(config.strategy, Strategy::Mcts);
    assert_eq!(config.mcts.playouts, 250);
    assert_eq!(config.search, SearchConfig::default());
    config.validate().unwrap();
}

#[test]
fn test_missing_config_file_falls_back_to_default() {
    let path = std::env::temp_dir().join("board-engine-no-such-robot.toml");
    let config = RobotConfig::load_or_default(&path).unwrap();
    assert_eq!(config.strategy, Strategy::AlphaBeta);
}
