//! Robot-versus-robot games from the command line.
//!
//! ```text
//! RUST_LOG=info selfplay --init "volcano-r 2 7" --games 4 --strategy mcts
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;

use board_engine::core::GameInit;
use board_engine::games::bug::{BugBoard, BugEvaluator};
use board_engine::games::volcano::{VolcanoBoard, VolcanoEvaluator};
use board_engine::record::GameRecord;
use board_engine::robot::{AutoPlayer, Robot, RobotConfig, Strategy};
use board_engine::rules::{GameBoard, GameResult};
use board_engine::search::Evaluator;
use board_engine::EngineResult;

/// Play robot-versus-robot games and report the results.
#[derive(Parser)]
#[command(name = "selfplay", about = "Robot self-play for Bug and Volcano")]
struct Cli {
    /// Init line: "variation [players [seed [revision]]]"
    #[arg(long, default_value = "bug-4")]
    init: String,

    /// Number of games; game i uses seed + i
    #[arg(long, default_value_t = 1)]
    games: u64,

    /// Path to a robot TOML configuration file
    #[arg(long, default_value = "robot.toml")]
    config: PathBuf,

    /// Override the configured strategy
    #[arg(long, value_enum)]
    strategy: Option<Strategy>,

    /// Override the alpha-beta depth
    #[arg(long)]
    depth: Option<u32>,

    /// Override the MCTS playout count
    #[arg(long)]
    playouts: Option<u32>,

    /// Stop a game after this many plies
    #[arg(long, default_value_t = 400)]
    max_plies: usize,

    /// Directory to write one bincode record per game into
    #[arg(long)]
    records: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = RobotConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(strategy) = cli.strategy {
        config.strategy = strategy;
    }
    if let Some(depth) = cli.depth {
        config.search.max_depth = depth;
    }
    if let Some(playouts) = cli.playouts {
        config.mcts.playouts = playouts;
    }
    config.validate().context("validating robot config")?;

    let base: GameInit = cli.init.parse().context("parsing init line")?;
    if let Some(dir) = &cli.records {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }

    for i in 0..cli.games {
        let init = nth_game(&base, i);
        let (result, record) = if init.variation.starts_with("bug") {
            play(&init, &config, cli.max_plies, BugBoard::new, BugEvaluator::default())?
        } else if init.variation.starts_with("volcano") {
            play(&init, &config, cli.max_plies, VolcanoBoard::new, VolcanoEvaluator::default())?
        } else {
            bail!("no game plays variation '{}'", init.variation);
        };

        let outcome = match &result {
            Some(GameResult::Winner(p)) => format!("{p} wins"),
            Some(GameResult::Winners(ps)) => format!("{} winners", ps.len()),
            Some(GameResult::Draw) => "draw".to_string(),
            None => "unfinished".to_string(),
        };
        println!("{} | {} plies | {}", record.init, record.moves.len(), outcome);

        if let Some(dir) = &cli.records {
            let path = dir.join(format!("game-{i:04}.rec"));
            record
                .save(&path)
                .with_context(|| format!("writing {}", path.display()))?;
        }
    }
    Ok(())
}

/// Init line of game `game`; seeds wrap past `u64::MAX`.
fn nth_game(base: &GameInit, game: u64) -> GameInit {
    GameInit {
        seed: base.seed.wrapping_add(game),
        ..base.clone()
    }
}

/// Play one game to the end and return its result with a checked record.
fn play<B, E, F>(
    init: &GameInit,
    config: &RobotConfig,
    max_plies: usize,
    make: F,
    evaluator: E,
) -> EngineResult<(Option<GameResult>, GameRecord)>
where
    B: GameBoard,
    E: Evaluator<B> + Clone + 'static,
    F: Fn(&GameInit) -> EngineResult<B>,
{
    let mut board = make(init)?;
    let mut auto = AutoPlayer::new(Robot::new(config.clone(), evaluator));
    let plies = auto.play_out(&mut board, max_plies)?;
    info!(
        "selfplay: {} finished after {} plies, {} positions, worst repeat {}",
        board.init_string(),
        plies.len(),
        auto.positions().len(),
        auto.positions().most_seen()
    );

    let record = GameRecord::build(init, plies, &make)?;
    record.replay(&make)?;
    Ok((board.result(), record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_strategy_flag() {
        let cli = Cli::try_parse_from(["selfplay", "--strategy", "mcts"]).unwrap();
        assert_eq!(cli.strategy, Some(Strategy::Mcts));
        let cli = Cli::try_parse_from(["selfplay", "--strategy", "alphabeta"]).unwrap();
        assert_eq!(cli.strategy, Some(Strategy::AlphaBeta));
        assert!(Cli::try_parse_from(["selfplay", "--strategy", "greedy"]).is_err());
        assert_eq!(Cli::try_parse_from(["selfplay"]).unwrap().strategy, None);
    }

    #[test]
    fn test_seeds_wrap_at_the_top() {
        let base: GameInit = format!("bug-4 2 {}", u64::MAX).parse().unwrap();
        assert_eq!(nth_game(&base, 0).seed, u64::MAX);
        assert_eq!(nth_game(&base, 1).seed, 0);
        assert_eq!(nth_game(&base, 3).variation, "bug-4");
    }
}
