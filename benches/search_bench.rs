//! Search Benchmarks
//!
//! Move generation, digesting, make/unmake and full searches on both games.

use board_engine::core::GameInit;
use board_engine::games::bug::{BugBoard, BugEvaluator};
use board_engine::games::volcano::{VolcanoBoard, VolcanoEvaluator};
use board_engine::mcts::{GuidedSimulation, MCTSConfig, MCTSSearch};
use board_engine::rules::GameBoard;
use board_engine::search::{AlphaBeta, SearchConfig};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bug_midgame() -> BugBoard {
    let mut board = BugBoard::new(&GameInit::latest("bug-4", 2, 0)).unwrap();
    for text in ["dropb D 4", "dropb B 3", "dropb F 5", "dropb C 6", "dropb E 2"] {
        let mut m = board.parse_move(text).unwrap();
        board.apply_ply(&mut m).unwrap();
    }
    board
}

fn volcano_start() -> VolcanoBoard {
    VolcanoBoard::new(&GameInit::latest("volcano", 2, 0)).unwrap()
}

fn bench_bug_legal_moves(c: &mut Criterion) {
    let mut board = bug_midgame();
    c.bench_function("bug_legal_moves", |b| {
        b.iter(|| black_box(board.legal_moves().len()))
    });
}

fn bench_bug_digest(c: &mut Criterion) {
    let board = bug_midgame();
    c.bench_function("bug_digest", |b| b.iter(|| black_box(board.digest())));
}

fn bench_bug_make_unmake(c: &mut Criterion) {
    let mut board = bug_midgame();
    let moves = board.legal_moves();
    c.bench_function("bug_make_unmake", |b| {
        b.iter(|| {
            for m in &moves {
                let mut m = m.clone();
                board.apply_ply(&mut m).unwrap();
                board.unexecute(&m).unwrap();
            }
        })
    });
}

fn bench_bug_alphabeta(c: &mut Criterion) {
    let evaluator = BugEvaluator::default();
    c.bench_function("bug_alphabeta_depth_3", |b| {
        b.iter(|| {
            let mut board = bug_midgame();
            let config = SearchConfig::default().with_depth(3);
            let result = AlphaBeta::new(config, &evaluator).search(&mut board).unwrap();
            black_box(result.nodes)
        })
    });
}

fn bench_volcano_alphabeta(c: &mut Criterion) {
    let evaluator = VolcanoEvaluator::default();
    c.bench_function("volcano_alphabeta_depth_3", |b| {
        b.iter(|| {
            let mut board = volcano_start();
            let config = SearchConfig::default().with_depth(3);
            let result = AlphaBeta::new(config, &evaluator).search(&mut board).unwrap();
            black_box(result.nodes)
        })
    });
}

fn bench_volcano_mcts(c: &mut Criterion) {
    let board = volcano_start();
    c.bench_function("volcano_mcts_200", |b| {
        b.iter(|| {
            let config = MCTSConfig::default().with_playouts(200).with_rollout_depth(20);
            let mut search = MCTSSearch::new(config)
                .with_simulation(GuidedSimulation::new(VolcanoEvaluator::default(), 10.0));
            black_box(search.search(&board).unwrap())
        })
    });
}

criterion_group!(
    benches,
    bench_bug_legal_moves,
    bench_bug_digest,
    bench_bug_make_unmake,
    bench_bug_alphabeta,
    bench_volcano_alphabeta,
    bench_volcano_mcts,
);
criterion_main!(benches);
