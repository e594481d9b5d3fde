use boardkit::games::connect4::{Connect4Move, Connect4State};
use boardkit::games::gomoku::{GomokuMove, GomokuState};
use boardkit::{Difficulty, GameState, Minimax, MonteCarlo};
use criterion::{criterion_group, criterion_main, Criterion};

fn connect4_midgame() -> Connect4State {
    let mut game = Connect4State::new();
    for col in [3, 3, 2, 4, 2, 4, 1, 5] {
        game.apply(&Connect4Move(col)).expect("scripted move");
    }
    game
}

fn gomoku_midgame() -> GomokuState {
    let mut game = GomokuState::new();
    let moves = [
        (7, 7),
        (8, 7),
        (7, 8),
        (8, 8),
        (6, 6),
        (9, 9),
        (5, 5),
        (10, 10),
        (6, 8),
        (8, 6),
    ];
    for (row, col) in moves {
        game.apply(&GomokuMove(row, col)).expect("scripted move");
    }
    game
}

fn bench_connect4_minimax(c: &mut Criterion) {
    let game = connect4_midgame();
    for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
        let engine = Minimax::for_difficulty(difficulty);
        c.bench_function(&format!("connect4_minimax_{difficulty:?}"), |b| {
            b.iter(|| engine.best_move(&game))
        });
    }
}

fn bench_connect4_monte_carlo(c: &mut Criterion) {
    let game = connect4_midgame();
    for simulations in [200, 1000] {
        let engine = MonteCarlo::new(simulations, 42).with_center_bias(true);
        c.bench_function(&format!("connect4_monte_carlo_{simulations}"), |b| {
            b.iter(|| engine.best_move(&game))
        });
    }
}

fn bench_gomoku_minimax(c: &mut Criterion) {
    let game = gomoku_midgame();
    let engine = Minimax::for_difficulty(Difficulty::Medium);
    c.bench_function("gomoku_minimax_Medium_midgame", |b| {
        b.iter(|| engine.best_move(&game))
    });
}

criterion_group!(
    benches,
    bench_connect4_minimax,
    bench_connect4_monte_carlo,
    bench_gomoku_minimax
);
criterion_main!(benches);
