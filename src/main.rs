//! Interactive command-line front end: a human plays Player One against
//! the engine. Moves are typed in each game's notation; `hint`, `analyze`
//! and `undo` expose the analysis and history layers.

use boardkit::games::trio::TrioDifficulty;
use boardkit::{Difficulty, GameWrapper, MoveReport, Player};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
enum GameChoice {
    Connect4,
    Gomoku,
    Lgame,
    Trio,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
enum DifficultyChoice {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyChoice> for Difficulty {
    fn from(choice: DifficultyChoice) -> Self {
        match choice {
            DifficultyChoice::Easy => Difficulty::Easy,
            DifficultyChoice::Medium => Difficulty::Medium,
            DifficultyChoice::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "play", about = "Play board games against the engine", version)]
struct Args {
    /// Which game to play.
    #[arg(short, long, value_enum, default_value_t = GameChoice::Connect4)]
    game: GameChoice,

    /// Engine strength.
    #[arg(short, long, value_enum, default_value_t = DifficultyChoice::Medium)]
    difficulty: DifficultyChoice,

    /// Seed for puzzle generation and Monte Carlo playouts.
    #[arg(short, long, default_value_t = 0)]
    seed: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();
    let difficulty: Difficulty = args.difficulty.into();

    let mut game = match args.game {
        GameChoice::Connect4 => GameWrapper::new_connect4(),
        GameChoice::Gomoku => GameWrapper::new_gomoku(),
        GameChoice::Lgame => GameWrapper::new_lgame(),
        GameChoice::Trio => {
            let trio_difficulty = if difficulty == Difficulty::Hard {
                TrioDifficulty::Hard
            } else {
                TrioDifficulty::Easy
            };
            GameWrapper::new_trio(trio_difficulty, args.seed)
        }
    };

    println!("{}", format!("=== {} ===", game.name()).bold());
    print_help(&game);
    render(&game);

    let stdin = io::stdin();
    loop {
        if game.is_game_over() {
            announce_result(&game);
            break;
        }
        if game.current_player() == Player::Two {
            match game.ai_move(difficulty, args.seed.wrapping_add(game.move_count() as u64)) {
                Some(mv) => {
                    println!("{} {}", "engine plays".cyan(), mv);
                    if let Ok(report) = game.make_move(&mv) {
                        render(&game);
                        if report.is_game_over {
                            announce_result(&game);
                            break;
                        }
                    }
                }
                None => {
                    announce_result(&game);
                    break;
                }
            }
            continue;
        }

        print!("{} ", "your move>".green());
        if io::stdout().flush().is_err() {
            break;
        }
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        match input {
            "" => continue,
            "quit" | "q" => break,
            "help" => print_help(&game),
            "undo" => {
                // Take back the engine's reply as well.
                let undone = game.undo_move() && game.undo_move();
                if !undone {
                    println!("nothing to undo");
                }
                render(&game);
            }
            "hint" => match game.ai_move_for(difficulty, Player::One, args.seed) {
                Some(mv) => println!("{} {}", "try".cyan(), mv),
                None => println!("no move available"),
            },
            "analyze" => {
                let analysis = game.analyze();
                println!(
                    "threats: yours {}, opponent {} | pieces {} | phase {:?} | score {}",
                    analysis.current_player_threats,
                    analysis.opponent_threats,
                    analysis.total_pieces,
                    analysis.phase,
                    analysis.evaluation_score
                );
                for mv in game.winning_moves() {
                    println!("{} {}", "winning:".green(), mv);
                }
                for mv in game.blocking_moves() {
                    println!("{} {}", "must block:".red(), mv);
                }
            }
            _ => match game.parse_move(input) {
                Ok(mv) => match game.make_move(&mv) {
                    Ok(MoveReport { .. }) => render(&game),
                    Err(err) => println!("{} {}", "illegal:".red(), err),
                },
                Err(err) => println!("{} {}", "unrecognized:".red(), err),
            },
        }
    }
}

fn render(game: &GameWrapper) {
    let (_, cols) = game.dimensions();
    if let GameWrapper::Trio(_) = game {
        // Trio renders its own digits and target.
        println!("{}", game);
        return;
    }
    print!("   ");
    for col in 0..cols {
        print!("{:2} ", col);
    }
    println!();
    for (i, cell) in game.board_cells().iter().enumerate() {
        if i % cols == 0 {
            print!("{:2} ", i / cols);
        }
        let symbol = match cell {
            1 => "X".red().bold(),
            2 => "O".yellow().bold(),
            3 => "N".blue().bold(),
            _ => ".".dimmed(),
        };
        print!(" {} ", symbol);
        if i % cols == cols - 1 {
            println!();
        }
    }
}

fn announce_result(game: &GameWrapper) {
    match game.winner() {
        Some(Player::One) => println!("{}", "you win".green().bold()),
        Some(Player::Two) => println!("{}", "the engine wins".red().bold()),
        None => println!("{}", "draw".yellow().bold()),
    }
}

fn print_help(game: &GameWrapper) {
    let notation = match game {
        GameWrapper::Connect4(_) => "a column number, e.g. 3",
        GameWrapper::Gomoku(_) => "row,col, e.g. 7,7",
        GameWrapper::LGame(_) => "row,col,orientation[,neutral,row,col], e.g. 0,0,2,0,3,3",
        GameWrapper::Trio(_) => "three cells r1,c1,r2,c2,r3,c3, e.g. 0,1,0,2,0,3",
    };
    println!("enter {notation}; or: hint, analyze, undo, help, quit");
}
