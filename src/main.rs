use std::io::{BufRead, Write};

use chequer::{
    chess::{
        colour::Colour,
        moves::UciMove,
        piece::PromotionTarget,
        position::Position,
        san::SanMove,
        square::Square,
    },
    game::{
        engine::{AnalysisOptions, RandomEngine},
        promotion::PromotionChooser,
        Game, GameConfig,
    },
};
#[cfg(feature = "perft")]
use chequer::chess::perft::PerftConfig;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Arguments {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Runs perft (generating all moves up to a certain depth)
    Perft {
        /// Maximum depth to reach
        depth: u8,
        /// Starting position as a FEN string.
        #[arg(short, long)]
        fen: Option<String>,
        /// Shows move count for each move from the starting position
        #[arg(short)]
        divide: bool,
        /// Generates moves for each depth up to the maximum
        #[arg(short)]
        iterative: bool,
        /// Show timing information
        #[arg(long)]
        bench: bool,
        /// Number of threads splitting the root moves, defaults to the CPU count
        #[arg(long)]
        threads: Option<usize>,
        /// Does not show the board and other decorations
        #[arg(long)]
        no_board: bool,
    },
    /// Lists the legal moves of a position, in UCI and SAN
    Moves {
        /// Position as a FEN string, defaults to the starting position.
        #[arg(short, long)]
        fen: Option<String>,
    },
    /// Plays moves from a position, then shows where the game stands
    Status {
        /// Starting position as a FEN string.
        #[arg(short, long)]
        fen: Option<String>,
        /// Moves to play, in UCI or SAN
        moves: Vec<String>,
    },
    /// Plays a game on the command line
    Play {
        /// Starting position as a FEN string.
        #[arg(short, long)]
        fen: Option<String>,
        /// Side played by the random engine
        #[arg(long, value_enum, default_value_t = EngineSide::None)]
        engine: EngineSide,
        /// Seed of the random engine
        #[arg(long, default_value_t = 0)]
        engine_seed: u64,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
enum EngineSide {
    White,
    Black,
    None,
}
impl EngineSide {
    fn plays(self, colour: Colour) -> bool {
        match self {
            Self::White => colour.is_white(),
            Self::Black => colour.is_black(),
            Self::None => false,
        }
    }
}

/// Asks for the promotion piece on the terminal.
struct PromptPromotion;
impl PromotionChooser for PromptPromotion {
    fn choose_promotion(
        &mut self,
        _: &Position,
        from: Square,
        to: Square,
    ) -> Option<PromotionTarget> {
        print!("promote {from}{to} to (q, r, b, n)? ");
        std::io::stdout().flush().ok()?;
        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer).ok()?;
        match answer.trim() {
            "" => Some(PromotionTarget::Queen),
            letter => letter.parse().ok(),
        }
    }
}

fn game_from(fen: Option<String>) -> Result<Game, Box<dyn std::error::Error>> {
    let config = match fen {
        Some(fen) => GameConfig::new().with_start_fen(fen),
        None => GameConfig::new(),
    };
    Ok(config.build()?)
}

fn print_moves(position: &Position) {
    let moves = position.legal_moves();
    for mv in &moves {
        println!(
            "{} {}",
            mv.to_uci(position.is_chess960()),
            SanMove::from_move(mv, &moves)
        );
    }
}

fn play(
    game: &mut Game,
    engine_side: EngineSide,
    seed: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = RandomEngine::new(seed);
    let options = AnalysisOptions::new();
    println!("{}\n", game.position());

    loop {
        let status = game.status();
        if status.is_over() {
            println!("{status}");
        } else if engine_side.plays(game.position().side_to_move()) {
            let mv = game.play_engine_move(&mut engine, &options)?;
            let chess960 = game.position().is_chess960();
            println!("engine plays {}\n\n{}\n", mv.to_uci(chess960), game.position());
            continue;
        }

        print!("{} > ", game.position().side_to_move());
        std::io::stdout().flush()?;
        let mut line = String::new();
        if std::io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(());
        }

        match line.trim() {
            "" => continue,
            "quit" | "exit" => return Ok(()),
            "fen" => println!("{}", game.position().to_fen()),
            "moves" => print_moves(game.position()),
            "board" => println!("{}\n", game.position()),
            "undo" => match game.undo() {
                Some(position) => println!("{position}\n"),
                None => println!("nothing to undo"),
            },
            "redo" => match game.redo() {
                Some(position) => println!("{position}\n"),
                None => println!("nothing to redo"),
            },
            "help" => println!(
                "enter a move in SAN or UCI, or one of: undo, redo, fen, moves, board, quit"
            ),
            text => {
                let played = match text.parse::<UciMove>() {
                    Ok(UciMove {
                        from,
                        to,
                        promotion: None,
                    }) => game.play_squares(from, to, &mut PromptPromotion),
                    _ => game.play_text(text),
                };
                match played {
                    Ok(_) => println!("{}\n", game.position()),
                    Err(e) => println!("{e}"),
                }
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Arguments::parse();
    env_logger::init();

    match args.command {
        #[cfg(feature = "perft")]
        Command::Perft {
            depth,
            fen,
            divide,
            iterative,
            bench,
            threads,
            no_board,
        } => {
            let position = match fen {
                Some(fen) => Position::from_fen(&fen)?,
                None => Position::initial(),
            };
            let mut config = PerftConfig::default()
                .with_depth(depth)
                .divide_moves(divide)
                .iterative_deepening(iterative)
                .benchmark(bench)
                .show_board(!no_board);
            if let Some(threads) = threads {
                config = config.with_threads(threads)
            }
            config.go(&position);
        }
        #[cfg(not(feature = "perft"))]
        Command::Perft { .. } => {
            eprintln!("chequer has not been compiled with feature `perft`");
        }
        Command::Moves { fen } => print_moves(game_from(fen)?.position()),
        Command::Status { fen, moves } => {
            let mut game = game_from(fen)?;
            for text in &moves {
                game.play_text(text)?;
            }
            println!("{}", game.position().to_fen());
            println!("{}", game.status());
        }
        Command::Play {
            fen,
            engine,
            engine_seed,
        } => play(&mut game_from(fen)?, engine, engine_seed)?,
    }
    Ok(())
}
