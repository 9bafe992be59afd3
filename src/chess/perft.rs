//! # Perft testing/benchmarking
//!
//! Counts the leaf nodes of the legal move tree to a fixed depth. Root moves can be
//! spread over several threads, each working on its own copy of the position.

use std::time::Instant;

use super::{moves::Move, position::Position};

/// Builder pattern to configure a Perft test.
#[derive(Clone, Debug)]
pub struct PerftConfig {
    pub depth: u8,
    pub iterative: bool,
    pub divide: bool,
    pub bench: bool,
    pub threads: usize,
    pub show_board: bool,
}
impl Default for PerftConfig {
    fn default() -> Self {
        Self {
            depth: 1,
            iterative: false,
            divide: false,
            bench: false,
            threads: num_cpus::get(),
            show_board: false,
        }
    }
}
impl PerftConfig {
    /// Whether to show the board at the start of the run.
    ///
    /// Should be disabled when trying to parse the output.
    pub fn show_board(mut self, value: bool) -> Self {
        self.show_board = value;
        self
    }

    /// Sets the maximum depth of the perft run.
    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    /// Number of worker threads splitting the root moves.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// If set to true, the run will go through all depths between 1 and the maximum.
    pub fn iterative_deepening(mut self, value: bool) -> Self {
        self.iterative = value;
        self
    }

    /// Shows perft results per legal move at the starting position.
    pub fn divide_moves(mut self, value: bool) -> Self {
        self.divide = value;
        self
    }

    /// Measures the time it takes to complete one depth.
    pub fn benchmark(mut self, value: bool) -> Self {
        self.bench = value;
        self
    }

    /// Runs a Perft test on the given position, printing results as it goes.
    ///
    /// Returns the node count at the maximum depth.
    pub fn go(&self, position: &Position) -> u64 {
        if self.show_board {
            println!("{position}\n");
        }

        let mut nodes = 0;
        for depth in (if self.iterative { 1 } else { self.depth })..=self.depth {
            if self.iterative && self.divide {
                println!("====== DEPTH {depth} ======")
            }

            let start = Instant::now();
            let divided = divide(position, depth, self.threads);
            nodes = divided.iter().map(|(_, n)| n).sum();
            let elapsed = start.elapsed().as_secs_f64();

            if self.divide {
                let chess960 = position.is_chess960();
                for (mv, mv_nodes) in &divided {
                    println!("{}: {mv_nodes}", mv.to_uci(chess960));
                }
                println!();
            }
            println!("depth {depth}: {nodes} nodes");
            if self.bench {
                println!(
                    "\ttook {} ({})",
                    human_readable_time(elapsed),
                    human_readable_nps(nodes as f64 / elapsed)
                );
            }
        }
        nodes
    }
}

/// Number of leaf nodes `depth` plies below `position`.
pub fn perft(position: &Position, depth: u8) -> u64 {
    match depth {
        0 => 1,
        1 => position.legal_moves().len() as u64,
        _ => position
            .legal_moves()
            .iter()
            .map(|mv| {
                let mut next = position.clone();
                next.make_move_unchecked(mv);
                perft(&next, depth - 1)
            })
            .sum(),
    }
}

/// Node counts below each root move, computed on up to `threads` threads.
///
/// Results keep the move generation order.
pub fn divide(position: &Position, depth: u8, threads: usize) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    let root_moves = position.legal_moves();
    let chunk_size = root_moves.len().div_ceil(threads.max(1)).max(1);

    std::thread::scope(|scope| {
        let workers: Vec<_> = root_moves
            .chunks(chunk_size)
            .map(|chunk| {
                let root = position.clone();
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|mv| {
                            let mut next = root.clone();
                            next.make_move_unchecked(mv);
                            (*mv, perft(&next, depth - 1))
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        workers
            .into_iter()
            .flat_map(|worker| match worker.join() {
                Ok(counts) => counts,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    })
}

fn human_readable_time(secs: f64) -> String {
    if secs < 0.001 {
        format!("{:.3}μs", secs * 1_000_000.)
    } else if secs < 1. {
        format!("{:.3}ms", secs * 1_000.)
    } else {
        format!("{secs:.3}s")
    }
}

fn human_readable_nps(nps: f64) -> String {
    if nps > 1_000_000_000. {
        format!("{:.3}Gnps", nps / 1_000_000_000.)
    } else if nps > 1_000_000. {
        format!("{:.3}Mnps", nps / 1_000_000.)
    } else if nps > 1_000. {
        format!("{:.3}Knps", nps / 1_000.)
    } else {
        format!("{nps:.3}nps")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn check_matching(fen: &str, expected: &[u64]) {
        let position = Position::from_fen(fen).unwrap();
        for (depth, expected) in expected.iter().enumerate() {
            let actual = perft(&position, depth as u8 + 1);
            assert_eq!(
                actual,
                *expected,
                "Expected {expected} at depth {} for {fen}, but got {actual}",
                depth + 1,
            );
        }
    }

    #[test]
    fn initial_position_perft() {
        check_matching(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            &[20, 400, 8902],
        )
    }

    #[test]
    fn kiwipete_perft() {
        check_matching(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            &[48, 2039],
        )
    }

    #[test]
    fn endgame_perft() {
        check_matching("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", &[14, 191, 2812])
    }

    #[test]
    fn chess960_perft() {
        check_matching(
            "bqnb1rkr/pp3ppp/3ppn2/2p5/5P2/P2P4/NPP1P1PP/BQ1BNRKR w HFhf - 2 9",
            &[21, 528],
        )
    }

    #[test]
    fn divide_matches_perft() {
        let position = Position::initial();
        let divided = divide(&position, 3, 4);
        assert_eq!(divided.len(), 20);
        assert_eq!(divided.iter().map(|(_, n)| n).sum::<u64>(), 8902);
        assert_eq!(
            divided.iter().map(|(mv, _)| *mv).collect::<Vec<_>>(),
            position.legal_moves().to_vec()
        );
    }

    #[test]
    #[ignore]
    fn initial_position_deep_perft() {
        check_matching(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            &[20, 400, 8902, 197281, 4865609],
        )
    }

    #[test]
    #[ignore]
    fn kiwipete_deep_perft() {
        check_matching(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            &[48, 2039, 97862, 4085603],
        )
    }

    #[test]
    #[ignore]
    fn endgame_deep_perft() {
        check_matching(
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            &[14, 191, 2812, 43238, 674624],
        )
    }

    #[test]
    #[ignore]
    fn promotion_perft() {
        check_matching(
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            &[6, 264, 9467, 422333],
        )
    }
}
