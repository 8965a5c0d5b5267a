use std::fmt::Write;

use anyhow::{ensure, Context};
use eight_puzzle_solver::{solve, Heuristic};

use crate::common::*;

mod common;

fn main() {
    run_tests("solve", |content| {
        let (input, board) = parse_input(content)?;
        let mut got = format!("{input}\n\n{SEPARATOR}");

        for heuristic in Heuristic::ALL {
            let solution = solve(board, heuristic)
                .with_context(|| format!("No solution with {heuristic}"))?;

            // Validate.
            ensure!(*solution.start() == board, "Trace does not start at the puzzle");
            for (w, i) in solution.path.windows(2).zip(1..) {
                ensure!(
                    w[0].successors().contains(&w[1]),
                    "Invalid move at depth {i} with {heuristic}: {} -> {}",
                    w[0],
                    w[1],
                );
            }
            ensure!(solution.goal().is_goal(), "Invalid solution with {heuristic}");

            writeln!(got, "{heuristic} {}", solution.depth()).unwrap();
        }

        Ok(got)
    });
}
