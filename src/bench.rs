use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use rayon::prelude::*;

use crate::solve::Search;
use crate::{Board, Heuristic, SolveError};

pub const MAX_DEPTH: usize = 30;

pub const REPORT_TITLE: &str = "Using A* Search Algorithm on an 8-Puzzle";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DepthStats {
    pub solved: u64,
    pub nodes_generated: u64,
    pub runtime: Duration,
}

impl DepthStats {
    pub fn average_nodes(&self) -> u64 {
        self.nodes_generated.checked_div(self.solved).unwrap_or(0)
    }

    // Nanoseconds.
    pub fn average_runtime(&self) -> f64 {
        if self.solved == 0 {
            return 0.0;
        }
        self.runtime.as_nanos() as f64 / self.solved as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trial {
    pub heuristic: Heuristic,
    pub depth: usize,
    pub nodes_generated: u64,
    pub runtime: Duration,
}

pub fn run_trial(
    search: &mut Search,
    board: Board,
    heuristic: Heuristic,
) -> Result<Trial, SolveError> {
    let started = Instant::now();
    let solution = search.run(board, |b| heuristic.estimate(b), |_, _| {})?;
    let runtime = started.elapsed();
    Ok(Trial {
        heuristic,
        depth: solution.depth(),
        nodes_generated: solution.nodes_generated,
        runtime,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeuristicStats {
    depths: [DepthStats; MAX_DEPTH],
    overflow: u64,
}

impl HeuristicStats {
    pub fn record(&mut self, depth: usize, nodes_generated: u64, runtime: Duration) {
        let Some(stats) = depth.checked_sub(1).and_then(|i| self.depths.get_mut(i)) else {
            tracing::warn!(depth, "Solution depth outside of the report range");
            self.overflow += 1;
            return;
        };
        stats.solved += 1;
        stats.nodes_generated += nodes_generated;
        stats.runtime += runtime;
    }

    pub fn at_depth(&self, depth: usize) -> Option<&DepthStats> {
        self.depths.get(depth.checked_sub(1)?)
    }

    pub fn overflow(&self) -> u64 {
        self.overflow
    }

    pub fn solved(&self) -> u64 {
        self.depths.iter().map(|s| s.solved).sum::<u64>() + self.overflow
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    misplaced: HeuristicStats,
    manhattan: HeuristicStats,
}

impl BatchReport {
    pub fn stats(&self, heuristic: Heuristic) -> &HeuristicStats {
        match heuristic {
            Heuristic::Misplaced => &self.misplaced,
            Heuristic::Manhattan => &self.manhattan,
        }
    }

    pub fn record(&mut self, trial: &Trial) {
        let stats = match trial.heuristic {
            Heuristic::Misplaced => &mut self.misplaced,
            Heuristic::Manhattan => &mut self.manhattan,
        };
        stats.record(trial.depth, trial.nodes_generated, trial.runtime);
    }

    pub fn write_csv(&self, w: &mut impl Write) -> io::Result<()> {
        write!(w, "{}", self)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut w = BufWriter::new(file);
        self.write_csv(&mut w)
            .and_then(|()| w.flush())
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{REPORT_TITLE}")?;
        writeln!(f, ",# of Cases,,Nodes Generated,,Average Runtime,,")?;
        writeln!(f, "Depth,H1,H2,H1,H2,H1,H2")?;
        let rows = self.misplaced.depths.iter().zip(&self.manhattan.depths);
        for ((h1, h2), depth) in rows.zip(1..) {
            writeln!(
                f,
                "{depth},{},{},{},{},{:.1},{:.1}",
                h1.solved,
                h2.solved,
                h1.average_nodes(),
                h2.average_nodes(),
                h1.average_runtime(),
                h2.average_runtime(),
            )?;
        }
        Ok(())
    }
}

pub fn run_batch(
    boards: &[Board],
    parallel: bool,
    progress: &ProgressBar,
) -> Result<BatchReport, SolveError> {
    let solve_both = |search: &mut Search, &board: &Board| {
        let trials = Heuristic::ALL.map(|h| run_trial(search, board, h));
        progress.inc(1);
        trials
    };

    let per_board = if parallel {
        boards
            .par_iter()
            .map_init(Search::new, solve_both)
            .collect::<Vec<_>>()
    } else {
        let mut search = Search::new();
        boards
            .iter()
            .map(|board| solve_both(&mut search, board))
            .collect()
    };

    let mut report = BatchReport::default();
    for trial in per_board.into_iter().flatten() {
        report.record(&trial?);
    }
    tracing::info!(
        boards = boards.len(),
        overflow = report.misplaced.overflow + report.manhattan.overflow,
        "Batch finished",
    );
    Ok(report)
}
