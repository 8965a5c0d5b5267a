use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use console::{Key, Term};
use eight_puzzle_solver::{bench, generate, solve, Board, Heuristic};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "eight-puzzle", about = "Solve 8-puzzles with A* search")]
struct Cli {
    /// Seed for random puzzles.
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Log at debug level unless RUST_LOG is set.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Solve one random puzzle with both heuristics.
    Sample,
    /// Solve the given puzzle, nine digits 0-8 row-major with 0 as the blank.
    Solve { puzzle: Board },
    /// Solve a batch of random puzzles and export per-depth statistics.
    Bench(BenchArgs),
}

#[derive(Debug, Clone, Args)]
struct BenchArgs {
    #[arg(long, default_value_t = 100)]
    trials: usize,
    #[arg(long, default_value = "output/100TestCases.csv")]
    output: PathBuf,
    /// Spread searches over all cores. Runtimes are then measured under contention.
    #[arg(long)]
    parallel: bool,
}

impl Default for BenchArgs {
    fn default() -> Self {
        Self {
            trials: 100,
            output: PathBuf::from("output/100TestCases.csv"),
            parallel: false,
        }
    }
}

enum Action {
    Sample,
    Custom,
    Batch,
    Exit,
}

impl TryFrom<Key> for Action {
    type Error = ();

    fn try_from(key: Key) -> Result<Self, Self::Error> {
        Ok(match key {
            Key::Char('1') => Self::Sample,
            Key::Char('2') => Self::Custom,
            Key::Char('3') => Self::Batch,
            Key::Char('4') | Key::Escape => Self::Exit,
            _ => return Err(()),
        })
    }
}

// Where menu answers come from. `None` once input is exhausted.
trait Input {
    fn next_key(&mut self) -> io::Result<Option<Key>>;
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

impl Input for Term {
    fn next_key(&mut self) -> io::Result<Option<Key>> {
        self.read_key().map(Some)
    }

    fn next_line(&mut self) -> io::Result<Option<String>> {
        self.read_line().map(Some)
    }
}

// Piped input, one answer per line.
struct Lines<R>(R);

impl<R: BufRead> Input for Lines<R> {
    fn next_key(&mut self) -> io::Result<Option<Key>> {
        Ok(self.next_line()?.map(|line| {
            let mut chars = line.trim().chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Char(c),
                _ => Key::Unknown,
            }
        }))
    }

    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        Ok((self.0.read_line(&mut line)? != 0).then_some(line))
    }
}

const MENU: &str = "\
(1) Generate sample puzzle
(2) Enter your own puzzle
(3) Generate 100 puzzles and export result data to file
(4) Exit
Select option by number: ";

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut term = Term::stdout();
    let mut out = term.clone();

    match cli.command {
        // Keys are only readable from a terminal.
        None if term.is_term() && io::stdin().is_terminal() => {
            run_menu(&mut out, &mut term, &mut rng)
        }
        None => run_menu(&mut out, &mut Lines(io::stdin().lock()), &mut rng),
        Some(Command::Sample) => run_sample(&mut out, &mut rng),
        Some(Command::Solve { puzzle }) => {
            validate(&puzzle)?;
            solve_both(&mut out, puzzle)
        }
        Some(Command::Bench(args)) => run_bench(&mut out, &mut rng, &args),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_menu(out: &mut impl Write, input: &mut impl Input, rng: &mut StdRng) -> Result<()> {
    writeln!(out, "This program will solve a 8-Puzzle by using an A* heuristic.\n")?;
    loop {
        out.write_all(MENU.as_bytes())?;
        out.flush()?;
        let action = loop {
            let Some(key) = input.next_key()? else {
                break Action::Exit;
            };
            match Action::try_from(key) {
                Ok(action) => break action,
                Err(()) => writeln!(out, "\nIncorrect input. Enter a valid option.")?,
            }
        };
        writeln!(out, "\n")?;

        match action {
            Action::Sample => run_sample(out, rng)?,
            Action::Custom => run_custom(out, input)?,
            Action::Batch => run_bench(out, rng, &BenchArgs::default())?,
            Action::Exit => break,
        }

        writeln!(out, "\nEnter 'X' to exit or 'O' for another option: ")?;
        let again = loop {
            match input.next_key()? {
                None | Some(Key::Char('X' | 'x') | Key::Escape) => break false,
                Some(Key::Char('O' | 'o')) => break true,
                Some(_) => writeln!(out, "Incorrect input. Enter a valid option.")?,
            }
        };
        if !again {
            break;
        }
        writeln!(out)?;
    }
    writeln!(out, "Thank you, come again.")?;
    Ok(())
}

fn run_sample(out: &mut impl Write, rng: &mut StdRng) -> Result<()> {
    writeln!(out, "SAMPLE TEST CASE:\n")?;
    let board = generate::random_board(rng);
    solve_both(out, board)
}

fn run_custom(out: &mut impl Write, input: &mut impl Input) -> Result<()> {
    loop {
        let board = loop {
            writeln!(out, "Enter an 8-puzzle (every digit 0-8 in any order): ")?;
            let Some(line) = input.next_line()? else {
                return Ok(());
            };
            let parsed = line.parse::<Board>().map_err(anyhow::Error::from);
            match parsed.and_then(|board| validate(&board).map(|()| board)) {
                Ok(board) => break board,
                Err(err) => writeln!(out, "Incorrect input: {err}. Please input another puzzle.")?,
            }
        };
        solve_both(out, board)?;

        writeln!(out, "Another puzzle? (Y or N): ")?;
        let line = input.next_line()?.unwrap_or_default();
        if !line.trim().eq_ignore_ascii_case("y") {
            return Ok(());
        }
    }
}

// Reject boards the search must not be started on.
fn validate(board: &Board) -> Result<()> {
    anyhow::ensure!(board.is_solvable(), "puzzle {board} is not solvable");
    anyhow::ensure!(!board.is_goal(), "puzzle {board} is already solved");
    Ok(())
}

fn solve_both(out: &mut impl Write, board: Board) -> Result<()> {
    writeln!(out, "{}\n", board.grid())?;
    for heuristic in Heuristic::ALL {
        writeln!(out, "Solving Puzzle using {heuristic}")?;
        let solution =
            solve(board, heuristic).with_context(|| format!("Failed to solve {board}"))?;
        writeln!(out, "{solution}")?;
        writeln!(out, "Nodes generated: {}\n", solution.nodes_generated)?;
    }
    Ok(())
}

fn run_bench(out: &mut impl Write, rng: &mut StdRng, args: &BenchArgs) -> Result<()> {
    writeln!(out, "Generating and solving {} puzzles...", args.trials)?;
    let boards = generate::random_boards(rng, args.trials);

    let progress = ProgressBar::new(boards.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
            .context("Invalid progress template")?
            .progress_chars("##-"),
    );
    let report =
        bench::run_batch(&boards, args.parallel, &progress).context("Batch search failed")?;
    progress.finish_and_clear();
    writeln!(out, "Puzzles solved.")?;

    // Export failures are reported, not fatal.
    match report.save(&args.output) {
        Ok(()) => writeln!(out, "Write to file successful at {}", args.output.display())?,
        Err(err) => {
            tracing::error!("{err:#}");
            writeln!(out, "Failed to export results: {err:#}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bench_is_sequential_by_default() {
        assert!(!BenchArgs::default().parallel);
        let cli = Cli::try_parse_from(["eight-puzzle", "bench"]).unwrap();
        let Some(Command::Bench(args)) = cli.command else {
            panic!("expecting the bench command");
        };
        assert!(!args.parallel);
        assert_eq!(args.trials, 100);

        let cli = Cli::try_parse_from(["eight-puzzle", "bench", "--parallel"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Bench(BenchArgs { parallel: true, .. }))));
    }

    fn run_piped(input: &str) -> String {
        let mut out = Vec::new();
        let mut rng = StdRng::seed_from_u64(1);
        run_menu(&mut out, &mut Lines(input.as_bytes()), &mut rng).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn piped_menu_stops_at_end_of_input() {
        let out = run_piped("");
        assert_eq!(out.matches("Select option by number").count(), 1);
        assert!(!out.contains("Incorrect input"));
        assert!(out.ends_with("Thank you, come again.\n"));

        // Inside the custom puzzle prompt.
        let out = run_piped("2\n12\n");
        assert_eq!(out.matches("Incorrect input: ").count(), 1);
        assert!(out.ends_with("Thank you, come again.\n"));
    }

    #[test]
    fn piped_menu_runs_options() {
        let out = run_piped("1\nX\n");
        assert!(out.contains("SAMPLE TEST CASE:"));
        assert_eq!(out.matches("Solved Puzzle at Depth").count(), 2);
        assert!(out.ends_with("Thank you, come again.\n"));

        let out = run_piped(" 9 \n2\n021345678\n102345678\ny\n123405678\nn\no\n4\n");
        assert_eq!(out.matches("Incorrect input. Enter a valid option.").count(), 1);
        assert!(out.contains("Incorrect input: puzzle [021345678] is not solvable."));
        assert_eq!(out.matches("Solved Puzzle at Depth 1\n").count(), 2);
        assert_eq!(out.matches("Solved Puzzle at Depth 14\n").count(), 2);
        assert_eq!(out.matches("Select option by number").count(), 2);
        assert!(out.ends_with("Thank you, come again.\n"));
    }
}
