//! dropfour CLI - interactive match against the distributed search engine
//!
//! The machine's turns run the coordinator/worker round protocol; the
//! opponent's turns are read from stdin as column indices, re-prompting on
//! invalid input.

use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;

use dropfour::board::Side;
use dropfour::cli::{create_search_spinner, print_board, print_round_summary, print_section};
use dropfour::config::SessionConfig;
use dropfour::coordinator::{Coordinator, GameStatus};
use dropfour::task::RoundAnalysis;

#[derive(Parser)]
#[command(name = "dropfour")]
#[command(version, about = "Distributed connect-four search engine", long_about = None)]
struct Cli {
    /// Board height in rows
    #[arg(long, default_value_t = 6)]
    height: usize,

    /// Board width in columns
    #[arg(long, default_value_t = 7)]
    width: usize,

    /// Run length required to win
    #[arg(long, default_value_t = 4)]
    win_length: usize,

    /// Maximum search depth beyond the two forced plies of a task
    #[arg(long, default_value_t = 5)]
    depth: usize,

    /// Worker threads; 0 searches on the coordinator thread, the default
    /// leaves one core for the coordinator
    #[arg(long)]
    workers: Option<usize>,

    /// Side that moves first
    #[arg(long, value_enum, default_value = "machine")]
    first: FirstMover,

    /// Append one JSON line per engine round to this file
    #[arg(long)]
    trace: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FirstMover {
    Machine,
    Human,
}

impl From<FirstMover> for Side {
    fn from(first: FirstMover) -> Side {
        match first {
            FirstMover::Machine => Side::Machine,
            FirstMover::Human => Side::Human,
        }
    }
}

/// One line of the round trace
#[derive(Serialize)]
struct TraceRecord<'a> {
    round: usize,
    column: Option<usize>,
    score: f64,
    elapsed_secs: f64,
    analysis: &'a RoundAnalysis,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = SessionConfig {
        height: cli.height,
        width: cli.width,
        win_length: cli.win_length,
        search_depth: cli.depth,
        first_mover: cli.first.into(),
        workers: cli
            .workers
            .unwrap_or_else(|| num_cpus::get().saturating_sub(1)),
    };
    let mut coordinator = Coordinator::new(&config)?;

    let mut trace = match &cli.trace {
        Some(path) => Some(BufWriter::new(
            File::create(path).with_context(|| format!("create trace file {}", path.display()))?,
        )),
        None => None,
    };

    print_section(&format!(
        "dropfour: {}x{} board, {} to win, depth {}, {} workers",
        cli.height,
        cli.width,
        cli.win_length,
        cli.depth,
        coordinator.worker_count()
    ));
    print_board(coordinator.board());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    if config.first_mover == Side::Human {
        opponent_turn(&mut coordinator, &mut lines)?;
        print_board(coordinator.board());
    }

    let mut round = 0;
    while !coordinator.status().is_over() {
        round += 1;

        let spinner = create_search_spinner();
        let started = Instant::now();
        let engine_move = coordinator.play_engine_move()?;
        let elapsed = started.elapsed();
        spinner.finish_and_clear();

        match engine_move.column {
            Some(column) => println!(
                "machine plays column {column} (score {:+.3})",
                engine_move.score
            ),
            None => println!("machine has no move left"),
        }
        print_round_summary(&engine_move.analysis, elapsed);
        print_board(coordinator.board());

        if let Some(writer) = &mut trace {
            let record = TraceRecord {
                round,
                column: engine_move.column,
                score: engine_move.score,
                elapsed_secs: elapsed.as_secs_f64(),
                analysis: &engine_move.analysis,
            };
            serde_json::to_writer(&mut *writer, &record)?;
            writeln!(writer)?;
        }

        if coordinator.status().is_over() {
            break;
        }

        opponent_turn(&mut coordinator, &mut lines)?;
        print_board(coordinator.board());
    }

    match coordinator.status() {
        GameStatus::MachineWon => print_section("machine wins"),
        GameStatus::HumanWon => print_section("you win"),
        GameStatus::Draw => print_section("draw"),
        GameStatus::InProgress => unreachable!("game loop exited mid-game"),
    }

    if let Some(writer) = &mut trace {
        writer.flush().context("flush trace file")?;
    }
    coordinator.shutdown()?;
    Ok(())
}

/// Prompt for a column until the move applies cleanly.
fn opponent_turn(
    coordinator: &mut Coordinator,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<()> {
    loop {
        print!("your move (0-{}): ", coordinator.board().width() - 1);
        io::stdout().flush().context("flush stdout")?;

        let line = match lines.next() {
            Some(line) => line.context("read opponent move")?,
            None => bail!("input closed before the game ended"),
        };
        let column: usize = match line.trim().parse() {
            Ok(column) => column,
            Err(_) => {
                println!("enter a column number");
                continue;
            }
        };

        match coordinator.play_opponent_move(column) {
            Ok(_) => return Ok(()),
            Err(err) if err.is_invalid_move() => println!("invalid move: {err}"),
            Err(err) => return Err(err.into()),
        }
    }
}
