//! Console output helpers for the interactive match binary

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::board::Board;
use crate::task::RoundAnalysis;

/// Create a spinner shown while the engine searches a round.
pub fn create_search_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("Invalid spinner template"),
    );
    pb.set_message("searching...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(40));
    println!("{title}");
    println!("{}", "=".repeat(40));
}

/// Print the board between moves
pub fn print_board(board: &Board) {
    println!("\n{board}\n");
}

/// Print the per-column aggregates behind an engine decision
pub fn print_round_summary(analysis: &RoundAnalysis, elapsed: Duration) {
    let scores: Vec<String> = analysis
        .column_scores
        .iter()
        .map(|score| match score {
            Some(score) => format!("{score:+.3}"),
            None => "  --  ".to_string(),
        })
        .collect();
    println!("column scores: [{}]", scores.join(", "));
    println!("time taken: {:.2}s", elapsed.as_secs_f64());
}
