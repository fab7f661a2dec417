//! Depth-limited search over a single mutable board
//!
//! The engine explores the game tree by playing a move in place, recursing,
//! and reverting, so the whole search touches one board allocation. Interior
//! nodes are valued with a hybrid rule: a forced outcome for the side
//! choosing among the children short-circuits, anything else averages. The
//! rule is deliberately not textbook minimax and is shared verbatim with the
//! distributed aggregation layer.

use crate::board::{Board, Side};

/// Combine child scores for the side choosing among them.
///
/// A minimizing chooser that can reach a machine loss forces it; a
/// maximizing chooser that can reach a machine win forces that. Otherwise
/// the value is the arithmetic mean of the children. Returns `None` when
/// there are no children to choose from.
///
/// Sentinel comparisons are exact: +1 and -1 only ever arise from
/// [`Board::terminal_score`] or from this short-circuit, never from
/// averaging.
///
/// # Examples
///
/// ```
/// use dropfour::board::Side;
/// use dropfour::search::combine_scores;
///
/// assert_eq!(combine_scores(Side::Human, &[0.5, -1.0]), Some(-1.0));
/// assert_eq!(combine_scores(Side::Machine, &[0.25, 0.75]), Some(0.5));
/// ```
pub fn combine_scores(chooser: Side, scores: &[f64]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let forced = match chooser {
        Side::Human => Side::Human.win_score(),
        Side::Machine => Side::Machine.win_score(),
    };
    if scores.iter().any(|&score| score == forced) {
        return Some(forced);
    }
    Some(scores.iter().sum::<f64>() / scores.len() as f64)
}

/// Evaluate playing `column` on `board`, searching at most `max_depth` plies
/// deep.
///
/// Returns `None` if the column cannot be played. Otherwise the board is
/// mutated, explored, and restored before returning:
///
/// - a move that completes a run is worth its terminal sentinel;
/// - a move at the depth cutoff is worth the same terminal-score function,
///   which is 0 for any non-winning placement (cutoff nodes carry no
///   positional heuristic);
/// - any other move is worth its children combined under
///   [`combine_scores`], with the reply side as the chooser.
pub fn search(board: &mut Board, column: usize, depth: usize, max_depth: usize) -> Option<f64> {
    let won = match board.play(column) {
        Ok(won) => won,
        Err(_) => return None,
    };

    if won || depth == max_depth - 1 {
        let score = board.terminal_score(column);
        board.revert(column);
        return Some(score);
    }

    let mut children = Vec::with_capacity(board.width());
    for next in 0..board.width() {
        if let Some(score) = search(board, next, depth + 1, max_depth) {
            children.push(score);
        }
    }
    let chooser = board.to_move();
    board.revert(column);

    combine_scores(chooser, &children)
}

/// Search every column from the root and pick the best one.
///
/// Ties break toward the lowest column index. When no column can be played
/// the result is `(None, 0.0)`: the position is a dead end, not an error.
pub fn game_simulation(board: &mut Board, max_depth: usize) -> (Option<usize>, f64) {
    let mut best: Option<(usize, f64)> = None;
    for column in 0..board.width() {
        if let Some(score) = search(board, column, 0, max_depth) {
            let improves = match best {
                None => true,
                Some((_, best_score)) => score > best_score,
            };
            if improves {
                best = Some((column, score));
            }
        }
    }
    match best {
        Some((column, score)) => (Some(column), score),
        None => (None, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Side};

    #[test]
    fn test_combine_empty_is_none() {
        assert_eq!(combine_scores(Side::Machine, &[]), None);
        assert_eq!(combine_scores(Side::Human, &[]), None);
    }

    #[test]
    fn test_combine_singleton_is_identity() {
        assert_eq!(combine_scores(Side::Machine, &[0.3]), Some(0.3));
        assert_eq!(combine_scores(Side::Human, &[0.3]), Some(0.3));
    }

    #[test]
    fn test_minimizer_short_circuits_on_loss() {
        let scores = [0.5, 1.0, -1.0, 0.0];
        assert_eq!(combine_scores(Side::Human, &scores), Some(-1.0));
    }

    #[test]
    fn test_maximizer_short_circuits_on_win() {
        let scores = [0.5, 1.0, -1.0, 0.0];
        assert_eq!(combine_scores(Side::Machine, &scores), Some(1.0));
    }

    #[test]
    fn test_average_when_no_forced_outcome() {
        // A machine win among the children does not help the minimizer, and
        // vice versa; the values average instead.
        assert_eq!(combine_scores(Side::Human, &[1.0, 0.0]), Some(0.5));
        assert_eq!(combine_scores(Side::Machine, &[-1.0, 0.0]), Some(-0.5));
    }

    #[test]
    fn test_short_circuit_is_order_independent() {
        let forward = [0.25, -1.0, 0.75];
        let backward = [0.75, -1.0, 0.25];
        assert_eq!(
            combine_scores(Side::Human, &forward),
            combine_scores(Side::Human, &backward),
        );
    }

    #[test]
    fn test_search_illegal_column_is_none() {
        let mut board = Board::from_rows("M.\nH.", 2, Side::Machine).unwrap();
        let before = board.clone();
        assert_eq!(search(&mut board, 0, 0, 4), None);
        assert_eq!(board, before);
    }

    #[test]
    fn test_search_reports_immediate_win() {
        let diagram = "\
            .......\n\
            .......\n\
            .......\n\
            M......\n\
            MH.....\n\
            MH.....";
        let mut board = Board::from_rows(diagram, 4, Side::Machine).unwrap();
        let before = board.clone();

        assert_eq!(search(&mut board, 0, 0, 4), Some(1.0));
        assert_eq!(board, before);
    }

    #[test]
    fn test_cutoff_scores_zero_without_a_win() {
        let mut board = Board::new(6, 7, 4, Side::Machine);
        // max_depth 1 cuts off immediately after the probed move.
        assert_eq!(search(&mut board, 3, 0, 1), Some(0.0));
    }

    #[test]
    fn test_search_restores_board_after_recursion() {
        let mut board = Board::new(4, 4, 3, Side::Machine);
        board.play(1).unwrap();
        let before = board.clone();

        search(&mut board, 0, 0, 3).unwrap();
        assert_eq!(board, before);
    }

    #[test]
    fn test_game_simulation_takes_immediate_win() {
        let diagram = "\
            .......\n\
            .......\n\
            .......\n\
            ..M....\n\
            ..MH...\n\
            ..MH...";
        let mut board = Board::from_rows(diagram, 4, Side::Machine).unwrap();

        let (column, score) = game_simulation(&mut board, 4);
        assert_eq!(column, Some(2));
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_game_simulation_on_full_board() {
        let board = "\
            MHM\n\
            MHM\n\
            HMH";
        let mut board = Board::from_rows(board, 3, Side::Human).unwrap();

        let (column, score) = game_simulation(&mut board, 4);
        assert_eq!(column, None);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_game_simulation_ties_break_low() {
        // Depth 1 scores every legal opening 0, so the first column wins the
        // tie.
        let mut board = Board::new(6, 7, 4, Side::Machine);
        let (column, score) = game_simulation(&mut board, 1);
        assert_eq!(column, Some(0));
        assert_eq!(score, 0.0);
    }
}
