//! Board state representation and move application
//!
//! The board is a gravity-drop grid: a played piece falls to the lowest empty
//! row of its column. Occupied cells in a column always form a contiguous run
//! from the bottom, which lets move application and undo operate on the
//! column fill level alone.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A cell on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Machine,
    Human,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Machine => 'M',
            Cell::Human => 'H',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' => Some(Cell::Empty),
            'M' | 'm' => Some(Cell::Machine),
            'H' | 'h' => Some(Cell::Human),
            _ => None,
        }
    }
}

/// One of the two sides of the game
///
/// The machine is the maximizing side in every search; the human (the
/// externally driven opponent) is the minimizing side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Machine,
    Human,
}

impl Side {
    /// Get the opposing side
    pub fn opponent(self) -> Side {
        match self {
            Side::Machine => Side::Human,
            Side::Human => Side::Machine,
        }
    }

    /// Convert side to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Side::Machine => Cell::Machine,
            Side::Human => Cell::Human,
        }
    }

    /// Sentinel score for a completed run by this side, from the machine's
    /// perspective.
    pub fn win_score(self) -> f64 {
        match self {
            Side::Machine => 1.0,
            Side::Human => -1.0,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Machine => write!(f, "machine"),
            Side::Human => write!(f, "human"),
        }
    }
}

/// Complete board state including cells, column fill levels, and whose turn
/// it is
///
/// Cells are stored row-major with row 0 at the bottom, so a piece dropped
/// into column `c` lands at `(fill(c), c)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    height: usize,
    width: usize,
    win_length: usize,
    cells: Vec<Cell>,
    fills: Vec<usize>,
    to_move: Side,
}

impl Board {
    /// Create an empty board with the given dimensions, run length required
    /// to win, and first mover.
    pub fn new(height: usize, width: usize, win_length: usize, first_mover: Side) -> Self {
        Board {
            height,
            width,
            win_length,
            cells: vec![Cell::Empty; height * width],
            fills: vec![0; width],
            to_move: first_mover,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn win_length(&self) -> usize {
        self.win_length
    }

    /// The side that plays next
    pub fn to_move(&self) -> Side {
        self.to_move
    }

    /// Cell at (row, column); row 0 is the bottom row
    pub fn get(&self, row: usize, column: usize) -> Cell {
        self.cells[row * self.width + column]
    }

    /// Number of pieces in the column
    pub fn fill(&self, column: usize) -> usize {
        self.fills[column]
    }

    fn set(&mut self, row: usize, column: usize, cell: Cell) {
        self.cells[row * self.width + column] = cell;
    }

    /// Drop the next mover's piece into `column`.
    ///
    /// Returns whether the placement completes a winning run through the
    /// placed cell. On error the board is left untouched; there is nothing
    /// to undo.
    ///
    /// # Errors
    ///
    /// Returns an invalid-move error if the column is out of range or full.
    ///
    /// # Examples
    ///
    /// ```
    /// use dropfour::board::{Board, Side};
    ///
    /// let mut board = Board::new(6, 7, 4, Side::Machine);
    /// let before = board.clone();
    /// let won = board.play(3).unwrap();
    /// assert!(!won);
    /// board.revert(3);
    /// assert_eq!(board, before);
    /// ```
    pub fn play(&mut self, column: usize) -> Result<bool> {
        if column >= self.width {
            return Err(Error::ColumnOutOfRange {
                column,
                width: self.width,
            });
        }
        let row = self.fills[column];
        if row == self.height {
            return Err(Error::ColumnFull { column });
        }

        self.set(row, column, self.to_move.to_cell());
        self.fills[column] += 1;
        self.to_move = self.to_move.opponent();
        Ok(self.completes_run(row, column))
    }

    /// Undo the most recent successful [`play`](Self::play) on `column`:
    /// remove its topmost piece and give the turn back.
    pub fn revert(&mut self, column: usize) {
        debug_assert!(column < self.width);
        debug_assert!(self.fills[column] > 0, "revert on an empty column");

        let row = self.fills[column] - 1;
        self.set(row, column, Cell::Empty);
        self.fills[column] -= 1;
        self.to_move = self.to_move.opponent();
    }

    /// Whether every column is filled to the top
    pub fn is_full(&self) -> bool {
        self.fills.iter().all(|&fill| fill == self.height)
    }

    /// Score of the position reached by the last drop into `column`, from
    /// the machine's perspective: +1 or -1 if the topmost piece of the
    /// column completes a run, 0 otherwise.
    ///
    /// The check is anchored at that single cell; a completed run elsewhere
    /// on the board is deliberately not looked for, because every win in an
    /// incremental game passes through the most recent placement.
    pub fn terminal_score(&self, column: usize) -> f64 {
        if self.fills[column] == 0 {
            return 0.0;
        }
        let row = self.fills[column] - 1;
        if !self.completes_run(row, column) {
            return 0.0;
        }
        match self.get(row, column) {
            Cell::Machine => Side::Machine.win_score(),
            Cell::Human => Side::Human.win_score(),
            Cell::Empty => 0.0,
        }
    }

    /// Whether the piece at (row, column) sits on a run of at least
    /// `win_length` in any of the four directions through it.
    fn completes_run(&self, row: usize, column: usize) -> bool {
        let piece = self.get(row, column);
        if piece == Cell::Empty {
            return false;
        }

        // (dr, dc) direction vectors; each pair covers one line through the
        // anchor. The vertical line only extends downward because the anchor
        // is the topmost piece of its column.
        let lines: [((i64, i64), (i64, i64)); 4] = [
            ((-1, 0), (0, 0)),  // vertical
            ((0, -1), (0, 1)),  // horizontal
            ((-1, -1), (1, 1)), // diagonal through lower-left
            ((1, -1), (-1, 1)), // diagonal through upper-left
        ];

        for (backward, forward) in lines {
            let run = 1 + self.run_length(row, column, piece, backward)
                + self.run_length(row, column, piece, forward);
            if run >= self.win_length {
                return true;
            }
        }
        false
    }

    /// Count consecutive cells equal to `piece` walking from (row, column)
    /// in direction (dr, dc), excluding the anchor itself.
    fn run_length(&self, row: usize, column: usize, piece: Cell, (dr, dc): (i64, i64)) -> usize {
        if dr == 0 && dc == 0 {
            return 0;
        }
        let mut run = 0;
        let mut r = row as i64 + dr;
        let mut c = column as i64 + dc;
        while r >= 0 && r < self.height as i64 && c >= 0 && c < self.width as i64 {
            if self.get(r as usize, c as usize) != piece {
                break;
            }
            run += 1;
            r += dr;
            c += dc;
        }
        run
    }

    /// Create a board from a text diagram.
    ///
    /// Rows are listed top-down, one per line; spaces inside a row are
    /// ignored. `.` is an empty cell, `M` a machine piece, `H` a human
    /// piece.
    ///
    /// # Errors
    ///
    /// Returns an error if the diagram is empty, the rows have unequal
    /// lengths, a character is not a valid cell, or a column has a piece
    /// above an empty cell.
    pub fn from_rows(diagram: &str, win_length: usize, to_move: Side) -> Result<Board> {
        let rows: Vec<String> = diagram
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect())
            .filter(|row: &String| !row.is_empty())
            .collect();

        if rows.is_empty() {
            return Err(Error::InvalidRowCount {
                expected: 1,
                got: 0,
            });
        }

        let height = rows.len();
        let width = rows[0].chars().count();
        let mut board = Board::new(height, width, win_length, to_move);

        for (line, row_text) in rows.iter().enumerate() {
            let got = row_text.chars().count();
            if got != width {
                return Err(Error::InvalidRowLength {
                    expected: width,
                    got,
                    row: row_text.clone(),
                });
            }
            // The first line of the diagram is the top row of the board.
            let row = height - 1 - line;
            for (column, character) in row_text.chars().enumerate() {
                let cell =
                    Cell::from_char(character).ok_or_else(|| Error::InvalidCellCharacter {
                        character,
                        row: row_text.clone(),
                    })?;
                board.set(row, column, cell);
            }
        }

        for column in 0..width {
            let mut fill = 0;
            while fill < height && board.get(fill, column) != Cell::Empty {
                fill += 1;
            }
            for row in fill..height {
                if board.get(row, column) != Cell::Empty {
                    return Err(Error::FloatingPiece { column });
                }
            }
            board.fills[column] = fill;
        }

        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..self.height).rev() {
            for column in 0..self.width {
                if column > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", self.get(row, column).to_char())?;
            }
            writeln!(f)?;
        }
        for column in 0..self.width {
            if column > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", column % 10)?;
        }
        Ok(())
    }
}
