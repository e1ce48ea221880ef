//! N-Queens by backtracking, one queen per row
//!
//! The safety check is split into its three scans (column, up-left
//! diagonal, up-right diagonal); each scan that runs records whether it found
//! a conflict. Placement, descent, backtrack and every full placement are
//! recorded as their own steps. Columns are tried left to right, so for
//! `n = 4` the solutions arrive as `[1, 3, 0, 2]` then `[2, 0, 3, 1]`.
//!
//! Board cells are highlighted as `row * n + col`.

use super::errors::{check_limit, ValidationError};
use super::list;
use crate::constants::MAX_QUEENS;
use crate::trace::{produce_with, Annotation, Grid, GridCell, GridRow, Recorder, StateView, Trace};

pub const PSEUDOCODE: &[&str] = &[
    "solve(row):",
    "  if row == n: record solution; return",
    "  for col in 0..n:",
    "    if isSafe(row, col):",
    "      board[row][col] = Q",
    "      solve(row + 1)",
    "      board[row][col] = .",
    "",
    "isSafe(row, col):",
    "  for i < row: if board[i][col]: return false",
    "  for (i, j) up-left: if board[i][j]: return false",
    "  for (i, j) up-right: if board[i][j]: return false",
    "  return true",
];

/// Indices into [`PSEUDOCODE`]
pub mod lines {
    pub const SOLVE: usize = 0;
    pub const SOLUTION: usize = 1;
    pub const TRY_COLUMN: usize = 2;
    pub const SAFE_CHECK: usize = 3;
    pub const PLACE: usize = 4;
    pub const DESCEND: usize = 5;
    pub const BACKTRACK: usize = 6;
    pub const SCAN_COLUMN: usize = 9;
    pub const SCAN_UP_LEFT: usize = 10;
    pub const SCAN_UP_RIGHT: usize = 11;
    pub const SAFE: usize = 12;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueensInput {
    pub n: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueensState {
    pub board: Vec<Vec<bool>>,
    pub solutions_found: usize,
}

impl QueensState {
    fn new(n: usize) -> Self {
        QueensState {
            board: vec![vec![false; n]; n],
            solutions_found: 0,
        }
    }

    /// Queen column for each row, if every row holds exactly one queen
    pub fn placement(&self) -> Option<Vec<usize>> {
        self.board
            .iter()
            .map(|row| row.iter().position(|&q| q))
            .collect()
    }
}

impl StateView for QueensState {
    fn grid(&self) -> Grid {
        let n = self.board.len();
        let rows = self
            .board
            .iter()
            .enumerate()
            .map(|(r, row)| {
                let cells = row
                    .iter()
                    .enumerate()
                    .map(|(c, &queen)| GridCell::entity(if queen { "Q" } else { "." }, r * n + c))
                    .collect();
                GridRow::new(format!("row {}", r), cells)
            })
            .collect();
        Grid::new(rows)
    }
}

/// Which of the three scans found a conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    Column,
    UpLeft,
    UpRight,
}

impl Scan {
    fn line(self) -> usize {
        match self {
            Scan::Column => lines::SCAN_COLUMN,
            Scan::UpLeft => lines::SCAN_UP_LEFT,
            Scan::UpRight => lines::SCAN_UP_RIGHT,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Scan::Column => "column",
            Scan::UpLeft => "up-left diagonal",
            Scan::UpRight => "up-right diagonal",
        }
    }
}

fn validate(input: &QueensInput) -> Result<usize, ValidationError> {
    check_limit("board size", input.n, MAX_QUEENS)?;
    Ok(input.n)
}

/// Find every placement of `n` non-attacking queens
pub fn trace(input: &QueensInput) -> Trace<QueensState> {
    trace_with(input, Recorder::new())
}

/// [`trace`] into a caller-supplied recorder
pub fn trace_with(input: &QueensInput, recorder: Recorder<QueensState>) -> Trace<QueensState> {
    produce_with("nqueens", validate(input), recorder, |n, rec| {
        let mut run = QueensRun {
            state: QueensState::new(n),
            rec,
            n,
            solutions: Vec::new(),
        };
        run.rec
            .record(&run.state, None, format!("Place {} queens on a {}x{} board", n, n, n), []);
        run.solve(0);

        let found = run.solutions.len();
        let message = if found == 0 {
            format!("No solution exists for n = {}", n)
        } else {
            format!("Search complete: {} solutions for n = {}", found, n)
        };
        let solutions: Vec<String> = run.solutions.iter().map(|s| list(s)).collect();
        run.rec.record_annotated(
            &run.state,
            None,
            message,
            [],
            &[
                Annotation::new("solutions", found.to_string()),
                Annotation::new("boards", solutions.join(" ")),
            ],
        );
    })
}

struct QueensRun<'r> {
    state: QueensState,
    rec: &'r mut Recorder<QueensState>,
    n: usize,
    solutions: Vec<Vec<usize>>,
}

impl QueensRun<'_> {
    fn cell(&self, row: usize, col: usize) -> usize {
        row * self.n + col
    }

    fn note(&mut self, line: usize, message: String, highlight: impl IntoIterator<Item = usize>) {
        self.rec.record(&self.state, Some(line), message, highlight);
    }

    fn solve(&mut self, row: usize) {
        if row == self.n {
            let columns = self.state.placement().unwrap_or_default();
            self.state.solutions_found += 1;
            let queens: Vec<usize> = columns
                .iter()
                .enumerate()
                .map(|(r, &c)| self.cell(r, c))
                .collect();
            self.rec.record_annotated(
                &self.state,
                Some(lines::SOLUTION),
                format!("Solution #{}: columns {}", self.state.solutions_found, list(&columns)),
                queens,
                &[Annotation::new("solution", list(&columns))],
            );
            self.solutions.push(columns);
            return;
        }

        self.note(lines::SOLVE, format!("solve(row = {})", row), []);
        for col in 0..self.n {
            let here = self.cell(row, col);
            self.note(
                lines::TRY_COLUMN,
                format!("Try row {}, column {}", row, col),
                [here],
            );

            if !self.is_safe(row, col) {
                continue;
            }

            self.state.board[row][col] = true;
            self.note(
                lines::PLACE,
                format!("Place queen at ({}, {})", row, col),
                [here],
            );
            self.note(
                lines::DESCEND,
                format!("Descend to row {}", row + 1),
                [here],
            );
            self.solve(row + 1);

            self.state.board[row][col] = false;
            self.note(
                lines::BACKTRACK,
                format!("Backtrack: remove queen from ({}, {})", row, col),
                [here],
            );
        }
    }

    fn is_safe(&mut self, row: usize, col: usize) -> bool {
        let here = self.cell(row, col);
        self.note(
            lines::SAFE_CHECK,
            format!("isSafe({}, {})?", row, col),
            [here],
        );

        for scan in [Scan::Column, Scan::UpLeft, Scan::UpRight] {
            match self.find_conflict(scan, row, col) {
                Some((r, c)) => {
                    let other = self.cell(r, c);
                    self.note(
                        scan.line(),
                        format!(
                            "{} scan: conflict with queen at ({}, {}) -> true",
                            scan.name(),
                            r,
                            c
                        ),
                        [here, other],
                    );
                    self.note(
                        lines::SAFE_CHECK,
                        format!("({}, {}) is not safe", row, col),
                        [here],
                    );
                    return false;
                }
                None => {
                    self.note(
                        scan.line(),
                        format!("{} scan: conflict -> false", scan.name()),
                        [here],
                    );
                }
            }
        }

        self.note(lines::SAFE, format!("({}, {}) is safe", row, col), [here]);
        true
    }

    /// Walk one direction upward from (row, col) and return the first queen met
    fn find_conflict(&self, scan: Scan, row: usize, col: usize) -> Option<(usize, usize)> {
        let board = &self.state.board;
        match scan {
            Scan::Column => (0..row).rev().find(|&r| board[r][col]).map(|r| (r, col)),
            Scan::UpLeft => (1..=row.min(col))
                .map(|d| (row - d, col - d))
                .find(|&(r, c)| board[r][c]),
            Scan::UpRight => (1..=row)
                .take_while(|&d| col + d < self.n)
                .map(|d| (row - d, col + d))
                .find(|&(r, c)| board[r][c]),
        }
    }
}
