// grid.rs - Logical grid types for the toroidal puzzle

use std::fmt;
use std::ops::Index;

use crate::error::{PuzzleError, Result};

/// Visual category of a tile. Only equality matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceColor {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
}

impl PieceColor {
    pub const ALL: [PieceColor; 5] = [
        PieceColor::Red,
        PieceColor::Green,
        PieceColor::Blue,
        PieceColor::Yellow,
        PieceColor::Purple,
    ];

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'R' => Some(PieceColor::Red),
            'G' => Some(PieceColor::Green),
            'B' => Some(PieceColor::Blue),
            'Y' => Some(PieceColor::Yellow),
            'P' => Some(PieceColor::Purple),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            PieceColor::Red => 'R',
            PieceColor::Green => 'G',
            PieceColor::Blue => 'B',
            PieceColor::Yellow => 'Y',
            PieceColor::Purple => 'P',
        }
    }
}

/// Slide direction. Up and Right move pieces along the positive axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

/// Player-visible puzzle state: `columns` x `rows` colors indexed `[column, row]`.
///
/// Row 0 is the top row. The grid is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalGrid {
    columns: usize,
    rows: usize,
    cells: Vec<PieceColor>, // column-major
}

impl LogicalGrid {
    /// Builds a grid from column vectors, `columns[c][r]`.
    pub fn from_columns(columns: Vec<Vec<PieceColor>>) -> Result<Self> {
        let column_count = columns.len();
        let row_count = columns.first().map_or(0, Vec::len);
        if column_count == 0 || row_count == 0 {
            return Err(PuzzleError::EmptyGrid { columns: column_count, rows: row_count });
        }

        let mut cells = Vec::with_capacity(column_count * row_count);
        for (column, colors) in columns.into_iter().enumerate() {
            if colors.len() != row_count {
                return Err(PuzzleError::RaggedGrid {
                    line: column,
                    expected: row_count,
                    found: colors.len(),
                });
            }
            cells.extend(colors);
        }

        Ok(Self { columns: column_count, rows: row_count, cells })
    }

    /// Parses one string per row, top row first, e.g. `["RGB", "GBR"]`.
    pub fn parse_rows(rows: &[&str]) -> Result<Self> {
        let row_count = rows.len();
        let column_count = rows.first().map_or(0, |row| row.chars().count());
        if row_count == 0 || column_count == 0 {
            return Err(PuzzleError::EmptyGrid { columns: column_count, rows: row_count });
        }

        let mut columns = vec![Vec::with_capacity(row_count); column_count];
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != column_count {
                return Err(PuzzleError::RaggedGrid { line: row, expected: column_count, found });
            }
            for (column, c) in line.chars().enumerate() {
                let color = PieceColor::from_char(c).ok_or(PuzzleError::UnknownColor(c))?;
                columns[column].push(color);
            }
        }

        Self::from_columns(columns)
    }

    /// Builds a grid by asking `color_at(column, row)` for every cell.
    pub fn from_fn(
        columns: usize,
        rows: usize,
        mut color_at: impl FnMut(usize, usize) -> PieceColor,
    ) -> Result<Self> {
        if columns == 0 || rows == 0 {
            return Err(PuzzleError::EmptyGrid { columns, rows });
        }
        let mut cells = Vec::with_capacity(columns * rows);
        for column in 0..columns {
            for row in 0..rows {
                cells.push(color_at(column, row));
            }
        }
        Ok(Self { columns, rows, cells })
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The grid after sliding one line a single cell with wrap-around.
    ///
    /// Up/Down rotate logical column `column`; Left/Right rotate logical row `row`.
    pub fn shifted(&self, direction: Direction, column: usize, row: usize) -> Result<Self> {
        let (pivot, limit) = if direction.is_vertical() {
            (column, self.columns)
        } else {
            (row, self.rows)
        };
        if pivot >= limit {
            return Err(PuzzleError::PivotOutOfRange { pivot, limit });
        }

        let (n, m) = (self.columns, self.rows);
        Self::from_fn(n, m, |c, r| match direction {
            Direction::Up if c == column => self[(c, (r + 1) % m)],
            Direction::Down if c == column => self[(c, (r + m - 1) % m)],
            Direction::Left if r == row => self[((c + 1) % n, r)],
            Direction::Right if r == row => self[((c + n - 1) % n, r)],
            _ => self[(c, r)],
        })
    }
}

impl Index<(usize, usize)> for LogicalGrid {
    type Output = PieceColor;

    fn index(&self, (column, row): (usize, usize)) -> &PieceColor {
        assert!(column < self.columns && row < self.rows, "cell [{column}, {row}] out of range");
        &self.cells[column * self.rows + row]
    }
}

impl fmt::Display for LogicalGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            if row > 0 {
                writeln!(f)?;
            }
            for column in 0..self.columns {
                write!(f, "{}", self[(column, row)].as_char())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PieceColor::*;

    #[test]
    fn parse_rows_is_row_major_text_column_major_storage() {
        let grid = LogicalGrid::parse_rows(&["RGB", "YPR"]).unwrap();
        assert_eq!((grid.columns(), grid.rows()), (3, 2));
        assert_eq!(grid[(0, 0)], Red);
        assert_eq!(grid[(2, 0)], Blue);
        assert_eq!(grid[(1, 1)], Purple);
        assert_eq!(grid.to_string(), "RGB\nYPR");
    }

    #[test]
    fn rejects_empty_and_ragged_input() {
        assert_eq!(
            LogicalGrid::from_columns(vec![]),
            Err(PuzzleError::EmptyGrid { columns: 0, rows: 0 })
        );
        assert_eq!(
            LogicalGrid::from_columns(vec![vec![Red, Green], vec![Blue]]),
            Err(PuzzleError::RaggedGrid { line: 1, expected: 2, found: 1 })
        );
        assert_eq!(LogicalGrid::parse_rows(&["RX"]), Err(PuzzleError::UnknownColor('X')));
    }

    #[test]
    fn shifting_wraps_the_selected_line_only() {
        let grid = LogicalGrid::parse_rows(&["RGB", "GBR", "BRG"]).unwrap();

        let right = grid.shifted(Direction::Right, 0, 1).unwrap();
        assert_eq!(right.to_string(), "RGB\nRGB\nBRG");

        let left = grid.shifted(Direction::Left, 0, 0).unwrap();
        assert_eq!(left.to_string(), "GBR\nGBR\nBRG");

        let up = grid.shifted(Direction::Up, 2, 0).unwrap();
        assert_eq!(up.to_string(), "RGR\nGBG\nBRB");

        let down = grid.shifted(Direction::Down, 0, 0).unwrap();
        assert_eq!(down.to_string(), "BGB\nRBR\nGRG");
    }

    #[test]
    fn shift_then_opposite_shift_is_identity() {
        let grid = LogicalGrid::parse_rows(&["RGBY", "PRGB"]).unwrap();
        let there = grid.shifted(Direction::Up, 3, 0).unwrap();
        assert_eq!(there.shifted(Direction::Down, 3, 0).unwrap(), grid);
    }

    #[test]
    fn shifting_a_single_line_grid_is_a_no_op_across_it() {
        let grid = LogicalGrid::parse_rows(&["RGB"]).unwrap();
        assert_eq!(grid.shifted(Direction::Up, 1, 0).unwrap(), grid);
    }

    #[test]
    fn shift_rejects_pivot_outside_grid() {
        let grid = LogicalGrid::parse_rows(&["RG", "BY"]).unwrap();
        assert_eq!(
            grid.shifted(Direction::Left, 0, 2),
            Err(PuzzleError::PivotOutOfRange { pivot: 2, limit: 2 })
        );
    }
}
