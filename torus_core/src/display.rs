// display.rs - The oversized display grid with wrap-around border duplicates
//
// Display cell [c + 1, r + 1] shows logical cell [c, r]. The outer ring repeats
// the opposite logical edge so a one-cell slide uncovers the colors that wrap in:
//
//   top    [c + 1, 0]     = L[c, M - 1]      bottom [c + 1, M + 1] = L[c, 0]
//   left   [0, r + 1]     = L[N - 1, r]      right  [N + 1, r + 1] = L[0, r]
//
// Corners take the diagonally opposite logical corner.

use glam::Vec2;
use tracing::{debug, trace};

use crate::cancel::CancelToken;
use crate::capability::PieceSpawner;
use crate::error::{PuzzleError, Result};
use crate::grid::{Direction, LogicalGrid, PieceColor};
use crate::instantiate::PieceInstantiator;
use crate::piece::PieceHandle;

pub struct GridModel {
    columns: usize, // logical
    rows: usize,    // logical
    pieces: Vec<Vec<PieceHandle>>, // [display column][display row]
    tile: Vec2,
}

impl GridModel {
    /// Allocates `(N + 2) x (M + 2)` tiles through `instantiator`, then syncs colors.
    pub async fn initialize<S: PieceSpawner>(
        instantiator: &mut PieceInstantiator<S>,
        logical: &LogicalGrid,
        origin: Vec2,
        cancel: &CancelToken,
    ) -> Result<Self> {
        let (columns, rows) = (logical.columns(), logical.rows());
        if columns == 0 || rows == 0 {
            return Err(PuzzleError::EmptyGrid { columns, rows });
        }

        let mut pieces = Vec::with_capacity(columns + 2);
        instantiator
            .create_grid(&mut pieces, columns + 2, rows + 2, origin, cancel)
            .await?;
        debug!(columns = columns + 2, rows = rows + 2, "display grid allocated");

        // Every tile comes from the same template
        let tile = pieces
            .first()
            .and_then(|line| line.first())
            .map(|piece| Vec2::new(piece.width(), piece.height()))
            .ok_or(PuzzleError::EmptyGrid { columns, rows })?;

        let mut model = Self { columns, rows, pieces, tile };
        model.sync_colors(logical)?;
        Ok(model)
    }

    pub fn display_columns(&self) -> usize {
        self.columns + 2
    }

    pub fn display_rows(&self) -> usize {
        self.rows + 2
    }

    /// Offset of a one-cell slide in container space, where y grows upwards.
    pub fn step(&self, direction: Direction) -> Vec2 {
        match direction {
            Direction::Up => Vec2::new(0.0, self.tile.y),
            Direction::Down => Vec2::new(0.0, -self.tile.y),
            Direction::Right => Vec2::new(self.tile.x, 0.0),
            Direction::Left => Vec2::new(-self.tile.x, 0.0),
        }
    }

    pub fn piece(&self, column: usize, row: usize) -> Option<&PieceHandle> {
        self.pieces.get(column)?.get(row)
    }

    /// Every tile, column by column.
    pub fn pieces(&self) -> impl Iterator<Item = &PieceHandle> {
        self.pieces.iter().flatten()
    }

    pub fn color_at(&self, column: usize, row: usize) -> Option<PieceColor> {
        self.piece(column, row)?.color()
    }

    pub fn check_dimensions(&self, logical: &LogicalGrid) -> Result<()> {
        if logical.columns() != self.columns || logical.rows() != self.rows {
            return Err(PuzzleError::DimensionMismatch {
                expected_columns: self.columns,
                expected_rows: self.rows,
                columns: logical.columns(),
                rows: logical.rows(),
            });
        }
        Ok(())
    }

    /// Writes the interior, then the border ring, from `logical` alone.
    pub fn sync_colors(&mut self, logical: &LogicalGrid) -> Result<()> {
        self.check_dimensions(logical)?;
        let (n, m) = (self.columns, self.rows);

        for column in 0..n {
            for row in 0..m {
                self.pieces[column + 1][row + 1].set_color(logical[(column, row)]);
            }
        }

        for column in 0..n {
            self.pieces[column + 1][0].set_color(logical[(column, m - 1)]);
            self.pieces[column + 1][m + 1].set_color(logical[(column, 0)]);
        }
        for row in 0..m {
            self.pieces[0][row + 1].set_color(logical[(n - 1, row)]);
            self.pieces[n + 1][row + 1].set_color(logical[(0, row)]);
        }

        self.pieces[0][0].set_color(logical[(n - 1, m - 1)]);
        self.pieces[n + 1][0].set_color(logical[(0, m - 1)]);
        self.pieces[0][m + 1].set_color(logical[(n - 1, 0)]);
        self.pieces[n + 1][m + 1].set_color(logical[(0, 0)]);

        trace!("synced colors\n{logical}");
        Ok(())
    }

    /// Snaps every tile back onto the lattice anchored at `origin`.
    pub fn reset_positions(&self, origin: Vec2) {
        for (column, line) in self.pieces.iter().enumerate() {
            for (row, piece) in line.iter().enumerate() {
                piece.set_position(piece.lattice_position(origin, column, row));
            }
        }
    }

    /// Tiles that travel together when sliding logical `column` (Up/Down) or
    /// logical `row` (Left/Right), border duplicates included.
    pub fn line(&self, direction: Direction, column: usize, row: usize) -> Result<Vec<PieceHandle>> {
        if direction.is_vertical() {
            if column >= self.columns {
                return Err(PuzzleError::PivotOutOfRange { pivot: column, limit: self.columns });
            }
            Ok(self.pieces[column + 1].clone())
        } else {
            if row >= self.rows {
                return Err(PuzzleError::PivotOutOfRange { pivot: row, limit: self.rows });
            }
            Ok(self.pieces.iter().map(|line| line[row + 1].clone()).collect())
        }
    }

    /// Current colors as `[display column][display row]`.
    pub fn colors(&self) -> Vec<Vec<Option<PieceColor>>> {
        self.pieces
            .iter()
            .map(|line| line.iter().map(PieceHandle::color).collect())
            .collect()
    }
}
