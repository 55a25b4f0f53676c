// instantiate.rs - Builds the display grid one column per scheduling slice

use glam::Vec2;
use tracing::trace;

use crate::cancel::CancelToken;
use crate::capability::PieceSpawner;
use crate::container::Phase;
use crate::error::{PuzzleError, Result};
use crate::piece::PieceHandle;

pub struct PieceInstantiator<S> {
    spawner: S,
}

impl<S: PieceSpawner> PieceInstantiator<S> {
    pub fn new(spawner: S) -> Self {
        Self { spawner }
    }

    pub fn spawner(&self) -> &S {
        &self.spawner
    }

    /// Appends `columns` columns of `rows` tiles to `pieces`, each placed on the
    /// lattice at `origin`, yielding after every finished column.
    ///
    /// A cancelled token stops before the next column; finished columns stay in `pieces`.
    pub async fn create_grid(
        &mut self,
        pieces: &mut Vec<Vec<PieceHandle>>,
        columns: usize,
        rows: usize,
        origin: Vec2,
        cancel: &CancelToken,
    ) -> Result<()> {
        for column in 0..columns {
            if cancel.is_cancelled() {
                return Err(PuzzleError::Cancelled { phase: Phase::Initialize });
            }

            let mut line = Vec::with_capacity(rows);
            for row in 0..rows {
                let piece = self.spawner.spawn();
                piece.set_position(piece.lattice_position(origin, column, row));
                line.push(piece);
            }
            pieces.push(line);

            trace!(column, rows, "instantiated column");
            tokio::task::yield_now().await; // one column per slice
        }
        Ok(())
    }
}
