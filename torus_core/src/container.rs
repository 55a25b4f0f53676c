// container.rs - Phase sequencing for the puzzle piece container
//
//   Idle -> Initializing -> Ready -> Shifting -> Ready
//                           Ready -> Hiding -> Hidden -> Expanding -> Ready
//
// Every phase is an async fn. A phase only returns once every tile it animated
// has reported completion, so the caller can never overlap two phases.

use std::fmt;

use tracing::{debug, info};

use crate::cancel::CancelToken;
use crate::capability::{Audio, Motion, PieceSpawner};
use crate::config::ContainerConfig;
use crate::display::GridModel;
use crate::error::{PuzzleError, Result};
use crate::grid::{Direction, LogicalGrid};
use crate::instantiate::PieceInstantiator;
use crate::motion::MotionCoordinator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Initialize,
    Shift,
    Hide,
    Expand,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Initialize => "initialize",
            Phase::Shift => "shift",
            Phase::Hide => "hide",
            Phase::Expand => "expand",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseState {
    Idle,
    Initializing,
    Ready,
    Shifting,
    Hiding,
    Hidden,
    Expanding,
}

impl fmt::Display for PhaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PhaseState::Idle => "idle",
            PhaseState::Initializing => "initializing",
            PhaseState::Ready => "ready",
            PhaseState::Shifting => "shifting",
            PhaseState::Hiding => "hiding",
            PhaseState::Hidden => "hidden",
            PhaseState::Expanding => "expanding",
        })
    }
}

pub struct PuzzlePieceContainer<S, M, A> {
    config: ContainerConfig,
    state: PhaseState,
    grid: Option<GridModel>,
    instantiator: PieceInstantiator<S>,
    coordinator: MotionCoordinator<M>,
    audio: A,
    cancel: CancelToken,
}

impl<S, M, A> PuzzlePieceContainer<S, M, A>
where
    S: PieceSpawner,
    M: Motion,
    A: Audio,
{
    pub fn new(config: ContainerConfig, spawner: S, motion: M, audio: A) -> Self {
        Self {
            config,
            state: PhaseState::Idle,
            grid: None,
            instantiator: PieceInstantiator::new(spawner),
            coordinator: MotionCoordinator::new(motion),
            audio,
            cancel: CancelToken::never(),
        }
    }

    /// Token checked by every following phase until replaced.
    pub fn set_cancel_token(&mut self, cancel: CancelToken) {
        self.cancel = cancel;
    }

    pub fn state(&self) -> PhaseState {
        self.state
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    pub fn grid(&self) -> Option<&GridModel> {
        self.grid.as_ref()
    }

    pub fn spawner(&self) -> &S {
        self.instantiator.spawner()
    }

    pub fn motion(&self) -> &M {
        self.coordinator.motion()
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    fn expect_state(&self, phase: Phase, allowed: &[PhaseState]) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(PuzzleError::InvalidPhase { phase, state: self.state })
        }
    }

    /// Creates the display grid, colors it from `logical`, and starts the ambient pulse.
    ///
    /// Cancelling drops every tile created so far and returns to `Idle`.
    pub async fn initialize(&mut self, logical: &LogicalGrid) -> Result<()> {
        self.expect_state(Phase::Initialize, &[PhaseState::Idle])?;
        info!(columns = logical.columns(), rows = logical.rows(), "initializing piece container");

        self.state = PhaseState::Initializing;
        let cancel = self.cancel.clone();
        match GridModel::initialize(&mut self.instantiator, logical, self.config.start_origin, &cancel).await {
            Ok(model) => {
                self.grid = Some(model);
                self.coordinator.pulse(self.config.pulse);
                self.state = PhaseState::Ready;
                Ok(())
            }
            Err(err) => {
                self.state = PhaseState::Idle;
                Err(err)
            }
        }
    }

    /// Slides one line a cell in `direction`, then snaps back and shows `next`.
    ///
    /// Up/Down slide logical column `pivot_column`; Left/Right slide logical row
    /// `pivot_row`. Dimensions and pivot are checked before anything moves.
    /// Cancelling snaps positions back but keeps the old colors.
    pub async fn update_pieces(
        &mut self,
        direction: Direction,
        pivot_column: usize,
        pivot_row: usize,
        next: &LogicalGrid,
    ) -> Result<()> {
        self.expect_state(Phase::Shift, &[PhaseState::Ready])?;
        let grid = self.grid.as_mut().ok_or(PuzzleError::InvalidPhase {
            phase: Phase::Shift,
            state: self.state,
        })?;
        grid.check_dimensions(next)?;
        let line = grid.line(direction, pivot_column, pivot_row)?;
        let distance = grid.step(direction);
        debug!(?direction, pivot_column, pivot_row, tiles = line.len(), "shift started");

        self.state = PhaseState::Shifting;
        self.audio.play_puzzle_move();
        let duration = self.config.move_duration;
        let moved = self
            .coordinator
            .run_batch(
                line.iter().map(|piece| piece.move_by(distance, duration)),
                Phase::Shift,
                &self.cancel,
            )
            .await;

        grid.reset_positions(self.config.start_origin);
        if moved.is_ok() {
            grid.sync_colors(next)?;
        }
        self.state = PhaseState::Ready;
        debug!(?direction, "shift finished");
        moved.map(|_| ())
    }

    /// Shrinks every tile to nothing. Also accepted when already hidden.
    pub async fn hide_process(&mut self) -> Result<()> {
        self.expect_state(Phase::Hide, &[PhaseState::Ready, PhaseState::Hidden])?;
        let grid = self.grid.as_ref().ok_or(PuzzleError::InvalidPhase {
            phase: Phase::Hide,
            state: self.state,
        })?;

        self.state = PhaseState::Hiding;
        let duration = self.config.scale_duration;
        let hidden = self
            .coordinator
            .run_batch(
                grid.pieces().map(|piece| piece.scale_to(0.0, duration)),
                Phase::Hide,
                &self.cancel,
            )
            .await;

        self.state = PhaseState::Hidden;
        debug!("hide finished");
        hidden.map(|_| ())
    }

    /// Recolors to `next` while hidden, then grows every tile back to full size.
    pub async fn expansion_animation(&mut self, next: &LogicalGrid) -> Result<()> {
        self.expect_state(Phase::Expand, &[PhaseState::Hidden])?;
        let grid = self.grid.as_mut().ok_or(PuzzleError::InvalidPhase {
            phase: Phase::Expand,
            state: self.state,
        })?;
        grid.sync_colors(next)?;

        self.state = PhaseState::Expanding;
        let duration = self.config.scale_duration;
        let expanded = self
            .coordinator
            .run_batch(
                grid.pieces().map(|piece| piece.scale_to(1.0, duration)),
                Phase::Expand,
                &self.cancel,
            )
            .await;

        self.state = PhaseState::Ready;
        debug!("expand finished");
        expanded.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{FixedSizeSpawner, InstantMotion, Silent};

    type TestContainer = PuzzlePieceContainer<FixedSizeSpawner, InstantMotion, Silent>;

    fn container() -> TestContainer {
        PuzzlePieceContainer::new(
            ContainerConfig::default(),
            FixedSizeSpawner::new(1.0, 1.0),
            InstantMotion::default(),
            Silent::default(),
        )
    }

    fn grid(rows: &[&str]) -> LogicalGrid {
        LogicalGrid::parse_rows(rows).unwrap()
    }

    #[tokio::test]
    async fn initialize_reaches_ready_and_starts_the_pulse() {
        let mut container = container();
        assert_eq!(container.state(), PhaseState::Idle);
        container.initialize(&grid(&["RG", "BY"])).await.unwrap();

        assert_eq!(container.state(), PhaseState::Ready);
        assert_eq!(container.spawner().spawned(), 16);
        assert_eq!(container.motion().pulse_requested(), Some(container.config().pulse));
    }

    #[tokio::test]
    async fn phases_out_of_order_fail_fast() {
        let mut container = container();
        let next = grid(&["RG", "BY"]);

        assert_eq!(
            container.update_pieces(Direction::Up, 0, 0, &next).await,
            Err(PuzzleError::InvalidPhase { phase: Phase::Shift, state: PhaseState::Idle })
        );
        assert_eq!(
            container.hide_process().await,
            Err(PuzzleError::InvalidPhase { phase: Phase::Hide, state: PhaseState::Idle })
        );

        container.initialize(&next).await.unwrap();
        assert_eq!(
            container.initialize(&next).await,
            Err(PuzzleError::InvalidPhase { phase: Phase::Initialize, state: PhaseState::Ready })
        );
        assert_eq!(
            container.expansion_animation(&next).await,
            Err(PuzzleError::InvalidPhase { phase: Phase::Expand, state: PhaseState::Ready })
        );

        container.hide_process().await.unwrap();
        assert_eq!(
            container.update_pieces(Direction::Left, 0, 0, &next).await,
            Err(PuzzleError::InvalidPhase { phase: Phase::Shift, state: PhaseState::Hidden })
        );
    }

    #[tokio::test]
    async fn mismatched_next_grid_leaves_container_untouched() {
        let mut container = container();
        container.initialize(&grid(&["RGB", "GBR", "BRG"])).await.unwrap();

        let result = container.update_pieces(Direction::Up, 0, 0, &grid(&["RG", "GB"])).await;
        assert!(matches!(result, Err(PuzzleError::DimensionMismatch { .. })));
        assert_eq!(container.state(), PhaseState::Ready);
        assert_eq!(container.motion().started(), 0);
        assert_eq!(container.audio().moves_played, 0);
    }

    #[tokio::test]
    async fn pivot_out_of_range_is_rejected_before_moving() {
        let mut container = container();
        let logical = grid(&["RGB", "GBR"]);
        container.initialize(&logical).await.unwrap();

        assert_eq!(
            container.update_pieces(Direction::Right, 0, 2, &logical).await,
            Err(PuzzleError::PivotOutOfRange { pivot: 2, limit: 2 })
        );
        assert_eq!(container.state(), PhaseState::Ready);
    }

    #[tokio::test]
    async fn hide_is_idempotent_and_expand_restores_scale() {
        let mut container = container();
        container.initialize(&grid(&["RG", "BY"])).await.unwrap();

        container.hide_process().await.unwrap();
        container.hide_process().await.unwrap();
        assert_eq!(container.state(), PhaseState::Hidden);
        let grid_model = container.grid().unwrap();
        assert!(grid_model.pieces().all(|piece| piece.scale() == 0.0));

        container.expansion_animation(&grid(&["YB", "GR"])).await.unwrap();
        assert_eq!(container.state(), PhaseState::Ready);
        let grid_model = container.grid().unwrap();
        assert!(grid_model.pieces().all(|piece| piece.scale() == 1.0));
        assert_eq!(grid_model.color_at(1, 1), Some(crate::grid::PieceColor::Yellow));
    }
}
