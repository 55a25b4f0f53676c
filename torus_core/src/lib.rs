// lib.rs - Toroidal sliding-tile piece container
//
// A logical N x M color grid is shown through an (N + 2) x (M + 2) grid of tiles
// whose outer ring duplicates the opposite edges, so sliding a row or column one
// cell looks like an endless wrap. Phases are cooperative async operations driven
// by the host's frame loop.

pub mod cancel;
pub mod capability;
pub mod config;
pub mod container;
pub mod display;
pub mod error;
pub mod grid;
pub mod instantiate;
pub mod motion;
pub mod piece;

pub use cancel::{CancelHandle, CancelToken, cancellation};
pub use capability::{Audio, FixedSizeSpawner, InstantMotion, Motion, PieceSpawner, Silent};
pub use config::ContainerConfig;
pub use container::{Phase, PhaseState, PuzzlePieceContainer};
pub use display::GridModel;
pub use error::{PuzzleError, Result};
pub use grid::{Direction, LogicalGrid, PieceColor};
pub use instantiate::PieceInstantiator;
pub use motion::{AmbientPulse, Batch, Completion, MotionCoordinator, MotionRequest, Tween};
pub use piece::{PieceHandle, PieceId, PieceNode};
