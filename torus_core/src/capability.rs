// capability.rs - Collaborators the container borrows from its host

use tracing::trace;

use crate::motion::{AmbientPulse, Completion, MotionRequest, Tween};
use crate::piece::{PieceHandle, PieceId};

/// Creates tiles in the host scene from its piece template.
pub trait PieceSpawner {
    /// A fresh tile at (0, 0) with the template's fixed size.
    fn spawn(&mut self) -> PieceHandle;
}

/// Animates tiles. `done` must be completed (or dropped) once the transition ends.
pub trait Motion {
    fn begin(&mut self, request: MotionRequest, done: Completion);

    /// Stops whatever is still running on `piece`, leaving it where it is.
    /// Completions of the stopped transitions may simply be dropped.
    fn cancel(&mut self, _piece: &PieceHandle) {}

    /// Ambient container effect; never awaited.
    fn pulse(&mut self, _pulse: AmbientPulse) {}
}

pub trait Audio {
    fn play_puzzle_move(&mut self);
}

/// Spawns same-sized tiles with increasing ids.
#[derive(Debug, Clone)]
pub struct FixedSizeSpawner {
    width: f32,
    height: f32,
    next_id: u32,
}

impl FixedSizeSpawner {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height, next_id: 0 }
    }

    pub fn spawned(&self) -> u32 {
        self.next_id
    }
}

impl PieceSpawner for FixedSizeSpawner {
    fn spawn(&mut self) -> PieceHandle {
        let handle = PieceHandle::new(PieceId(self.next_id), self.width, self.height);
        self.next_id += 1;
        handle
    }
}

/// Applies every tween's end state on the spot, for headless hosts.
#[derive(Debug, Default)]
pub struct InstantMotion {
    started: usize,
    pulse: Option<AmbientPulse>,
}

impl InstantMotion {
    pub fn started(&self) -> usize {
        self.started
    }

    pub fn pulse_requested(&self) -> Option<AmbientPulse> {
        self.pulse
    }
}

pub fn apply_tween(piece: &PieceHandle, tween: Tween) {
    match tween {
        Tween::Move { to } => piece.set_position(to),
        Tween::Scale { to } => piece.set_scale(to),
        Tween::Fade { to } => piece.set_alpha(to),
    }
}

impl Motion for InstantMotion {
    fn begin(&mut self, request: MotionRequest, done: Completion) {
        self.started += 1;
        apply_tween(&request.piece, request.tween);
        done.complete();
    }

    fn pulse(&mut self, pulse: AmbientPulse) {
        self.pulse = Some(pulse);
    }
}

/// Audio stand-in that only counts requests.
#[derive(Debug, Default)]
pub struct Silent {
    pub moves_played: usize,
}

impl Audio for Silent {
    fn play_puzzle_move(&mut self) {
        self.moves_played += 1;
        trace!(count = self.moves_played, "puzzle move sound (silent)");
    }
}
