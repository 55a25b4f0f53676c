// stage.rs - Scene side of the container: spawned tiles, linear tweens, move sound

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{info, trace};
use torus_core::capability::apply_tween;
use torus_core::{
    AmbientPulse, Audio, Completion, FixedSizeSpawner, Motion, MotionRequest, PieceHandle,
    PieceSpawner, Tween,
};

const SOUND_FLASH_SECONDS: f32 = 0.25;

struct ActiveTween {
    piece: PieceHandle,
    from: Tween,
    to: Tween,
    duration: f32,
    elapsed: f32,
    done: Option<Completion>,
}

impl ActiveTween {
    fn start(request: MotionRequest, done: Completion) -> Self {
        let from = match request.tween {
            Tween::Move { .. } => Tween::Move { to: request.piece.position() },
            Tween::Scale { .. } => Tween::Scale { to: request.piece.scale() },
            Tween::Fade { .. } => Tween::Fade { to: request.piece.alpha() },
        };
        Self {
            piece: request.piece,
            from,
            to: request.tween,
            duration: request.duration.as_secs_f32(),
            elapsed: 0.0,
            done: Some(done),
        }
    }

    // Returns true once finished.
    fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        let t = if self.duration > 0.0 { (self.elapsed / self.duration).min(1.0) } else { 1.0 };

        let current = match (self.from, self.to) {
            (Tween::Move { to: a }, Tween::Move { to: b }) => Tween::Move { to: a.lerp(b, t) },
            (Tween::Scale { to: a }, Tween::Scale { to: b }) => Tween::Scale { to: a + (b - a) * t },
            (Tween::Fade { to: a }, Tween::Fade { to: b }) => Tween::Fade { to: a + (b - a) * t },
            (_, end) => end,
        };
        apply_tween(&self.piece, current);

        if t >= 1.0 {
            if let Some(done) = self.done.take() {
                done.complete();
            }
            true
        } else {
            false
        }
    }
}

#[derive(Default)]
pub struct Stage {
    pieces: Vec<PieceHandle>,
    tweens: Vec<ActiveTween>,
    pulse: Option<AmbientPulse>,
    pulse_elapsed: f32,
    sound_flash: f32,
    pub moves_played: u32,
}

pub type SharedStage = Rc<RefCell<Stage>>;

impl Stage {
    pub fn shared() -> SharedStage {
        Rc::new(RefCell::new(Stage::default()))
    }

    pub fn pieces(&self) -> &[PieceHandle] {
        &self.pieces
    }

    pub fn is_animating(&self) -> bool {
        !self.tweens.is_empty() || self.pulse.is_some() || self.sound_flash > 0.0
    }

    pub fn advance(&mut self, dt: f32) {
        self.tweens.retain_mut(|tween| !tween.advance(dt));
        self.pulse_elapsed += dt;
        self.sound_flash = (self.sound_flash - dt).max(0.0);
    }

    /// Opacity of the whole board, bouncing between 1 and the pulse minimum.
    pub fn container_alpha(&self) -> f32 {
        let Some(pulse) = self.pulse else {
            return 1.0;
        };
        let period = pulse.period.as_secs_f32();
        if period <= 0.0 {
            return 1.0;
        }
        let phase = (self.pulse_elapsed / period) % 2.0;
        let f = if phase < 1.0 { phase } else { 2.0 - phase };
        1.0 + (pulse.min_alpha - 1.0) * f
    }

    pub fn sound_flash(&self) -> f32 {
        self.sound_flash / SOUND_FLASH_SECONDS
    }
}

pub struct StageSpawner {
    stage: SharedStage,
    template: FixedSizeSpawner,
}

impl StageSpawner {
    pub fn new(stage: SharedStage, tile_size: f32) -> Self {
        Self { stage, template: FixedSizeSpawner::new(tile_size, tile_size) }
    }
}

impl PieceSpawner for StageSpawner {
    fn spawn(&mut self) -> PieceHandle {
        let piece = self.template.spawn();
        self.stage.borrow_mut().pieces.push(piece.clone());
        piece
    }
}

pub struct StageMotion {
    stage: SharedStage,
}

impl StageMotion {
    pub fn new(stage: SharedStage) -> Self {
        Self { stage }
    }
}

impl Motion for StageMotion {
    fn begin(&mut self, request: MotionRequest, done: Completion) {
        self.stage.borrow_mut().tweens.push(ActiveTween::start(request, done));
    }

    // Dropping the tween drops its completion; the piece stays where it is
    fn cancel(&mut self, piece: &PieceHandle) {
        let mut stage = self.stage.borrow_mut();
        let before = stage.tweens.len();
        stage.tweens.retain(|tween| tween.piece.id() != piece.id());
        trace!(piece = ?piece.id(), stopped = before - stage.tweens.len(), "tweens stopped");
    }

    fn pulse(&mut self, pulse: AmbientPulse) {
        let mut stage = self.stage.borrow_mut();
        stage.pulse = Some(pulse);
        stage.pulse_elapsed = 0.0;
    }
}

pub struct StageAudio {
    stage: SharedStage,
}

impl StageAudio {
    pub fn new(stage: SharedStage) -> Self {
        Self { stage }
    }
}

impl Audio for StageAudio {
    fn play_puzzle_move(&mut self) {
        let mut stage = self.stage.borrow_mut();
        stage.moves_played += 1;
        stage.sound_flash = SOUND_FLASH_SECONDS;
        info!(moves = stage.moves_played, "puzzle move");
    }
}
