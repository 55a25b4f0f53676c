// main.rs - Toroidal slide puzzle viewer
// Each container phase is a cooperative task, polled once per frame on the tokio runtime

use eframe::egui;
use glam::Vec2;
use std::future::Future;
use std::pin::Pin;
use std::task::Poll;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use torus_core::{
    CancelHandle, ContainerConfig, Direction, LogicalGrid, Phase, PhaseState, PuzzleError,
    PuzzlePieceContainer, cancellation,
};

mod puzzles;  // Preset boards and random generator
mod stage;    // Scene side: tiles, tweens, sound
mod ui;       // eframe::App

use stage::{SharedStage, Stage, StageAudio, StageMotion, StageSpawner};

pub const TILE_SIZE: f32 = 56.0;
pub const SCRAMBLE_MOVES: usize = 20;
const DEFAULT_LOG_FILTER: &str = "torus_core=debug,torus_viewer=info";

type Container = PuzzlePieceContainer<StageSpawner, StageMotion, StageAudio>;
type PhaseTask = Pin<Box<dyn Future<Output = Settled>>>;

/// What the running task was asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Request {
    Initialize,
    Slide,
    NextPuzzle,
    Reveal,
}

/// Output of a phase task: the container back, plus the grid it was moving to
struct Settled {
    container: Container,
    result: Result<(), PuzzleError>,
    request: Request,
    next: LogicalGrid,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let first = puzzles::preset_grid(&puzzles::PRESETS[0])?;
    let app = TorusPuzzle::new(runtime, first);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 820.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Torus Slide Puzzle",
        options,
        Box::new(move |_cc| Box::new(app)),
    )?;
    Ok(())
}

/// Game controller: owns the logical grid and hands the container to one phase at a time
pub struct TorusPuzzle {
    container: Option<Container>,   // None while a phase task owns it
    task: Option<PhaseTask>,
    cancel: Option<CancelHandle>,

    pub stage: SharedStage,
    pub logical: LogicalGrid,
    pub pivot_column: usize,
    pub pivot_row: usize,
    pub selected_preset: usize,
    pub moves: u32,
    pub status: String,
    pub last_frame: Instant,

    runtime: tokio::runtime::Runtime,
    rng: rand::rngs::ThreadRng,
}

impl TorusPuzzle {
    pub fn new(runtime: tokio::runtime::Runtime, logical: LogicalGrid) -> Self {
        let mut app = Self {
            container: None,
            task: None,
            cancel: None,
            stage: Stage::shared(),
            logical: logical.clone(),
            pivot_column: 0,
            pivot_row: 0,
            selected_preset: 0,
            moves: 0,
            status: String::new(),
            last_frame: Instant::now(),
            runtime,
            rng: rand::thread_rng(),
        };
        app.load(logical);
        app
    }

    /// Board origin in container units so display cell [1, 1] sits at (0, 0)
    pub fn start_origin() -> Vec2 {
        Vec2::new(-TILE_SIZE, TILE_SIZE)
    }

    /// Replaces the container with a fresh one sized for `logical` and initializes it
    pub fn load(&mut self, logical: LogicalGrid) {
        self.task = None;   // Drops the old container with it
        self.cancel = None;

        self.stage = Stage::shared();
        let config = ContainerConfig::default().with_start_origin(Self::start_origin());
        let container = PuzzlePieceContainer::new(
            config,
            StageSpawner::new(self.stage.clone(), TILE_SIZE),
            StageMotion::new(self.stage.clone()),
            StageAudio::new(self.stage.clone()),
        );
        self.container = Some(container);
        self.logical = logical.clone();
        self.pivot_column = 0;
        self.pivot_row = 0;
        self.moves = 0;

        self.initialize();
    }

    /// Runs Initialize again after it was aborted
    pub fn initialize(&mut self) {
        let logical = self.logical.clone();
        self.launch(Request::Initialize, logical, |mut container, grid| async move {
            let result = container.initialize(&grid).await;
            (container, result)
        });
    }

    pub fn state(&self) -> Option<PhaseState> {
        self.container.as_ref().map(PuzzlePieceContainer::state)
    }

    pub fn is_busy(&self) -> bool {
        self.task.is_some()
    }

    pub fn slide(&mut self, direction: Direction) {
        let next = match self.logical.shifted(direction, self.pivot_column, self.pivot_row) {
            Ok(next) => next,
            Err(err) => {
                self.status = err.to_string();
                return;
            }
        };
        let (column, row) = (self.pivot_column, self.pivot_row);
        self.launch(Request::Slide, next, move |mut container, grid| async move {
            let result = container.update_pieces(direction, column, row, &grid).await;
            (container, result)
        });
    }

    /// Hides the board and expands it again showing a scrambled random puzzle
    pub fn next_puzzle(&mut self) {
        let next = puzzles::random_grid(self.logical.columns(), self.logical.rows(), &mut self.rng)
            .and_then(|grid| puzzles::scramble(&grid, SCRAMBLE_MOVES, &mut self.rng));
        let next = match next {
            Ok(next) => next,
            Err(err) => {
                self.status = err.to_string();
                return;
            }
        };
        self.launch(Request::NextPuzzle, next, |mut container, grid| async move {
            if let Err(err) = container.hide_process().await {
                return (container, Err(err));
            }
            let result = container.expansion_animation(&grid).await;
            (container, result)
        });
    }

    /// Expands a board left hidden by an aborted hide
    pub fn reveal(&mut self) {
        let logical = self.logical.clone();
        self.launch(Request::Reveal, logical, |mut container, grid| async move {
            let result = container.expansion_animation(&grid).await;
            (container, result)
        });
    }

    pub fn abort(&mut self) {
        if let Some(cancel) = &self.cancel {
            cancel.cancel();
        }
    }

    fn launch<F, Fut>(&mut self, request: Request, next: LogicalGrid, phase: F)
    where
        F: FnOnce(Container, LogicalGrid) -> Fut,
        Fut: Future<Output = (Container, Result<(), PuzzleError>)> + 'static,
    {
        let Some(mut container) = self.container.take() else {
            warn!(?request, "phase requested while another is running");
            return;
        };
        let (handle, token) = cancellation();
        container.set_cancel_token(token);
        self.cancel = Some(handle);
        self.status = format!("{request:?}...");

        let running = phase(container, next.clone());
        self.task = Some(Box::pin(async move {
            let (container, result) = running.await;
            Settled { container, result, request, next }
        }));
    }

    /// Polls the running phase once; called every frame
    pub fn drive(&mut self) {
        let Some(task) = self.task.as_mut() else {
            return;
        };
        let polled = self
            .runtime
            .block_on(std::future::poll_fn(|cx| Poll::Ready(task.as_mut().poll(cx))));

        if let Poll::Ready(Settled { container, result, request, next }) = polled {
            self.task = None;
            self.cancel = None;
            match result {
                Ok(()) => {
                    match request {
                        Request::Slide => self.moves += 1,
                        Request::NextPuzzle => self.moves = 0,
                        Request::Initialize | Request::Reveal => {}
                    }
                    self.logical = next;
                    self.status = container.state().to_string();
                }
                // Expand recolors before it animates, so the new grid is already showing
                Err(PuzzleError::Cancelled { phase: Phase::Expand }) => {
                    self.logical = next;
                    self.moves = 0;
                    self.status = "expand aborted".to_string();
                }
                Err(err) => {
                    warn!(%err, "phase did not finish");
                    self.status = err.to_string();
                }
            }
            info!(state = %container.state(), "phase settled");
            self.container = Some(container);
        }
    }
}
