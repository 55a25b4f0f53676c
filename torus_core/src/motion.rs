// motion.rs - Fan-out of motion requests and fan-in on their completions

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use glam::Vec2;
use tracing::{debug, trace};

use crate::cancel::CancelToken;
use crate::capability::Motion;
use crate::container::Phase;
use crate::error::{PuzzleError, Result};
use crate::piece::PieceHandle;

/// Target of one animated transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tween {
    Move { to: Vec2 },
    Scale { to: f32 },
    Fade { to: f32 },
}

#[derive(Debug, Clone)]
pub struct MotionRequest {
    pub piece: PieceHandle,
    pub tween: Tween,
    pub duration: Duration,
}

/// Looping yoyo fade of the whole container between full opacity and `min_alpha`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientPulse {
    pub min_alpha: f32,
    pub period: Duration,
}

#[derive(Debug, Default)]
struct Counter {
    completed: Cell<usize>,
}

/// One-shot completion signal handed to the motion backend with each request.
///
/// Counts exactly once: either through `complete` or when dropped unfired.
#[derive(Debug)]
pub struct Completion {
    counter: Option<Rc<Counter>>,
}

impl Completion {
    pub fn complete(mut self) {
        self.fire();
    }

    fn fire(&mut self) {
        if let Some(counter) = self.counter.take() {
            counter.completed.set(counter.completed.get() + 1);
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        self.fire();
    }
}

/// Join point for a set of concurrently running motions.
#[derive(Debug, Default)]
pub struct Batch {
    counter: Rc<Counter>,
    size: usize,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one more member and returns its completion signal.
    pub fn completion(&mut self) -> Completion {
        self.size += 1;
        Completion {
            counter: Some(Rc::clone(&self.counter)),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn completed(&self) -> usize {
        self.counter.completed.get()
    }

    pub fn is_done(&self) -> bool {
        self.completed() >= self.size
    }

    /// Yields once per tick until every member completed; returns the ticks spent.
    pub async fn wait(self, phase: Phase, cancel: &CancelToken) -> Result<usize> {
        let mut ticks = 0;
        while !self.is_done() {
            if cancel.is_cancelled() {
                debug!(%phase, completed = self.completed(), size = self.size, "batch cancelled");
                return Err(PuzzleError::Cancelled { phase });
            }
            tokio::task::yield_now().await;
            ticks += 1;
        }
        trace!(%phase, size = self.size, ticks, "batch complete");
        Ok(ticks)
    }
}

/// Issues batches on the injected motion backend and waits for each one as a whole.
#[derive(Debug)]
pub struct MotionCoordinator<M> {
    motion: M,
}

impl<M: Motion> MotionCoordinator<M> {
    pub fn new(motion: M) -> Self {
        Self { motion }
    }

    pub fn motion(&self) -> &M {
        &self.motion
    }

    /// Starts every request, then waits for all of them.
    ///
    /// On cancellation the backend is told to stop each member, so nothing keeps
    /// animating after the phase gave up on the batch.
    pub async fn run_batch(
        &mut self,
        requests: impl IntoIterator<Item = MotionRequest>,
        phase: Phase,
        cancel: &CancelToken,
    ) -> Result<usize> {
        let mut batch = Batch::new();
        let mut members = Vec::new();
        for request in requests {
            members.push(request.piece.clone());
            let done = batch.completion();
            self.motion.begin(request, done);
        }
        debug!(%phase, size = batch.size(), "motion batch issued");

        let waited = batch.wait(phase, cancel).await;
        if waited.is_err() {
            for piece in &members {
                self.motion.cancel(piece);
            }
        }
        waited
    }

    pub fn pulse(&mut self, pulse: AmbientPulse) {
        self.motion.pulse(pulse);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::cancellation;
    use crate::capability::InstantMotion;
    use crate::piece::PieceId;
    use std::cell::RefCell;

    #[test]
    fn completion_counts_once_whether_fired_or_dropped() {
        let mut batch = Batch::new();
        let first = batch.completion();
        let second = batch.completion();
        assert_eq!((batch.size(), batch.completed()), (2, 0));

        first.complete();
        assert_eq!(batch.completed(), 1);
        assert!(!batch.is_done());

        drop(second);
        assert_eq!(batch.completed(), 2);
        assert!(batch.is_done());
    }

    #[tokio::test]
    async fn empty_batch_finishes_without_yielding() {
        let ticks = Batch::new().wait(Phase::Hide, &CancelToken::never()).await.unwrap();
        assert_eq!(ticks, 0);
    }

    #[tokio::test]
    async fn waits_for_every_member_in_any_order() {
        let mut batch = Batch::new();
        let mut pending: Vec<Option<Completion>> = (0..4).map(|_| Some(batch.completion())).collect();
        let observed = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&observed);
        let counter = Rc::clone(&batch.counter);

        // Finish out of issue order, two ticks apart.
        let driver = async move {
            for index in [2, 0, 3, 1] {
                tokio::task::yield_now().await;
                tokio::task::yield_now().await;
                if let Some(done) = pending[index].take() {
                    done.complete();
                }
                seen.borrow_mut().push(counter.completed.get());
            }
        };

        let never = CancelToken::never();
        let (ticks, ()) = tokio::join!(batch.wait(Phase::Shift, &never), driver);
        assert!(ticks.unwrap() >= 4);
        assert_eq!(*observed.borrow(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn cancelled_wait_reports_the_phase() {
        let (handle, token) = cancellation();
        let mut batch = Batch::new();
        let _never_completes = batch.completion();
        handle.cancel();
        assert_eq!(
            batch.wait(Phase::Expand, &token).await,
            Err(PuzzleError::Cancelled { phase: Phase::Expand })
        );
    }

    /// Holds every completion until told to stop the piece.
    #[derive(Default)]
    struct Stalled {
        running: Vec<(PieceId, Completion)>,
        stopped: Vec<PieceId>,
    }

    impl Motion for Stalled {
        fn begin(&mut self, request: MotionRequest, done: Completion) {
            self.running.push((request.piece.id(), done));
        }

        fn cancel(&mut self, piece: &PieceHandle) {
            self.running.retain(|(id, _)| *id != piece.id());
            self.stopped.push(piece.id());
        }
    }

    #[tokio::test]
    async fn cancelled_batch_stops_every_member() {
        let pieces: Vec<_> = (0..3).map(|i| PieceHandle::new(PieceId(i), 1.0, 1.0)).collect();
        let mut coordinator = MotionCoordinator::new(Stalled::default());
        let (handle, token) = cancellation();

        let canceller = async {
            tokio::task::yield_now().await;
            handle.cancel();
        };
        let requests = pieces.iter().map(|p| p.move_by(Vec2::X, Duration::from_millis(500)));
        let (result, ()) = tokio::join!(coordinator.run_batch(requests, Phase::Shift, &token), canceller);

        assert_eq!(result, Err(PuzzleError::Cancelled { phase: Phase::Shift }));
        assert!(coordinator.motion().running.is_empty());
        assert_eq!(coordinator.motion().stopped, vec![PieceId(0), PieceId(1), PieceId(2)]);
    }

    #[tokio::test]
    async fn coordinator_runs_requests_through_the_backend() {
        let pieces: Vec<_> = (0..3).map(|i| PieceHandle::new(PieceId(i), 1.0, 1.0)).collect();
        let mut coordinator = MotionCoordinator::new(InstantMotion::default());
        let requests = pieces.iter().map(|p| p.scale_to(0.0, Duration::from_millis(500)));

        let ticks = coordinator
            .run_batch(requests, Phase::Hide, &CancelToken::never())
            .await
            .unwrap();

        assert_eq!(ticks, 0);
        assert_eq!(coordinator.motion().started(), 3);
        assert!(pieces.iter().all(|p| p.scale() == 0.0));
    }
}
