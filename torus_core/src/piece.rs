// piece.rs - Handles to renderable tiles

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use glam::Vec2;

use crate::grid::PieceColor;
use crate::motion::{MotionRequest, Tween};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub u32);

/// Visual state of one tile as the host scene sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceNode {
    pub position: Vec2,
    pub scale: f32,
    pub alpha: f32,
    pub color: Option<PieceColor>,
}

impl Default for PieceNode {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            scale: 1.0,
            alpha: 1.0,
            color: None,
        }
    }
}

/// Shared reference to a scene tile.
///
/// Clones point at the same node, so the container and the host's motion backend
/// both see writes made by the other. Width and height never change.
#[derive(Debug, Clone)]
pub struct PieceHandle {
    id: PieceId,
    size: Vec2,
    node: Rc<RefCell<PieceNode>>,
}

impl PieceHandle {
    pub fn new(id: PieceId, width: f32, height: f32) -> Self {
        Self {
            id,
            size: Vec2::new(width, height),
            node: Rc::new(RefCell::new(PieceNode::default())),
        }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn node(&self) -> PieceNode {
        *self.node.borrow()
    }

    pub fn position(&self) -> Vec2 {
        self.node.borrow().position
    }

    pub fn set_position(&self, position: Vec2) {
        self.node.borrow_mut().position = position;
    }

    pub fn color(&self) -> Option<PieceColor> {
        self.node.borrow().color
    }

    pub fn set_color(&self, color: PieceColor) {
        self.node.borrow_mut().color = Some(color);
    }

    pub fn scale(&self) -> f32 {
        self.node.borrow().scale
    }

    pub fn set_scale(&self, scale: f32) {
        self.node.borrow_mut().scale = scale;
    }

    pub fn alpha(&self) -> f32 {
        self.node.borrow().alpha
    }

    pub fn set_alpha(&self, alpha: f32) {
        self.node.borrow_mut().alpha = alpha;
    }

    /// Where cell `(column, row)` sits when the grid rests on its lattice.
    /// Rows grow downwards, so they subtract from y.
    pub fn lattice_position(&self, origin: Vec2, column: usize, row: usize) -> Vec2 {
        origin + Vec2::new(column as f32 * self.size.x, -(row as f32) * self.size.y)
    }

    pub fn move_by(&self, offset: Vec2, duration: Duration) -> MotionRequest {
        MotionRequest {
            piece: self.clone(),
            tween: Tween::Move { to: self.position() + offset },
            duration,
        }
    }

    pub fn scale_to(&self, scale: f32, duration: Duration) -> MotionRequest {
        MotionRequest {
            piece: self.clone(),
            tween: Tween::Scale { to: scale },
            duration,
        }
    }

    pub fn fade_to(&self, alpha: f32, duration: Duration) -> MotionRequest {
        MotionRequest {
            piece: self.clone(),
            tween: Tween::Fade { to: alpha },
            duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_node() {
        let handle = PieceHandle::new(PieceId(7), 2.0, 3.0);
        let other = handle.clone();
        other.set_color(PieceColor::Yellow);
        other.set_position(Vec2::new(4.0, -6.0));
        assert_eq!(handle.color(), Some(PieceColor::Yellow));
        assert_eq!(handle.position(), Vec2::new(4.0, -6.0));
        assert_eq!(handle.id(), PieceId(7));
    }

    #[test]
    fn lattice_positions_step_right_and_down() {
        let handle = PieceHandle::new(PieceId(0), 10.0, 20.0);
        let origin = Vec2::new(5.0, 5.0);
        assert_eq!(handle.lattice_position(origin, 0, 0), origin);
        assert_eq!(handle.lattice_position(origin, 2, 3), Vec2::new(25.0, -55.0));
    }

    #[test]
    fn move_request_targets_current_position_plus_offset() {
        let handle = PieceHandle::new(PieceId(1), 1.0, 1.0);
        handle.set_position(Vec2::new(1.0, 1.0));
        let request = handle.move_by(Vec2::new(0.0, 2.0), Duration::from_millis(100));
        assert_eq!(request.tween, Tween::Move { to: Vec2::new(1.0, 3.0) });
        assert_eq!(request.piece.id(), PieceId(1));
    }
}
