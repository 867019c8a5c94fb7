//! Snapshot structures for the render feed.
//!
//! Lightweight read-only copies of simulation state, built once per
//! frame and handed to the renderer. The renderer never touches live
//! state.

use crate::camera::CameraView;
use crate::grid::{GridSize, Position};
use crate::palette::Color;
use crate::stats::Stats;

/// View of one snake for drawing.
#[derive(Clone, Debug)]
pub struct SnakeView {
    pub alive: bool,
    /// Ordered body positions, head first.
    pub body: Vec<Position>,
    pub color: Color,
}

/// View of one food item for drawing.
#[derive(Clone, Debug)]
pub struct FoodView {
    pub position: Position,
    /// 1.0 fresh, 0.0 at expiry; drives the shrink effect.
    pub freshness: f32,
    pub color: Color,
}

/// Complete per-frame snapshot.
#[derive(Clone, Debug)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub grid: GridSize,
    pub snakes: Vec<SnakeView>,
    pub foods: Vec<FoodView>,
    pub camera: CameraView,
    pub stats: Stats,
}
