//! Auto-framing camera controller.
//!
//! Keeps a smoothed (center, distance) framing that tracks the bounding
//! box of all live snakes. Pure state machine: no graphics context, the
//! renderer derives its eye/look-at from [`CameraView`]. Units are grid
//! cells throughout; the renderer applies its own cell-size scale.

use serde::{Deserialize, Serialize};

use crate::config::CameraConfig;
use crate::grid::{GridSize, Position};

/// Float triple for camera math. Grid coordinates stay integral; floats
/// exist only on this side of the fence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
            self.z + (other.z - self.z) * t,
        )
    }
}

impl From<Position> for Vec3 {
    fn from(p: Position) -> Self {
        Self::new(p.x as f32, p.y as f32, p.z as f32)
    }
}

/// Smoothed camera parameters handed to the renderer each frame.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CameraView {
    /// Look-at point.
    pub center: Vec3,
    /// Eye point: center offset along +Z by `distance`.
    pub eye: Vec3,
    pub distance: f32,
}

#[derive(Clone, Copy, Debug)]
struct Framing {
    center: Vec3,
    distance: f32,
}

/// Camera state machine: target recomputed on a fixed interval, current
/// exponentially smoothed toward it every frame.
pub struct CameraController {
    config: CameraConfig,
    grid: GridSize,
    current: Framing,
    target: Framing,
    since_retarget: f32,
}

impl CameraController {
    pub fn new(config: CameraConfig, grid: GridSize) -> Self {
        let home = Self::default_framing(&config, grid);
        Self {
            config,
            grid,
            current: home,
            target: home,
            since_retarget: 0.0,
        }
    }

    /// Centered full-grid framing, used at startup and when nothing is
    /// alive.
    fn default_framing(config: &CameraConfig, grid: GridSize) -> Framing {
        let extent = grid.x.max(grid.y).max(grid.z) as f32;
        Framing {
            center: grid.center().into(),
            distance: Self::fit(config, extent),
        }
    }

    /// Distance at which `extent` fills the field of view, with margin,
    /// clamped to the configured range.
    fn fit(config: &CameraConfig, extent: f32) -> f32 {
        let extent = extent.max(config.min_extent);
        let distance = (extent / 2.0) / (config.fov / 2.0).tan() * config.margin;
        distance.clamp(config.min_distance, config.max_distance)
    }

    /// Advance the controller by `dt` seconds, retargeting from `bounds`
    /// (min/max corner of all live segments) when the interval elapses.
    pub fn update(&mut self, bounds: Option<(Position, Position)>, dt: f32) {
        self.since_retarget += dt;
        if self.since_retarget >= self.config.retarget_interval {
            self.since_retarget = 0.0;
            self.retarget(bounds);
        }

        // Frame-rate-normalized exponential smoothing
        let t = 1.0 - (-self.config.smoothing * dt.max(0.0)).exp();
        self.current.center = self.current.center.lerp(self.target.center, t);
        self.current.distance += (self.target.distance - self.current.distance) * t;
    }

    /// Recompute the target framing immediately.
    pub fn retarget(&mut self, bounds: Option<(Position, Position)>) {
        self.target = match bounds {
            Some((min, max)) => {
                let extent = (max.x - min.x).max(max.y - min.y).max(max.z - min.z) as f32;
                Framing {
                    center: Vec3::new(
                        (min.x + max.x) as f32 / 2.0,
                        (min.y + max.y) as f32 / 2.0,
                        (min.z + max.z) as f32 / 2.0,
                    ),
                    distance: Self::fit(&self.config, extent),
                }
            }
            None => Self::default_framing(&self.config, self.grid),
        };
    }

    /// Snap straight to the target. Used on restart.
    pub fn reset(&mut self, grid: GridSize) {
        self.grid = grid;
        let home = Self::default_framing(&self.config, grid);
        self.current = home;
        self.target = home;
        self.since_retarget = 0.0;
    }

    pub fn view(&self) -> CameraView {
        let c = self.current.center;
        CameraView {
            center: c,
            eye: Vec3::new(c.x, c.y, c.z + self.current.distance),
            distance: self.current.distance,
        }
    }

    /// Resolve a cursor position (normalized device coordinates, +Y up)
    /// to the grid cell where a user-intent food spawn lands: a ray from
    /// the eye through the cursor, intersected with a fixed depth plane.
    pub fn cursor_cell(&self, ndc_x: f32, ndc_y: f32, aspect: f32) -> Position {
        let view = self.view();
        let half_tan = (self.config.fov / 2.0).tan();

        // Ray direction in camera space; the camera looks along -Z.
        let dx = ndc_x * half_tan * aspect;
        let dy = ndc_y * half_tan;
        let dz = -1.0f32;
        let len = (dx * dx + dy * dy + dz * dz).sqrt();
        let (dx, dy, dz) = (dx / len, dy / len, dz / len);

        let plane_z = self.config.cursor_plane_fraction * self.grid.z as f32;
        let t = (plane_z - view.eye.z) / dz;
        let ix = view.eye.x + t * dx;
        let iy = view.eye.y + t * dy;
        let iz = view.eye.z + t * dz;

        Position::new(
            (ix.floor() as i32).clamp(0, self.grid.x - 1),
            (iy.floor() as i32).clamp(0, self.grid.y - 1),
            (iz.floor() as i32).clamp(0, self.grid.z - 1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;

    fn controller() -> CameraController {
        CameraController::new(CameraConfig::default(), GridSize::new(100, 100, 100))
    }

    #[test]
    fn test_default_framing_targets_grid_center() {
        let cam = controller();
        let view = cam.view();
        assert_eq!(view.center, Vec3::new(50.0, 50.0, 50.0));
        assert!(view.distance > 0.0);
        assert_eq!(view.eye.z, view.center.z + view.distance);
    }

    #[test]
    fn test_retarget_frames_bounding_box() {
        let mut cam = controller();
        cam.retarget(Some((Position::new(10, 10, 10), Position::new(30, 20, 10))));
        // Let smoothing converge
        for _ in 0..300 {
            cam.update(Some((Position::new(10, 10, 10), Position::new(30, 20, 10))), 0.016);
        }
        let view = cam.view();
        assert!((view.center.x - 20.0).abs() < 0.1);
        assert!((view.center.y - 15.0).abs() < 0.1);
        assert!((view.center.z - 10.0).abs() < 0.1);
    }

    #[test]
    fn test_no_agents_resets_to_default() {
        let mut cam = controller();
        cam.retarget(Some((Position::new(0, 0, 0), Position::new(5, 5, 5))));
        cam.retarget(None);
        for _ in 0..300 {
            cam.update(None, 0.016);
        }
        assert!((cam.view().center.x - 50.0).abs() < 0.1);
    }

    #[test]
    fn test_distance_clamped_and_floored() {
        let config = CameraConfig::default();
        // A single-cell bounding box hits the extent floor, not zero
        let floor = CameraController::fit(&config, 0.0);
        assert!(floor >= config.min_distance);
        // A gigantic extent hits the max clamp
        let far = CameraController::fit(&config, 1e9);
        assert_eq!(far, config.max_distance);
    }

    #[test]
    fn test_smoothing_converges_monotonically() {
        let mut cam = controller();
        cam.retarget(Some((Position::new(0, 0, 0), Position::new(10, 10, 10))));
        let mut last_err = f32::INFINITY;
        for _ in 0..60 {
            cam.update(Some((Position::new(0, 0, 0), Position::new(10, 10, 10))), 0.016);
            let err = (cam.view().center.x - 5.0).abs();
            assert!(err <= last_err + 1e-4);
            last_err = err;
        }
    }

    #[test]
    fn test_cursor_cell_in_bounds() {
        let cam = controller();
        for (nx, ny) in [(0.0, 0.0), (-1.0, 1.0), (1.0, -1.0), (0.5, 0.25)] {
            let cell = cam.cursor_cell(nx, ny, 16.0 / 9.0);
            assert!(cell.x >= 0 && cell.x < 100);
            assert!(cell.y >= 0 && cell.y < 100);
            assert!(cell.z >= 0 && cell.z < 100);
        }
    }
}
