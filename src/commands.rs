//! Commands for controlling the simulation from a host UI.

use serde::{Deserialize, Serialize};

use crate::config::{AiMode, Config, GravityMode};

/// Commands sent from the host to the simulation thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SimCommand {
    /// Pause the simulation
    Pause,
    /// Resume the simulation
    Resume,
    /// Execute a single tick while paused
    Step,
    /// Set simulation speed multiplier (0.1 - 10.0)
    SetSpeed(f32),
    /// Restart with the current config
    Reset,
    /// Restart with new settings
    ResetWithSettings(SimSettings),
    /// Spawn a food burst where the cursor ray meets the depth plane.
    /// Coordinates are normalized device coordinates, +Y up.
    SpawnFoodAtCursor { ndc_x: f32, ndc_y: f32, aspect: f32 },
    /// Spawn a food burst around an explicit grid cell
    SpawnFoodAt { x: i32, y: i32, z: i32 },
    /// Shutdown the simulation thread
    Shutdown,
}

/// Simulation thread state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimState {
    Running,
    Paused,
    Stopped,
}

/// The settings a host control panel can change. Applied only through a
/// restart; a running world never sees them change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimSettings {
    pub snake_count: usize,
    pub initial_snake_length: usize,
    pub food_count: usize,
    pub food_max_age_ms: u64,
    pub palette: String,
    pub base_grid_size: i32,
    pub aspect_ratio: f32,
    pub ai_mode: AiMode,
    pub gravity_mode: GravityMode,
}

impl Default for SimSettings {
    fn default() -> Self {
        let config = Config::default();
        Self::from_config(&config)
    }
}

impl SimSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            snake_count: config.snakes.count,
            initial_snake_length: config.snakes.initial_length,
            food_count: config.food.count,
            food_max_age_ms: config.food.max_age_ms,
            palette: config.snakes.palette.clone(),
            base_grid_size: config.world.base_grid_size,
            aspect_ratio: config.world.aspect_ratio,
            ai_mode: config.snakes.ai_mode,
            gravity_mode: config.food.gravity.mode,
        }
    }

    /// Overlay these settings onto a config for the restarted world.
    pub fn apply_to(&self, config: &mut Config) {
        config.snakes.count = self.snake_count.max(1);
        config.snakes.initial_length = self.initial_snake_length.max(1);
        config.food.count = self.food_count;
        config.food.max_age_ms = self.food_max_age_ms.max(1);
        config.snakes.palette = self.palette.clone();
        config.world.base_grid_size = self.base_grid_size.max(1);
        config.world.aspect_ratio = if self.aspect_ratio > 0.0 {
            self.aspect_ratio
        } else {
            config.world.aspect_ratio
        };
        config.snakes.ai_mode = self.ai_mode;
        config.food.gravity.mode = self.gravity_mode;
    }
}
