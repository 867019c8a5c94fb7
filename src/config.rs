//! Configuration for the simulation.
//!
//! Supports YAML configuration files with sensible defaults. Config is
//! read at initialization or restart and immutable during a run.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub world: WorldConfig,
    pub snakes: SnakeConfig,
    pub food: FoodConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Grid and clock configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Base size for the smallest grid dimension
    pub base_grid_size: i32,
    /// Viewport aspect ratio the grid is derived from
    pub aspect_ratio: f32,
    /// Logical milliseconds the clock advances per tick
    pub tick_ms: u64,
}

/// Snake agent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnakeConfig {
    /// Number of snakes at start
    pub count: usize,
    /// Starting segments per snake
    pub initial_length: usize,
    /// Body index self-collision checks start from (min 2)
    pub self_collision_offset: usize,
    /// Targeting behavior
    pub ai_mode: AiMode,
    /// Active palette identifier
    pub palette: String,
}

/// Food configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodConfig {
    /// Food items maintained at start
    pub count: usize,
    /// Max lifetime in logical milliseconds
    pub max_age_ms: u64,
    /// Food items in a clustered region needed to spawn a snake
    pub cluster_min: usize,
    /// Items per cursor-spawn burst
    pub spawn_burst_count: usize,
    /// Spread (in cells) of a cursor-spawn burst
    pub spawn_burst_spread: i32,
    /// Attempts before a random spawn is skipped
    pub spawn_retry_limit: usize,
    #[serde(default)]
    pub gravity: GravityConfig,
}

/// Optional gravity-like food drift
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GravityConfig {
    pub mode: GravityMode,
    /// Ticks between drift passes
    pub interval_ticks: u64,
    /// Under push, items this close to a face teleport back near center
    pub edge_margin: i32,
}

/// Direction of the gravity drift relative to the grid center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GravityMode {
    Off,
    Pull,
    Push,
}

/// Targeting behavior for snake AI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiMode {
    /// Chase the food with the lowest Manhattan distance. Ties break by
    /// iteration order, first minimum wins.
    Nearest,
    /// Chase the food with the lowest age-weighted effective distance
    /// (fresh food counts as closer).
    Freshness,
    /// Nearest, plus a bounded lookahead that steers away from trapped
    /// states before food-seeking.
    Evasive,
}

/// Camera framing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Vertical field of view in radians
    pub fov: f32,
    /// Extra framing margin applied to the fitted distance
    pub margin: f32,
    /// Distance clamp, in cell units
    pub min_distance: f32,
    pub max_distance: f32,
    /// Bounding-extent floor, avoids extreme zoom on a lone short snake
    pub min_extent: f32,
    /// Exponential smoothing rate per second
    pub smoothing: f32,
    /// Seconds between target recomputations
    pub retarget_interval: f32,
    /// Depth plane for cursor food spawns, as a fraction of grid Z
    pub cursor_plane_fraction: f32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Ticks between stats history samples
    pub stats_interval: u64,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            snakes: SnakeConfig::default(),
            food: FoodConfig::default(),
            camera: CameraConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            base_grid_size: 200,
            aspect_ratio: 16.0 / 9.0,
            tick_ms: 16,
        }
    }
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            count: 100,
            initial_length: 5,
            self_collision_offset: 4,
            ai_mode: AiMode::Nearest,
            palette: "default".to_string(),
        }
    }
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            count: 100,
            max_age_ms: 10_000,
            cluster_min: 9,
            spawn_burst_count: 3,
            spawn_burst_spread: 2,
            spawn_retry_limit: 64,
            gravity: GravityConfig::default(),
        }
    }
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            mode: GravityMode::Off,
            interval_ticks: 10,
            edge_margin: 2,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: std::f32::consts::FRAC_PI_3,
            margin: 1.2,
            min_distance: 20.0,
            max_distance: 2000.0,
            min_extent: 10.0,
            smoothing: 4.0,
            retarget_interval: 0.25,
            cursor_plane_fraction: 0.4,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            stats_interval: 50,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        config.sanitize();
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Reject configurations that cannot produce a consistent world.
    pub fn validate(&self) -> Result<(), String> {
        if self.world.base_grid_size <= 0 {
            return Err("base_grid_size must be > 0".to_string());
        }
        if !(self.world.aspect_ratio.is_finite() && self.world.aspect_ratio > 0.0) {
            return Err("aspect_ratio must be a positive finite number".to_string());
        }
        if self.snakes.count == 0 {
            return Err("snake count must be > 0".to_string());
        }
        if self.food.max_age_ms == 0 {
            return Err("food max_age_ms must be > 0".to_string());
        }
        if self.camera.min_distance > self.camera.max_distance {
            return Err("camera min_distance cannot exceed max_distance".to_string());
        }
        Ok(())
    }

    /// Clamp recoverable values to safe minimums. Invalid values never
    /// reach the tick loop.
    pub fn sanitize(&mut self) {
        self.world.tick_ms = self.world.tick_ms.max(1);
        self.snakes.initial_length = self.snakes.initial_length.max(1);
        self.snakes.self_collision_offset = self.snakes.self_collision_offset.max(2);
        self.food.cluster_min = self.food.cluster_min.max(2);
        self.food.spawn_retry_limit = self.food.spawn_retry_limit.max(1);
        self.food.spawn_burst_spread = self.food.spawn_burst_spread.max(0);
        self.food.gravity.interval_ticks = self.food.gravity.interval_ticks.max(1);
        self.food.gravity.edge_margin = self.food.gravity.edge_margin.max(1);
        self.camera.smoothing = self.camera.smoothing.max(0.01);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let loaded: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config.world.base_grid_size, loaded.world.base_grid_size);
        assert_eq!(config.snakes.ai_mode, loaded.snakes.ai_mode);
    }

    #[test]
    fn test_zero_counts_rejected() {
        let mut config = Config::default();
        config.snakes.count = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.world.base_grid_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sanitize_clamps_minimums() {
        let mut config = Config::default();
        config.snakes.self_collision_offset = 0;
        config.world.tick_ms = 0;
        config.food.cluster_min = 0;
        config.sanitize();
        assert_eq!(config.snakes.self_collision_offset, 2);
        assert_eq!(config.world.tick_ms, 1);
        assert_eq!(config.food.cluster_min, 2);
    }

    #[test]
    fn test_ai_mode_yaml_names() {
        let mode: AiMode = serde_yaml::from_str("freshness").unwrap();
        assert_eq!(mode, AiMode::Freshness);
        let mode: GravityMode = serde_yaml::from_str("push").unwrap();
        assert_eq!(mode, GravityMode::Push);
    }
}
