//! # VOXEL SERPENTS
//!
//! Simulation core for a 3D toroidal multi-snake world: autonomous
//! snake agents that chase food, grow, collide, die into food, and
//! re-emerge when enough food clusters together.
//!
//! The crate owns the simulation only. Rendering, input wiring, and the
//! control panel are external collaborators that consume the per-frame
//! [`snapshot::WorldSnapshot`] and drive the core through
//! [`commands::SimCommand`].
//!
//! ## Quick start
//!
//! ```rust
//! use voxel_serpents::{Config, World};
//!
//! let mut config = Config::default();
//! config.world.base_grid_size = 30;
//! config.snakes.count = 20;
//!
//! let mut world = World::new_with_seed(config, 42);
//! world.run(100);
//!
//! println!("alive: {}", world.population());
//! println!("food: {}", world.foods.len());
//! ```
//!
//! ## Threaded host
//!
//! ```rust,no_run
//! use voxel_serpents::{Config, SimulationHandle};
//!
//! let mut handle = SimulationHandle::spawn(Config::default());
//! if let Some(snapshot) = handle.try_recv_snapshot() {
//!     // hand to the renderer
//!     let _ = snapshot.camera;
//! }
//! handle.shutdown();
//! ```

pub mod camera;
pub mod commands;
pub mod config;
pub mod food;
pub mod grid;
pub mod palette;
pub mod sim_thread;
pub mod snake;
pub mod snapshot;
pub mod stats;
pub mod world;

// Re-export main types
pub use config::Config;
pub use sim_thread::SimulationHandle;
pub use snake::Snake;
pub use world::World;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run a quick throughput benchmark
pub fn benchmark(ticks: u64, snakes: usize) -> BenchmarkResult {
    use std::time::Instant;

    let mut config = Config::default();
    config.world.base_grid_size = 60;
    config.world.aspect_ratio = 1.0;
    config.snakes.count = snakes;

    let mut world = World::new(config);

    let start = Instant::now();
    world.run(ticks);
    let elapsed = start.elapsed();

    BenchmarkResult {
        ticks,
        initial_snakes: snakes,
        final_population: world.population(),
        food_count: world.foods.len(),
        elapsed_secs: elapsed.as_secs_f64(),
        ticks_per_second: ticks as f64 / elapsed.as_secs_f64(),
    }
}

/// Benchmark result
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub ticks: u64,
    pub initial_snakes: usize,
    pub final_population: usize,
    pub food_count: usize,
    pub elapsed_secs: f64,
    pub ticks_per_second: f64,
}

impl std::fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Benchmark Results ===")?;
        writeln!(f, "Ticks: {}", self.ticks)?;
        writeln!(
            f,
            "Snakes: {} -> {}",
            self.initial_snakes, self.final_population
        )?;
        writeln!(f, "Food: {}", self.food_count)?;
        writeln!(f, "Time: {:.3}s", self.elapsed_secs)?;
        writeln!(f, "Speed: {:.1} ticks/s", self.ticks_per_second)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_benchmark_runs() {
        let result = benchmark(10, 5);
        assert_eq!(result.ticks, 10);
        assert!(result.ticks_per_second > 0.0);
    }
}
