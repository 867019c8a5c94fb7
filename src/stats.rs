//! Statistics tracking for the simulation.

use crate::snake::Snake;
use serde::{Deserialize, Serialize};

/// Statistics snapshot for a simulation tick
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Stats {
    /// Current tick
    pub time: u64,
    /// Live snake count
    pub population: usize,
    /// Total snakes ever created this run (dead records included)
    pub total_spawned: usize,
    /// Live food item count
    pub food_count: usize,
    /// Mean body length across live snakes
    pub length_mean: f32,
    /// Longest live snake
    pub length_max: usize,
    /// Cluster spawns this tick
    pub births: usize,
    /// Snake deaths this tick
    pub deaths: usize,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update stats from current simulation state
    pub fn update(&mut self, snakes: &[Snake], food_count: usize) {
        self.total_spawned = snakes.len();
        self.food_count = food_count;

        let alive: Vec<&Snake> = snakes.iter().filter(|s| s.alive).collect();
        self.population = alive.len();

        if alive.is_empty() {
            self.length_mean = 0.0;
            self.length_max = 0;
        } else {
            let total: usize = alive.iter().map(|s| s.len()).sum();
            self.length_mean = total as f32 / alive.len() as f32;
            self.length_max = alive.iter().map(|s| s.len()).max().unwrap_or(0);
        }
    }

    /// Save stats to JSON file
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }

    /// Load stats from JSON file
    pub fn load_json(path: &str) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

/// Interval-sampled stats history
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StatsHistory {
    /// Ticks between recorded samples
    pub interval: u64,
    entries: Vec<Stats>,
}

impl StatsHistory {
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, stats: Stats) {
        self.entries.push(stats);
    }

    pub fn entries(&self) -> &[Stats] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&Stats> {
        self.entries.last()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
