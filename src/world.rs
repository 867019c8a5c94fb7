//! World simulation engine - the per-tick update loop.
//!
//! Tick ordering (load-bearing): gravity drift -> plan all directions
//! against the pre-move state -> per snake: commit direction, move, eat,
//! self-collision -> pair collisions -> cluster spawn -> food expiry.
//! Planning before any snake moves means no snake sees another's
//! already-moved position within the same tick, so a run is fully
//! determined by the seed and the snake iteration order.

use log::{debug, info, warn};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::camera::CameraView;
use crate::config::{AiMode, Config, GravityMode};
use crate::food::FoodField;
use crate::grid::{Direction, GridSize, Position};
use crate::palette::{Color, Palette, FOOD_COLOR};
use crate::snake::Snake;
use crate::snapshot::{FoodView, SnakeView, WorldSnapshot};
use crate::stats::{Stats, StatsHistory};

/// Lookahead depth for the evasive AI's trapped-state search.
const EVASION_DEPTH: u32 = 3;

/// The simulation world
pub struct World {
    /// All snakes ever created this run; dead ones stay as inert records.
    pub snakes: Vec<Snake>,
    pub foods: FoodField,
    pub grid: GridSize,

    /// Completed ticks.
    pub tick: u64,
    /// Logical clock in milliseconds, advanced by `tick_ms` per tick.
    pub clock_ms: u64,

    pub config: Config,

    pub stats: Stats,
    pub stats_history: StatsHistory,

    /// Colors of the active palette, resolved at construction.
    palette_colors: Vec<Color>,

    // Random number generator (seeded for reproducibility)
    rng: ChaCha8Rng,
    seed: u64,

    births_this_tick: usize,
    deaths_this_tick: usize,
}

impl World {
    /// Create a new world with the given configuration
    pub fn new(config: Config) -> Self {
        let seed = rand::thread_rng().gen();
        Self::new_with_seed(config, seed)
    }

    /// Create a new world with a specific seed for reproducibility
    pub fn new_with_seed(mut config: Config, seed: u64) -> Self {
        config.sanitize();
        let grid = GridSize::from_aspect(config.world.base_grid_size, config.world.aspect_ratio);
        let palette_colors: Vec<Color> =
            Palette::by_name(&config.snakes.palette).colors.to_vec();

        let mut world = Self {
            snakes: Vec::new(),
            foods: FoodField::new(),
            grid,
            tick: 0,
            clock_ms: 0,
            stats: Stats::new(),
            stats_history: StatsHistory::new(config.logging.stats_interval),
            palette_colors,
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            births_this_tick: 0,
            deaths_this_tick: 0,
        };

        world.seed_snakes();
        for _ in 0..world.config.food.count {
            world.spawn_food_random();
        }
        world.update_stats();

        info!(
            "world created: grid {}x{}x{}, {} snakes, {} food, seed {}",
            world.grid.x,
            world.grid.y,
            world.grid.z,
            world.snakes.len(),
            world.foods.len(),
            world.seed
        );
        world
    }

    /// Lay the initial snakes out on an XY lattice with random depth and
    /// heading.
    fn seed_snakes(&mut self) {
        let count = self.config.snakes.count;
        let length = self.config.snakes.initial_length;
        let per_row = (count as f64).sqrt().ceil() as usize;
        let spacing = (self.grid.x / per_row.max(1) as i32).max(1);

        for i in 0..count {
            let row = (i / per_row) as i32;
            let col = (i % per_row) as i32;
            let head = Position::new(
                (col * spacing + spacing / 2).rem_euclid(self.grid.x),
                (row * spacing + spacing / 2).rem_euclid(self.grid.y),
                self.rng.gen_range(0..self.grid.z),
            );
            let dir = Direction::random(&mut self.rng);
            let color = self.random_palette_color();
            self.snakes.push(Snake::new(head, dir, color, length, self.grid));
        }
    }

    fn random_palette_color(&mut self) -> Color {
        self.palette_colors[self.rng.gen_range(0..self.palette_colors.len())]
    }

    /// Main simulation tick
    pub fn step(&mut self) {
        self.births_this_tick = 0;
        self.deaths_this_tick = 0;
        self.clock_ms += self.config.world.tick_ms;

        let gravity = self.config.food.gravity.clone();
        if gravity.mode != GravityMode::Off && self.tick % gravity.interval_ticks == 0 {
            self.foods.apply_gravity(
                self.grid,
                gravity.mode,
                gravity.edge_margin,
                self.clock_ms,
                &mut self.rng,
            );
        }

        // Phase 1: plan every snake's direction against the pre-move state
        let plans = self.plan_directions();

        // Phase 2: execute sequentially
        for (idx, dir) in plans {
            if !self.snakes[idx].alive {
                continue;
            }
            self.snakes[idx].set_direction(dir);
            self.snakes[idx].advance(self.grid);
            self.eat_at_head(idx);
            if self.snakes[idx].self_collision(self.config.snakes.self_collision_offset) {
                debug!("snake {} self-collision", idx);
                self.kill_snake(idx);
            }
        }

        // Phase 3: inter-snake collisions
        self.resolve_collisions();

        // Phase 4: density-triggered snake spawn (at most one per tick)
        self.check_food_clusters();

        // Phase 5: expire old food
        self.foods.expire(self.clock_ms, self.config.food.max_age_ms);

        self.tick += 1;
        self.update_stats();
    }

    /// Run the AI for every live snake against the pre-move world.
    fn plan_directions(&mut self) -> Vec<(usize, Direction)> {
        let mut plans = Vec::with_capacity(self.snakes.len());
        for idx in 0..self.snakes.len() {
            if !self.snakes[idx].alive {
                continue;
            }
            let dir = plan_direction(
                &self.snakes,
                &self.foods,
                self.grid,
                &self.config,
                idx,
                self.clock_ms,
                &mut self.rng,
            );
            plans.push((idx, dir));
        }
        plans
    }

    /// Head-on-food pickup: eat, grow, and immediately replace the eaten
    /// item elsewhere to maintain food density.
    fn eat_at_head(&mut self, idx: usize) {
        let head = self.snakes[idx].head();
        if let Some(i) = self.foods.index_at(head) {
            self.foods.remove(i);
            self.snakes[idx].grow();
            debug!(
                "snake {} ate at ({},{},{}), length {}",
                idx,
                head.x,
                head.y,
                head.z,
                self.snakes[idx].len()
            );
            self.spawn_food_random();
        }
    }

    /// Mark a snake dead and convert every body segment into food at the
    /// segment's position, in the snake's color. Forced spawns bypass
    /// the one-per-cell check; a dying snake's own segments are adjacent
    /// and would otherwise reject each other. Idempotent.
    pub fn kill_snake(&mut self, idx: usize) {
        if !self.snakes[idx].kill() {
            return;
        }
        self.deaths_this_tick += 1;
        let color = self.snakes[idx].color;
        let segments: Vec<Position> = self.snakes[idx].body.iter().copied().collect();
        debug!("snake {} died, dropping {} food", idx, segments.len());
        for seg in segments {
            self.foods.spawn_at(self.grid, seg, color, self.clock_ms, true);
        }
    }

    /// Resolve collisions between every pair of live snakes.
    ///
    /// Head-to-head: the shorter snake dies, equal lengths kill both.
    /// Head-to-body (either ordering, other's head excluded): the
    /// head-owner dies. A snake killed by an earlier pair no longer
    /// participates.
    fn resolve_collisions(&mut self) {
        for i in 0..self.snakes.len() {
            for j in (i + 1)..self.snakes.len() {
                if !self.snakes[i].alive || !self.snakes[j].alive {
                    continue;
                }
                let head_a = self.snakes[i].head();
                let head_b = self.snakes[j].head();

                if head_a == head_b {
                    let (len_a, len_b) = (self.snakes[i].len(), self.snakes[j].len());
                    debug!("head-to-head between {} and {}", i, j);
                    if len_a < len_b {
                        self.kill_snake(i);
                    } else if len_a > len_b {
                        self.kill_snake(j);
                    } else {
                        self.kill_snake(i);
                        self.kill_snake(j);
                    }
                    continue;
                }

                if self.snakes[j].body.iter().skip(1).any(|&s| s == head_a) {
                    debug!("snake {} head hit snake {} body", i, j);
                    self.kill_snake(i);
                }
                if self.snakes[i].body.iter().skip(1).any(|&s| s == head_b) {
                    debug!("snake {} head hit snake {} body", j, i);
                    self.kill_snake(j);
                }
            }
        }
    }

    /// Scan for one dense food region and turn it into a new length-3
    /// snake with a random heading and palette color.
    pub fn check_food_clusters(&mut self) {
        let Some(cluster) = self.foods.find_cluster(self.grid, self.config.food.cluster_min)
        else {
            return;
        };
        self.foods.remove_all(&cluster.indices);
        let dir = Direction::random(&mut self.rng);
        let color = self.random_palette_color();
        info!(
            "food cluster of {} became a snake at ({},{},{})",
            cluster.indices.len(),
            cluster.center.x,
            cluster.center.y,
            cluster.center.z
        );
        self.snakes
            .push(Snake::new(cluster.center, dir, color, 3, self.grid));
        self.births_this_tick += 1;
    }

    /// Spawn one food item at a uniformly random free cell. Bounded
    /// retries; on exhaustion the spawn is skipped until the next
    /// opportunity.
    pub fn spawn_food_random(&mut self) -> bool {
        for _ in 0..self.config.food.spawn_retry_limit {
            let pos = self.grid.random_cell(&mut self.rng);
            if self.cell_has_live_segment(pos) || self.foods.occupied(pos) {
                continue;
            }
            return self
                .foods
                .spawn_at(self.grid, pos, FOOD_COLOR, self.clock_ms, false);
        }
        warn!("no free cell found for food spawn, skipping");
        false
    }

    /// User-intent spawn: a burst of food jittered around `base`,
    /// clamped into bounds (not wrapped, matching cursor semantics).
    pub fn spawn_food_burst(&mut self, base: Position) {
        let spread = self.config.food.spawn_burst_spread;
        for _ in 0..self.config.food.spawn_burst_count {
            let pos = Position::new(
                (base.x + self.rng.gen_range(-spread..=spread)).clamp(0, self.grid.x - 1),
                (base.y + self.rng.gen_range(-spread..=spread)).clamp(0, self.grid.y - 1),
                (base.z + self.rng.gen_range(-spread..=spread)).clamp(0, self.grid.z - 1),
            );
            self.foods
                .spawn_at(self.grid, pos, FOOD_COLOR, self.clock_ms, false);
        }
    }

    fn cell_has_live_segment(&self, pos: Position) -> bool {
        self.snakes
            .iter()
            .filter(|s| s.alive)
            .any(|s| s.body.iter().any(|&seg| seg == pos))
    }

    /// Min/max corner of all live segments, for camera framing.
    pub fn live_bounds(&self) -> Option<(Position, Position)> {
        let mut bounds: Option<(Position, Position)> = None;
        for snake in self.snakes.iter().filter(|s| s.alive) {
            for &seg in &snake.body {
                bounds = Some(match bounds {
                    None => (seg, seg),
                    Some((min, max)) => (
                        Position::new(min.x.min(seg.x), min.y.min(seg.y), min.z.min(seg.z)),
                        Position::new(max.x.max(seg.x), max.y.max(seg.y), max.z.max(seg.z)),
                    ),
                });
            }
        }
        bounds
    }

    /// Build the per-frame render feed.
    pub fn snapshot(&self, camera: CameraView) -> WorldSnapshot {
        let max_age = self.config.food.max_age_ms;
        WorldSnapshot {
            tick: self.tick,
            grid: self.grid,
            snakes: self
                .snakes
                .iter()
                .map(|s| SnakeView {
                    alive: s.alive,
                    body: s.body.iter().copied().collect(),
                    color: s.color,
                })
                .collect(),
            foods: self
                .foods
                .items()
                .iter()
                .map(|f| FoodView {
                    position: f.position,
                    freshness: f.freshness(self.clock_ms, max_age),
                    color: f.color,
                })
                .collect(),
            camera,
            stats: self.stats.clone(),
        }
    }

    fn update_stats(&mut self) {
        self.stats.time = self.tick;
        self.stats.births = self.births_this_tick;
        self.stats.deaths = self.deaths_this_tick;
        self.stats.update(&self.snakes, self.foods.len());

        if self.tick % self.stats_history.interval == 0 {
            self.stats_history.record(self.stats.clone());
        }
    }

    /// Run the simulation for the given number of ticks
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.step();
        }
    }

    /// Run with a callback after every tick
    pub fn run_with_callback<F>(&mut self, ticks: u64, mut callback: F)
    where
        F: FnMut(&World, u64),
    {
        for i in 0..ticks {
            self.step();
            callback(self, i);
        }
    }

    /// Live snake count
    pub fn population(&self) -> usize {
        self.snakes.iter().filter(|s| s.alive).count()
    }

    pub fn is_extinct(&self) -> bool {
        self.population() == 0
    }

    /// Seed for reproducibility
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// Decide one snake's next direction against the pre-move world.
fn plan_direction(
    snakes: &[Snake],
    foods: &FoodField,
    grid: GridSize,
    config: &Config,
    idx: usize,
    now_ms: u64,
    rng: &mut ChaCha8Rng,
) -> Direction {
    let snake = &snakes[idx];
    let head = snake.head();

    if config.snakes.ai_mode == AiMode::Evasive {
        if let Some(dir) = evade(snakes, grid, idx, rng) {
            return dir;
        }
    }

    // No food: hold course.
    if foods.is_empty() {
        return snake.direction;
    }

    let target = match config.snakes.ai_mode {
        AiMode::Freshness => {
            // Fresh food counts as closer: d / (freshness + 0.1)
            let mut best = f32::INFINITY;
            let mut target = head;
            for f in foods.items() {
                let d = head.manhattan(f.position) as f32;
                let eff = d / (f.freshness(now_ms, config.food.max_age_ms) + 0.1);
                if eff < best {
                    best = eff;
                    target = f.position;
                }
            }
            target
        }
        _ => {
            // First minimum in iteration order wins; the tie-break is
            // deliberate, not incidental.
            let mut best = i32::MAX;
            let mut target = head;
            for f in foods.items() {
                let d = head.manhattan(f.position);
                if d < best {
                    best = d;
                    target = f.position;
                }
            }
            target
        }
    };

    let delta = (target.x - head.x, target.y - head.y, target.z - head.z);

    // Greedy persistence: keep the current heading while it closes the
    // gap on its own axis, to avoid thrashing between axes.
    if reduces_distance(snake.direction, delta) {
        return snake.direction;
    }

    if let Some(dir) = Direction::toward(delta) {
        if dir != snake.direction.opposite() && is_safe_move(snakes, grid, idx, dir) {
            return dir;
        }
    }
    snake.direction
}

/// Evasive pre-check: if continuing straight collides or leads into a
/// trapped state within the lookahead, pick a random safe, untrapped
/// direction instead. `None` means no evasion needed (or possible) and
/// food-seeking proceeds.
fn evade(snakes: &[Snake], grid: GridSize, idx: usize, rng: &mut ChaCha8Rng) -> Option<Direction> {
    let snake = &snakes[idx];
    let ahead = grid.wrap(snake.head().step(snake.direction));
    let straight_bad = !is_safe_move(snakes, grid, idx, snake.direction)
        || is_trapped(snakes, grid, idx, ahead, snake.direction, EVASION_DEPTH);
    if !straight_bad {
        return None;
    }

    let mut candidates: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|&d| d != snake.direction.opposite())
        .collect();
    candidates.shuffle(rng);

    for cand in candidates {
        if !is_safe_move(snakes, grid, idx, cand) {
            continue;
        }
        let next = grid.wrap(snake.head().step(cand));
        if !is_trapped(snakes, grid, idx, next, cand, EVASION_DEPTH) {
            return Some(cand);
        }
    }
    None
}

/// A position is trapped if no non-reversing continuation within `depth`
/// steps reaches a free cell.
fn is_trapped(
    snakes: &[Snake],
    grid: GridSize,
    idx: usize,
    pos: Position,
    came_from: Direction,
    depth: u32,
) -> bool {
    if depth == 0 {
        return false;
    }
    for dir in Direction::ALL {
        if dir == came_from.opposite() {
            continue;
        }
        let next = grid.wrap(pos.step(dir));
        if !cell_blocked(snakes, idx, next) && !is_trapped(snakes, grid, idx, next, dir, depth - 1)
        {
            return false;
        }
    }
    true
}

/// Candidate next-head cell check: free of the snake's own segments
/// (its current tail is vacated this tick) and of every live segment of
/// every other snake.
fn is_safe_move(snakes: &[Snake], grid: GridSize, idx: usize, dir: Direction) -> bool {
    let cand = grid.wrap(snakes[idx].head().step(dir));
    !cell_blocked(snakes, idx, cand)
}

fn cell_blocked(snakes: &[Snake], idx: usize, cand: Position) -> bool {
    let own = &snakes[idx];
    let keep = own.len().saturating_sub(1); // tail cell is vacated
    if own.body.iter().take(keep).any(|&s| s == cand) {
        return true;
    }
    snakes.iter().enumerate().any(|(j, other)| {
        j != idx && other.alive && other.body.iter().any(|&s| s == cand)
    })
}

fn reduces_distance(dir: Direction, delta: (i32, i32, i32)) -> bool {
    let (ux, uy, uz) = dir.delta();
    let (dx, dy, dz) = delta;
    (ux != 0 && dx.signum() == ux) || (uy != 0 && dy.signum() == uy) || (uz != 0 && dz.signum() == uz)
}
