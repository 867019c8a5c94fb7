//! Food lifecycle: spawning, aging, clustering, and gravity drift.

use serde::{Deserialize, Serialize};

use crate::config::GravityMode;
use crate::grid::{Direction, GridSize, Position};
use crate::palette::Color;

/// A single-cell food entity.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct FoodItem {
    pub position: Position,
    /// Logical-clock timestamp of creation, in milliseconds.
    pub birth_ms: u64,
    pub color: Color,
}

impl FoodItem {
    /// Remaining-life fraction: 1.0 when fresh, 0.0 at expiry.
    pub fn freshness(&self, now_ms: u64, max_age_ms: u64) -> f32 {
        if max_age_ms == 0 {
            return 0.0;
        }
        let age = now_ms.saturating_sub(self.birth_ms);
        (1.0 - age as f32 / max_age_ms as f32).clamp(0.0, 1.0)
    }
}

/// A qualifying dense sub-region of food, ready to become a snake.
#[derive(Clone, Debug)]
pub struct FoodCluster {
    /// Indices of the contributing items, ascending.
    pub indices: Vec<usize>,
    /// Rounded mean position of the contributing items, wrapped.
    pub center: Position,
}

/// The collection of live food items.
///
/// At most one item per cell, enforced at spawn time only; a forced
/// spawn (snake death deposit) bypasses the check.
#[derive(Clone, Debug, Default)]
pub struct FoodField {
    items: Vec<FoodItem>,
}

impl FoodField {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn items(&self) -> &[FoodItem] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Index of the item occupying `pos`, if any.
    pub fn index_at(&self, pos: Position) -> Option<usize> {
        self.items.iter().position(|f| f.position == pos)
    }

    pub fn occupied(&self, pos: Position) -> bool {
        self.index_at(pos).is_some()
    }

    /// Insert an item at `pos` (wrapped into bounds). Without `force`
    /// an occupied cell rejects the spawn; with it the insert is
    /// unconditional. Returns whether an item was inserted.
    pub fn spawn_at(
        &mut self,
        grid: GridSize,
        pos: Position,
        color: Color,
        birth_ms: u64,
        force: bool,
    ) -> bool {
        let pos = grid.wrap(pos);
        if !force && self.occupied(pos) {
            return false;
        }
        self.items.push(FoodItem {
            position: pos,
            birth_ms,
            color,
        });
        true
    }

    pub fn remove(&mut self, index: usize) -> FoodItem {
        self.items.remove(index)
    }

    /// Drop every item older than `max_age_ms`.
    pub fn expire(&mut self, now_ms: u64, max_age_ms: u64) {
        self.items
            .retain(|f| now_ms.saturating_sub(f.birth_ms) <= max_age_ms);
    }

    /// Find one dense sub-region: a 3x3x3 cube (wrap-aware) centered on
    /// some item that holds at least `min_items` items. First hit in
    /// iteration order wins; callers perform at most one spawn per tick.
    pub fn find_cluster(&self, grid: GridSize, min_items: usize) -> Option<FoodCluster> {
        if self.items.len() < min_items {
            return None;
        }
        for anchor in &self.items {
            let indices: Vec<usize> = self
                .items
                .iter()
                .enumerate()
                .filter(|(_, f)| grid.within_cube(anchor.position, f.position, 1))
                .map(|(i, _)| i)
                .collect();
            if indices.len() >= min_items {
                let n = indices.len() as f64;
                let (sx, sy, sz) = indices.iter().fold((0f64, 0f64, 0f64), |acc, &i| {
                    let p = self.items[i].position;
                    (acc.0 + p.x as f64, acc.1 + p.y as f64, acc.2 + p.z as f64)
                });
                let center = grid.wrap(Position::new(
                    (sx / n).round() as i32,
                    (sy / n).round() as i32,
                    (sz / n).round() as i32,
                ));
                return Some(FoodCluster { indices, center });
            }
        }
        None
    }

    /// Remove the given items, highest index first so earlier indices
    /// stay valid.
    pub fn remove_all(&mut self, indices: &[usize]) {
        let mut sorted = indices.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        for i in sorted {
            self.items.remove(i);
        }
    }

    /// Nudge every item one cell along its dominant axis of offset from
    /// the grid center, toward it (pull) or away from it (push). Moves
    /// into occupied cells are skipped. Under push, items inside
    /// `edge_margin` of any face are instead teleported back near the
    /// center with a reset birth time, so they do not pile up and expire
    /// at the faces.
    pub fn apply_gravity<R: rand::Rng>(
        &mut self,
        grid: GridSize,
        mode: GravityMode,
        edge_margin: i32,
        now_ms: u64,
        rng: &mut R,
    ) {
        if mode == GravityMode::Off {
            return;
        }
        let center = grid.center();
        for i in 0..self.items.len() {
            let pos = self.items[i].position;

            if mode == GravityMode::Push && near_face(grid, pos, edge_margin) {
                let jitter = Position::new(
                    rng.gen_range(-2..=2),
                    rng.gen_range(-2..=2),
                    rng.gen_range(-2..=2),
                );
                let back = grid.wrap(Position::new(
                    center.x + jitter.x,
                    center.y + jitter.y,
                    center.z + jitter.z,
                ));
                self.items[i].position = back;
                self.items[i].birth_ms = now_ms;
                continue;
            }

            let offset = (pos.x - center.x, pos.y - center.y, pos.z - center.z);
            let Some(away) = Direction::toward(offset) else {
                continue; // already at center
            };
            let dir = match mode {
                GravityMode::Pull => away.opposite(),
                GravityMode::Push => away,
                GravityMode::Off => unreachable!(),
            };
            let target = grid.wrap(pos.step(dir));
            if !self.occupied(target) {
                self.items[i].position = target;
            }
        }
    }
}

fn near_face(grid: GridSize, pos: Position, margin: i32) -> bool {
    pos.x < margin
        || pos.y < margin
        || pos.z < margin
        || pos.x >= grid.x - margin
        || pos.y >= grid.y - margin
        || pos.z >= grid.z - margin
}
