//! Lattice geometry: grid bounds, positions, and axis directions.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Bounds of the 3D wrap-around lattice.
///
/// All coordinates in the simulation are stored normalized into
/// `[0, size)` per axis; [`GridSize::wrap`] is the single place that
/// normalization happens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl GridSize {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        debug_assert!(x > 0 && y > 0 && z > 0);
        Self { x, y, z }
    }

    /// Derive grid bounds from a base size and a viewport aspect ratio.
    ///
    /// Wider-than-tall viewports stretch X and Z; taller-than-wide
    /// viewports stretch Y. The smallest dimension is always `base`.
    pub fn from_aspect(base: i32, aspect: f32) -> Self {
        let base = base.max(1);
        if aspect > 1.0 {
            let long = ((base as f32 * aspect) as i32).max(base);
            Self::new(long, base, long)
        } else {
            let tall = ((base as f32 / aspect.max(f32::EPSILON)) as i32).max(base);
            Self::new(base, tall, base)
        }
    }

    /// Normalize a position into `[0, size)` on every axis.
    #[inline]
    pub fn wrap(&self, p: Position) -> Position {
        Position {
            x: p.x.rem_euclid(self.x),
            y: p.y.rem_euclid(self.y),
            z: p.z.rem_euclid(self.z),
        }
    }

    /// Axis-wise equality after wrapping both operands.
    #[inline]
    pub fn equals_wrapped(&self, a: Position, b: Position) -> bool {
        self.wrap(a) == self.wrap(b)
    }

    /// Shortest wrapped distance between two coordinates on one axis.
    #[inline]
    fn axis_distance(size: i32, a: i32, b: i32) -> i32 {
        let d = (a - b).rem_euclid(size);
        d.min(size - d)
    }

    /// True if `a` and `b` lie within `r` cells of each other on every
    /// axis, measured the short way around. A radius of 1 describes a
    /// 3x3x3 cube centered on either position.
    pub fn within_cube(&self, a: Position, b: Position, r: i32) -> bool {
        Self::axis_distance(self.x, a.x, b.x) <= r
            && Self::axis_distance(self.y, a.y, b.y) <= r
            && Self::axis_distance(self.z, a.z, b.z) <= r
    }

    /// Center cell of the grid.
    pub fn center(&self) -> Position {
        Position::new(self.x / 2, self.y / 2, self.z / 2)
    }

    /// Uniformly random cell.
    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> Position {
        Position::new(
            rng.gen_range(0..self.x),
            rng.gen_range(0..self.y),
            rng.gen_range(0..self.z),
        )
    }
}

/// Integer lattice position. A plain value type, not an entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Position one step along `dir`, unwrapped.
    #[inline]
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy, dz) = dir.delta();
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Plain Manhattan distance, no wraparound shortcut. This is the
    /// metric the baseline AI targets with.
    #[inline]
    pub fn manhattan(self, other: Self) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs() + (self.z - other.z).abs()
    }
}

/// One of the six axis unit vectors. Never zero during motion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::PosX,
        Direction::NegX,
        Direction::PosY,
        Direction::NegY,
        Direction::PosZ,
        Direction::NegZ,
    ];

    #[inline]
    pub const fn delta(self) -> (i32, i32, i32) {
        match self {
            Direction::PosX => (1, 0, 0),
            Direction::NegX => (-1, 0, 0),
            Direction::PosY => (0, 1, 0),
            Direction::NegY => (0, -1, 0),
            Direction::PosZ => (0, 0, 1),
            Direction::NegZ => (0, 0, -1),
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::PosX => Direction::NegX,
            Direction::NegX => Direction::PosX,
            Direction::PosY => Direction::NegY,
            Direction::NegY => Direction::PosY,
            Direction::PosZ => Direction::NegZ,
            Direction::NegZ => Direction::PosZ,
        }
    }

    /// Signed unit direction along the axis of the largest absolute
    /// component of `delta`. Returns `None` for the zero vector.
    pub fn toward(delta: (i32, i32, i32)) -> Option<Self> {
        let (dx, dy, dz) = delta;
        let (ax, ay, az) = (dx.abs(), dy.abs(), dz.abs());
        if ax == 0 && ay == 0 && az == 0 {
            return None;
        }
        Some(if ax >= ay && ax >= az {
            if dx > 0 { Direction::PosX } else { Direction::NegX }
        } else if ay >= az {
            if dy > 0 { Direction::PosY } else { Direction::NegY }
        } else if dz > 0 {
            Direction::PosZ
        } else {
            Direction::NegZ
        })
    }

    /// Uniformly random direction.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}
