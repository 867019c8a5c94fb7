//! Snake agent: body segments, direction state machine, lifecycle.

use std::collections::VecDeque;

use crate::grid::{Direction, GridSize, Position};
use crate::palette::Color;

/// A snake agent on the lattice.
///
/// The body is head-first; every position is stored wrapped. Dead snakes
/// stay in the world's collection as inert records, so `alive` gates all
/// behavior.
#[derive(Clone, Debug)]
pub struct Snake {
    /// Ordered segments, head at the front. Never empty.
    pub body: VecDeque<Position>,
    /// Direction committed by the last move.
    pub direction: Direction,
    /// Direction requested for the next move. Never the exact opposite
    /// of `direction`.
    pending_direction: Direction,
    pub alive: bool,
    pub color: Color,
}

impl Snake {
    /// Create a snake of `length` segments with its head at `head`,
    /// trailing away opposite to `direction`.
    pub fn new(head: Position, direction: Direction, color: Color, length: usize, grid: GridSize) -> Self {
        let length = length.max(1);
        let back = direction.opposite();
        let mut body = VecDeque::with_capacity(length);
        let mut seg = grid.wrap(head);
        for _ in 0..length {
            body.push_back(seg);
            seg = grid.wrap(seg.step(back));
        }
        Self {
            body,
            direction,
            pending_direction: direction,
            alive: true,
            color,
        }
    }

    /// Build a snake from explicit segments (head first). Positions are
    /// taken as-is; callers pass wrapped coordinates.
    pub fn from_body(body: Vec<Position>, direction: Direction, color: Color) -> Self {
        debug_assert!(!body.is_empty());
        Self {
            body: body.into(),
            direction,
            pending_direction: direction,
            alive: true,
            color,
        }
    }

    #[inline]
    pub fn head(&self) -> Position {
        self.body[0]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    /// Request a direction for the next move. An exact reversal of the
    /// committed direction is rejected, not queued.
    pub fn set_direction(&mut self, new_dir: Direction) {
        if new_dir != self.direction.opposite() {
            self.pending_direction = new_dir;
        }
    }

    /// Commit the pending direction and take one step: new head one cell
    /// along the direction (wrapped), tail dropped. Length is preserved.
    pub fn advance(&mut self, grid: GridSize) {
        debug_assert!(self.alive);
        self.direction = self.pending_direction;
        let head = grid.wrap(self.head().step(self.direction));
        self.body.push_front(head);
        self.body.pop_back();
    }

    /// Duplicate the tail segment, growing by one without moving the head.
    pub fn grow(&mut self) {
        if let Some(&tail) = self.body.back() {
            self.body.push_back(tail);
        }
    }

    /// True if the head coincides with any segment from `skip_offset`
    /// onward. Segments immediately behind the head are geometrically
    /// unreachable and would report false positives during tight turns,
    /// hence the offset.
    pub fn self_collision(&self, skip_offset: usize) -> bool {
        let head = self.head();
        self.body.iter().skip(skip_offset.max(2)).any(|&seg| seg == head)
    }

    /// Mark the snake dead. Idempotent: returns `true` only on the call
    /// that flipped the state, so the caller deposits food exactly once.
    pub fn kill(&mut self) -> bool {
        if self.alive {
            self.alive = false;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::from_rgb(0xef4444);

    fn grid() -> GridSize {
        GridSize::new(10, 10, 10)
    }

    #[test]
    fn test_new_body_trails_behind() {
        let s = Snake::new(Position::new(5, 5, 5), Direction::PosX, RED, 3, grid());
        let body: Vec<_> = s.body.iter().copied().collect();
        assert_eq!(
            body,
            vec![
                Position::new(5, 5, 5),
                Position::new(4, 5, 5),
                Position::new(3, 5, 5)
            ]
        );
    }

    #[test]
    fn test_new_body_wraps() {
        let s = Snake::new(Position::new(0, 0, 0), Direction::PosX, RED, 3, grid());
        assert_eq!(s.body[2], Position::new(8, 0, 0));
    }

    #[test]
    fn test_reversal_rejected() {
        let mut s = Snake::new(Position::new(5, 5, 5), Direction::PosX, RED, 3, grid());
        s.set_direction(Direction::NegX);
        assert_eq!(s.pending_direction(), Direction::PosX);

        s.set_direction(Direction::PosY);
        assert_eq!(s.pending_direction(), Direction::PosY);
    }

    #[test]
    fn test_advance_preserves_length_and_adjacency() {
        let g = grid();
        let mut s = Snake::new(Position::new(5, 5, 5), Direction::PosX, RED, 4, g);
        let before = s.head();
        s.advance(g);
        assert_eq!(s.len(), 4);
        assert_eq!(s.head(), Position::new(6, 5, 5));
        // New head is one wrapped step from the old one
        assert_eq!(g.wrap(before.step(s.direction)), s.head());
    }

    #[test]
    fn test_advance_commits_pending() {
        let g = grid();
        let mut s = Snake::new(Position::new(5, 5, 5), Direction::PosX, RED, 3, g);
        s.set_direction(Direction::PosZ);
        s.advance(g);
        assert_eq!(s.direction, Direction::PosZ);
        assert_eq!(s.head(), Position::new(5, 5, 6));
    }

    #[test]
    fn test_advance_wraps_head() {
        let g = grid();
        let mut s = Snake::new(Position::new(9, 5, 5), Direction::PosX, RED, 3, g);
        s.advance(g);
        assert_eq!(s.head(), Position::new(0, 5, 5));
    }

    #[test]
    fn test_grow_duplicates_tail() {
        let g = grid();
        let mut s = Snake::new(Position::new(5, 5, 5), Direction::PosX, RED, 3, g);
        s.grow();
        assert_eq!(s.len(), 4);
        assert_eq!(s.body[3], s.body[2]);
        assert_eq!(s.head(), Position::new(5, 5, 5));
    }

    #[test]
    fn test_short_snake_cannot_self_collide() {
        let g = grid();
        // Walk a tight square; with length <= skip offset there is nothing
        // far enough back to collide with.
        let mut s = Snake::new(Position::new(5, 5, 5), Direction::PosX, RED, 4, g);
        for dir in [Direction::PosY, Direction::NegX, Direction::NegY, Direction::PosX] {
            s.set_direction(dir);
            s.advance(g);
            assert!(!s.self_collision(4));
        }
    }

    #[test]
    fn test_self_collision_detected_past_offset() {
        // Head placed directly on a segment beyond the skip offset.
        let body = vec![
            Position::new(5, 5, 5),
            Position::new(6, 5, 5),
            Position::new(6, 6, 5),
            Position::new(5, 6, 5),
            Position::new(5, 5, 5),
            Position::new(4, 5, 5),
        ];
        let s = Snake::from_body(body, Direction::NegY, RED);
        assert!(s.self_collision(4));
        assert!(!s.self_collision(5));
    }

    #[test]
    fn test_kill_is_idempotent() {
        let mut s = Snake::new(Position::new(5, 5, 5), Direction::PosX, RED, 3, grid());
        assert!(s.kill());
        assert!(!s.alive);
        assert!(!s.kill());
    }
}
